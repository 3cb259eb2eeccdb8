//! Error types and error handling for the front end.
//!
//! Every phase reports failures through a single [`errors::Error`] value
//! carrying the failing [`errors::ErrorImpl`] and the source position it
//! refers to. Analysis stops at the first error.

pub mod errors;
