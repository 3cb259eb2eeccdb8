//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! A predictive recursive-descent parser for the LL(1) SPL grammar. Each
//! production is one function; every choice between alternatives is made by
//! looking at the current token against the FIRST sets in [`lookups`].
//!
//! - Program structure (`glob`, `proc`, `func`, `main` sections)
//! - Instructions, dispatched through the instruction lookup table
//! - Terms, assignment right-hand sides, call arguments and print outputs
//!
//! There is no error recovery: the first token that fits no alternative
//! aborts parsing with a syntax error listing what was expected.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
