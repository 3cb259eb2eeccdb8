//! Lexical analysis module.
//!
//! Converts SPL source text into the token stream consumed by the parser:
//!
//! - Tokenization using an ordered table of anchored regex patterns
//! - Recognition of keywords, word operators, identifiers and literals
//! - Line/column tracking for error reporting
//! - Whitespace and `//` comment skipping

pub mod lexer;
pub mod tokens;
