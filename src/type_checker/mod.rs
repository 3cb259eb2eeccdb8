//! Scope and type checking module.
//!
//! This module performs semantic analysis on the parsed AST in two passes:
//!
//! - Pass A declares global variables and every procedure/function signature,
//!   then rejects names shared between those categories
//! - Pass B checks each procedure, function and main body in its own scope:
//!   declarations, name resolution, call kinds and arity, operand types and
//!   condition types
//!
//! Expressions are annotated in place with their inferred type, and every
//! identifier is annotated with the unique name of the symbol it resolves to.

pub mod symbol_table;
pub mod type_checker;

#[cfg(test)]
mod tests;
