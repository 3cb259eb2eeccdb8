/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: program, definitions, identifiers and atoms
/// - expressions: terms, operators and function calls
/// - statements: instructions and algorithms
/// - types: the value types assigned by the type checker
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
