use std::fmt::Display;

use thiserror::Error;

use crate::{ast::types::ValueType, type_checker::symbol_table::SymbolKind, Position};

#[derive(Error, Debug, Clone)]
#[error("{internal_error} at {position}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::InvalidLiteral { .. } => "InvalidLiteral",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::SyntaxError { .. } => "SyntaxError",
            ErrorImpl::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            ErrorImpl::ParamShadow { .. } => "ParamShadow",
            ErrorImpl::GlobalNameClash { .. } => "GlobalNameClash",
            ErrorImpl::UndefinedVariable { .. } => "UndefinedVariable",
            ErrorImpl::UndefinedFunction { .. } => "UndefinedFunction",
            ErrorImpl::UndefinedProcedure { .. } => "UndefinedProcedure",
            ErrorImpl::NotAProcedure { .. } => "NotAProcedure",
            ErrorImpl::NotAFunction { .. } => "NotAFunction",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::UnaryTypeError { .. } => "UnaryTypeError",
            ErrorImpl::BinaryTypeError { .. } => "BinaryTypeError",
            ErrorImpl::ConditionTypeError { .. } => "ConditionTypeError",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::ReturnTypeError { .. } => "ReturnTypeError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::InvalidLiteral { token, message } => {
                ErrorTip::Suggestion(format!("Invalid literal `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::SyntaxError { expected, found } => ErrorTip::Suggestion(format!(
                "Expected one of {}, found `{}`",
                expected.join(", "),
                found
            )),
            ErrorImpl::DuplicateDeclaration { name } => {
                ErrorTip::Suggestion(format!("`{}` is already declared in this scope", name))
            }
            ErrorImpl::ParamShadow { name } => ErrorTip::Suggestion(format!(
                "Local `{}` shadows a parameter of the same name",
                name
            )),
            ErrorImpl::GlobalNameClash { name, first, second } => ErrorTip::Suggestion(format!(
                "`{}` is declared both as a {} and as a {}",
                name, first, second
            )),
            ErrorImpl::UndefinedVariable { name } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", name))
            }
            ErrorImpl::UndefinedFunction { name } => {
                ErrorTip::Suggestion(format!("Function `{}` not declared", name))
            }
            ErrorImpl::UndefinedProcedure { name } => {
                ErrorTip::Suggestion(format!("Procedure `{}` not declared", name))
            }
            ErrorImpl::NotAProcedure { name, kind } => ErrorTip::Suggestion(format!(
                "`{}` is a {}, only procedures can be called as an instruction",
                name, kind
            )),
            ErrorImpl::NotAFunction { name, kind } => ErrorTip::Suggestion(format!(
                "`{}` is a {}, only functions can be called in an assignment",
                name, kind
            )),
            ErrorImpl::UnexpectedArguments { name, expected, received }
            | ErrorImpl::MissingArguments { name, expected, received } => {
                ErrorTip::Suggestion(format!(
                    "`{}` expects {} arguments, received {}",
                    name, expected, received
                ))
            }
            ErrorImpl::UnaryTypeError { operator, expected, received } => {
                ErrorTip::Suggestion(format!(
                    "`{}` expects a {} operand, received {}",
                    operator, expected, received
                ))
            }
            ErrorImpl::BinaryTypeError { operator, side, expected, received } => {
                ErrorTip::Suggestion(format!(
                    "`{}` expects a {} {} operand, received {}",
                    operator, expected, side, received
                ))
            }
            ErrorImpl::ConditionTypeError { construct, expected, received } => {
                ErrorTip::Suggestion(format!(
                    "`{}` condition must be {}, received {}",
                    construct, expected, received
                ))
            }
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::ReturnTypeError { function, name } => ErrorTip::Suggestion(format!(
                "Function `{}` returns `{}`, which is not declared",
                function, name
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

/// Which operand of an operator failed its type rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandSide {
    Left,
    Right,
}

impl Display for OperandSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperandSide::Left => write!(f, "left"),
            OperandSide::Right => write!(f, "right"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("invalid literal {token:?}: {message}")]
    InvalidLiteral { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("syntax error: expected one of [{}], found {found:?}", .expected.join(", "))]
    SyntaxError { expected: Vec<String>, found: String },
    #[error("{name:?} already declared in this scope")]
    DuplicateDeclaration { name: String },
    #[error("local {name:?} shadows a parameter")]
    ParamShadow { name: String },
    #[error("{name:?} declared as both {first} and {second}")]
    GlobalNameClash {
        name: String,
        first: SymbolKind,
        second: SymbolKind,
    },
    #[error("variable {name:?} not declared")]
    UndefinedVariable { name: String },
    #[error("function {name:?} not declared")]
    UndefinedFunction { name: String },
    #[error("procedure {name:?} not declared")]
    UndefinedProcedure { name: String },
    #[error("{name:?} is a {kind}, not a procedure")]
    NotAProcedure { name: String, kind: SymbolKind },
    #[error("{name:?} is a {kind}, not a function")]
    NotAFunction { name: String, kind: SymbolKind },
    #[error("unexpected arguments to {name:?}: expected {expected}, received {received}")]
    UnexpectedArguments {
        name: String,
        expected: usize,
        received: usize,
    },
    #[error("missing arguments to {name:?}: expected {expected}, received {received}")]
    MissingArguments {
        name: String,
        expected: usize,
        received: usize,
    },
    #[error("operator {operator:?} expects {expected} operand, received {received}")]
    UnaryTypeError {
        operator: String,
        expected: ValueType,
        received: ValueType,
    },
    #[error("operator {operator:?} expects {expected} {side} operand, received {received}")]
    BinaryTypeError {
        operator: String,
        side: OperandSide,
        expected: ValueType,
        received: ValueType,
    },
    #[error("{construct} condition must be {expected}, received {received}")]
    ConditionTypeError {
        construct: String,
        expected: ValueType,
        received: ValueType,
    },
    #[error("types do not match: expected {expected}, received {received}")]
    TypeMatchError {
        expected: ValueType,
        received: ValueType,
    },
    #[error("function {function:?} returns undeclared {name:?}")]
    ReturnTypeError { function: String, name: String },
}
