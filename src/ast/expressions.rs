use std::fmt::Display;

use crate::{lexer::tokens::TokenKind, Span};

use super::{ast::{Atom, Ident}, types::ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Neg,
    Not,
}

impl UnaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Neg => Some(UnaryOperator::Neg),
            TokenKind::Not => Some(UnaryOperator::Not),
            _ => None,
        }
    }
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Neg => write!(f, "neg"),
            UnaryOperator::Not => write!(f, "not"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    Greater,
    Or,
    And,
    Plus,
    Minus,
    Mult,
    Div,
}

impl BinaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Eq => Some(BinaryOperator::Eq),
            TokenKind::Greater => Some(BinaryOperator::Greater),
            TokenKind::Or => Some(BinaryOperator::Or),
            TokenKind::And => Some(BinaryOperator::And),
            TokenKind::Plus => Some(BinaryOperator::Plus),
            TokenKind::Minus => Some(BinaryOperator::Minus),
            TokenKind::Mult => Some(BinaryOperator::Mult),
            TokenKind::Div => Some(BinaryOperator::Div),
            _ => None,
        }
    }

    /// Operand type and result type of the operator.
    pub fn signature(&self) -> (ValueType, ValueType) {
        match self {
            BinaryOperator::Plus | BinaryOperator::Minus | BinaryOperator::Mult | BinaryOperator::Div => {
                (ValueType::Numeric, ValueType::Numeric)
            }
            BinaryOperator::Eq | BinaryOperator::Greater => (ValueType::Numeric, ValueType::Boolean),
            BinaryOperator::And | BinaryOperator::Or => (ValueType::Boolean, ValueType::Boolean),
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let spelling = match self {
            BinaryOperator::Eq => "eq",
            BinaryOperator::Greater => ">",
            BinaryOperator::Or => "or",
            BinaryOperator::And => "and",
            BinaryOperator::Plus => "plus",
            BinaryOperator::Minus => "minus",
            BinaryOperator::Mult => "mult",
            BinaryOperator::Div => "div",
        };
        write!(f, "{}", spelling)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Atom(Atom),
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Function call; only produced as an assignment right-hand side.
    Call {
        name: Ident,
        args: Vec<Atom>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExprKind,
    pub span: Span,
    /// Inferred type, set once by the type checker.
    pub ty: Option<ValueType>,
}

impl Expression {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expression { kind, span, ty: None }
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_type(&self) -> Option<ValueType> {
        self.ty
    }

    /// Visits this expression and its sub-expressions, outermost first.
    pub fn walk<F: FnMut(&Expression)>(&self, f: &mut F) {
        f(self);
        match &self.kind {
            ExprKind::Atom(_) | ExprKind::Call { .. } => {}
            ExprKind::Unary { operand, .. } => operand.walk(f),
            ExprKind::Binary { left, right, .. } => {
                left.walk(f);
                right.walk(f);
            }
        }
    }
}
