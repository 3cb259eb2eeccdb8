use std::slice::{Iter, IterMut};

use crate::Span;

use super::{ast::{Atom, Ident}, expressions::Expression};

/// A `;`-separated, non-empty sequence of instructions.
#[derive(Debug, Clone, PartialEq)]
pub struct Algorithm {
    pub instructions: Vec<Instruction>,
    pub span: Span,
}

impl Algorithm {
    pub fn iter(&self) -> Iter<'_, Instruction> {
        self.instructions.iter()
    }
    pub fn iter_mut(&mut self) -> IterMut<'_, Instruction> {
        self.instructions.iter_mut()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Atom(Atom),
    Text { value: String, span: Span },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Halt {
        span: Span,
    },
    Print {
        output: Output,
        span: Span,
    },
    Assign {
        target: Ident,
        rhs: Expression,
        span: Span,
    },
    /// Procedure call used as an instruction.
    Call {
        name: Ident,
        args: Vec<Atom>,
        span: Span,
    },
    While {
        condition: Expression,
        body: Algorithm,
        span: Span,
    },
    DoUntil {
        body: Algorithm,
        condition: Expression,
        span: Span,
    },
    If {
        condition: Expression,
        then_body: Algorithm,
        else_body: Option<Algorithm>,
        span: Span,
    },
}

impl Instruction {
    pub fn get_span(&self) -> &Span {
        match self {
            Instruction::Halt { span }
            | Instruction::Print { span, .. }
            | Instruction::Assign { span, .. }
            | Instruction::Call { span, .. }
            | Instruction::While { span, .. }
            | Instruction::DoUntil { span, .. }
            | Instruction::If { span, .. } => span,
        }
    }
}
