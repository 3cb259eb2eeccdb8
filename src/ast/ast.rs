use crate::Span;

use super::{expressions::Expression, statements::{Algorithm, Instruction}};

/// An identifier occurrence, declaring or referencing.
///
/// `unique` is filled in by the type checker with the IR-safe name of the
/// symbol the identifier resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
    pub unique: Option<String>,
}

impl Ident {
    pub fn new(name: String, span: Span) -> Self {
        Ident { name, span, unique: None }
    }
}

/// An identifier or a number literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Id(Ident),
    Number { value: u64, span: Span },
}

impl Atom {
    pub fn get_span(&self) -> &Span {
        match self {
            Atom::Id(ident) => &ident.span,
            Atom::Number { span, .. } => span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub locals: Vec<Ident>,
    pub algorithm: Algorithm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcDef {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Body,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDef {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Body,
    pub return_atom: Atom,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MainProg {
    pub variables: Vec<Ident>,
    pub algorithm: Algorithm,
    pub span: Span,
}

/// Root of the tree: `glob { } proc { } func { } main { }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub globals: Vec<Ident>,
    pub procedures: Vec<ProcDef>,
    pub functions: Vec<FuncDef>,
    pub main: MainProg,
}

impl Program {
    /// Visits every expression in the program, outermost first.
    pub fn for_each_expression<F: FnMut(&Expression)>(&self, f: &mut F) {
        for procedure in self.procedures.iter() {
            visit_algorithm(&procedure.body.algorithm, f);
        }
        for function in self.functions.iter() {
            visit_algorithm(&function.body.algorithm, f);
        }
        visit_algorithm(&self.main.algorithm, f);
    }
}

fn visit_algorithm<F: FnMut(&Expression)>(algorithm: &Algorithm, f: &mut F) {
    for instruction in algorithm.iter() {
        match instruction {
            Instruction::Halt { .. } | Instruction::Print { .. } | Instruction::Call { .. } => {}
            Instruction::Assign { rhs, .. } => rhs.walk(f),
            Instruction::While { condition, body, .. }
            | Instruction::DoUntil { body, condition, .. } => {
                condition.walk(f);
                visit_algorithm(body, f);
            }
            Instruction::If { condition, then_body, else_body, .. } => {
                condition.walk(f);
                visit_algorithm(then_body, f);
                if let Some(else_body) = else_body {
                    visit_algorithm(else_body, f);
                }
            }
        }
    }
}
