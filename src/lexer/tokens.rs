use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("glob", TokenKind::Glob);
        map.insert("proc", TokenKind::Proc);
        map.insert("func", TokenKind::Func);
        map.insert("main", TokenKind::Main);
        map.insert("var", TokenKind::Var);
        map.insert("local", TokenKind::Local);
        map.insert("return", TokenKind::Return);
        map.insert("halt", TokenKind::Halt);
        map.insert("print", TokenKind::Print);
        map.insert("while", TokenKind::While);
        map.insert("do", TokenKind::Do);
        map.insert("until", TokenKind::Until);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("pdef", TokenKind::Pdef);
        map.insert("fdef", TokenKind::Fdef);
        map.insert("neg", TokenKind::Neg);
        map.insert("not", TokenKind::Not);
        map.insert("eq", TokenKind::Eq);
        map.insert("or", TokenKind::Or);
        map.insert("and", TokenKind::And);
        map.insert("plus", TokenKind::Plus);
        map.insert("minus", TokenKind::Minus);
        map.insert("mult", TokenKind::Mult);
        map.insert("div", TokenKind::Div);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    String,
    Identifier,

    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Semicolon,
    Assignment, // =
    Greater,    // >

    // Reserved
    Glob,
    Proc,
    Func,
    Main,
    Var,
    Local,
    Return,
    Halt,
    Print,
    While,
    Do,
    Until,
    If,
    Else,
    Pdef,
    Fdef,

    // Word operators
    Neg,
    Not,
    Eq,
    Or,
    And,
    Plus,
    Minus,
    Mult,
    Div,
}

impl TokenKind {
    /// Source spelling used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::EOF => String::from("end of input"),
            TokenKind::Number => String::from("number"),
            TokenKind::String => String::from("string"),
            TokenKind::Identifier => String::from("identifier"),
            TokenKind::OpenCurly => String::from("`{`"),
            TokenKind::CloseCurly => String::from("`}`"),
            TokenKind::OpenParen => String::from("`(`"),
            TokenKind::CloseParen => String::from("`)`"),
            TokenKind::Semicolon => String::from("`;`"),
            TokenKind::Assignment => String::from("`=`"),
            TokenKind::Greater => String::from("`>`"),
            keyword => match RESERVED_LOOKUP.iter().find(|(_, kind)| *kind == keyword) {
                Some((spelling, _)) => format!("`{}`", spelling),
                None => format!("{:?}", keyword),
            },
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    pub fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    /// One-line listing used by `--emit tokens`.
    pub fn debug(&self) -> String {
        if self.is_one_of_many(&[TokenKind::String, TokenKind::Identifier, TokenKind::Number]) {
            format!(
                "{}:{} {} ({})",
                self.span.start.line, self.span.start.col, self.kind, self.value
            )
        } else {
            format!("{}:{} {}", self.span.start.line, self.span.start.col, self.kind)
        }
    }
}
