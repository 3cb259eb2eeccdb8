use std::rc::Rc;

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::{errors::errors::{Error, ErrorImpl}, Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<(), Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler
}

/// Longest string literal body accepted, in characters.
pub const MAX_STRING_LEN: usize = 15;

lazy_static! {
    // Tried in order; every regex is anchored at the cursor.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new("^[a-z][a-z0-9]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new("^[0-9]+").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new("^\\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^\"[^\"\\n]*\"").unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new("^//[^\\n]*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^\\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        RegexPattern { regex: Regex::new("^\\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
        RegexPattern { regex: Regex::new("^\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new("^\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new("^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: Regex::new("^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
        RegexPattern { regex: Regex::new("^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
    ];

    static ref STRING_BODY: Regex = Regex::new("^[A-Za-z0-9]*$").unwrap();
}

pub struct Lexer<'a> {
    tokens: Vec<Token>,
    source: &'a str,
    pos: usize,
    line: u32,
    line_start: usize,
    file: Rc<String>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file: Option<String>) -> Lexer<'a> {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            tokens: vec![],
            source,
            pos: 0,
            line: 1,
            line_start: 0,
            file: file_name,
        }
    }

    /// Moves the cursor forward, keeping line and column bookkeeping in step.
    pub fn advance_n(&mut self, n: usize) {
        let consumed = &self.source[self.pos..self.pos + n];
        for (i, byte) in consumed.bytes().enumerate() {
            if byte == b'\n' {
                self.line += 1;
                self.line_start = self.pos + i + 1;
            }
        }
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        trace!("token {:?} {:?}", token.kind, token.value);
        self.tokens.push(token);
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &'a str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self) -> Position {
        Position::new(
            self.pos as u32,
            self.line,
            (self.pos - self.line_start + 1) as u32,
            Rc::clone(&self.file),
        )
    }

    /// Span of a single-line token of `len` bytes starting at the cursor.
    pub fn span_of(&self, len: usize) -> Span {
        let start = self.position();
        let mut end = start.clone();
        end.offset += len as u32;
        end.col += len as u32;
        Span { start, end }
    }
}

fn matched<'a>(lexer: &Lexer<'a>, regex: &Regex) -> &'a str {
    regex.find(lexer.remainder()).map(|m| m.as_str()).unwrap_or("")
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = matched(lexer, regex);

    if value.len() > 1 && value.starts_with('0') {
        return Err(Error::new(ErrorImpl::InvalidLiteral {
            token: value.to_string(),
            message: String::from("numbers may not have leading zeros"),
        }, lexer.position()));
    }

    let span = lexer.span_of(value.len());
    lexer.push(MK_TOKEN!(TokenKind::Number, value.to_string(), span));
    lexer.advance_n(value.len());
    Ok(())
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let len = matched(lexer, regex).len();
    lexer.advance_n(len);
    Ok(())
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let literal = matched(lexer, regex);
    let body = &literal[1..literal.len() - 1];

    if !STRING_BODY.is_match(body) {
        return Err(Error::new(ErrorImpl::InvalidLiteral {
            token: literal.to_string(),
            message: String::from("strings may only contain letters and digits"),
        }, lexer.position()));
    }

    if body.len() > MAX_STRING_LEN {
        return Err(Error::new(ErrorImpl::InvalidLiteral {
            token: literal.to_string(),
            message: format!("strings may hold at most {} characters", MAX_STRING_LEN),
        }, lexer.position()));
    }

    let span = lexer.span_of(literal.len());
    lexer.push(MK_TOKEN!(TokenKind::String, body.to_string(), span));
    lexer.advance_n(literal.len());
    Ok(())
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = matched(lexer, regex);
    let span = lexer.span_of(value.len());

    if let Some(kind) = RESERVED_LOOKUP.get(value) {
        lexer.push(MK_TOKEN!(*kind, value.to_string(), span));
    } else {
        lexer.push(MK_TOKEN!(TokenKind::Identifier, value.to_string(), span));
    }

    lexer.advance_n(value.len());
    Ok(())
}

pub fn tokenize(source: &str, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let pattern = PATTERNS.iter().find(|pattern| pattern.regex.is_match(lex.remainder()));

        match pattern {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex)?,
            None => {
                return Err(Error::new(ErrorImpl::UnrecognisedToken { token: lex.at().to_string() }, lex.position()));
            }
        }
    }

    let span = lex.span_of(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
    Ok(lex.tokens)
}
