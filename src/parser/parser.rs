//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct: a single-token lookahead
//! cursor over the token stream plus the instruction dispatch table. The
//! grammar productions themselves live in [`super::stmt`] and
//! [`super::expr`].

use std::collections::HashMap;

use log::debug;

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span, MK_TOKEN,
};

use super::{
    lookups::{create_token_lookups, InstrHandler, InstrLookup},
    stmt::parse_program,
};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The list of tokens to parse, always terminated by `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Lookup table from the first token of an instruction to its production
    instr_lookup: InstrLookup,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// A missing trailing `EOF` token is supplied so that the cursor can
    /// never run off the end of the stream.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(Position::null);
            tokens.push(MK_TOKEN!(
                TokenKind::EOF,
                String::from("EOF"),
                Span { start: end.clone(), end }
            ));
        }

        Parser {
            tokens,
            pos: 0,
            instr_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind
    }

    /// Returns the kind of the token after the current one.
    pub fn peek_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos + 1)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::EOF)
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// The cursor stays on `EOF` once it is reached.
    pub fn advance(&mut self) -> &Token {
        let current = self.pos;
        if self.tokens[current].kind != TokenKind::EOF {
            self.pos += 1;
        }
        &self.tokens[current]
    }

    /// Builds the syntax error for the current token given the set of
    /// token kinds that would have been accepted here.
    pub fn unexpected(&self, expected: &[TokenKind]) -> Error {
        let token = self.current_token();
        let found = if token.kind == TokenKind::EOF {
            TokenKind::EOF.describe()
        } else {
            token.value.clone()
        };

        Error::new(
            ErrorImpl::SyntaxError {
                expected: expected.iter().map(|kind| kind.describe()).collect(),
                found,
            },
            token.span.start.clone(),
        )
    }

    /// Expects a token of the specified kind and consumes it.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            Err(self.unexpected(&[expected_kind]))
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Consumes the current token if it has the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current_token_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Returns a reference to the instruction lookup table.
    pub fn get_instr_lookup(&self) -> &InstrLookup {
        &self.instr_lookup
    }

    /// Registers the production for instructions starting with `kind`.
    pub fn instr(&mut self, kind: TokenKind, instr_fn: InstrHandler) {
        self.instr_lookup.insert(kind, instr_fn);
    }

    /// Returns the start position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        let end = if self.pos == 0 {
            start.clone()
        } else {
            self.tokens[self.pos - 1].span.end.clone()
        };

        Span { start, end }
    }
}

/// Parses a stream of tokens into a [`Program`].
///
/// This is the main entry point for parsing. The whole stream must form one
/// program; anything after the closing `}` of `main` is a syntax error.
pub fn parse(tokens: Vec<Token>) -> Result<Program, Error> {
    let mut parser = Parser::new(tokens);
    create_token_lookups(&mut parser);

    let program = parse_program(&mut parser)?;
    parser.expect(TokenKind::EOF)?;

    debug!(
        "parsed program with {} globals, {} procedures, {} functions",
        program.globals.len(),
        program.procedures.len(),
        program.functions.len()
    );

    Ok(program)
}
