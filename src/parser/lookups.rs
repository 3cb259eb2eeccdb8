use std::collections::HashMap;

use crate::{ast::statements::Instruction, errors::errors::Error, lexer::tokens::TokenKind};

use super::{parser::Parser, stmt::*};

// FIRST sets of the productions that have more than one alternative.
// Every branching decision in the parser is made against one of these.

pub const ATOM_FIRST: &[TokenKind] = &[TokenKind::Identifier, TokenKind::Number];
pub const TERM_FIRST: &[TokenKind] = &[TokenKind::Identifier, TokenKind::Number, TokenKind::OpenParen];
pub const ASSIGN_RHS_FIRST: &[TokenKind] = &[TokenKind::Identifier, TokenKind::Number, TokenKind::OpenParen];
pub const OUTPUT_FIRST: &[TokenKind] = &[TokenKind::Identifier, TokenKind::Number, TokenKind::String];
pub const UNOP_FIRST: &[TokenKind] = &[TokenKind::Neg, TokenKind::Not];
pub const BINOP_FIRST: &[TokenKind] = &[
    TokenKind::Eq,
    TokenKind::Greater,
    TokenKind::Or,
    TokenKind::And,
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Mult,
    TokenKind::Div,
];
/// After an identifier in instruction position: call or assignment.
pub const INSTR_AFTER_ID_FIRST: &[TokenKind] = &[TokenKind::OpenParen, TokenKind::Assignment];
pub const INSTR_FIRST: &[TokenKind] = &[
    TokenKind::Halt,
    TokenKind::Print,
    TokenKind::Identifier,
    TokenKind::While,
    TokenKind::Do,
    TokenKind::If,
];
pub const PDEF_FIRST: &[TokenKind] = &[TokenKind::Pdef, TokenKind::Identifier];
pub const FDEF_FIRST: &[TokenKind] = &[TokenKind::Fdef, TokenKind::Identifier];

pub type InstrHandler = fn(&mut Parser) -> Result<Instruction, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    parser.instr(TokenKind::Halt, parse_halt_instr);
    parser.instr(TokenKind::Print, parse_print_instr);
    parser.instr(TokenKind::Identifier, parse_instr_after_id);

    // Loops
    parser.instr(TokenKind::While, parse_while_instr);
    parser.instr(TokenKind::Do, parse_do_until_instr);

    // Branch
    parser.instr(TokenKind::If, parse_if_instr);
}

pub type InstrLookup = HashMap<TokenKind, InstrHandler>;
