use crate::{
    ast::{
        ast::Atom,
        expressions::{BinaryOperator, ExprKind, Expression, UnaryOperator},
        statements::Output,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{
    lookups::{ASSIGN_RHS_FIRST, ATOM_FIRST, BINOP_FIRST, OUTPUT_FIRST, TERM_FIRST, UNOP_FIRST},
    parser::Parser,
    stmt::parse_ident,
};

/// Most arguments a call may pass.
pub const MAX_ARGS: usize = 3;

/// `ATOM → id | number`
pub fn parse_atom(parser: &mut Parser) -> Result<Atom, Error> {
    match parser.current_token_kind() {
        TokenKind::Identifier => Ok(Atom::Id(parse_ident(parser)?)),
        TokenKind::Number => {
            let token = parser.current_token().clone();
            let value = token.value.parse::<u64>().map_err(|_| {
                Error::new(ErrorImpl::NumberParseError { token: token.value.clone() }, token.span.start.clone())
            })?;
            parser.advance();

            Ok(Atom::Number { value, span: token.span })
        }
        _ => Err(parser.unexpected(ATOM_FIRST)),
    }
}

fn atom_expr(atom: Atom) -> Expression {
    let span = atom.get_span().clone();
    Expression::new(ExprKind::Atom(atom), span)
}

/// `TERM → ATOM | PARENS_TERM`
pub fn parse_term(parser: &mut Parser) -> Result<Expression, Error> {
    match parser.current_token_kind() {
        TokenKind::Identifier | TokenKind::Number => Ok(atom_expr(parse_atom(parser)?)),
        TokenKind::OpenParen => parse_parens_term(parser),
        _ => Err(parser.unexpected(TERM_FIRST)),
    }
}

/// `PARENS_TERM → '(' UNOP TERM ')' | '(' TERM BINOP TERM ')'`
///
/// The token after `(` decides: `neg`/`not` selects the unary form.
pub fn parse_parens_term(parser: &mut Parser) -> Result<Expression, Error> {
    let start = parser.expect(TokenKind::OpenParen)?.span.start;

    let kind = match parser.current_token_kind() {
        kind if UNOP_FIRST.contains(&kind) => {
            parser.advance();
            let operand = parse_term(parser)?;

            ExprKind::Unary {
                operator: UnaryOperator::from_token(kind).ok_or_else(|| parser.unexpected(UNOP_FIRST))?,
                operand: Box::new(operand),
            }
        }
        kind if TERM_FIRST.contains(&kind) => {
            let left = parse_term(parser)?;

            let operator = BinaryOperator::from_token(parser.current_token_kind())
                .ok_or_else(|| parser.unexpected(BINOP_FIRST))?;
            parser.advance();

            let right = parse_term(parser)?;

            ExprKind::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            }
        }
        _ => return Err(parser.unexpected(&[UNOP_FIRST, TERM_FIRST].concat())),
    };

    parser.expect(TokenKind::CloseParen)?;

    Ok(Expression::new(kind, parser.span_from(start)))
}

/// `ASSIGN_RHS → id ASSIGN_RHS_ID' | number | PARENS_TERM`
///
/// After the identifier, `(` makes it a function call; anything else leaves
/// it a plain reference.
pub fn parse_assign_rhs(parser: &mut Parser) -> Result<Expression, Error> {
    match parser.current_token_kind() {
        TokenKind::Identifier => {
            let name = parse_ident(parser)?;

            if parser.current_token_kind() == TokenKind::OpenParen {
                let start = name.span.start.clone();
                parser.advance();
                let args = parse_input(parser)?;
                parser.expect(TokenKind::CloseParen)?;

                Ok(Expression::new(ExprKind::Call { name, args }, parser.span_from(start)))
            } else {
                Ok(atom_expr(Atom::Id(name)))
            }
        }
        TokenKind::Number => Ok(atom_expr(parse_atom(parser)?)),
        TokenKind::OpenParen => parse_parens_term(parser),
        _ => Err(parser.unexpected(ASSIGN_RHS_FIRST)),
    }
}

/// `INPUT`: zero to three atoms.
pub fn parse_input(parser: &mut Parser) -> Result<Vec<Atom>, Error> {
    let mut args = vec![];
    while args.len() < MAX_ARGS && ATOM_FIRST.contains(&parser.current_token_kind()) {
        args.push(parse_atom(parser)?);
    }
    Ok(args)
}

/// `OUTPUT → ATOM | string`
pub fn parse_output(parser: &mut Parser) -> Result<Output, Error> {
    match parser.current_token_kind() {
        TokenKind::Identifier | TokenKind::Number => Ok(Output::Atom(parse_atom(parser)?)),
        TokenKind::String => {
            let token = parser.advance().clone();
            Ok(Output::Text { value: token.value, span: token.span })
        }
        _ => Err(parser.unexpected(OUTPUT_FIRST)),
    }
}
