use log::trace;

use crate::{
    ast::{
        ast::{Body, FuncDef, Ident, MainProg, ProcDef, Program},
        statements::{Algorithm, Instruction},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{
    expr::{parse_assign_rhs, parse_atom, parse_input, parse_output, parse_term},
    lookups::{FDEF_FIRST, INSTR_AFTER_ID_FIRST, INSTR_FIRST, PDEF_FIRST},
    parser::Parser,
};

/// Most identifiers a parameter list or `local` block may hold.
pub const MAX_DECLARED: usize = 3;

pub fn parse_program(parser: &mut Parser) -> Result<Program, Error> {
    parser.expect(TokenKind::Glob)?;
    parser.expect(TokenKind::OpenCurly)?;
    let globals = parse_variables(parser)?;
    parser.expect(TokenKind::CloseCurly)?;

    parser.expect(TokenKind::Proc)?;
    parser.expect(TokenKind::OpenCurly)?;
    let mut procedures = vec![];
    while PDEF_FIRST.contains(&parser.current_token_kind()) {
        procedures.push(parse_proc_def(parser)?);
    }
    parser.expect(TokenKind::CloseCurly)?;

    parser.expect(TokenKind::Func)?;
    parser.expect(TokenKind::OpenCurly)?;
    let mut functions = vec![];
    while FDEF_FIRST.contains(&parser.current_token_kind()) {
        functions.push(parse_func_def(parser)?);
    }
    parser.expect(TokenKind::CloseCurly)?;

    parser.expect(TokenKind::Main)?;
    parser.expect(TokenKind::OpenCurly)?;
    let main = parse_main_prog(parser)?;
    parser.expect(TokenKind::CloseCurly)?;

    Ok(Program {
        globals,
        procedures,
        functions,
        main,
    })
}

pub fn parse_ident(parser: &mut Parser) -> Result<Ident, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(Ident::new(token.value, token.span))
}

/// `VARIABLES → VAR VARIABLES | ε`
pub fn parse_variables(parser: &mut Parser) -> Result<Vec<Ident>, Error> {
    let mut variables = vec![];
    while parser.current_token_kind() == TokenKind::Identifier {
        variables.push(parse_ident(parser)?);
    }
    Ok(variables)
}

/// `MAX3`: zero to three identifiers. A fourth identifier is left for the
/// caller, whose closing token expectation rejects it.
pub fn parse_max3(parser: &mut Parser) -> Result<Vec<Ident>, Error> {
    let mut variables = vec![];
    while variables.len() < MAX_DECLARED && parser.current_token_kind() == TokenKind::Identifier {
        variables.push(parse_ident(parser)?);
    }
    Ok(variables)
}

pub fn parse_proc_def(parser: &mut Parser) -> Result<ProcDef, Error> {
    let start = parser.get_position();
    parser.eat(TokenKind::Pdef);

    let name = parse_ident(parser)?;
    trace!("parsing procedure `{}`", name.name);

    parser.expect(TokenKind::OpenParen)?;
    let params = parse_max3(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    parser.expect(TokenKind::OpenCurly)?;
    let body = parse_body(parser)?;
    parser.expect(TokenKind::CloseCurly)?;

    Ok(ProcDef {
        name,
        params,
        body,
        span: parser.span_from(start),
    })
}

pub fn parse_func_def(parser: &mut Parser) -> Result<FuncDef, Error> {
    let start = parser.get_position();
    parser.eat(TokenKind::Fdef);

    let name = parse_ident(parser)?;
    trace!("parsing function `{}`", name.name);

    parser.expect(TokenKind::OpenParen)?;
    let params = parse_max3(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    parser.expect(TokenKind::OpenCurly)?;
    let body = parse_body(parser)?;
    parser.expect(TokenKind::Semicolon)?;
    parser.expect(TokenKind::Return)?;
    let return_atom = parse_atom(parser)?;
    parser.expect(TokenKind::CloseCurly)?;

    Ok(FuncDef {
        name,
        params,
        body,
        return_atom,
        span: parser.span_from(start),
    })
}

/// `BODY → 'local' '{' MAX3 '}' ALGO`
pub fn parse_body(parser: &mut Parser) -> Result<Body, Error> {
    parser.expect(TokenKind::Local)?;
    parser.expect(TokenKind::OpenCurly)?;
    let locals = parse_max3(parser)?;
    parser.expect(TokenKind::CloseCurly)?;

    let algorithm = parse_algorithm(parser)?;

    Ok(Body { locals, algorithm })
}

/// `MAINPROG → 'var' '{' VARIABLES '}' ALGO`
pub fn parse_main_prog(parser: &mut Parser) -> Result<MainProg, Error> {
    let start = parser.get_position();

    parser.expect(TokenKind::Var)?;
    parser.expect(TokenKind::OpenCurly)?;
    let variables = parse_variables(parser)?;
    parser.expect(TokenKind::CloseCurly)?;

    let algorithm = parse_algorithm(parser)?;

    Ok(MainProg {
        variables,
        algorithm,
        span: parser.span_from(start),
    })
}

/// `ALGO → INSTR ALGO'`, `ALGO' → ';' INSTR ALGO' | ε`
///
/// A `;` directly followed by `return` closes a function body and is left
/// for [`parse_func_def`] to consume.
pub fn parse_algorithm(parser: &mut Parser) -> Result<Algorithm, Error> {
    let start = parser.get_position();

    let mut instructions = vec![parse_instruction(parser)?];
    while parser.current_token_kind() == TokenKind::Semicolon && parser.peek_kind() != TokenKind::Return {
        parser.advance();
        instructions.push(parse_instruction(parser)?);
    }

    Ok(Algorithm {
        instructions,
        span: parser.span_from(start),
    })
}

pub fn parse_instruction(parser: &mut Parser) -> Result<Instruction, Error> {
    let kind = parser.current_token_kind();
    let handler = parser.get_instr_lookup().get(&kind).copied();

    match handler {
        Some(handler) => handler(parser),
        None => Err(parser.unexpected(INSTR_FIRST)),
    }
}

pub fn parse_halt_instr(parser: &mut Parser) -> Result<Instruction, Error> {
    let span = parser.expect(TokenKind::Halt)?.span;
    Ok(Instruction::Halt { span })
}

pub fn parse_print_instr(parser: &mut Parser) -> Result<Instruction, Error> {
    let start = parser.expect(TokenKind::Print)?.span.start;
    let output = parse_output(parser)?;

    Ok(Instruction::Print {
        output,
        span: parser.span_from(start),
    })
}

/// `id INSTR_AFTER_ID`: `(` selects a procedure call, `=` an assignment.
pub fn parse_instr_after_id(parser: &mut Parser) -> Result<Instruction, Error> {
    let name = parse_ident(parser)?;
    let start = name.span.start.clone();

    match parser.current_token_kind() {
        TokenKind::OpenParen => {
            parser.advance();
            let args = parse_input(parser)?;
            parser.expect(TokenKind::CloseParen)?;

            Ok(Instruction::Call {
                name,
                args,
                span: parser.span_from(start),
            })
        }
        TokenKind::Assignment => {
            parser.advance();
            let rhs = parse_assign_rhs(parser)?;

            Ok(Instruction::Assign {
                target: name,
                rhs,
                span: parser.span_from(start),
            })
        }
        _ => Err(parser.unexpected(INSTR_AFTER_ID_FIRST)),
    }
}

/// `'{' ALGO '}'`
fn parse_block(parser: &mut Parser) -> Result<Algorithm, Error> {
    parser.expect(TokenKind::OpenCurly)?;
    let algorithm = parse_algorithm(parser)?;
    parser.expect(TokenKind::CloseCurly)?;
    Ok(algorithm)
}

pub fn parse_while_instr(parser: &mut Parser) -> Result<Instruction, Error> {
    let start = parser.expect(TokenKind::While)?.span.start;
    let condition = parse_term(parser)?;
    let body = parse_block(parser)?;

    Ok(Instruction::While {
        condition,
        body,
        span: parser.span_from(start),
    })
}

pub fn parse_do_until_instr(parser: &mut Parser) -> Result<Instruction, Error> {
    let start = parser.expect(TokenKind::Do)?.span.start;
    let body = parse_block(parser)?;
    parser.expect(TokenKind::Until)?;
    let condition = parse_term(parser)?;

    Ok(Instruction::DoUntil {
        body,
        condition,
        span: parser.span_from(start),
    })
}

pub fn parse_if_instr(parser: &mut Parser) -> Result<Instruction, Error> {
    let start = parser.expect(TokenKind::If)?.span.start;
    let condition = parse_term(parser)?;
    let then_body = parse_block(parser)?;

    let else_body = if parser.eat(TokenKind::Else) {
        Some(parse_block(parser)?)
    } else {
        None
    };

    Ok(Instruction::If {
        condition,
        then_body,
        else_body,
        span: parser.span_from(start),
    })
}
