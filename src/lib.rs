#![allow(clippy::module_inception)]

use std::{fmt::Display, rc::Rc};

use log::debug;

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorTip},
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::{symbol_table::SymbolTable, type_checker::type_check},
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// A location in a source file: byte offset plus 1-based line and column.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub col: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(offset: u32, line: u32, col: u32, file: Rc<String>) -> Self {
        Position { offset, line, col, file }
    }

    pub fn null() -> Self {
        Position::new(0, 0, 0, Rc::new(String::from("<null>")))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Result of a successful front-end run: the annotated tree and every declared symbol.
#[derive(Debug)]
pub struct Analysis {
    pub program: Program,
    pub symbols: SymbolTable,
}

/// Runs the lexer, parser and semantic analysis over `source`.
pub fn analyze_source(source: &str, file: &str) -> Result<Analysis, Error> {
    let tokens = tokenize(source, Some(String::from(file)))?;
    debug!("tokenized {} tokens", tokens.len());

    let mut program = parse(tokens)?;
    debug!(
        "parsed {} procedures, {} functions",
        program.procedures.len(),
        program.functions.len()
    );

    let symbols = type_check(&mut program)?;

    Ok(Analysis { program, symbols })
}

/// Returns the text of the given 1-based line, without its line terminator.
pub fn get_line(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }

    source
        .split('\n')
        .nth((line - 1) as usize)
        .map(|text| text.trim_end_matches('\r'))
}


/// Formats an error with the offending source line and a caret under the column.
pub fn render_error(error: &Error, source: &str) -> String {
    /*
        Error: name (tip)
        -> main.spl
           |
        20 | x = (y plus z)
           | ----^
    */

    let position = error.get_position();
    let line_text = get_line(source, position.line).unwrap_or("");

    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;

    let mut out = String::new();
    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!("Error: {} ({})\n", error.get_error_name(), error.get_tip()));
    }
    out.push_str(&format!("-> {}\n", position.file));
    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = (position.col as usize).saturating_sub(removed_whitespace).max(1);
    out.push_str(&format!("{:>padding$} {:->arrows$}", "|", "^"));

    out
}

pub fn display_error(error: &Error, source: &str) {
    eprintln!("{}", render_error(error, source));
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
