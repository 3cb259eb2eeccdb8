//! Unit tests for the symbol table and the type checker.

use std::collections::HashSet;

use crate::ast::ast::{Atom, Ident, Program};
use crate::ast::expressions::ExprKind;
use crate::ast::statements::Instruction;
use crate::ast::types::ValueType;
use crate::errors::errors::{Error, ErrorImpl, OperandSide};
use crate::lexer::lexer::tokenize;
use crate::parser::parser::parse;
use crate::{Position, Span};

use super::symbol_table::{ScopeKind, SymbolKind, SymbolTable};
use super::type_checker::{check_procedure, declare_signatures, type_check};

const WELL_TYPED: &str = r#"
glob { x y }
proc {
  pdef show(a) { local { t } t = (a mult 2); print t }
}
func {
  fdef inc(a) { local { r } r = (a plus 1); return r }
}
main {
  var { n }
  n = inc(x);
  show(n);
  while (n > 0) { n = (n minus 1) };
  do { print "tick" } until ((n eq 0) or (not (y > n)));
  if ((x > 5) and (y > 10)) { halt } else { print n }
}
"#;

fn parse_program(source: &str) -> Program {
    let tokens = tokenize(source, Some("test.spl".to_string())).unwrap();
    parse(tokens).unwrap()
}

fn check(source: &str) -> Result<(Program, SymbolTable), Error> {
    let mut program = parse_program(source);
    let symbols = type_check(&mut program)?;
    Ok((program, symbols))
}

fn check_err(source: &str) -> Error {
    check(source).unwrap_err()
}

/// Program with a procedure `p(a)`, a function `f(a b)` and globals `x y`.
fn with_main(variables: &str, algorithm: &str) -> String {
    format!(
        "glob {{ x y }} proc {{ p(a) {{ local {{ }} print a }} }} func {{ f(a b) {{ local {{ }} halt; return a }} }} main {{ var {{ {} }} {} }}",
        variables, algorithm
    )
}

fn ident(name: &str) -> Ident {
    Ident::new(
        name.to_string(),
        Span {
            start: Position::null(),
            end: Position::null(),
        },
    )
}

#[test]
fn test_well_typed_program_checks() {
    let (program, symbols) = check(WELL_TYPED).unwrap();

    let uniques: Vec<&str> = symbols.all_symbols().map(|symbol| symbol.unique_name.as_str()).collect();
    assert_eq!(
        uniques,
        vec!["s0_x", "s0_y", "s0_show", "s0_inc", "s1_a", "s1_t", "s2_a", "s2_r", "s3_n"]
    );

    let distinct: HashSet<&str> = uniques.iter().copied().collect();
    assert_eq!(distinct.len(), uniques.len());

    let mut untyped = 0;
    program.for_each_expression(&mut |expr| {
        if expr.get_type().is_none() {
            untyped += 1;
        }
    });
    assert_eq!(untyped, 0);
}

#[test]
fn test_check_is_deterministic() {
    let (first_program, first_symbols) = check(WELL_TYPED).unwrap();
    let (second_program, second_symbols) = check(WELL_TYPED).unwrap();

    assert_eq!(first_program, second_program);
    assert_eq!(first_symbols.to_string(), second_symbols.to_string());

    let first_error = check_err(&with_main("", "x = (x plus (y > 1))"));
    let second_error = check_err(&with_main("", "x = (x plus (y > 1))"));
    assert_eq!(first_error.to_string(), second_error.to_string());
}

#[test]
fn test_identifiers_get_unique_names() {
    let (program, _) = check(WELL_TYPED).unwrap();

    match &program.main.algorithm.instructions[0] {
        Instruction::Assign { target, rhs, .. } => {
            assert_eq!(target.unique.as_deref(), Some("s3_n"));
            match &rhs.kind {
                ExprKind::Call { name, args } => {
                    assert_eq!(name.unique.as_deref(), Some("s0_inc"));
                    assert!(matches!(&args[0], Atom::Id(arg) if arg.unique.as_deref() == Some("s0_x")));
                }
                other => panic!("expected call, got {:?}", other),
            }
        }
        other => panic!("expected assignment, got {:?}", other),
    }

    match &program.functions[0].return_atom {
        Atom::Id(ret) => assert_eq!(ret.unique.as_deref(), Some("s2_r")),
        other => panic!("unexpected return atom {:?}", other),
    }
}

#[test]
fn test_duplicate_global() {
    let error = check_err("glob { x x } proc { } func { } main { var { } halt }");

    assert_eq!(error.kind(), &ErrorImpl::DuplicateDeclaration { name: "x".to_string() });
    assert_eq!(error.get_position().col, 10);
}

#[test]
fn test_duplicate_main_variable() {
    let error = check_err("glob { } proc { } func { } main { var { a b a } halt }");

    assert_eq!(error.get_error_name(), "DuplicateDeclaration");
}

#[test]
fn test_duplicate_parameter() {
    let error = check_err("glob { } proc { p(a a) { local { } halt } } func { } main { var { } halt }");

    assert_eq!(error.kind(), &ErrorImpl::DuplicateDeclaration { name: "a".to_string() });
}

#[test]
fn test_local_shadowing_parameter() {
    let error = check_err("glob { } proc { } func { fdef f(p) { local { p } halt; return p } } main { var { } halt }");

    assert_eq!(error.kind(), &ErrorImpl::ParamShadow { name: "p".to_string() });
}

#[test]
fn test_local_may_shadow_global() {
    let (program, _) =
        check("glob { x } proc { p() { local { x } x = 1 } } func { } main { var { } x = 2 }").unwrap();

    match &program.procedures[0].body.algorithm.instructions[0] {
        Instruction::Assign { target, .. } => assert_eq!(target.unique.as_deref(), Some("s1_x")),
        other => panic!("expected assignment, got {:?}", other),
    }
    match &program.main.algorithm.instructions[0] {
        Instruction::Assign { target, .. } => assert_eq!(target.unique.as_deref(), Some("s0_x")),
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_global_name_clash() {
    let error = check_err("glob { a } proc { a() { local { } halt } } func { } main { var { } halt }");

    assert_eq!(
        error.kind(),
        &ErrorImpl::GlobalNameClash {
            name: "a".to_string(),
            first: SymbolKind::Var,
            second: SymbolKind::Proc,
        }
    );
}

#[test]
fn test_procedure_function_clash() {
    let error = check_err(
        "glob { } proc { g() { local { } halt } } func { g() { local { } halt; return 1 } } main { var { } halt }",
    );

    assert_eq!(
        error.kind(),
        &ErrorImpl::GlobalNameClash {
            name: "g".to_string(),
            first: SymbolKind::Proc,
            second: SymbolKind::Func,
        }
    );
}

#[test]
fn test_assignment_to_undeclared() {
    let error = check_err("glob { } proc { } func { } main { var { } x = 10 }");

    assert_eq!(error.kind(), &ErrorImpl::UndefinedVariable { name: "x".to_string() });
    assert_eq!(error.get_position().col, 43);
}

#[test]
fn test_undeclared_in_expression_and_print() {
    let in_expr = check_err(&with_main("", "x = (z plus 1)"));
    let in_print = check_err(&with_main("", "print z"));
    let in_args = check_err(&with_main("", "p(z)"));

    for error in [in_expr, in_print, in_args] {
        assert_eq!(error.kind(), &ErrorImpl::UndefinedVariable { name: "z".to_string() });
    }
}

#[test]
fn test_procedure_name_is_not_a_variable() {
    let error = check_err(&with_main("", "x = p"));

    assert_eq!(error.kind(), &ErrorImpl::UndefinedVariable { name: "p".to_string() });
}

#[test]
fn test_locals_are_not_visible_outside_their_body() {
    let error = check_err("glob { } proc { p() { local { t } t = 1 } } func { } main { var { } t = 2 }");

    assert_eq!(error.kind(), &ErrorImpl::UndefinedVariable { name: "t".to_string() });
}

#[test]
fn test_numeric_condition_rejected() {
    let error = check_err(&with_main("", "if x { halt }"));

    assert_eq!(
        error.kind(),
        &ErrorImpl::ConditionTypeError {
            construct: "if".to_string(),
            expected: ValueType::Boolean,
            received: ValueType::Numeric,
        }
    );
}

#[test]
fn test_loop_conditions_rejected() {
    let while_error = check_err(&with_main("", "while (x plus 1) { halt }"));
    let until_error = check_err(&with_main("", "do { halt } until 1"));

    assert!(matches!(while_error.kind(), ErrorImpl::ConditionTypeError { construct, .. } if construct == "while"));
    assert!(matches!(until_error.kind(), ErrorImpl::ConditionTypeError { construct, .. } if construct == "until"));
}

#[test]
fn test_boolean_condition_annotated() {
    let (program, _) = check(&with_main("", "if (x > 5) { halt }")).unwrap();

    match &program.main.algorithm.instructions[0] {
        Instruction::If { condition, .. } => {
            assert_eq!(condition.get_type(), Some(ValueType::Boolean));
            match &condition.kind {
                ExprKind::Binary { left, right, .. } => {
                    assert_eq!(left.get_type(), Some(ValueType::Numeric));
                    assert_eq!(right.get_type(), Some(ValueType::Numeric));
                }
                other => panic!("expected comparison, got {:?}", other),
            }
        }
        other => panic!("expected if, got {:?}", other),
    }
}

#[test]
fn test_boolean_operand_to_arithmetic() {
    let error = check_err(&with_main("", "x = ((x > 5) plus 1)"));

    assert_eq!(
        error.kind(),
        &ErrorImpl::BinaryTypeError {
            operator: "plus".to_string(),
            side: OperandSide::Left,
            expected: ValueType::Numeric,
            received: ValueType::Boolean,
        }
    );
}

#[test]
fn test_numeric_right_operand_to_logic() {
    let error = check_err(&with_main("", "if ((x > 5) and y) { halt }"));

    assert_eq!(
        error.kind(),
        &ErrorImpl::BinaryTypeError {
            operator: "and".to_string(),
            side: OperandSide::Right,
            expected: ValueType::Boolean,
            received: ValueType::Numeric,
        }
    );
}

#[test]
fn test_logical_expression_is_boolean() {
    let (program, _) = check(&with_main("", "if ((x > 5) and (y > 10)) { halt }")).unwrap();

    match &program.main.algorithm.instructions[0] {
        Instruction::If { condition, .. } => assert_eq!(condition.get_type(), Some(ValueType::Boolean)),
        other => panic!("expected if, got {:?}", other),
    }
}

#[test]
fn test_unary_operand_types() {
    let not_error = check_err(&with_main("", "if (not x) { halt }"));
    let neg_error = check_err(&with_main("", "x = (neg (x > 1))"));

    assert_eq!(
        not_error.kind(),
        &ErrorImpl::UnaryTypeError {
            operator: "not".to_string(),
            expected: ValueType::Boolean,
            received: ValueType::Numeric,
        }
    );
    assert_eq!(
        neg_error.kind(),
        &ErrorImpl::UnaryTypeError {
            operator: "neg".to_string(),
            expected: ValueType::Numeric,
            received: ValueType::Boolean,
        }
    );
}

#[test]
fn test_boolean_assignment_rejected() {
    let error = check_err(&with_main("", "x = (x > 1)"));

    assert_eq!(
        error.kind(),
        &ErrorImpl::TypeMatchError {
            expected: ValueType::Numeric,
            received: ValueType::Boolean,
        }
    );
}

#[test]
fn test_function_called_as_statement() {
    let error = check_err(&with_main("", "f(x y)"));

    assert_eq!(
        error.kind(),
        &ErrorImpl::NotAProcedure {
            name: "f".to_string(),
            kind: SymbolKind::Func,
        }
    );
}

#[test]
fn test_procedure_called_in_assignment() {
    let error = check_err(&with_main("", "x = p(y)"));

    assert_eq!(
        error.kind(),
        &ErrorImpl::NotAFunction {
            name: "p".to_string(),
            kind: SymbolKind::Proc,
        }
    );
}

#[test]
fn test_variable_called() {
    let error = check_err(&with_main("", "x(1)"));

    assert_eq!(
        error.kind(),
        &ErrorImpl::NotAProcedure {
            name: "x".to_string(),
            kind: SymbolKind::Var,
        }
    );
}

#[test]
fn test_undefined_callables() {
    let procedure = check_err(&with_main("", "q()"));
    let function = check_err(&with_main("", "x = g(1)"));

    assert_eq!(procedure.kind(), &ErrorImpl::UndefinedProcedure { name: "q".to_string() });
    assert_eq!(function.kind(), &ErrorImpl::UndefinedFunction { name: "g".to_string() });
}

#[test]
fn test_three_argument_calls() {
    let source = "glob { x y } proc { show(a b c) { local { d e f } d = (a plus b); e = (d plus c); f = e; print f } } func { sum(a b c) { local { d e f } d = (a plus b); e = (d plus c); f = e; return f } } main { var { z } z = sum(x 1 y); show(z x 2) }";
    let (program, symbols) = check(source).unwrap();

    let arities: Vec<Option<usize>> = symbols
        .all_symbols()
        .filter(|symbol| !symbol.kind.is_value())
        .map(|symbol| symbol.arity)
        .collect();
    assert_eq!(arities, vec![Some(3), Some(3)]);

    match &program.main.algorithm.instructions[0] {
        Instruction::Assign { rhs, .. } => assert_eq!(rhs.get_type(), Some(ValueType::Numeric)),
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_call_arity() {
    let too_many = check_err(&with_main("", "p(1 2)"));
    let too_few = check_err(&with_main("", "x = f(1)"));

    assert_eq!(
        too_many.kind(),
        &ErrorImpl::UnexpectedArguments {
            name: "p".to_string(),
            expected: 1,
            received: 2,
        }
    );
    assert_eq!(
        too_few.kind(),
        &ErrorImpl::MissingArguments {
            name: "f".to_string(),
            expected: 2,
            received: 1,
        }
    );
}

#[test]
fn test_forward_and_mutual_references() {
    let source = "glob { } proc { a() { local { } b() } b() { local { } a() } } func { c(n) { local { m } m = d(n); return m } d(n) { local { } halt; return n } } main { var { } a() }";

    assert!(check(source).is_ok());
}

#[test]
fn test_return_of_undeclared_name() {
    let error = check_err("glob { } proc { } func { f() { local { } halt; return r } } main { var { } halt }");

    assert_eq!(
        error.kind(),
        &ErrorImpl::ReturnTypeError {
            function: "f".to_string(),
            name: "r".to_string(),
        }
    );
}

#[test]
fn test_return_of_parameter_and_global() {
    let source = "glob { g } proc { } func { f(a) { local { } halt; return a } h() { local { } halt; return g } } main { var { } halt }";

    assert!(check(source).is_ok());
}

#[test]
fn test_scope_closed_after_failed_body() {
    let mut program = parse_program("glob { } proc { p(a) { local { t } print zz } } func { } main { var { } halt }");
    let mut symbols = SymbolTable::new();
    declare_signatures(&mut symbols, &mut program).unwrap();

    let result = check_procedure(&mut symbols, &mut program.procedures[0]);

    assert!(result.is_err());
    assert_eq!(symbols.current_scope_level(), 0);
    assert!(symbols.find_unique("s1_t").is_some());
}

#[test]
fn test_symbol_table_declare_and_lookup() {
    let mut symbols = SymbolTable::new();
    symbols.declare(&ident("g"), SymbolKind::Var, Some(ValueType::Numeric), None).unwrap();

    {
        let mut scope = symbols.enter_scope(ScopeKind::Main);
        let unique = scope.declare(&ident("v"), SymbolKind::Var, Some(ValueType::Numeric), None).unwrap();

        assert_eq!(unique, "s1_v");
        assert_eq!(scope.current_scope_level(), 1);
        assert_eq!(scope.lookup("v").map(|symbol| symbol.scope_level), Some(1));
        assert_eq!(scope.lookup("g").map(|symbol| symbol.scope_level), Some(0));
        assert!(scope.assert_exists(&ident("w")).is_err());
    }

    assert_eq!(symbols.current_scope_level(), 0);
    assert!(symbols.lookup("v").is_none());
    assert_eq!(symbols.all_symbols().count(), 2);
}

#[test]
fn test_symbol_table_scope_ids_increase() {
    let mut symbols = SymbolTable::new();

    let first = symbols.open_scope(ScopeKind::Procedure("p".to_string()));
    symbols.close_scope();
    let second = symbols.open_scope(ScopeKind::Function("f".to_string()));
    symbols.close_scope();
    symbols.close_scope();

    assert_eq!((first, second), (1, 2));
    assert_eq!(symbols.current_scope().kind, ScopeKind::Global);
}

#[test]
fn test_symbol_table_display() {
    let (_, symbols) = check("glob { x } proc { p(a) { local { } print a } } func { } main { var { } halt }").unwrap();
    let listing = symbols.to_string();

    assert!(listing.starts_with("scope 0 (global)\n"));
    assert!(listing.contains("scope 1 (procedure p)"));
    assert!(listing.contains("scope 2 (main)"));
    assert!(listing.contains("s0_x : numeric"));
    assert!(listing.contains("s0_p /1"));
    assert!(listing.contains("s1_a : numeric"));
}
