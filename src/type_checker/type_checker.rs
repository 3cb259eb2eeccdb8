use log::{debug, trace};

use crate::{
    ast::{
        ast::{Atom, FuncDef, Ident, MainProg, ProcDef, Program},
        expressions::{ExprKind, Expression, UnaryOperator},
        statements::{Algorithm, Instruction, Output},
        types::ValueType,
    },
    errors::errors::{Error, ErrorImpl, OperandSide},
};

use super::symbol_table::{ScopeKind, SymbolKind, SymbolTable};

/// Runs both analysis passes over `program`.
///
/// On success every expression carries its type, every identifier carries the
/// unique name of the symbol it resolves to, and the returned table holds every
/// declared symbol. The first violation aborts analysis.
pub fn type_check(program: &mut Program) -> Result<SymbolTable, Error> {
    let mut symbols = SymbolTable::new();

    declare_signatures(&mut symbols, program)?;

    for procedure in program.procedures.iter_mut() {
        check_procedure(&mut symbols, procedure)?;
    }
    for function in program.functions.iter_mut() {
        check_function(&mut symbols, function)?;
    }
    check_main(&mut symbols, &mut program.main)?;

    debug!("type checked program, {} symbols", symbols.all_symbols().count());
    Ok(symbols)
}

/// Declares globals and every procedure/function signature up front, so
/// bodies may call definitions that appear later in the source.
pub fn declare_signatures(symbols: &mut SymbolTable, program: &mut Program) -> Result<(), Error> {
    for global in program.globals.iter_mut() {
        global.unique = Some(symbols.declare(global, SymbolKind::Var, Some(ValueType::Numeric), None)?);
    }

    for procedure in program.procedures.iter_mut() {
        let arity = procedure.params.len();
        procedure.name.unique = Some(symbols.declare(&procedure.name, SymbolKind::Proc, None, Some(arity))?);
    }

    for function in program.functions.iter_mut() {
        let arity = function.params.len();
        function.name.unique = Some(symbols.declare(&function.name, SymbolKind::Func, None, Some(arity))?);
    }

    symbols.check_no_global_clashes()
}

fn declare_all(symbols: &mut SymbolTable, idents: &mut [Ident], kind: SymbolKind) -> Result<(), Error> {
    for ident in idents.iter_mut() {
        ident.unique = Some(symbols.declare(ident, kind, Some(ValueType::Numeric), None)?);
    }
    Ok(())
}

pub fn check_procedure(symbols: &mut SymbolTable, procedure: &mut ProcDef) -> Result<(), Error> {
    debug!("checking procedure `{}`", procedure.name.name);
    let mut scope = symbols.enter_scope(ScopeKind::Procedure(procedure.name.name.clone()));

    declare_all(&mut scope, &mut procedure.params, SymbolKind::Param)?;
    declare_all(&mut scope, &mut procedure.body.locals, SymbolKind::Var)?;

    check_algorithm(&scope, &mut procedure.body.algorithm)
}

pub fn check_function(symbols: &mut SymbolTable, function: &mut FuncDef) -> Result<(), Error> {
    debug!("checking function `{}`", function.name.name);
    let mut scope = symbols.enter_scope(ScopeKind::Function(function.name.name.clone()));

    declare_all(&mut scope, &mut function.params, SymbolKind::Param)?;
    declare_all(&mut scope, &mut function.body.locals, SymbolKind::Var)?;

    check_algorithm(&scope, &mut function.body.algorithm)?;

    // The returned atom may name a parameter or local, so it is resolved
    // before the frame closes.
    if let Atom::Id(ident) = &mut function.return_atom {
        let unique = match scope.lookup(&ident.name) {
            Some(symbol) if symbol.kind.is_value() => symbol.unique_name.clone(),
            _ => {
                return Err(Error::new(
                    ErrorImpl::ReturnTypeError {
                        function: function.name.name.clone(),
                        name: ident.name.clone(),
                    },
                    ident.span.start.clone(),
                ))
            }
        };
        ident.unique = Some(unique);
    }

    Ok(())
}

pub fn check_main(symbols: &mut SymbolTable, main: &mut MainProg) -> Result<(), Error> {
    debug!("checking main");
    let mut scope = symbols.enter_scope(ScopeKind::Main);

    declare_all(&mut scope, &mut main.variables, SymbolKind::Var)?;

    check_algorithm(&scope, &mut main.algorithm)
}

pub fn check_algorithm(symbols: &SymbolTable, algorithm: &mut Algorithm) -> Result<(), Error> {
    for instruction in algorithm.iter_mut() {
        check_instruction(symbols, instruction)?;
    }
    Ok(())
}

pub fn check_instruction(symbols: &SymbolTable, instruction: &mut Instruction) -> Result<(), Error> {
    match instruction {
        Instruction::Halt { .. } => Ok(()),
        Instruction::Print { output, .. } => match output {
            Output::Atom(atom) => resolve_atom(symbols, atom).map(|_| ()),
            Output::Text { .. } => Ok(()),
        },
        Instruction::Assign { target, rhs, .. } => {
            resolve_variable(symbols, target)?;

            let received = type_check_expr(symbols, rhs)?;
            if received != ValueType::Numeric {
                return Err(Error::new(
                    ErrorImpl::TypeMatchError {
                        expected: ValueType::Numeric,
                        received,
                    },
                    rhs.get_span().start.clone(),
                ));
            }
            Ok(())
        }
        Instruction::Call { name, args, .. } => check_call(symbols, name, args, SymbolKind::Proc),
        Instruction::While { condition, body, .. } => {
            check_condition(symbols, condition, "while")?;
            check_algorithm(symbols, body)
        }
        Instruction::DoUntil { body, condition, .. } => {
            check_algorithm(symbols, body)?;
            check_condition(symbols, condition, "until")
        }
        Instruction::If { condition, then_body, else_body, .. } => {
            check_condition(symbols, condition, "if")?;
            check_algorithm(symbols, then_body)?;
            if let Some(else_body) = else_body {
                check_algorithm(symbols, else_body)?;
            }
            Ok(())
        }
    }
}

fn check_condition(symbols: &SymbolTable, condition: &mut Expression, construct: &str) -> Result<(), Error> {
    let received = type_check_expr(symbols, condition)?;

    if received != ValueType::Boolean {
        return Err(Error::new(
            ErrorImpl::ConditionTypeError {
                construct: construct.to_string(),
                expected: ValueType::Boolean,
                received,
            },
            condition.get_span().start.clone(),
        ));
    }
    Ok(())
}

/// Resolves a variable or parameter reference and records its unique name.
/// Procedure and function names are not values and do not resolve here.
pub fn resolve_variable(symbols: &SymbolTable, ident: &mut Ident) -> Result<ValueType, Error> {
    let symbol = symbols.assert_exists(ident)?;

    match symbol.decl_type {
        Some(decl_type) if symbol.kind.is_value() => {
            trace!("`{}` resolves to {}", ident.name, symbol.unique_name);
            ident.unique = Some(symbol.unique_name.clone());
            Ok(decl_type)
        }
        _ => Err(Error::new(
            ErrorImpl::UndefinedVariable { name: ident.name.clone() },
            ident.span.start.clone(),
        )),
    }
}

fn resolve_atom(symbols: &SymbolTable, atom: &mut Atom) -> Result<ValueType, Error> {
    match atom {
        Atom::Id(ident) => resolve_variable(symbols, ident),
        Atom::Number { .. } => Ok(ValueType::Numeric),
    }
}

/// Checks a call site against the signature declared in the first pass:
/// the name must be a `expected_kind` symbol taking exactly `args.len()`
/// arguments, and every argument must resolve.
pub fn check_call(
    symbols: &SymbolTable,
    name: &mut Ident,
    args: &mut [Atom],
    expected_kind: SymbolKind,
) -> Result<(), Error> {
    let position = name.span.start.clone();

    let symbol = symbols.lookup(&name.name).ok_or_else(|| {
        let error = if expected_kind == SymbolKind::Proc {
            ErrorImpl::UndefinedProcedure { name: name.name.clone() }
        } else {
            ErrorImpl::UndefinedFunction { name: name.name.clone() }
        };
        Error::new(error, position.clone())
    })?;

    if symbol.kind != expected_kind {
        let error = if expected_kind == SymbolKind::Proc {
            ErrorImpl::NotAProcedure { name: name.name.clone(), kind: symbol.kind }
        } else {
            ErrorImpl::NotAFunction { name: name.name.clone(), kind: symbol.kind }
        };
        return Err(Error::new(error, position));
    }

    let expected = symbol.arity.unwrap_or(0);
    if args.len() > expected {
        return Err(Error::new(
            ErrorImpl::UnexpectedArguments {
                name: name.name.clone(),
                expected,
                received: args.len(),
            },
            args[expected].get_span().start.clone(),
        ));
    } else if args.len() < expected {
        return Err(Error::new(
            ErrorImpl::MissingArguments {
                name: name.name.clone(),
                expected,
                received: args.len(),
            },
            position,
        ));
    }

    name.unique = Some(symbol.unique_name.clone());

    for arg in args.iter_mut() {
        resolve_atom(symbols, arg)?;
    }

    Ok(())
}

/// Infers the type of `expr`, annotating it and all of its sub-expressions.
pub fn type_check_expr(symbols: &SymbolTable, expr: &mut Expression) -> Result<ValueType, Error> {
    let ty = match &mut expr.kind {
        ExprKind::Atom(atom) => resolve_atom(symbols, atom)?,
        ExprKind::Unary { operator, operand } => {
            let expected = match operator {
                UnaryOperator::Neg => ValueType::Numeric,
                UnaryOperator::Not => ValueType::Boolean,
            };

            let received = type_check_expr(symbols, operand)?;
            if received != expected {
                return Err(Error::new(
                    ErrorImpl::UnaryTypeError {
                        operator: operator.to_string(),
                        expected,
                        received,
                    },
                    operand.get_span().start.clone(),
                ));
            }

            expected
        }
        ExprKind::Binary { operator, left, right } => {
            let (operand_type, result_type) = operator.signature();

            for (side, operand) in [(OperandSide::Left, left), (OperandSide::Right, right)] {
                let received = type_check_expr(symbols, operand)?;
                if received != operand_type {
                    return Err(Error::new(
                        ErrorImpl::BinaryTypeError {
                            operator: operator.to_string(),
                            side,
                            expected: operand_type,
                            received,
                        },
                        operand.get_span().start.clone(),
                    ));
                }
            }

            result_type
        }
        ExprKind::Call { name, args } => {
            check_call(symbols, name, args, SymbolKind::Func)?;
            ValueType::Numeric
        }
    };

    trace!("expression at {} is {}", expr.span.start, ty);
    expr.ty = Some(ty);
    Ok(ty)
}
