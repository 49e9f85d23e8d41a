//! Statement execution.

use tracing::trace;

use crate::parser::ast::{
    AssignmentOperator, AssignmentTarget, BlockStatementData, ExpressionType, FunctionData,
    StatementType, UpdateOperator, VariableAssignmentType, VariableDeclaratorData,
    VariableDeclarationKind, VariableStatementType,
};
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::operations::arithmetic::{
    add_values, divide_values, get_nested_index, modulo_values, multiply_values,
    subtract_values,
};
use crate::runner::ds::operations::type_conversion::{
    get_type, to_array_index, to_boolean, to_js_string, to_number,
};
use crate::runner::ds::scope::{check_identifier, BindingKind, ScopeKind};
use crate::runner::ds::value::JsValue;

use super::expression::evaluate_expression;
use super::types::{Completion, EvalContext, EvalResult, ValueResult};

use std::rc::Rc;

/// Execute a statement and return its completion.
pub fn execute_statement(stmt: &StatementType, ctx: &mut EvalContext) -> EvalResult {
    trace!(kind = stmt.kind_name(), "execute statement");
    match stmt {
        StatementType::EmptyStatement => Ok(Completion::normal()),

        StatementType::ExpressionStatement(expression) => {
            let value = evaluate_expression(expression, ctx)?;
            Ok(Completion::normal_with_value(value))
        }

        StatementType::BlockStatement(block) => execute_block_statement(block, ctx),

        StatementType::IfStatement {
            test,
            consequent,
            alternate,
        } => execute_if_statement(test, consequent, alternate.as_deref(), ctx),

        StatementType::WhileStatement { test, body } => execute_while_statement(test, body, ctx),

        StatementType::FunctionDeclaration(function) => {
            execute_function_declaration(function, ctx)
        }

        StatementType::ReturnStatement { argument } => {
            if ctx.call_depth() == 0 {
                return Err(JErrorType::SyntaxError(
                    "Illegal return statement".to_string(),
                ));
            }
            let value = match argument {
                Some(expr) => evaluate_expression(expr, ctx)?,
                None => JsValue::Undefined,
            };
            Ok(Completion::return_value(value))
        }

        StatementType::PrintStatement { arguments } => execute_print_statement(arguments, ctx),

        StatementType::VariableStatement(VariableStatementType::Declaration {
            kind,
            declarations,
        }) => execute_variable_declaration(*kind, declarations, ctx),

        StatementType::VariableStatement(VariableStatementType::Assignment { target, value }) => {
            let value = evaluate_expression(value, ctx)?;
            store_plain_assignment(target, value, ctx)
        }

        StatementType::VariableAssignment(assignment) => {
            execute_variable_assignment(assignment, ctx)
        }
    }
}

/// Runs the statements of a `{ ... }` body in a fresh block scope. The scope
/// is dropped on every exit path.
fn execute_block_statement(block: &BlockStatementData, ctx: &mut EvalContext) -> EvalResult {
    let saved_scope = ctx.env.current_scope();
    ctx.env.push_scope(ScopeKind::Block);
    let result = execute_statement_list(&block.body, ctx);
    ctx.env.unwind_to(saved_scope);
    result
}

fn execute_statement_list(statements: &[StatementType], ctx: &mut EvalContext) -> EvalResult {
    let mut last_value = None;
    for stmt in statements {
        let completion = execute_statement(stmt, ctx)?;
        if completion.is_return() {
            return Ok(completion);
        }
        if completion.value.is_some() {
            last_value = completion.value;
        }
    }
    Ok(Completion {
        value: last_value,
        ..Completion::normal()
    })
}

fn execute_if_statement(
    test: &ExpressionType,
    consequent: &StatementType,
    alternate: Option<&StatementType>,
    ctx: &mut EvalContext,
) -> EvalResult {
    let test_value = evaluate_expression(test, ctx)?;
    let completion = if to_boolean(&test_value) {
        execute_statement(consequent, ctx)?
    } else if let Some(alt) = alternate {
        execute_statement(alt, ctx)?
    } else {
        Completion::normal()
    };
    if completion.is_return() {
        Ok(completion)
    } else {
        Ok(Completion::normal_with_value(completion.get_value()))
    }
}

fn execute_while_statement(
    test: &ExpressionType,
    body: &StatementType,
    ctx: &mut EvalContext,
) -> EvalResult {
    let mut last_value = JsValue::Undefined;
    loop {
        let test_value = evaluate_expression(test, ctx)?;
        if !to_boolean(&test_value) {
            break;
        }
        let completion = execute_statement(body, ctx)?;
        if completion.is_return() {
            return Ok(completion);
        }
        if let Some(value) = completion.value {
            last_value = value;
        }
    }
    Ok(Completion::normal_with_value(last_value))
}

fn execute_function_declaration(function: &Rc<FunctionData>, ctx: &mut EvalContext) -> EvalResult {
    for param in &function.params {
        check_identifier(param)?;
    }
    ctx.env.declare(
        &function.name,
        BindingKind::Function,
        JsValue::Function(function.name.clone()),
        Some(function.clone()),
    )?;
    Ok(Completion::normal_with_value(JsValue::Undefined))
}

fn execute_print_statement(arguments: &[ExpressionType], ctx: &mut EvalContext) -> EvalResult {
    let mut values = Vec::with_capacity(arguments.len());
    for argument in arguments {
        values.push(evaluate_expression(argument, ctx)?);
    }
    ctx.host_mut().print(&values);
    Ok(Completion::normal_with_value(JsValue::Undefined))
}

/// Asks the host for one line of input. End of input reads as undefined.
pub fn read_input(prompt: Option<&str>, ctx: &mut EvalContext) -> ValueResult {
    Ok(match ctx.host_mut().read_line(prompt) {
        Some(line) => JsValue::String(line),
        None => JsValue::Undefined,
    })
}

fn execute_variable_declaration(
    kind: VariableDeclarationKind,
    declarations: &[VariableDeclaratorData],
    ctx: &mut EvalContext,
) -> EvalResult {
    for declarator in declarations {
        let value = match &declarator.init {
            Some(init) => evaluate_expression(init, ctx)?,
            None => JsValue::Undefined,
        };
        ctx.env.declare(&declarator.id, kind.into(), value, None)?;
    }
    Ok(Completion::normal_with_value(JsValue::Undefined))
}

/// `x = v` assigns, or creates `x` in the current frame when nothing by that
/// name is visible. `x[i] = v` requires `x` to exist.
fn store_plain_assignment(
    target: &AssignmentTarget,
    value: JsValue,
    ctx: &mut EvalContext,
) -> EvalResult {
    if target.is_simple() && !ctx.env.exists(&target.name) {
        ctx.env
            .declare(&target.name, BindingKind::Var, value.clone(), None)?;
    } else {
        let indices = evaluate_indices(&target.indices, ctx)?;
        write_target(&target.name, &indices, value.clone(), ctx)?;
    }
    Ok(Completion::normal_with_value(value))
}

fn execute_variable_assignment(
    assignment: &VariableAssignmentType,
    ctx: &mut EvalContext,
) -> EvalResult {
    match assignment {
        VariableAssignmentType::Compound {
            target,
            operator,
            value,
        } => {
            let indices = evaluate_indices(&target.indices, ctx)?;
            let current = read_target(&target.name, &indices, ctx)?;
            let operand = evaluate_expression(value, ctx)?;
            let updated = match operator {
                AssignmentOperator::AddEquals => add_values(&current, &operand),
                AssignmentOperator::SubtractEquals => subtract_values(&current, &operand),
                AssignmentOperator::MultiplyEquals => multiply_values(&current, &operand),
                AssignmentOperator::DivideEquals => divide_values(&current, &operand),
                AssignmentOperator::ModuloEquals => modulo_values(&current, &operand),
            };
            write_target(&target.name, &indices, updated.clone(), ctx)?;
            Ok(Completion::normal_with_value(updated))
        }
        VariableAssignmentType::Update {
            target,
            operator,
            prefix,
        } => {
            let indices = evaluate_indices(&target.indices, ctx)?;
            let old = to_number(&read_target(&target.name, &indices, ctx)?);
            let new = match operator {
                UpdateOperator::Increment => old + 1.0,
                UpdateOperator::Decrement => old - 1.0,
            };
            write_target(&target.name, &indices, JsValue::Number(new), ctx)?;
            let result = if *prefix { new } else { old };
            Ok(Completion::normal_with_value(JsValue::Number(result)))
        }
    }
}

fn evaluate_indices(indices: &[ExpressionType], ctx: &mut EvalContext) -> Result<Vec<JsValue>, JErrorType> {
    let mut values = Vec::with_capacity(indices.len());
    for index in indices {
        values.push(evaluate_expression(index, ctx)?);
    }
    Ok(values)
}

fn read_target(name: &str, indices: &[JsValue], ctx: &EvalContext) -> ValueResult {
    let value = &ctx.env.get_binding(name)?.value;
    Ok(get_nested_index(value, indices).into_owned())
}

fn write_target(
    name: &str,
    indices: &[JsValue],
    value: JsValue,
    ctx: &mut EvalContext,
) -> Result<(), JErrorType> {
    if indices.is_empty() {
        return ctx.env.assign(name, value);
    }
    let max_length = ctx.config.max_array_length;
    ctx.env
        .update_with(name, |slot| write_cell(slot, indices, value, max_length))
}

/// Stores `value` at the position `indices` names inside `slot`, growing
/// arrays with undefined as needed.
fn write_cell(
    slot: &mut JsValue,
    indices: &[JsValue],
    value: JsValue,
    max_length: usize,
) -> Result<(), JErrorType> {
    let (index, rest) = match indices.split_first() {
        Some(split) => split,
        None => {
            *slot = value;
            return Ok(());
        }
    };
    let items = match slot {
        JsValue::Array(items) => items,
        other => {
            return Err(JErrorType::TypeError(format!(
                "Cannot set index {} of {}",
                to_js_string(index),
                get_type(other)
            )))
        }
    };
    let i = to_array_index(index).ok_or_else(|| {
        JErrorType::TypeError(format!("Invalid array index {}", to_js_string(index)))
    })?;
    if i >= max_length {
        return Err(JErrorType::RangeError("Invalid array length".to_string()));
    }
    if i >= items.len() {
        items.resize(i + 1, JsValue::Undefined);
    }
    write_cell(&mut items[i], rest, value, max_length)
}
