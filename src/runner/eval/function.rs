//! Function call execution.

use std::rc::Rc;

use tracing::debug;

use crate::parser::ast::{ExpressionType, FunctionData};
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::scope::{BindingKind, ScopeKind};
use crate::runner::ds::value::JsValue;

use super::ensure_sufficient_stack;
use super::expression::evaluate_expression;
use super::statement::execute_statement;
use super::types::{EvalContext, ValueResult};

/// Call the function named `callee`.
///
/// The callee is resolved before any argument is evaluated; arguments are
/// evaluated left to right in the caller's scope and must match the
/// parameter count exactly. The body runs in a fresh frame that can read the
/// caller's bindings but whose writes are dropped when the call returns.
pub fn call_function(
    callee: &str,
    arguments: &[ExpressionType],
    ctx: &mut EvalContext,
) -> ValueResult {
    let function = resolve_function(callee, ctx)?;

    let mut args = Vec::with_capacity(arguments.len());
    for argument in arguments {
        args.push(evaluate_expression(argument, ctx)?);
    }

    if args.len() != function.params.len() {
        return Err(JErrorType::ArityError {
            name: callee.to_string(),
            expected: function.params.len(),
            found: args.len(),
        });
    }

    ctx.enter_call()?;
    let saved_scope = ctx.env.current_scope();
    ctx.env.push_scope(ScopeKind::Function);
    debug!(
        function = %function.name,
        depth = ctx.call_depth(),
        scopes = ctx.env.depth(),
        "entering function frame"
    );

    let result = ensure_sufficient_stack(|| run_function_body(&function, args, ctx));

    ctx.env.unwind_to(saved_scope);
    ctx.exit_call();
    debug!(function = %function.name, ok = result.is_ok(), "left function frame");
    result
}

fn resolve_function(callee: &str, ctx: &EvalContext) -> Result<Rc<FunctionData>, JErrorType> {
    let binding = ctx.env.get_binding(callee)?;
    if let Some(function) = &binding.function {
        return Ok(function.clone());
    }
    // A variable holding a function reference calls the function it names.
    if let JsValue::Function(target) = &binding.value {
        if let Ok(target_binding) = ctx.env.get_binding(target) {
            if let Some(function) = &target_binding.function {
                return Ok(function.clone());
            }
        }
    }
    Err(JErrorType::IsNotAFunction(callee.to_string()))
}

fn run_function_body(
    function: &FunctionData,
    args: Vec<JsValue>,
    ctx: &mut EvalContext,
) -> ValueResult {
    for (param, value) in function.params.iter().zip(args) {
        ctx.env.declare(param, BindingKind::Var, value, None)?;
    }
    for stmt in &function.body.body {
        let completion = execute_statement(stmt, ctx)?;
        if completion.is_return() {
            return Ok(completion.get_value());
        }
    }
    Ok(JsValue::Undefined)
}
