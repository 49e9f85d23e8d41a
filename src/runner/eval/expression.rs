//! Expression evaluation.

use crate::parser::ast::{
    BinaryOperator, ExpressionType, LiteralType, LogicalOperator, TemplateElement, TernaryBranch,
    UnaryOperator,
};
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::operations::arithmetic::{
    add_values, divide_values, get_index, get_length, get_nested_index, logical_not,
    modulo_values, multiply_values, negate_value, subtract_values,
};
use crate::runner::ds::operations::test_and_comparison::{
    compare_values, loose_equality, strict_equality, RelationalOperator,
};
use crate::runner::ds::operations::type_conversion::{to_boolean, to_js_string};
use crate::runner::ds::value::JsValue;

use super::ensure_sufficient_stack;
use super::function::call_function;
use super::statement::read_input;
use super::types::{EvalContext, ValueResult};

/// Evaluate an expression and return its value.
pub fn evaluate_expression(expr: &ExpressionType, ctx: &mut EvalContext) -> ValueResult {
    ensure_sufficient_stack(|| evaluate_expression_inner(expr, ctx))
}

fn evaluate_expression_inner(expr: &ExpressionType, ctx: &mut EvalContext) -> ValueResult {
    match expr {
        ExpressionType::Literal(lit) => Ok(evaluate_literal(lit)),

        ExpressionType::Identifier(name) => ctx.get_binding(name),

        ExpressionType::ArrayExpression(elements) => {
            let mut items = Vec::with_capacity(elements.len());
            for element in elements {
                items.push(evaluate_expression(element, ctx)?);
            }
            Ok(JsValue::Array(items))
        }

        ExpressionType::ArrayAccess { object, index } => {
            if let Some((name, indices)) = access_path(expr) {
                let indices = evaluate_path_indices(name, &indices, ctx)?;
                let value = &ctx.env.get_binding(name)?.value;
                return Ok(get_nested_index(value, &indices).into_owned());
            }
            let object = evaluate_expression(object, ctx)?;
            let index = evaluate_expression(index, ctx)?;
            Ok(get_index(&object, &index))
        }

        ExpressionType::ArrayLength(object) => {
            if let Some((name, indices)) = access_path(object) {
                let indices = evaluate_path_indices(name, &indices, ctx)?;
                let value = &ctx.env.get_binding(name)?.value;
                return Ok(get_length(&get_nested_index(value, &indices)));
            }
            let object = evaluate_expression(object, ctx)?;
            Ok(get_length(&object))
        }

        ExpressionType::TemplateLiteral(parts) => evaluate_template_literal(parts, ctx),

        ExpressionType::UnaryExpression { operator, argument } => {
            let value = evaluate_expression(argument, ctx)?;
            Ok(match operator {
                UnaryOperator::Minus => negate_value(&value),
                UnaryOperator::LogicalNot => logical_not(&value),
            })
        }

        ExpressionType::BinaryExpression {
            operator,
            left,
            right,
        } => evaluate_binary_expression(*operator, left, right, ctx),

        ExpressionType::LogicalExpression {
            operator,
            left,
            right,
        } => evaluate_logical_expression(*operator, left, right, ctx),

        ExpressionType::ConditionalExpression {
            test,
            consequent,
            alternate,
        } => evaluate_conditional_expression(test, consequent, alternate, ctx),

        ExpressionType::CallExpression { callee, arguments } => {
            call_function(callee, arguments, ctx)
        }

        ExpressionType::InputExpression { prompt } => {
            let prompt = match prompt {
                Some(p) => Some(to_js_string(&evaluate_expression(p, ctx)?)),
                None => None,
            };
            read_input(prompt.as_deref(), ctx)
        }
    }
}

/// Splits `name[i][j]...` into the variable and its index expressions, so
/// elements can be read without copying the whole array out of the binding.
fn access_path(expr: &ExpressionType) -> Option<(&str, Vec<&ExpressionType>)> {
    match expr {
        ExpressionType::Identifier(name) => Some((name.as_str(), vec![])),
        ExpressionType::ArrayAccess { object, index } => {
            let (name, mut indices) = access_path(object)?;
            indices.push(index);
            Some((name, indices))
        }
        _ => None,
    }
}

/// The variable is resolved before any index is evaluated.
fn evaluate_path_indices(
    name: &str,
    indices: &[&ExpressionType],
    ctx: &mut EvalContext,
) -> Result<Vec<JsValue>, JErrorType> {
    ctx.env.get_binding(name)?;
    let mut values = Vec::with_capacity(indices.len());
    for index in indices {
        values.push(evaluate_expression(index, ctx)?);
    }
    Ok(values)
}

fn evaluate_literal(lit: &LiteralType) -> JsValue {
    match lit {
        LiteralType::NumberLiteral(n) => JsValue::Number(*n),
        LiteralType::StringLiteral(s) => JsValue::String(s.clone()),
        LiteralType::BooleanLiteral(b) => JsValue::Boolean(*b),
        LiteralType::UndefinedLiteral => JsValue::Undefined,
    }
}

fn evaluate_template_literal(parts: &[TemplateElement], ctx: &mut EvalContext) -> ValueResult {
    let mut text = String::new();
    for part in parts {
        match part {
            TemplateElement::Text(s) => text.push_str(s),
            TemplateElement::Substitution(expr) => {
                let value = evaluate_expression(expr, ctx)?;
                text.push_str(&to_js_string(&value));
            }
        }
    }
    Ok(JsValue::String(text))
}

/// Both operands are evaluated, left first, before the operator applies.
fn evaluate_binary_expression(
    operator: BinaryOperator,
    left: &ExpressionType,
    right: &ExpressionType,
    ctx: &mut EvalContext,
) -> ValueResult {
    let l = evaluate_expression(left, ctx)?;
    let r = evaluate_expression(right, ctx)?;
    Ok(apply_binary_operator(operator, &l, &r))
}

pub fn apply_binary_operator(operator: BinaryOperator, l: &JsValue, r: &JsValue) -> JsValue {
    match operator {
        BinaryOperator::Add => add_values(l, r),
        BinaryOperator::Subtract => subtract_values(l, r),
        BinaryOperator::Multiply => multiply_values(l, r),
        BinaryOperator::Divide => divide_values(l, r),
        BinaryOperator::Modulo => modulo_values(l, r),
        BinaryOperator::LooselyEqual => JsValue::Boolean(loose_equality(l, r)),
        BinaryOperator::LooselyUnequal => JsValue::Boolean(!loose_equality(l, r)),
        BinaryOperator::StrictlyEqual => JsValue::Boolean(strict_equality(l, r)),
        BinaryOperator::StrictlyUnequal => JsValue::Boolean(!strict_equality(l, r)),
        BinaryOperator::LessThan => {
            JsValue::Boolean(compare_values(RelationalOperator::LessThan, l, r))
        }
        BinaryOperator::LessThanEqual => {
            JsValue::Boolean(compare_values(RelationalOperator::LessThanEqual, l, r))
        }
        BinaryOperator::GreaterThan => {
            JsValue::Boolean(compare_values(RelationalOperator::GreaterThan, l, r))
        }
        BinaryOperator::GreaterThanEqual => {
            JsValue::Boolean(compare_values(RelationalOperator::GreaterThanEqual, l, r))
        }
    }
}

/// Short-circuits and yields the deciding operand, not a boolean.
fn evaluate_logical_expression(
    operator: LogicalOperator,
    left: &ExpressionType,
    right: &ExpressionType,
    ctx: &mut EvalContext,
) -> ValueResult {
    let l = evaluate_expression(left, ctx)?;
    match operator {
        LogicalOperator::And if !to_boolean(&l) => Ok(l),
        LogicalOperator::Or if to_boolean(&l) => Ok(l),
        _ => evaluate_expression(right, ctx),
    }
}

fn evaluate_conditional_expression(
    test: &ExpressionType,
    consequent: &TernaryBranch,
    alternate: &TernaryBranch,
    ctx: &mut EvalContext,
) -> ValueResult {
    // Either arm being a block rejects the whole expression, taken or not.
    let (consequent, alternate) = match (consequent, alternate) {
        (TernaryBranch::Expression(c), TernaryBranch::Expression(a)) => (c, a),
        _ => return Err(JErrorType::SyntaxError("Unexpected token '{'".to_string())),
    };
    let test = evaluate_expression(test, ctx)?;
    if to_boolean(&test) {
        evaluate_expression(consequent, ctx)
    } else {
        evaluate_expression(alternate, ctx)
    }
}
