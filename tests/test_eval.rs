//! Tests for the expression evaluation engine.
//!
//! These tests build expression trees by hand and evaluate them against a
//! fresh context, covering literals, operators and coercions.

extern crate just_lite;

use just_lite::parser::ast::{
    BinaryOperator, ExpressionType, LiteralType, LogicalOperator, TemplateElement, TernaryBranch,
    UnaryOperator,
};
use just_lite::runner::config::EngineConfig;
use just_lite::runner::ds::error::JErrorType;
use just_lite::runner::ds::scope::BindingKind;
use just_lite::runner::ds::value::JsValue;
use just_lite::runner::eval::expression::evaluate_expression;
use just_lite::runner::eval::types::EvalContext;
use just_lite::runner::host::BufferedHost;

fn new_ctx() -> EvalContext {
    EvalContext::with_host(Box::new(BufferedHost::new()), EngineConfig::default())
}

fn num_expr(n: f64) -> ExpressionType {
    ExpressionType::Literal(LiteralType::NumberLiteral(n))
}

fn str_expr(s: &str) -> ExpressionType {
    ExpressionType::Literal(LiteralType::StringLiteral(s.to_string()))
}

fn bool_expr(b: bool) -> ExpressionType {
    ExpressionType::Literal(LiteralType::BooleanLiteral(b))
}

fn undefined_expr() -> ExpressionType {
    ExpressionType::Literal(LiteralType::UndefinedLiteral)
}

fn ident(name: &str) -> ExpressionType {
    ExpressionType::Identifier(name.to_string())
}

fn binary(operator: BinaryOperator, left: ExpressionType, right: ExpressionType) -> ExpressionType {
    ExpressionType::BinaryExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn eval(expr: &ExpressionType) -> Result<JsValue, JErrorType> {
    evaluate_expression(expr, &mut new_ctx())
}

fn num(n: f64) -> JsValue {
    JsValue::Number(n)
}

fn s(v: &str) -> JsValue {
    JsValue::String(v.to_string())
}

// ════════════════════════════════════════════════════════════
// Literals
// ════════════════════════════════════════════════════════════

#[test]
fn test_literals() {
    assert_eq!(eval(&num_expr(42.0)), Ok(num(42.0)));
    assert_eq!(eval(&str_expr("hi")), Ok(s("hi")));
    assert_eq!(eval(&bool_expr(true)), Ok(JsValue::Boolean(true)));
    assert_eq!(eval(&undefined_expr()), Ok(JsValue::Undefined));
}

#[test]
fn test_array_literal() {
    let expr = ExpressionType::ArrayExpression(vec![num_expr(1.0), str_expr("x")]);
    assert_eq!(eval(&expr), Ok(JsValue::Array(vec![num(1.0), s("x")])));
}

// ════════════════════════════════════════════════════════════
// The + operator
// ════════════════════════════════════════════════════════════

#[test]
fn test_addition_table() {
    use BinaryOperator::Add;
    assert_eq!(eval(&binary(Add, num_expr(10.0), num_expr(5.0))), Ok(num(15.0)));
    assert_eq!(eval(&binary(Add, str_expr("5"), num_expr(2.0))), Ok(s("52")));
    assert_eq!(eval(&binary(Add, num_expr(2.0), str_expr("5"))), Ok(s("25")));
    assert_eq!(eval(&binary(Add, bool_expr(true), num_expr(1.0))), Ok(num(2.0)));
    assert_eq!(eval(&binary(Add, str_expr("a"), bool_expr(true))), Ok(s("atrue")));
    assert_eq!(eval(&binary(Add, str_expr("hello"), num_expr(5.0))), Ok(s("hello5")));
    assert!(eval(&binary(Add, undefined_expr(), num_expr(1.0))).unwrap().is_nan());
}

#[test]
fn test_addition_with_array_concatenates() {
    let arr = ExpressionType::ArrayExpression(vec![num_expr(1.0), num_expr(2.0)]);
    assert_eq!(eval(&binary(BinaryOperator::Add, arr, num_expr(3.0))), Ok(s("1,23")));
}

// ════════════════════════════════════════════════════════════
// Other arithmetic
// ════════════════════════════════════════════════════════════

#[test]
fn test_text_coerces_for_arithmetic() {
    use BinaryOperator::*;
    assert_eq!(eval(&binary(Subtract, str_expr("5"), num_expr(2.0))), Ok(num(3.0)));
    assert_eq!(eval(&binary(Multiply, str_expr("10"), num_expr(5.0))), Ok(num(50.0)));
    assert_eq!(eval(&binary(Divide, str_expr("10"), num_expr(5.0))), Ok(num(2.0)));
    assert!(eval(&binary(Subtract, str_expr("hello"), num_expr(5.0))).unwrap().is_nan());
}

#[test]
fn test_division_edge_cases() {
    use BinaryOperator::Divide;
    assert_eq!(
        eval(&binary(Divide, num_expr(1.0), num_expr(0.0))),
        Ok(num(f64::INFINITY))
    );
    assert!(eval(&binary(Divide, num_expr(0.0), num_expr(0.0))).unwrap().is_nan());
    assert_eq!(eval(&binary(Divide, num_expr(7.0), num_expr(2.0))), Ok(num(3.5)));
}

#[test]
fn test_modulo() {
    assert_eq!(
        eval(&binary(BinaryOperator::Modulo, num_expr(17.0), num_expr(5.0))),
        Ok(num(2.0))
    );
}

#[test]
fn test_unary_operators() {
    let neg = ExpressionType::UnaryExpression {
        operator: UnaryOperator::Minus,
        argument: Box::new(str_expr("3")),
    };
    assert_eq!(eval(&neg), Ok(num(-3.0)));
    let not = ExpressionType::UnaryExpression {
        operator: UnaryOperator::LogicalNot,
        argument: Box::new(str_expr("hello")),
    };
    assert_eq!(eval(&not), Ok(JsValue::Boolean(false)));
}

// ════════════════════════════════════════════════════════════
// Comparison
// ════════════════════════════════════════════════════════════

#[test]
fn test_loose_and_strict_equality() {
    use BinaryOperator::*;
    assert_eq!(
        eval(&binary(LooselyEqual, num_expr(10.0), str_expr("10"))),
        Ok(JsValue::Boolean(true))
    );
    assert_eq!(
        eval(&binary(StrictlyEqual, num_expr(10.0), str_expr("10"))),
        Ok(JsValue::Boolean(false))
    );
    assert_eq!(
        eval(&binary(LooselyUnequal, num_expr(5.0), str_expr("5"))),
        Ok(JsValue::Boolean(false))
    );
    assert_eq!(
        eval(&binary(StrictlyUnequal, num_expr(5.0), str_expr("5"))),
        Ok(JsValue::Boolean(true))
    );
    assert_eq!(
        eval(&binary(LooselyEqual, str_expr("hello"), num_expr(5.0))),
        Ok(JsValue::Boolean(false))
    );
    assert_eq!(
        eval(&binary(LooselyUnequal, str_expr("hello"), num_expr(5.0))),
        Ok(JsValue::Boolean(true))
    );
}

#[test]
fn test_relational() {
    use BinaryOperator::*;
    assert_eq!(
        eval(&binary(GreaterThanEqual, str_expr("25"), num_expr(18.0))),
        Ok(JsValue::Boolean(true))
    );
    assert_eq!(
        eval(&binary(LessThan, str_expr("abc"), str_expr("abd"))),
        Ok(JsValue::Boolean(true))
    );
    // Lexicographic, not numeric, when both sides are text.
    assert_eq!(
        eval(&binary(LessThan, str_expr("10"), str_expr("9"))),
        Ok(JsValue::Boolean(true))
    );
    assert_eq!(
        eval(&binary(GreaterThan, str_expr("abc"), num_expr(5.0))),
        Ok(JsValue::Boolean(false))
    );
}

// ════════════════════════════════════════════════════════════
// Logical, ternary, template
// ════════════════════════════════════════════════════════════

#[test]
fn test_logical_short_circuit() {
    let and = ExpressionType::LogicalExpression {
        operator: LogicalOperator::And,
        left: Box::new(num_expr(0.0)),
        right: Box::new(ident("never_defined")),
    };
    assert_eq!(eval(&and), Ok(num(0.0)));
    let or = ExpressionType::LogicalExpression {
        operator: LogicalOperator::Or,
        left: Box::new(str_expr("")),
        right: Box::new(str_expr("fallback")),
    };
    assert_eq!(eval(&or), Ok(s("fallback")));
}

#[test]
fn test_conditional_expression() {
    let expr = ExpressionType::ConditionalExpression {
        test: Box::new(str_expr("0")),
        consequent: Box::new(TernaryBranch::Expression(str_expr("truthy"))),
        alternate: Box::new(TernaryBranch::Expression(str_expr("falsy"))),
    };
    assert_eq!(eval(&expr), Ok(s("truthy")));
}

#[test]
fn test_template_literal() {
    let mut ctx = new_ctx();
    ctx.env
        .declare("n", BindingKind::Let, num(2.5), None)
        .unwrap();
    let expr = ExpressionType::TemplateLiteral(vec![
        TemplateElement::Text("n = ".to_string()),
        TemplateElement::Substitution(ident("n")),
        TemplateElement::Text(", list = ".to_string()),
        TemplateElement::Substitution(ExpressionType::ArrayExpression(vec![
            num_expr(1.0),
            undefined_expr(),
            num_expr(3.0),
        ])),
    ]);
    assert_eq!(evaluate_expression(&expr, &mut ctx), Ok(s("n = 2.5, list = 1,,3")));
}

// ════════════════════════════════════════════════════════════
// Identifiers, indexing, length
// ════════════════════════════════════════════════════════════

#[test]
fn test_identifier_lookup() {
    let mut ctx = new_ctx();
    ctx.env
        .declare("x", BindingKind::Var, num(7.0), None)
        .unwrap();
    assert_eq!(evaluate_expression(&ident("x"), &mut ctx), Ok(num(7.0)));
    assert_eq!(
        evaluate_expression(&ident("y"), &mut ctx),
        Err(JErrorType::ReferenceError("y".to_string()))
    );
}

#[test]
fn test_index_and_length() {
    let arr = ExpressionType::ArrayExpression(vec![str_expr("a"), str_expr("b")]);
    let access = ExpressionType::ArrayAccess {
        object: Box::new(arr.clone()),
        index: Box::new(num_expr(1.0)),
    };
    assert_eq!(eval(&access), Ok(s("b")));
    assert_eq!(eval(&ExpressionType::ArrayLength(Box::new(arr))), Ok(num(2.0)));
    assert_eq!(
        eval(&ExpressionType::ArrayLength(Box::new(str_expr("four")))),
        Ok(num(4.0))
    );
}

#[test]
fn test_input_expression_reads_host() {
    let host = BufferedHost::with_input(vec!["typed"]);
    let mut ctx = EvalContext::with_host(Box::new(host), EngineConfig::default());
    let expr = ExpressionType::InputExpression {
        prompt: Some(Box::new(str_expr("say: "))),
    };
    assert_eq!(evaluate_expression(&expr, &mut ctx), Ok(s("typed")));
    assert_eq!(evaluate_expression(&expr, &mut ctx), Ok(JsValue::Undefined));
}
