use super::api::JsParser;
use super::api::Rule;
use super::ast::*;
use super::parse_to_ast;
use crate::runner::ds::error::JErrorType;

use pest::consumes_to;
use pest::fails_with;
use pest::parses_to;

#[test]
fn test_integer_number() {
    parses_to! {
        parser: JsParser,
        input: "10",
        rule: Rule::number,
        tokens: [
            number(0, 2)
        ]
    };
}

#[test]
fn test_decimal_number_with_exp() {
    parses_to! {
        parser: JsParser,
        input: "1.5e3",
        rule: Rule::number,
        tokens: [
            number(0, 5)
        ]
    };
}

#[test]
fn test_number_fails_on_word() {
    fails_with! {
        parser: JsParser,
        input: "abc",
        rule: Rule::number,
        positives: vec![Rule::number],
        negatives: vec![],
        pos: 0
    };
}

#[test]
fn test_double_quoted_string() {
    parses_to! {
        parser: JsParser,
        input: "\"ab\"",
        rule: Rule::string,
        tokens: [
            string(0, 4, [
                double_quoted(1, 3)
            ])
        ]
    };
}

#[test]
fn test_empty_single_quoted_string() {
    parses_to! {
        parser: JsParser,
        input: "''",
        rule: Rule::string,
        tokens: [
            string(0, 2, [
                single_quoted(1, 1)
            ])
        ]
    };
}

#[test]
fn test_identifier() {
    parses_to! {
        parser: JsParser,
        input: "count_1",
        rule: Rule::identifier,
        tokens: [
            identifier(0, 7)
        ]
    };
}

#[test]
fn test_boolean_needs_word_boundary() {
    fails_with! {
        parser: JsParser,
        input: "trueish",
        rule: Rule::boolean_literal,
        positives: vec![Rule::boolean_literal],
        negatives: vec![],
        pos: 0
    };
}

#[test]
fn test_declaration_kind() {
    parses_to! {
        parser: JsParser,
        input: "const",
        rule: Rule::declaration_kind,
        tokens: [
            declaration_kind(0, 5)
        ]
    };
}

fn single_statement(code: &str) -> StatementType {
    let mut program = parse_to_ast(code).unwrap();
    assert_eq!(program.body.len(), 1, "expected one statement in {:?}", code);
    program.body.remove(0)
}

fn num(n: f64) -> ExpressionType {
    ExpressionType::Literal(LiteralType::NumberLiteral(n))
}

fn id(name: &str) -> ExpressionType {
    ExpressionType::Identifier(name.to_string())
}

#[test]
fn test_operator_precedence() {
    let stmt = single_statement("1 + 2 * 3");
    assert_eq!(
        stmt,
        StatementType::ExpressionStatement(ExpressionType::BinaryExpression {
            operator: BinaryOperator::Add,
            left: Box::new(num(1.0)),
            right: Box::new(ExpressionType::BinaryExpression {
                operator: BinaryOperator::Multiply,
                left: Box::new(num(2.0)),
                right: Box::new(num(3.0)),
            }),
        })
    );
}

#[test]
fn test_subtraction_is_left_associative() {
    let stmt = single_statement("10 - 4 - 3;");
    assert_eq!(
        stmt,
        StatementType::ExpressionStatement(ExpressionType::BinaryExpression {
            operator: BinaryOperator::Subtract,
            left: Box::new(ExpressionType::BinaryExpression {
                operator: BinaryOperator::Subtract,
                left: Box::new(num(10.0)),
                right: Box::new(num(4.0)),
            }),
            right: Box::new(num(3.0)),
        })
    );
}

#[test]
fn test_declaration_with_several_declarators() {
    let stmt = single_statement("let a = 1, b;");
    assert_eq!(
        stmt,
        StatementType::VariableStatement(VariableStatementType::Declaration {
            kind: VariableDeclarationKind::Let,
            declarations: vec![
                VariableDeclaratorData {
                    id: "a".to_string(),
                    init: Some(num(1.0)),
                },
                VariableDeclaratorData {
                    id: "b".to_string(),
                    init: None,
                },
            ],
        })
    );
}

#[test]
fn test_keyword_prefix_is_an_identifier() {
    let stmt = single_statement("letter = 5");
    assert_eq!(
        stmt,
        StatementType::VariableStatement(VariableStatementType::Assignment {
            target: AssignmentTarget {
                name: "letter".to_string(),
                indices: vec![],
            },
            value: num(5.0),
        })
    );
}

#[test]
fn test_array_cell_assignment() {
    let stmt = single_statement("arr[5] = 9");
    assert_eq!(
        stmt,
        StatementType::VariableStatement(VariableStatementType::Assignment {
            target: AssignmentTarget {
                name: "arr".to_string(),
                indices: vec![num(5.0)],
            },
            value: num(9.0),
        })
    );
}

#[test]
fn test_compound_and_update_forms() {
    assert_eq!(
        single_statement("a += 2;"),
        StatementType::VariableAssignment(VariableAssignmentType::Compound {
            target: AssignmentTarget {
                name: "a".to_string(),
                indices: vec![],
            },
            operator: AssignmentOperator::AddEquals,
            value: num(2.0),
        })
    );
    assert_eq!(
        single_statement("i++"),
        StatementType::VariableAssignment(VariableAssignmentType::Update {
            target: AssignmentTarget {
                name: "i".to_string(),
                indices: vec![],
            },
            operator: UpdateOperator::Increment,
            prefix: false,
        })
    );
    assert_eq!(
        single_statement("--i"),
        StatementType::VariableAssignment(VariableAssignmentType::Update {
            target: AssignmentTarget {
                name: "i".to_string(),
                indices: vec![],
            },
            operator: UpdateOperator::Decrement,
            prefix: true,
        })
    );
}

#[test]
fn test_equality_is_not_an_assignment() {
    let stmt = single_statement("x == 3");
    assert_eq!(
        stmt,
        StatementType::ExpressionStatement(ExpressionType::BinaryExpression {
            operator: BinaryOperator::LooselyEqual,
            left: Box::new(id("x")),
            right: Box::new(num(3.0)),
        })
    );
}

#[test]
fn test_if_else_chain() {
    let stmt = single_statement("if (a) { b = 1 } else if (c) b = 2; else { b = 3 }");
    match stmt {
        StatementType::IfStatement { alternate, .. } => match alternate.map(|a| *a) {
            Some(StatementType::IfStatement { alternate, .. }) => {
                assert!(matches!(
                    alternate.map(|a| *a),
                    Some(StatementType::BlockStatement(_))
                ));
            }
            other => panic!("expected nested if, got {:?}", other),
        },
        other => panic!("expected if, got {:?}", other),
    }
}

#[test]
fn test_function_declaration() {
    let stmt = single_statement("function add(x, y) { return x + y; }");
    match stmt {
        StatementType::FunctionDeclaration(f) => {
            assert_eq!(f.name, "add");
            assert_eq!(f.params, vec!["x".to_string(), "y".to_string()]);
            assert_eq!(f.body.body.len(), 1);
        }
        other => panic!("expected function declaration, got {:?}", other),
    }
}

#[test]
fn test_template_literal_parts() {
    let stmt = single_statement("`sum is ${a + 1}!`");
    assert_eq!(
        stmt,
        StatementType::ExpressionStatement(ExpressionType::TemplateLiteral(vec![
            TemplateElement::Text("sum is ".to_string()),
            TemplateElement::Substitution(ExpressionType::BinaryExpression {
                operator: BinaryOperator::Add,
                left: Box::new(id("a")),
                right: Box::new(num(1.0)),
            }),
            TemplateElement::Text("!".to_string()),
        ]))
    );
}

#[test]
fn test_length_and_index_chain() {
    let stmt = single_statement("m[1][0].length");
    assert_eq!(
        stmt,
        StatementType::ExpressionStatement(ExpressionType::ArrayLength(Box::new(
            ExpressionType::ArrayAccess {
                object: Box::new(ExpressionType::ArrayAccess {
                    object: Box::new(id("m")),
                    index: Box::new(num(1.0)),
                }),
                index: Box::new(num(0.0)),
            }
        )))
    );
}

#[test]
fn test_ternary_with_block_branch_parses() {
    let stmt = single_statement("x ? { y = 1 } : 2");
    match stmt {
        StatementType::ExpressionStatement(ExpressionType::ConditionalExpression {
            consequent,
            alternate,
            ..
        }) => {
            assert!(matches!(*consequent, TernaryBranch::Block(_)));
            assert_eq!(*alternate, TernaryBranch::Expression(num(2.0)));
        }
        other => panic!("expected ternary, got {:?}", other),
    }
}

#[test]
fn test_comments_and_missing_semicolons() {
    let program = parse_to_ast(
        "let x = 10 // ten\n/* block\ncomment */ let y = 5\nconsole.log(x, y)",
    )
    .unwrap();
    assert_eq!(program.body.len(), 3);
    assert!(matches!(
        program.body[2],
        StatementType::PrintStatement { ref arguments } if arguments.len() == 2
    ));
}

#[test]
fn test_prompt_is_an_input_expression() {
    let stmt = single_statement("let a = prompt(\"Enter: \")");
    match stmt {
        StatementType::VariableStatement(VariableStatementType::Declaration {
            declarations,
            ..
        }) => assert!(matches!(
            declarations[0].init,
            Some(ExpressionType::InputExpression { prompt: Some(_) })
        )),
        other => panic!("expected declaration, got {:?}", other),
    }
}

#[test]
fn test_const_requires_initializer() {
    assert_eq!(
        parse_to_ast("const x;"),
        Err(JErrorType::SyntaxError(
            "Missing = in const declaration".to_string()
        ))
    );
}

#[test]
fn test_missing_closing_delimiters() {
    match parse_to_ast("add(1, 2") {
        Err(JErrorType::UnmatchedDelimiter { label, .. }) => {
            assert_eq!(label, "Missing ) in argument list")
        }
        other => panic!("unexpected {:?}", other),
    }
    match parse_to_ast("let a = [1, 2") {
        Err(JErrorType::UnmatchedDelimiter { label, .. }) => {
            assert_eq!(label, "Missing ] after element list")
        }
        other => panic!("unexpected {:?}", other),
    }
    match parse_to_ast("function f() { return 1;") {
        Err(JErrorType::UnmatchedDelimiter { label, .. }) => {
            assert_eq!(label, "Missing } after function body")
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_reserved_word_reaches_the_ast() {
    // Reserved words are rejected by the interpreter, not the grammar.
    let stmt = single_statement("let while = 3");
    assert!(matches!(
        stmt,
        StatementType::VariableStatement(VariableStatementType::Declaration { .. })
    ));
}
