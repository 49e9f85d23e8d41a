use std::num::NonZeroUsize;
use std::rc::Rc;
use std::sync::Once;
use std::time::Instant;

use pest::error::{Error, ErrorVariant, InputLocation, LineColLocation};
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;
use tracing::debug;

use super::ast::*;
use crate::runner::ds::error::JErrorType;
use crate::stack::{ensure_sufficient_stack, with_parse_stack};

#[derive(Parser)]
#[grammar = "parser/js_grammar.pest"] // relative to src
pub struct JsParser;

impl JsParser {
    pub fn parse_to_ast_from_str(script: &str) -> Result<ProgramData, JErrorType> {
        parse_to_ast(script)
    }

    pub fn parse_to_token_tree_from_str(script: &str) -> Result<String, JErrorType> {
        parse_to_token_tree(script)
    }
}

const TAB_WIDTH: usize = 2;

/// Deepest nesting of brackets, braces and template substitutions a script
/// may use.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Upper bound on grammar rule attempts in one parse.
const PARSE_CALL_LIMIT: usize = 50_000_000;

static SET_CALL_LIMIT: Once = Once::new();

type BuildResult<T> = Result<T, JErrorType>;

/// Runs the generated parser over the whole script. Nesting is checked first
/// so that the recursion inside pest stays within the parse stack.
fn parse_script(script: &str) -> Result<Pairs<Rule>, JErrorType> {
    check_nesting(script)?;
    SET_CALL_LIMIT.call_once(|| pest::set_call_limit(NonZeroUsize::new(PARSE_CALL_LIMIT)));
    let start = Instant::now();
    let result = with_parse_stack(|| JsParser::parse(Rule::script, script));
    debug!(
        "Actual parse time is {}ms",
        Instant::now().saturating_duration_since(start).as_millis()
    );
    result.map_err(|e| to_syntax_error(e, script))
}

/// Rejects scripts nested deeper than `MAX_NESTING_DEPTH`. Brackets inside
/// string literals and comments do not count; template literals and their
/// substitutions do.
fn check_nesting(script: &str) -> Result<(), JErrorType> {
    let mut open: Vec<char> = vec![];
    let mut quote: Option<char> = None;
    let mut chars = script.char_indices().peekable();
    while let Some((position, c)) = chars.next() {
        if let Some(q) = quote {
            match c {
                '\\' => {
                    chars.next();
                }
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        if open.last() == Some(&'`') {
            match c {
                '\\' => {
                    chars.next();
                }
                '`' => {
                    open.pop();
                }
                '$' if chars.peek().map(|&(_, n)| n) == Some('{') => {
                    chars.next();
                    open.push('$');
                }
                _ => {}
            }
        } else {
            match c {
                '"' | '\'' => quote = Some(c),
                '/' if chars.peek().map(|&(_, n)| n) == Some('/') => {
                    while let Some(&(_, n)) = chars.peek() {
                        if n == '\n' {
                            break;
                        }
                        chars.next();
                    }
                }
                '/' if chars.peek().map(|&(_, n)| n) == Some('*') => {
                    chars.next();
                    let mut previous = ' ';
                    for (_, n) in chars.by_ref() {
                        if previous == '*' && n == '/' {
                            break;
                        }
                        previous = n;
                    }
                }
                '(' | '[' | '{' | '`' => open.push(c),
                ')' | ']' | '}' => {
                    open.pop();
                }
                _ => {}
            }
        }
        if open.len() > MAX_NESTING_DEPTH {
            let (line, column) = line_col(script, position);
            return Err(JErrorType::SyntaxError(format!(
                "Maximum nesting depth of {} exceeded at line {}, column {}",
                MAX_NESTING_DEPTH, line, column
            )));
        }
    }
    Ok(())
}

fn line_col(script: &str, position: usize) -> (usize, usize) {
    let before = &script[..position];
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, column)
}

pub fn parse_to_token_tree(script: &str) -> Result<String, JErrorType> {
    let mut tree = vec![];
    for pair in parse_script(script)? {
        tree.push(pair_to_string(pair, 0).join("\n"));
    }
    Ok(tree.join("\n"))
}

fn pair_to_string(pair: Pair<Rule>, level: usize) -> Vec<String> {
    ensure_sufficient_stack(|| pair_to_string_inner(pair, level))
}

fn pair_to_string_inner(pair: Pair<Rule>, level: usize) -> Vec<String> {
    let mut tree = vec![];
    let span = pair.as_span();
    let rule_name = format!(
        "{:?} => ({},{}) #{:?}",
        pair.as_rule(),
        span.start(),
        span.end(),
        span.as_str()
    );
    tree.push(format!("{}{}", " ".repeat(level * TAB_WIDTH), rule_name));
    for child_pair in pair.into_inner() {
        tree.append(pair_to_string(child_pair, level + 1).as_mut());
    }
    tree
}

pub fn parse_to_ast(script: &str) -> Result<ProgramData, JErrorType> {
    let start = Instant::now();
    let pairs = parse_script(script)?;
    let program = build_ast_from_script(pairs)?;
    debug!(
        statements = program.body.len(),
        "parsed script in {}us",
        Instant::now().saturating_duration_since(start).as_micros()
    );
    Ok(program)
}

/// Maps a pest failure onto the syntax errors a user is shown. Missing closing
/// delimiters are recognised through the dedicated `*_close` rules.
fn to_syntax_error(err: Error<Rule>, script: &str) -> JErrorType {
    let (line, column) = match err.line_col {
        LineColLocation::Pos(p) => p,
        LineColLocation::Span(start, _) => start,
    };
    let position = match err.location {
        InputLocation::Pos(p) => p,
        InputLocation::Span((start, _)) => start,
    };
    if let ErrorVariant::CustomError { message } = &err.variant {
        return JErrorType::SyntaxError(format!(
            "Script too complex to parse ({}) at line {}, column {}",
            message, line, column
        ));
    }
    if let ErrorVariant::ParsingError { positives, .. } = &err.variant {
        let label = if positives.contains(&Rule::cond_close) {
            Some("Missing ) after condition")
        } else if positives.contains(&Rule::body_close) {
            Some("Missing } after function body")
        } else if positives.contains(&Rule::array_close) {
            Some("Missing ] after element list")
        } else if positives.contains(&Rule::args_close) {
            Some("Missing ) in argument list")
        } else {
            None
        };
        if let Some(label) = label {
            return JErrorType::UnmatchedDelimiter {
                label: label.to_string(),
                line,
                column,
            };
        }
    }
    let rest = script.get(position..).unwrap_or("");
    if rest.trim().is_empty() {
        return JErrorType::UnexpectedEndOfInput;
    }
    JErrorType::SyntaxError(format!(
        "Unexpected token '{}' at line {}, column {}",
        offending_token(rest),
        line,
        column
    ))
}

fn offending_token(rest: &str) -> &str {
    let rest = rest.trim_start();
    let is_word = |c: char| c.is_alphanumeric() || c == '_' || c == '$';
    match rest.chars().next() {
        Some(c) if is_word(c) => {
            let end = rest.find(|c: char| !is_word(c)).unwrap_or(rest.len());
            &rest[..end]
        }
        Some(c) => &rest[..c.len_utf8()],
        None => "",
    }
}

fn get_unexpected_error(id: i32, pair: &Pair<Rule>) -> JErrorType {
    JErrorType::SyntaxError(format!(
        "Unexpected state reached [{:?}] - {}",
        pair.as_rule(),
        id
    ))
}

fn next_child<'i>(pairs: &mut Pairs<'i, Rule>, parent: Rule) -> BuildResult<Pair<'i, Rule>> {
    pairs.next().ok_or_else(|| {
        JErrorType::SyntaxError(format!("Unexpected state reached [{:?}] - no child", parent))
    })
}

fn first_child(pair: Pair<Rule>) -> BuildResult<Pair<Rule>> {
    let rule = pair.as_rule();
    next_child(&mut pair.into_inner(), rule)
}

fn build_ast_from_script(pairs: Pairs<Rule>) -> BuildResult<ProgramData> {
    let mut body = vec![];
    for pair in pairs {
        match pair.as_rule() {
            Rule::script => {
                for inner_pair in pair.into_inner() {
                    match inner_pair.as_rule() {
                        Rule::statement => body.push(build_ast_from_statement(inner_pair)?),
                        Rule::EOI => { /* Do nothing */ }
                        _ => return Err(get_unexpected_error(1, &inner_pair)),
                    }
                }
            }
            Rule::EOI => { /* Do nothing */ }
            _ => return Err(get_unexpected_error(2, &pair)),
        }
    }
    Ok(ProgramData { body })
}

fn build_ast_from_statement(pair: Pair<Rule>) -> BuildResult<StatementType> {
    ensure_sufficient_stack(|| build_ast_from_statement_inner(pair))
}

fn build_ast_from_statement_inner(pair: Pair<Rule>) -> BuildResult<StatementType> {
    let inner_pair = first_child(pair)?;
    Ok(match inner_pair.as_rule() {
        Rule::function_declaration => build_ast_from_function_declaration(inner_pair)?,
        Rule::if_statement => build_ast_from_if_statement(inner_pair)?,
        Rule::while_statement => {
            let mut inner = inner_pair.into_inner();
            let test = build_ast_from_expression(next_child(&mut inner, Rule::while_statement)?)?;
            let mut body = None;
            for p in inner {
                if p.as_rule() == Rule::statement {
                    body = Some(Box::new(build_ast_from_statement(p)?));
                }
            }
            StatementType::WhileStatement {
                test,
                body: body.ok_or_else(|| {
                    JErrorType::SyntaxError("Unexpected end of while statement".to_string())
                })?,
            }
        }
        Rule::block => StatementType::BlockStatement(build_ast_from_block(inner_pair)?),
        Rule::empty_statement => StatementType::EmptyStatement,
        Rule::return_statement => {
            let mut argument = None;
            for p in inner_pair.into_inner() {
                if p.as_rule() == Rule::expression {
                    argument = Some(build_ast_from_expression(p)?);
                }
            }
            StatementType::ReturnStatement { argument }
        }
        Rule::print_statement => {
            let mut arguments = vec![];
            for p in inner_pair.into_inner() {
                if p.as_rule() == Rule::argument_list {
                    arguments = build_ast_from_argument_list(p)?;
                }
            }
            StatementType::PrintStatement { arguments }
        }
        Rule::variable_statement => build_ast_from_variable_statement(inner_pair)?,
        Rule::variable_assignment => build_ast_from_variable_assignment(inner_pair)?,
        Rule::expression_statement => {
            StatementType::ExpressionStatement(build_ast_from_expression(first_child(inner_pair)?)?)
        }
        _ => return Err(get_unexpected_error(3, &inner_pair)),
    })
}

/// Works for both `block` and `function_body`; the closing-brace rules are
/// skipped.
fn build_ast_from_block(pair: Pair<Rule>) -> BuildResult<BlockStatementData> {
    let mut body = vec![];
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::statement => body.push(build_ast_from_statement(p)?),
            Rule::block_close | Rule::body_close => {}
            _ => return Err(get_unexpected_error(4, &p)),
        }
    }
    Ok(BlockStatementData { body })
}

fn build_ast_from_function_declaration(pair: Pair<Rule>) -> BuildResult<StatementType> {
    let mut name = None;
    let mut params = vec![];
    let mut body = None;
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::kw_function | Rule::args_close => {}
            Rule::identifier => name = Some(p.as_str().to_string()),
            Rule::parameter_list => {
                params = p.into_inner().map(|id| id.as_str().to_string()).collect();
            }
            Rule::function_body => body = Some(build_ast_from_block(p)?),
            _ => return Err(get_unexpected_error(5, &p)),
        }
    }
    match (name, body) {
        (Some(name), Some(body)) => Ok(StatementType::FunctionDeclaration(Rc::new(
            FunctionData { name, params, body },
        ))),
        _ => Err(JErrorType::SyntaxError(
            "Incomplete function declaration".to_string(),
        )),
    }
}

fn build_ast_from_if_statement(pair: Pair<Rule>) -> BuildResult<StatementType> {
    let mut test = None;
    let mut consequent = None;
    let mut alternate = None;
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::expression => test = Some(build_ast_from_expression(p)?),
            Rule::cond_close => {}
            Rule::statement => consequent = Some(Box::new(build_ast_from_statement(p)?)),
            Rule::else_clause => {
                for e in p.into_inner() {
                    if e.as_rule() == Rule::statement {
                        alternate = Some(Box::new(build_ast_from_statement(e)?));
                    }
                }
            }
            _ => return Err(get_unexpected_error(6, &p)),
        }
    }
    match (test, consequent) {
        (Some(test), Some(consequent)) => Ok(StatementType::IfStatement {
            test,
            consequent,
            alternate,
        }),
        _ => Err(JErrorType::SyntaxError("Incomplete if statement".to_string())),
    }
}

fn build_ast_from_variable_statement(pair: Pair<Rule>) -> BuildResult<StatementType> {
    let mut inner = pair.into_inner();
    let kind = match next_child(&mut inner, Rule::variable_statement)?.as_str() {
        "var" => VariableDeclarationKind::Var,
        "let" => VariableDeclarationKind::Let,
        _ => VariableDeclarationKind::Const,
    };
    let mut declarations = vec![];
    for declarator in inner {
        let mut declarator_inner = declarator.into_inner();
        let id = next_child(&mut declarator_inner, Rule::variable_declarator)?
            .as_str()
            .to_string();
        let init = match declarator_inner.next() {
            Some(e) => Some(build_ast_from_expression(e)?),
            None => None,
        };
        if init.is_none() && kind == VariableDeclarationKind::Const {
            return Err(JErrorType::SyntaxError(
                "Missing = in const declaration".to_string(),
            ));
        }
        declarations.push(VariableDeclaratorData { id, init });
    }
    Ok(StatementType::VariableStatement(
        VariableStatementType::Declaration { kind, declarations },
    ))
}

fn build_ast_from_variable_assignment(pair: Pair<Rule>) -> BuildResult<StatementType> {
    let inner_pair = first_child(pair)?;
    let rule = inner_pair.as_rule();
    let mut inner = inner_pair.into_inner();
    Ok(match rule {
        Rule::assignment => {
            let target = build_ast_from_assignment_target(next_child(&mut inner, rule)?)?;
            let operator = next_child(&mut inner, rule)?;
            let value = build_ast_from_expression(next_child(&mut inner, rule)?)?;
            let operator = match operator.as_str() {
                "=" => {
                    return Ok(StatementType::VariableStatement(
                        VariableStatementType::Assignment { target, value },
                    ))
                }
                "+=" => AssignmentOperator::AddEquals,
                "-=" => AssignmentOperator::SubtractEquals,
                "*=" => AssignmentOperator::MultiplyEquals,
                "/=" => AssignmentOperator::DivideEquals,
                "%=" => AssignmentOperator::ModuloEquals,
                _ => return Err(get_unexpected_error(7, &operator)),
            };
            StatementType::VariableAssignment(VariableAssignmentType::Compound {
                target,
                operator,
                value,
            })
        }
        Rule::update_prefix | Rule::update_postfix => {
            let prefix = rule == Rule::update_prefix;
            let (operator, target) = if prefix {
                let op = next_child(&mut inner, rule)?;
                (op, next_child(&mut inner, rule)?)
            } else {
                let target = next_child(&mut inner, rule)?;
                (next_child(&mut inner, rule)?, target)
            };
            let operator = if operator.as_str() == "++" {
                UpdateOperator::Increment
            } else {
                UpdateOperator::Decrement
            };
            StatementType::VariableAssignment(VariableAssignmentType::Update {
                target: build_ast_from_assignment_target(target)?,
                operator,
                prefix,
            })
        }
        _ => return Err(JErrorType::SyntaxError(format!(
            "Unexpected state reached [{:?}] - 8",
            rule
        ))),
    })
}

fn build_ast_from_assignment_target(pair: Pair<Rule>) -> BuildResult<AssignmentTarget> {
    let mut inner = pair.into_inner();
    let name = next_child(&mut inner, Rule::assignment_target)?
        .as_str()
        .to_string();
    let mut indices = vec![];
    for p in inner {
        if p.as_rule() == Rule::expression {
            indices.push(build_ast_from_expression(p)?);
        }
    }
    Ok(AssignmentTarget { name, indices })
}

fn build_ast_from_argument_list(pair: Pair<Rule>) -> BuildResult<Vec<ExpressionType>> {
    pair.into_inner().map(build_ast_from_expression).collect()
}

fn build_ast_from_expression(pair: Pair<Rule>) -> BuildResult<ExpressionType> {
    ensure_sufficient_stack(|| build_ast_from_expression_inner(pair))
}

fn build_ast_from_expression_inner(pair: Pair<Rule>) -> BuildResult<ExpressionType> {
    let mut inner = pair.into_inner();
    let test = build_ast_from_operand(next_child(&mut inner, Rule::expression)?)?;
    match (inner.next(), inner.next()) {
        (Some(consequent), Some(alternate)) => Ok(ExpressionType::ConditionalExpression {
            test: Box::new(test),
            consequent: Box::new(build_ast_from_ternary_branch(consequent)?),
            alternate: Box::new(build_ast_from_ternary_branch(alternate)?),
        }),
        _ => Ok(test),
    }
}

fn build_ast_from_ternary_branch(pair: Pair<Rule>) -> BuildResult<TernaryBranch> {
    let inner_pair = first_child(pair)?;
    Ok(match inner_pair.as_rule() {
        Rule::block => TernaryBranch::Block(build_ast_from_block(inner_pair)?),
        _ => TernaryBranch::Expression(build_ast_from_expression(inner_pair)?),
    })
}

fn build_ast_from_operand(pair: Pair<Rule>) -> BuildResult<ExpressionType> {
    match pair.as_rule() {
        Rule::logical_or => build_ast_from_logical(pair, LogicalOperator::Or),
        Rule::logical_and => build_ast_from_logical(pair, LogicalOperator::And),
        Rule::equality
        | Rule::relational
        | Rule::additive
        | Rule::multiplicative => build_ast_from_binary(pair),
        Rule::unary => build_ast_from_unary(pair),
        Rule::expression => build_ast_from_expression(pair),
        _ => Err(get_unexpected_error(9, &pair)),
    }
}

fn build_ast_from_logical(pair: Pair<Rule>, operator: LogicalOperator) -> BuildResult<ExpressionType> {
    let mut inner = pair.into_inner();
    let mut left = build_ast_from_operand(next_child(&mut inner, Rule::logical_or)?)?;
    for p in inner {
        left = ExpressionType::LogicalExpression {
            operator,
            left: Box::new(left),
            right: Box::new(build_ast_from_operand(p)?),
        };
    }
    Ok(left)
}

fn build_ast_from_binary(pair: Pair<Rule>) -> BuildResult<ExpressionType> {
    let rule = pair.as_rule();
    let mut inner = pair.into_inner();
    let mut left = build_ast_from_operand(next_child(&mut inner, rule)?)?;
    while let Some(op_pair) = inner.next() {
        let operator = match op_pair.as_str() {
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Subtract,
            "*" => BinaryOperator::Multiply,
            "/" => BinaryOperator::Divide,
            "%" => BinaryOperator::Modulo,
            "==" => BinaryOperator::LooselyEqual,
            "!=" => BinaryOperator::LooselyUnequal,
            "===" => BinaryOperator::StrictlyEqual,
            "!==" => BinaryOperator::StrictlyUnequal,
            "<" => BinaryOperator::LessThan,
            "<=" => BinaryOperator::LessThanEqual,
            ">" => BinaryOperator::GreaterThan,
            ">=" => BinaryOperator::GreaterThanEqual,
            _ => return Err(get_unexpected_error(10, &op_pair)),
        };
        let right = build_ast_from_operand(next_child(&mut inner, rule)?)?;
        left = ExpressionType::BinaryExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        };
    }
    Ok(left)
}

fn build_ast_from_unary(pair: Pair<Rule>) -> BuildResult<ExpressionType> {
    let mut operators = vec![];
    let mut operand = None;
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::unary_operator => operators.push(if p.as_str() == "!" {
                UnaryOperator::LogicalNot
            } else {
                UnaryOperator::Minus
            }),
            Rule::postfix => operand = Some(build_ast_from_postfix(p)?),
            _ => return Err(get_unexpected_error(11, &p)),
        }
    }
    let mut expression = operand
        .ok_or_else(|| JErrorType::SyntaxError("Missing operand".to_string()))?;
    for operator in operators.into_iter().rev() {
        expression = ExpressionType::UnaryExpression {
            operator,
            argument: Box::new(expression),
        };
    }
    Ok(expression)
}

fn build_ast_from_postfix(pair: Pair<Rule>) -> BuildResult<ExpressionType> {
    let mut inner = pair.into_inner();
    let mut object = build_ast_from_primary(next_child(&mut inner, Rule::postfix)?)?;
    for p in inner {
        object = match p.as_rule() {
            Rule::index_access => ExpressionType::ArrayAccess {
                object: Box::new(object),
                index: Box::new(build_ast_from_expression(first_child(p)?)?),
            },
            Rule::length_access => ExpressionType::ArrayLength(Box::new(object)),
            _ => return Err(get_unexpected_error(12, &p)),
        };
    }
    Ok(object)
}

fn build_ast_from_primary(pair: Pair<Rule>) -> BuildResult<ExpressionType> {
    let inner_pair = first_child(pair)?;
    Ok(match inner_pair.as_rule() {
        Rule::number => {
            let text = inner_pair.as_str();
            let n = text.parse::<f64>().map_err(|_| {
                JErrorType::SyntaxError(format!("Invalid numeric literal '{}'", text))
            })?;
            ExpressionType::Literal(LiteralType::NumberLiteral(n))
        }
        Rule::string => {
            let content = first_child(inner_pair)?;
            ExpressionType::Literal(LiteralType::StringLiteral(unescape(content.as_str())))
        }
        Rule::template_literal => {
            let mut elements = vec![];
            for p in inner_pair.into_inner() {
                match p.as_rule() {
                    Rule::template_chars => elements.push(TemplateElement::Text(unescape(p.as_str()))),
                    Rule::template_substitution => elements.push(TemplateElement::Substitution(
                        build_ast_from_expression(first_child(p)?)?,
                    )),
                    _ => return Err(get_unexpected_error(13, &p)),
                }
            }
            ExpressionType::TemplateLiteral(elements)
        }
        Rule::boolean_literal => {
            ExpressionType::Literal(LiteralType::BooleanLiteral(inner_pair.as_str() == "true"))
        }
        Rule::undefined_literal => ExpressionType::Literal(LiteralType::UndefinedLiteral),
        Rule::array_literal => {
            let mut elements = vec![];
            for p in inner_pair.into_inner() {
                if p.as_rule() == Rule::expression {
                    elements.push(build_ast_from_expression(p)?);
                }
            }
            ExpressionType::ArrayExpression(elements)
        }
        Rule::input_expression => {
            let mut prompt = None;
            for p in inner_pair.into_inner() {
                if p.as_rule() == Rule::expression {
                    prompt = Some(Box::new(build_ast_from_expression(p)?));
                }
            }
            ExpressionType::InputExpression { prompt }
        }
        Rule::function_call => {
            let mut inner = inner_pair.into_inner();
            let callee = next_child(&mut inner, Rule::function_call)?
                .as_str()
                .to_string();
            let mut arguments = vec![];
            for p in inner {
                if p.as_rule() == Rule::argument_list {
                    arguments = build_ast_from_argument_list(p)?;
                }
            }
            ExpressionType::CallExpression { callee, arguments }
        }
        Rule::identifier => ExpressionType::Identifier(inner_pair.as_str().to_string()),
        Rule::expression => build_ast_from_expression(inner_pair)?,
        _ => return Err(get_unexpected_error(14, &inner_pair)),
    })
}

fn unescape(raw: &str) -> String {
    let mut s = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            s.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => s.push('\n'),
            Some('t') => s.push('\t'),
            Some('r') => s.push('\r'),
            Some('0') => s.push('\0'),
            Some(other) => s.push(other),
            None => s.push('\\'),
        }
    }
    s
}
