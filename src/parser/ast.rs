use std::rc::Rc;

/// A parsed script: the ordered list of its top-level statements.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramData {
    pub body: Vec<StatementType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementType {
    EmptyStatement,
    ExpressionStatement(ExpressionType),
    BlockStatement(BlockStatementData),
    IfStatement {
        test: ExpressionType,
        consequent: Box<StatementType>,
        alternate: Option<Box<StatementType>>,
    },
    WhileStatement {
        test: ExpressionType,
        body: Box<StatementType>,
    },
    FunctionDeclaration(Rc<FunctionData>),
    ReturnStatement {
        argument: Option<ExpressionType>,
    },
    /// `console.log(...)`
    PrintStatement {
        arguments: Vec<ExpressionType>,
    },
    VariableStatement(VariableStatementType),
    VariableAssignment(VariableAssignmentType),
}

impl StatementType {
    /// Name of the node kind, used when tracing statement dispatch.
    pub fn kind_name(&self) -> &'static str {
        match self {
            StatementType::EmptyStatement => "empty",
            StatementType::ExpressionStatement(_) => "expression",
            StatementType::BlockStatement(_) => "block",
            StatementType::IfStatement { .. } => "if",
            StatementType::WhileStatement { .. } => "while",
            StatementType::FunctionDeclaration(_) => "functionDeclaration",
            StatementType::ReturnStatement { .. } => "return",
            StatementType::PrintStatement { .. } => "print",
            StatementType::VariableStatement(_) => "variableStatement",
            StatementType::VariableAssignment(_) => "variableAssignment",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatementData {
    pub body: Vec<StatementType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionData {
    pub name: String,
    pub params: Vec<String>,
    pub body: BlockStatementData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableDeclarationKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaratorData {
    pub id: String,
    pub init: Option<ExpressionType>,
}

/// The plain forms of a variable statement: declarations (with or without an
/// initializer) and `=` assignments.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableStatementType {
    Declaration {
        kind: VariableDeclarationKind,
        declarations: Vec<VariableDeclaratorData>,
    },
    Assignment {
        target: AssignmentTarget,
        value: ExpressionType,
    },
}

/// `name` or `name[i][j]...`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentTarget {
    pub name: String,
    pub indices: Vec<ExpressionType>,
}

impl AssignmentTarget {
    pub fn is_simple(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Read-modify-write forms: `+=` and friends, `++`/`--`.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableAssignmentType {
    Compound {
        target: AssignmentTarget,
        operator: AssignmentOperator,
        value: ExpressionType,
    },
    Update {
        target: AssignmentTarget,
        operator: UpdateOperator,
        prefix: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    AddEquals,
    SubtractEquals,
    MultiplyEquals,
    DivideEquals,
    ModuloEquals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionType {
    Literal(LiteralType),
    Identifier(String),
    ArrayExpression(Vec<ExpressionType>),
    ArrayAccess {
        object: Box<ExpressionType>,
        index: Box<ExpressionType>,
    },
    ArrayLength(Box<ExpressionType>),
    TemplateLiteral(Vec<TemplateElement>),
    UnaryExpression {
        operator: UnaryOperator,
        argument: Box<ExpressionType>,
    },
    BinaryExpression {
        operator: BinaryOperator,
        left: Box<ExpressionType>,
        right: Box<ExpressionType>,
    },
    LogicalExpression {
        operator: LogicalOperator,
        left: Box<ExpressionType>,
        right: Box<ExpressionType>,
    },
    ConditionalExpression {
        test: Box<ExpressionType>,
        consequent: Box<TernaryBranch>,
        alternate: Box<TernaryBranch>,
    },
    CallExpression {
        callee: String,
        arguments: Vec<ExpressionType>,
    },
    /// `prompt(...)`
    InputExpression {
        prompt: Option<Box<ExpressionType>>,
    },
}

/// A ternary arm. Only the expression form is executable; the grammar accepts
/// a block so that the interpreter can report it.
#[derive(Debug, Clone, PartialEq)]
pub enum TernaryBranch {
    Expression(ExpressionType),
    Block(BlockStatementData),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateElement {
    Text(String),
    Substitution(ExpressionType),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralType {
    NumberLiteral(f64),
    StringLiteral(String),
    BooleanLiteral(bool),
    UndefinedLiteral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    LooselyEqual,
    LooselyUnequal,
    StrictlyEqual,
    StrictlyUnequal,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Minus,
    LogicalNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}
