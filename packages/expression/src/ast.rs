use serde::{Deserialize, Serialize};

/// Byte range of a node in the expression source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Expression AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// String literal
    Literal { value: String, span: Span },

    /// Number literal
    Number { value: f64, span: Span },

    /// Boolean literal
    Boolean { value: bool, span: Span },

    Null { span: Span },

    Undefined { span: Span },

    /// Variable reference
    Variable { name: String, span: Span },

    /// Member access (obj.prop)
    Member {
        object: Box<Expression>,
        property: String,
        span: Span,
    },

    /// Computed member access (obj[expr])
    Index {
        object: Box<Expression>,
        index: Box<Expression>,
        span: Span,
    },

    /// Unary operation (!a, -a)
    Unary {
        operator: UnaryOp,
        operand: Box<Expression>,
        span: Span,
    },

    /// Binary operation (a + b)
    Binary {
        left: Box<Expression>,
        operator: BinaryOp,
        right: Box<Expression>,
        span: Span,
    },

    /// Short-circuiting operation (a && b, a || b, a ?? b)
    Logical {
        left: Box<Expression>,
        operator: LogicalOp,
        right: Box<Expression>,
        span: Span,
    },

    /// Conditional (test ? consequent : alternate)
    Conditional {
        test: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
        span: Span,
    },

    /// Call of a builtin function (Math.ceil(x)) or a method (s.trim())
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
        span: Span,
    },

    /// Constructor call (new Date(x))
    New {
        constructor: String,
        arguments: Vec<Expression>,
        span: Span,
    },
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Literal { span, .. }
            | Expression::Number { span, .. }
            | Expression::Boolean { span, .. }
            | Expression::Null { span }
            | Expression::Undefined { span }
            | Expression::Variable { span, .. }
            | Expression::Member { span, .. }
            | Expression::Index { span, .. }
            | Expression::Unary { span, .. }
            | Expression::Binary { span, .. }
            | Expression::Logical { span, .. }
            | Expression::Conditional { span, .. }
            | Expression::Call { span, .. }
            | Expression::New { span, .. } => *span,
        }
    }

    /// Dotted path for plain variable/member chains (`Math.ceil`), used to
    /// resolve builtin functions.
    pub fn path(&self) -> Option<String> {
        match self {
            Expression::Variable { name, .. } => Some(name.clone()),
            Expression::Member {
                object, property, ..
            } => object.path().map(|base| format!("{}.{}", base, property)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Negate,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Equals,
    NotEquals,
    StrictEquals,
    StrictNotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Remainder => "%",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::StrictEquals => "===",
            BinaryOp::StrictNotEquals => "!==",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
    Coalesce,
}
