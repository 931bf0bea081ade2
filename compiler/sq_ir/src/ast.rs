//! Surface syntax tree.
//!
//! Produced by `sq_parse`, consumed only by lowering. Nodes carry byte
//! spans; line/column resolution happens during lowering.

use crate::{ImportDecl, Span};

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// `@name(args)` placed before a binding.
#[derive(Clone, Debug, PartialEq)]
pub struct Decorator {
    pub name: Identifier,
    pub args: Vec<Node>,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InfixOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Equal,
    NotEqual,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    And,
    Or,
    To,
}

impl InfixOp {
    /// Registry function the operator lowers to.
    pub fn function_name(self) -> &'static str {
        match self {
            InfixOp::Add => "add",
            InfixOp::Subtract => "subtract",
            InfixOp::Multiply => "multiply",
            InfixOp::Divide => "divide",
            InfixOp::Power => "pow",
            InfixOp::Equal => "equal",
            InfixOp::NotEqual => "unequal",
            InfixOp::Less => "smaller",
            InfixOp::LessEq => "smallerEq",
            InfixOp::Greater => "larger",
            InfixOp::GreaterEq => "largerEq",
            InfixOp::And => "and",
            InfixOp::Or => "or",
            InfixOp::To => "to",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

impl UnaryOp {
    pub fn function_name(self) -> &'static str {
        match self {
            UnaryOp::Negate => "unaryMinus",
            UnaryOp::Not => "not",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Whole module: import header plus statements.
    Program {
        imports: Vec<ImportDecl>,
        statements: Vec<Node>,
    },
    /// `{ stmt; stmt; result }`
    Block(Vec<Node>),
    /// `name = value`
    Let { name: Identifier, value: Box<Node> },
    /// `name(a, b) = body`
    Defun {
        name: Identifier,
        parameters: Vec<Identifier>,
        body: Box<Node>,
    },
    /// Decorator applied to the following statement.
    Decorated {
        decorator: Decorator,
        statement: Box<Node>,
    },
    /// `{|a, b| body}`
    Lambda {
        parameters: Vec<Identifier>,
        body: Box<Node>,
    },
    Call { callee: Box<Node>, args: Vec<Node> },
    Infix {
        op: InfixOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Unary { op: UnaryOp, operand: Box<Node> },
    /// `value -> callee(args)`
    Pipe {
        value: Box<Node>,
        callee: Box<Node>,
        args: Vec<Node>,
    },
    /// `target.key`
    DotLookup { target: Box<Node>, key: String },
    /// `target[index]`
    BracketLookup { target: Box<Node>, index: Box<Node> },
    Ternary {
        condition: Box<Node>,
        if_true: Box<Node>,
        if_false: Box<Node>,
    },
    Array(Vec<Node>),
    Dict(Vec<(Node, Node)>),
    Identifier(String),
    Number(f64),
    String(String),
    Boolean(bool),
}

impl NodeKind {
    /// True for statements that introduce a binding.
    pub fn is_binding(&self) -> bool {
        match self {
            NodeKind::Let { .. } | NodeKind::Defun { .. } => true,
            NodeKind::Decorated { statement, .. } => statement.kind.is_binding(),
            _ => false,
        }
    }
}
