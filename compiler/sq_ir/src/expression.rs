//! Lowered expression tree.
//!
//! This is the only shape the reducer evaluates. Operators, lookups and
//! decorators are already desugared to plain calls, so the reducer has a
//! small closed set of node kinds.

use std::fmt;
use std::sync::Arc;

use crate::LocationRange;

#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub location: LocationRange,
}

impl Expression {
    pub fn new(kind: ExpressionKind, location: LocationRange) -> Self {
        Expression { kind, location }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Number(f64),
    String(Arc<str>),
    Bool(bool),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExpressionKind {
    /// Top-level statements evaluated in the current scope.
    Program {
        statements: Vec<Expression>,
        result: Option<Box<Expression>>,
    },
    /// Statements evaluated in a fresh child scope.
    Block {
        statements: Vec<Expression>,
        result: Box<Expression>,
    },
    Array(Vec<Expression>),
    Record(Vec<(Expression, Expression)>),
    Symbol(Arc<str>),
    Let {
        name: Arc<str>,
        value: Box<Expression>,
    },
    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
    },
    Lambda {
        name: Option<Arc<str>>,
        parameters: Vec<Arc<str>>,
        body: Arc<Expression>,
    },
    Ternary {
        condition: Box<Expression>,
        if_true: Box<Expression>,
        if_false: Box<Expression>,
    },
    Literal(Literal),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{n}"),
            Literal::String(s) => write!(f, "'{s}'"),
            Literal::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// S-expression rendering, used by tests and `sq parse`.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, items: &[Expression]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match &self.kind {
            ExpressionKind::Program { statements, result } => {
                write!(f, "(program")?;
                for statement in statements {
                    write!(f, " {statement}")?;
                }
                if let Some(result) = result {
                    write!(f, " {result}")?;
                }
                write!(f, ")")
            }
            ExpressionKind::Block { statements, result } => {
                write!(f, "(block")?;
                for statement in statements {
                    write!(f, " {statement}")?;
                }
                write!(f, " {result})")
            }
            ExpressionKind::Array(items) => {
                write!(f, "[")?;
                list(f, items)?;
                write!(f, "]")
            }
            ExpressionKind::Record(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            ExpressionKind::Symbol(name) => write!(f, ":{name}"),
            ExpressionKind::Let { name, value } => write!(f, ":{name} = {value}"),
            ExpressionKind::Call { callee, args } => {
                write!(f, "({callee}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                write!(f, ")")
            }
            ExpressionKind::Lambda {
                parameters, body, ..
            } => write!(f, "{{|{}| {body}}}", parameters.join(",")),
            ExpressionKind::Ternary {
                condition,
                if_true,
                if_false,
            } => write!(f, "({condition} ? {if_true} : {if_false})"),
            ExpressionKind::Literal(literal) => write!(f, "{literal}"),
        }
    }
}
