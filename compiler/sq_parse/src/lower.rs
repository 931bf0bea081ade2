//! AST to [`Expression`] lowering.
//!
//! Operators become calls to registry functions, field and index lookups
//! become `$_atIndex_$` calls, decorators become `Tag.*` calls wrapped around
//! the bound value, and `f(x) = ...` becomes a `let` of a named lambda.

use std::collections::HashSet;
use std::sync::Arc;

use sq_ir::ast::{Decorator, Identifier, Node, NodeKind};
use sq_ir::{Expression, ExpressionKind, LineIndex, Literal, LocationRange, Span};
use sq_stack::ensure_sufficient_stack;

use crate::{Ast, CompileError};

/// Registry function behind `a.b` and `a[b]`.
pub const INDEX_FUNCTION: &str = "$_atIndex_$";

pub fn lower(ast: &Ast) -> Result<Expression, CompileError> {
    Lowerer {
        index: &ast.line_index,
    }
    .node(&ast.root)
}

fn decorator_function(name: &str) -> Option<&'static str> {
    match name {
        "name" => Some("Tag.name"),
        "doc" => Some("Tag.doc"),
        "showAs" => Some("Tag.showAs"),
        "format" => Some("Tag.format"),
        "hide" => Some("Tag.hide"),
        _ => None,
    }
}

struct Lowerer<'a> {
    index: &'a LineIndex,
}

impl Lowerer<'_> {
    fn loc(&self, span: Span) -> LocationRange {
        self.index.location(span)
    }

    fn node(&self, node: &Node) -> Result<Expression, CompileError> {
        ensure_sufficient_stack(|| self.node_inner(node))
    }

    fn nodes(&self, nodes: &[Node]) -> Result<Vec<Expression>, CompileError> {
        nodes.iter().map(|node| self.node(node)).collect()
    }

    fn node_inner(&self, node: &Node) -> Result<Expression, CompileError> {
        let location = self.loc(node.span);
        let kind = match &node.kind {
            NodeKind::Program { statements, .. } => {
                let mut lowered = self.nodes(statements)?;
                let result = match statements.last() {
                    Some(last) if !last.kind.is_binding() => lowered.pop().map(Box::new),
                    _ => None,
                };
                ExpressionKind::Program {
                    statements: lowered,
                    result,
                }
            }
            NodeKind::Block(statements) => {
                let mut lowered = self.nodes(statements)?;
                let Some(result) = lowered.pop() else {
                    return Err(CompileError::new("Empty block", Some(location)));
                };
                ExpressionKind::Block {
                    statements: lowered,
                    result: Box::new(result),
                }
            }
            NodeKind::Let { name, value } => return self.binding(name, value, location),
            NodeKind::Defun {
                name,
                parameters,
                body,
            } => {
                let lambda = self.lambda(Some(&name.name), parameters, body, location.clone())?;
                ExpressionKind::Let {
                    name: Arc::from(name.name.as_str()),
                    value: Box::new(lambda),
                }
            }
            NodeKind::Decorated {
                decorator,
                statement,
            } => return self.decorated(decorator, statement),
            NodeKind::Lambda { parameters, body } => {
                return self.lambda(None, parameters, body, location)
            }
            NodeKind::Call { callee, args } => ExpressionKind::Call {
                callee: Box::new(self.node(callee)?),
                args: self.nodes(args)?,
            },
            NodeKind::Infix { op, left, right } => {
                let args = vec![self.node(left)?, self.node(right)?];
                return Ok(builtin_call(op.function_name(), args, location));
            }
            NodeKind::Unary { op, operand } => {
                let args = vec![self.node(operand)?];
                return Ok(builtin_call(op.function_name(), args, location));
            }
            NodeKind::Pipe {
                value,
                callee,
                args,
            } => {
                let mut lowered = Vec::with_capacity(args.len() + 1);
                lowered.push(self.node(value)?);
                lowered.extend(self.nodes(args)?);
                ExpressionKind::Call {
                    callee: Box::new(self.node(callee)?),
                    args: lowered,
                }
            }
            NodeKind::DotLookup { target, key } => {
                let key = Expression::new(
                    ExpressionKind::Literal(Literal::String(Arc::from(key.as_str()))),
                    location.clone(),
                );
                let args = vec![self.node(target)?, key];
                return Ok(builtin_call(INDEX_FUNCTION, args, location));
            }
            NodeKind::BracketLookup { target, index } => {
                let args = vec![self.node(target)?, self.node(index)?];
                return Ok(builtin_call(INDEX_FUNCTION, args, location));
            }
            NodeKind::Ternary {
                condition,
                if_true,
                if_false,
            } => ExpressionKind::Ternary {
                condition: Box::new(self.node(condition)?),
                if_true: Box::new(self.node(if_true)?),
                if_false: Box::new(self.node(if_false)?),
            },
            NodeKind::Array(items) => ExpressionKind::Array(self.nodes(items)?),
            NodeKind::Dict(entries) => ExpressionKind::Record(
                entries
                    .iter()
                    .map(|(key, value)| Ok((self.node(key)?, self.node(value)?)))
                    .collect::<Result<_, CompileError>>()?,
            ),
            NodeKind::Identifier(name) => ExpressionKind::Symbol(Arc::from(name.as_str())),
            NodeKind::Number(n) => ExpressionKind::Literal(Literal::Number(*n)),
            NodeKind::String(s) => ExpressionKind::Literal(Literal::String(Arc::from(s.as_str()))),
            NodeKind::Boolean(b) => ExpressionKind::Literal(Literal::Bool(*b)),
        };
        Ok(Expression::new(kind, location))
    }

    fn binding(
        &self,
        name: &Identifier,
        value: &Node,
        location: LocationRange,
    ) -> Result<Expression, CompileError> {
        let mut value = self.node(value)?;
        // anonymous lambdas take the name they are bound to
        if let ExpressionKind::Lambda {
            name: lambda_name, ..
        } = &mut value.kind
        {
            if lambda_name.is_none() {
                *lambda_name = Some(Arc::from(name.name.as_str()));
            }
        }
        Ok(Expression::new(
            ExpressionKind::Let {
                name: Arc::from(name.name.as_str()),
                value: Box::new(value),
            },
            location,
        ))
    }

    fn lambda(
        &self,
        name: Option<&str>,
        parameters: &[Identifier],
        body: &Node,
        location: LocationRange,
    ) -> Result<Expression, CompileError> {
        let mut seen = HashSet::new();
        for parameter in parameters {
            if !seen.insert(parameter.name.as_str()) {
                return Err(CompileError::new(
                    format!("Duplicate parameter name: {}", parameter.name),
                    Some(self.loc(parameter.span)),
                ));
            }
        }
        Ok(Expression::new(
            ExpressionKind::Lambda {
                name: name.map(Arc::from),
                parameters: parameters
                    .iter()
                    .map(|p| Arc::from(p.name.as_str()))
                    .collect(),
                body: Arc::new(self.node(body)?),
            },
            location,
        ))
    }

    fn decorated(&self, decorator: &Decorator, statement: &Node) -> Result<Expression, CompileError> {
        let decorator_location = self.loc(decorator.span);
        let Some(function) = decorator_function(&decorator.name.name) else {
            return Err(CompileError::new(
                format!("Unknown decorator: @{}", decorator.name.name),
                Some(decorator_location),
            ));
        };
        let inner = self.node(statement)?;
        let ExpressionKind::Let { name, value } = inner.kind else {
            return Err(CompileError::new(
                "Decorators can only be applied to bindings",
                Some(decorator_location),
            ));
        };
        let mut args = Vec::with_capacity(decorator.args.len() + 1);
        args.push(*value);
        args.extend(self.nodes(&decorator.args)?);
        Ok(Expression::new(
            ExpressionKind::Let {
                name,
                value: Box::new(builtin_call(function, args, decorator_location)),
            },
            inner.location,
        ))
    }
}

fn builtin_call(name: &str, args: Vec<Expression>, location: LocationRange) -> Expression {
    let callee = Expression::new(ExpressionKind::Symbol(Arc::from(name)), location.clone());
    Expression::new(
        ExpressionKind::Call {
            callee: Box::new(callee),
            args,
        },
        location,
    )
}

#[cfg(test)]
mod tests;
