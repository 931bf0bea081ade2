//! Callable values.
//!
//! Both kinds share one call protocol, implemented by the reducer: user
//! lambdas evaluate their body under the captured scope, builtins run
//! native code. This module only describes them.

use std::fmt;
use std::sync::Arc;

use sq_ir::{Expression, LocationRange};

use crate::{Bindings, CallContext, IError, Value};

/// Native body of a builtin.
pub type BuiltinFn = dyn Fn(&[Value], &mut dyn CallContext) -> Result<Value, IError> + Send + Sync;

/// A closure written in Squiggle.
pub struct UserLambda {
    pub name: Option<Arc<str>>,
    pub parameters: Vec<Arc<str>>,
    pub body: Arc<Expression>,
    /// Scope at the point of creation, shared with the creator.
    pub captured: Bindings,
    pub location: LocationRange,
}

/// A function implemented natively, usually backed by registry dispatch.
pub struct BuiltinLambda {
    name: Arc<str>,
    body: Arc<BuiltinFn>,
}

impl BuiltinLambda {
    pub fn new<F>(name: impl Into<Arc<str>>, body: F) -> Self
    where
        F: Fn(&[Value], &mut dyn CallContext) -> Result<Value, IError> + Send + Sync + 'static,
    {
        BuiltinLambda {
            name: name.into(),
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value], context: &mut dyn CallContext) -> Result<Value, IError> {
        (self.body)(args, context)
    }
}

#[derive(Clone)]
pub enum Lambda {
    User(Arc<UserLambda>),
    Builtin(Arc<BuiltinLambda>),
}

impl Lambda {
    pub fn user(lambda: UserLambda) -> Self {
        Lambda::User(Arc::new(lambda))
    }

    pub fn builtin(lambda: BuiltinLambda) -> Self {
        Lambda::Builtin(Arc::new(lambda))
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Lambda::User(lambda) => lambda.name.as_deref(),
            Lambda::Builtin(lambda) => Some(lambda.name()),
        }
    }

    /// Name used for frames and messages.
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or("<anonymous>")
    }

    /// Exact parameter count for user lambdas; builtins check their own.
    pub fn parameter_count(&self) -> Option<usize> {
        match self {
            Lambda::User(lambda) => Some(lambda.parameters.len()),
            Lambda::Builtin(_) => None,
        }
    }

    pub fn parameter_string(&self) -> String {
        match self {
            Lambda::User(lambda) => lambda.parameters.join(","),
            Lambda::Builtin(_) => "...".to_string(),
        }
    }

    pub fn ptr_eq(&self, other: &Lambda) -> bool {
        match (self, other) {
            (Lambda::User(a), Lambda::User(b)) => Arc::ptr_eq(a, b),
            (Lambda::Builtin(a), Lambda::Builtin(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lambda::User(_) => write!(f, "lambda({}=>internal code)", self.parameter_string()),
            Lambda::Builtin(lambda) => write!(f, "Builtin({})", lambda.name),
        }
    }
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
