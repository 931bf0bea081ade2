//! Builtin function definitions.

use std::fmt::Write as _;

use sq_value::{CallContext, ErrorMessage, IError, Value};

use crate::FrType;

/// Native implementation of a definition. Arguments have already been
/// checked against the definition's inputs.
pub type FnBody = fn(&[Value], &mut dyn CallContext) -> Result<Value, IError>;

#[derive(Clone, Debug, PartialEq)]
pub struct FrInput {
    pub ty: FrType,
    pub optional: bool,
}

#[derive(Clone, Copy)]
enum Body {
    Native(FnBody),
    /// Matches like any definition, then fails with a fixed message.
    Assert(&'static str),
}

/// One overload of a builtin.
#[derive(Clone)]
pub struct FnDefinition {
    inputs: Vec<FrInput>,
    rest: Option<FrType>,
    output: FrType,
    body: Body,
}

impl FnDefinition {
    pub fn make(inputs: Vec<FrType>, output: FrType, body: FnBody) -> Self {
        FnDefinition {
            inputs: inputs
                .into_iter()
                .map(|ty| FrInput {
                    ty,
                    optional: false,
                })
                .collect(),
            rest: None,
            output,
            body: Body::Native(body),
        }
    }

    /// Any number of trailing arguments of type `rest`.
    pub fn variadic(inputs: Vec<FrType>, rest: FrType, output: FrType, body: FnBody) -> Self {
        FnDefinition {
            rest: Some(rest),
            ..FnDefinition::make(inputs, output, body)
        }
    }

    pub fn assert(inputs: Vec<FrType>, message: &'static str) -> Self {
        FnDefinition {
            body: Body::Assert(message),
            ..FnDefinition::make(inputs, FrType::Any, |_, _| Ok(Value::void()))
        }
    }

    /// Append an optional trailing input.
    #[must_use]
    pub fn with_optional(mut self, ty: FrType) -> Self {
        self.inputs.push(FrInput { ty, optional: true });
        self
    }

    pub fn inputs(&self) -> &[FrInput] {
        &self.inputs
    }

    pub fn output(&self) -> &FrType {
        &self.output
    }

    pub fn is_assert(&self) -> bool {
        matches!(self.body, Body::Assert(_))
    }

    pub fn min_arity(&self) -> usize {
        self.inputs.iter().filter(|input| !input.optional).count()
    }

    /// `None` for variadic definitions.
    pub fn max_arity(&self) -> Option<usize> {
        match self.rest {
            Some(_) => None,
            None => Some(self.inputs.len()),
        }
    }

    pub fn matches(&self, args: &[Value]) -> bool {
        if args.len() < self.min_arity() || self.max_arity().is_some_and(|max| args.len() > max) {
            return false;
        }
        args.iter().enumerate().all(|(i, arg)| match self.inputs.get(i) {
            Some(input) => input.ty.matches(arg),
            None => self.rest.as_ref().is_some_and(|rest| rest.matches(arg)),
        })
    }

    pub fn call(&self, args: &[Value], context: &mut dyn CallContext) -> Result<Value, IError> {
        match self.body {
            Body::Native(body) => body(args, context),
            Body::Assert(message) => Err(ErrorMessage::other(message).into()),
        }
    }

    /// `name(Number, String?)`, as shown when dispatch fails.
    pub fn signature(&self, name: &str) -> String {
        let mut out = format!("{name}(");
        for (i, input) in self.inputs.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}", input.ty);
            if input.optional {
                out.push('?');
            }
        }
        if let Some(rest) = &self.rest {
            if !self.inputs.is_empty() {
                out.push_str(", ");
            }
            let _ = write!(out, "...{rest}");
        }
        out.push(')');
        out
    }
}

/// A named builtin with its overloads.
#[derive(Clone)]
pub struct FrFunction {
    pub name: &'static str,
    pub namespace: Option<&'static str>,
    /// Only reachable as `Namespace.name`.
    pub requires_namespace: bool,
    pub description: Option<&'static str>,
    pub definitions: Vec<FnDefinition>,
}

impl FrFunction {
    pub fn new(namespace: Option<&'static str>, name: &'static str) -> Self {
        FrFunction {
            name,
            namespace,
            requires_namespace: false,
            description: None,
            definitions: Vec::new(),
        }
    }

    #[must_use]
    pub fn requires_namespace(mut self) -> Self {
        self.requires_namespace = true;
        self
    }

    #[must_use]
    pub fn description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    #[must_use]
    pub fn definition(mut self, definition: FnDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Every name this function is reachable under.
    ///
    /// A function called `make` is also reachable under its bare namespace,
    /// so `Calculator.make(...)` and `Calculator(...)` are the same call.
    pub fn names(&self) -> Vec<String> {
        let Some(namespace) = self.namespace else {
            return vec![self.name.to_string()];
        };
        let mut names = vec![format!("{namespace}.{}", self.name)];
        if self.name == "make" {
            names.push(namespace.to_string());
        }
        if !self.requires_namespace {
            names.push(self.name.to_string());
        }
        names
    }
}
