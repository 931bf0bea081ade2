//! Expression reducer and the lambda call protocol.

use std::sync::Arc;

use sq_ir::{Expression, ExpressionKind, Literal, LocationRange};
use sq_stack::{ensure_sufficient_stack, DepthLimit};
use sq_value::{
    Bindings, CallContext, Environment, ErrorMessage, FrameStack, IError, Lambda, UserLambda,
    Value, ValueMap, TOP_FRAME_NAME,
};

use crate::{EvalConfig, EvalCounters};

/// Scope state threaded through one function body or program.
struct Context {
    bindings: Bindings,
    frame_stack: FrameStack,
    /// Lambda whose body is being evaluated; `None` at top level.
    in_function: Option<Lambda>,
}

impl Context {
    fn function_name(&self) -> Arc<str> {
        match &self.in_function {
            Some(lambda) => Arc::from(lambda.display_name()),
            None => Arc::from(TOP_FRAME_NAME),
        }
    }

    fn child(&self) -> Context {
        Context {
            bindings: self.bindings.extend(),
            frame_stack: self.frame_stack.clone(),
            in_function: self.in_function.clone(),
        }
    }

    /// Attach the current position to an error raised by the reducer itself.
    fn fail(&self, message: ErrorMessage, location: &LocationRange) -> IError {
        let stack = self
            .frame_stack
            .extend(self.function_name(), Some(location.clone()));
        IError::with_frame_stack(message, stack)
    }
}

pub struct Reducer {
    environment: Environment,
    depth: DepthLimit,
    counters: EvalCounters,
}

impl Reducer {
    pub fn new(environment: Environment) -> Self {
        Reducer::with_config(environment, &EvalConfig::default())
    }

    pub fn with_config(environment: Environment, config: &EvalConfig) -> Self {
        Reducer {
            environment,
            depth: DepthLimit::new(config.max_call_depth),
            counters: EvalCounters::default(),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn counters(&self) -> &EvalCounters {
        &self.counters
    }

    /// Evaluate a program whose top-level bindings land in `bindings`.
    ///
    /// Returns the program's result (void when it ends with a binding) and
    /// the bindings after every statement ran. Callers that want only the
    /// program's own names pass a fresh child scope and read its locals.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn evaluate_program(
        &mut self,
        expression: &Expression,
        bindings: Bindings,
    ) -> Result<(Value, Bindings), IError> {
        let mut context = Context {
            bindings,
            frame_stack: FrameStack::new(),
            in_function: None,
        };
        let value = self.evaluate(expression, &mut context)?;
        tracing::debug!(
            expressions = self.counters.expressions_evaluated,
            calls = self.counters.function_calls,
            "program evaluated"
        );
        Ok((value, context.bindings))
    }

    /// Call a lambda from outside any program, e.g. from a host.
    pub fn call(&mut self, lambda: &Lambda, args: Vec<Value>) -> Result<Value, IError> {
        self.call_lambda(lambda, args, &FrameStack::new(), TOP_FRAME_NAME, None)
    }

    fn evaluate(&mut self, expression: &Expression, context: &mut Context) -> Result<Value, IError> {
        self.counters.count_expression();
        ensure_sufficient_stack(|| self.evaluate_inner(expression, context))
    }

    fn evaluate_inner(
        &mut self,
        expression: &Expression,
        context: &mut Context,
    ) -> Result<Value, IError> {
        let location = &expression.location;
        match &expression.kind {
            ExpressionKind::Program { statements, result } => {
                for statement in statements {
                    self.evaluate(statement, context)?;
                }
                match result {
                    Some(result) => self.evaluate(result, context),
                    None => Ok(Value::void()),
                }
            }
            ExpressionKind::Block { statements, result } => {
                let mut inner = context.child();
                for statement in statements {
                    self.evaluate(statement, &mut inner)?;
                }
                self.evaluate(result, &mut inner)
            }
            ExpressionKind::Array(items) => {
                let values = items
                    .iter()
                    .map(|item| self.evaluate(item, context))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::array(values))
            }
            ExpressionKind::Record(entries) => {
                let mut map = ValueMap::new();
                for (key, value) in entries {
                    let key_value = self.evaluate(key, context)?;
                    let Some(name) = key_value.as_str() else {
                        return Err(context.fail(
                            ErrorMessage::expected_type("String", &key_value),
                            &key.location,
                        ));
                    };
                    let name: Arc<str> = Arc::from(name);
                    let value = self.evaluate(value, context)?;
                    map.insert(name, value);
                }
                Ok(Value::dict(map))
            }
            ExpressionKind::Symbol(name) => match context.bindings.get(name) {
                Some(value) => Ok(value.clone()),
                None => Err(context.fail(ErrorMessage::SymbolNotFound(name.to_string()), location)),
            },
            ExpressionKind::Let { name, value } => {
                let value = self.evaluate(value, context)?;
                context.bindings = context.bindings.set(Arc::clone(name), value);
                Ok(Value::void())
            }
            ExpressionKind::Call { callee, args } => {
                let callee_value = self.evaluate(callee, context)?;
                let args = args
                    .iter()
                    .map(|arg| self.evaluate(arg, context))
                    .collect::<Result<Vec<_>, _>>()?;
                let Some(lambda) = callee_value.as_lambda() else {
                    return Err(context.fail(
                        ErrorMessage::NotAFunction(callee_value.to_string()),
                        location,
                    ));
                };
                let caller = context.function_name();
                self.call_lambda(
                    lambda,
                    args,
                    &context.frame_stack,
                    &caller,
                    Some(location.clone()),
                )
            }
            ExpressionKind::Lambda {
                name,
                parameters,
                body,
            } => Ok(Value::lambda(Lambda::user(UserLambda {
                name: name.clone(),
                parameters: parameters.clone(),
                body: Arc::clone(body),
                captured: context.bindings.clone(),
                location: location.clone(),
            }))),
            ExpressionKind::Ternary {
                condition,
                if_true,
                if_false,
            } => {
                let test = self.evaluate(condition, context)?;
                match test.as_bool() {
                    Some(true) => self.evaluate(if_true, context),
                    Some(false) => self.evaluate(if_false, context),
                    None => Err(context.fail(
                        ErrorMessage::expected_type("Bool", &test),
                        &condition.location,
                    )),
                }
            }
            ExpressionKind::Literal(literal) => Ok(match literal {
                Literal::Number(n) => Value::number(*n),
                Literal::String(s) => Value::string(Arc::clone(s)),
                Literal::Bool(b) => Value::bool(*b),
            }),
        }
    }

    /// Call `lambda` from a caller named `caller` whose frames are `stack`.
    ///
    /// The call pushes one frame naming the caller at the call site. Any
    /// error leaving the call without a frame stack gets this one.
    #[tracing::instrument(level = "debug", skip_all, fields(lambda = lambda.display_name()))]
    fn call_lambda(
        &mut self,
        lambda: &Lambda,
        args: Vec<Value>,
        stack: &FrameStack,
        caller: &str,
        location: Option<LocationRange>,
    ) -> Result<Value, IError> {
        self.counters.count_function_call();
        let frame_stack = stack.extend(caller, location);
        if let Err(exceeded) = self.depth.enter() {
            return Err(IError::with_frame_stack(
                ErrorMessage::RecursionLimit {
                    limit: exceeded.limit,
                },
                frame_stack,
            ));
        }
        let result = ensure_sufficient_stack(|| self.call_in_frame(lambda, args, &frame_stack));
        self.depth.exit();
        result.map_err(|error| error.attach_frame_stack(&frame_stack))
    }

    fn call_in_frame(
        &mut self,
        lambda: &Lambda,
        args: Vec<Value>,
        frame_stack: &FrameStack,
    ) -> Result<Value, IError> {
        match lambda {
            Lambda::User(user) => {
                if args.len() != user.parameters.len() {
                    return Err(ErrorMessage::Arity {
                        expected: user.parameters.len(),
                        got: args.len(),
                    }
                    .into());
                }
                let mut bindings = user.captured.extend();
                // Bound first so a parameter of the same name shadows it.
                if let Some(name) = &user.name {
                    bindings = bindings.set(Arc::clone(name), Value::lambda(lambda.clone()));
                }
                for (parameter, arg) in user.parameters.iter().zip(args) {
                    bindings = bindings.set(Arc::clone(parameter), arg);
                }
                let mut context = Context {
                    bindings,
                    frame_stack: frame_stack.clone(),
                    in_function: Some(lambda.clone()),
                };
                self.evaluate(&user.body, &mut context)
            }
            Lambda::Builtin(builtin) => {
                let mut context = ReducerCallContext {
                    reducer: self,
                    frame_stack,
                    name: builtin.name(),
                };
                builtin.call(&args, &mut context)
            }
        }
    }
}

/// What a builtin sees of the reducer while it runs.
struct ReducerCallContext<'a> {
    reducer: &'a mut Reducer,
    frame_stack: &'a FrameStack,
    name: &'a str,
}

impl CallContext for ReducerCallContext<'_> {
    fn environment(&self) -> &Environment {
        &self.reducer.environment
    }

    fn call(&mut self, lambda: &Lambda, args: Vec<Value>) -> Result<Value, IError> {
        self.reducer
            .call_lambda(lambda, args, self.frame_stack, self.name, None)
    }
}
