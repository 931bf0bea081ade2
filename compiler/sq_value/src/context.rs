use crate::{Environment, IError, Lambda, Value};

/// What a builtin may ask of the evaluator that invoked it.
///
/// Implemented by the reducer. Builtins such as `List.map` use [`call`] to
/// invoke user lambdas; the resulting frames name the builtin as caller.
///
/// [`call`]: CallContext::call
pub trait CallContext {
    fn environment(&self) -> &Environment;

    fn call(&mut self, lambda: &Lambda, args: Vec<Value>) -> Result<Value, IError>;
}
