//! Builtin registry and multi-dispatch.
//!
//! The registry is built once per process and shared read-only. Each name
//! maps to the definitions of every function registered under it, in
//! declaration order; dispatch runs the first definition whose inputs
//! match.

use std::fmt::Write as _;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use sq_value::{
    BuiltinLambda, CallContext, ErrorMessage, IError, Lambda, Namespace, Value,
};

use crate::{modules, FnDefinition, FrFunction};

static GLOBAL_REGISTRY: OnceLock<Registry> = OnceLock::new();
static STD_LIB: OnceLock<Namespace> = OnceLock::new();

pub struct Registry {
    functions: Vec<FrFunction>,
    by_name: FxHashMap<String, Vec<FnDefinition>>,
}

impl Registry {
    pub fn new(functions: Vec<FrFunction>) -> Self {
        let mut by_name: FxHashMap<String, Vec<FnDefinition>> = FxHashMap::default();
        for function in &functions {
            for name in function.names() {
                by_name
                    .entry(name)
                    .or_default()
                    .extend(function.definitions.iter().cloned());
            }
        }
        Registry { functions, by_name }
    }

    pub fn functions(&self) -> &[FrFunction] {
        &self.functions
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn definitions(&self, name: &str) -> Option<&[FnDefinition]> {
        self.by_name.get(name).map(Vec::as_slice)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn call(
        &self,
        name: &str,
        args: &[Value],
        context: &mut dyn CallContext,
    ) -> Result<Value, IError> {
        let definitions = self
            .definitions(name)
            .ok_or_else(|| ErrorMessage::SymbolNotFound(name.to_string()))?;
        dispatch(name, definitions, args, context)
    }

    /// A lambda value that dispatches over `name`'s definitions.
    pub fn make_lambda(&'static self, name: &str) -> Option<Lambda> {
        let definitions = self.definitions(name)?;
        let owned = name.to_string();
        Some(Lambda::builtin(BuiltinLambda::new(name, move |args, context| {
            dispatch(&owned, definitions, args, context)
        })))
    }
}

/// Run the first definition that matches `args`.
pub fn dispatch(
    name: &str,
    definitions: &[FnDefinition],
    args: &[Value],
    context: &mut dyn CallContext,
) -> Result<Value, IError> {
    match definitions.iter().position(|definition| definition.matches(args)) {
        Some(index) => {
            tracing::trace!(name, index, "dispatch matched");
            definitions[index].call(args, context)
        }
        None => {
            tracing::trace!(name, args = args.len(), "no definition matched");
            Err(no_match_error(name, definitions, args).into())
        }
    }
}

fn no_match_error(name: &str, definitions: &[FnDefinition], args: &[Value]) -> ErrorMessage {
    let mut message =
        format!("There are function matches for {name}(), but with different arguments:\n");
    for definition in definitions {
        let _ = writeln!(message, "  {}", definition.signature(name));
    }
    let given: Vec<String> = args.iter().map(ToString::to_string).collect();
    let _ = write!(message, "Was given arguments: ({})", given.join(","));
    ErrorMessage::NoMatchingDefinition(message)
}

/// The process-wide registry holding every standard library function.
pub fn global_registry() -> &'static Registry {
    GLOBAL_REGISTRY.get_or_init(|| Registry::new(modules::all()))
}

/// Standard library namespace: one lambda per registered name plus the
/// math constants.
pub fn std_lib() -> Namespace {
    STD_LIB
        .get_or_init(|| {
            let registry = global_registry();
            let mut namespace = modules::constants();
            for name in registry.names() {
                if let Some(lambda) = registry.make_lambda(name) {
                    namespace = namespace.set(name, Value::lambda(lambda));
                }
            }
            tracing::debug!(entries = namespace.len(), "standard library built");
            namespace
        })
        .clone()
}

#[cfg(test)]
mod tests;
