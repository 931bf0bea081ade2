//! Builtin functions for the Squiggle reducer.
//!
//! Functions are described by [`FrFunction`]s holding one or more
//! [`FnDefinition`] overloads. The [`Registry`] indexes them by every name
//! they are reachable under and dispatches calls to the first overload
//! whose input types match. [`std_lib`] exposes the registry as a
//! [`Namespace`](sq_value::Namespace) of lambdas for the evaluator.

mod args;
mod definition;
mod fr_type;
mod modules;
mod registry;

pub use definition::{FnBody, FnDefinition, FrFunction, FrInput};
pub use fr_type::{FrType, RecordField};
pub use registry::{dispatch, global_registry, std_lib, Registry};

#[cfg(test)]
mod test_support;
