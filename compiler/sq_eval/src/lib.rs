//! Reducer for lowered Squiggle expressions.
//!
//! The [`Reducer`] walks an [`Expression`](sq_ir::Expression) tree against
//! persistent [`Bindings`](sq_value::Bindings). Lambda calls push a frame
//! onto an immutable frame stack, so an error raised anywhere carries the
//! chain of calls that led to it. Builtins re-enter the reducer through
//! [`CallContext`](sq_value::CallContext) to call user lambdas.

mod config;
mod counters;
mod reducer;

pub use config::EvalConfig;
pub use counters::EvalCounters;
pub use reducer::Reducer;
