//! Squiggle runtime values.
//!
//! Everything the reducer and the builtin library exchange lives here:
//!
//! - [`Value`]: the tagged runtime union, each value optionally carrying
//!   immutable [`ValueTags`]
//! - [`Namespace`] and [`Bindings`]: persistent scopes
//! - [`FrameStack`]: the call chain used for stack traces
//! - [`ErrorMessage`] and [`IError`]: runtime failures, with the frame stack
//!   attached once at the innermost lambda boundary
//! - [`Lambda`]: user closures and registry-backed builtins
//! - [`Distribution`]: the capability a host implements to provide
//!   distribution values
//!
//! All persistent structures are `Send + Sync` and share structure on
//! update, so snapshots can be read while new versions are built.

mod context;
mod dist;
mod environment;
mod error;
mod frame_stack;
mod lambda;
mod namespace;
mod value;

pub use context::CallContext;
pub use dist::{CombineMode, DistError, DistHandle, DistOperation, Distribution, Operand};
pub use environment::Environment;
pub use error::{ErrorMessage, IError};
pub use frame_stack::{Frame, FrameStack, Frames, TOP_FRAME_NAME};
pub use lambda::{BuiltinFn, BuiltinLambda, Lambda, UserLambda};
pub use namespace::{Bindings, Namespace};
pub use value::{
    Calculator, CalculatorInput, Domain, LabeledDistribution, Plot, PlotKind, SDate, SDuration,
    Scale, ScaleKind, Table, TableColumn, Value, ValueKind, ValueMap, ValueTags,
};
