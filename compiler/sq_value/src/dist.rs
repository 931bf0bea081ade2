//! The distribution capability.
//!
//! The core never implements distribution math. A host supplies values that
//! implement [`Distribution`]; builtins only delegate to them and convert
//! [`DistError`] into the ordinary runtime error shape.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::Environment;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DistError {
    #[error("Not yet implemented: {0}")]
    NotYetImplemented(String),
    #[error("Distribution operation error: {0}")]
    Operation(String),
    #[error("Too few samples when constructing sample set: {0}")]
    TooFewSamples(usize),
    #[error("Distribution error: {0}")]
    Other(String),
}

/// Binary operation on distributions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DistOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Logarithm,
}

impl DistOperation {
    pub fn name(self) -> &'static str {
        match self {
            DistOperation::Add => "add",
            DistOperation::Subtract => "subtract",
            DistOperation::Multiply => "multiply",
            DistOperation::Divide => "divide",
            DistOperation::Power => "pow",
            DistOperation::Logarithm => "log",
        }
    }
}

/// Algebraic combination convolves random variables; pointwise combination
/// applies the operation to the density functions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CombineMode {
    Algebraic,
    Pointwise,
}

/// Right-hand side of [`Distribution::combine`].
#[derive(Clone, Debug)]
pub enum Operand {
    Dist(DistHandle),
    Scalar(f64),
}

pub trait Distribution: fmt::Debug + fmt::Display + Send + Sync {
    fn mean(&self, env: &Environment) -> Result<f64, DistError>;

    fn sample(&self, env: &Environment) -> Result<f64, DistError>;

    fn sample_n(&self, n: usize, env: &Environment) -> Result<Vec<f64>, DistError> {
        (0..n).map(|_| self.sample(env)).collect()
    }

    fn cdf(&self, _x: f64, _env: &Environment) -> Result<f64, DistError> {
        Err(DistError::NotYetImplemented("cdf".into()))
    }

    fn pdf(&self, _x: f64, _env: &Environment) -> Result<f64, DistError> {
        Err(DistError::NotYetImplemented("pdf".into()))
    }

    fn inv(&self, _p: f64, _env: &Environment) -> Result<f64, DistError> {
        Err(DistError::NotYetImplemented("inv".into()))
    }

    fn to_point_set(&self, _env: &Environment) -> Result<DistHandle, DistError> {
        Err(DistError::NotYetImplemented("toPointSet".into()))
    }

    fn combine(
        &self,
        op: DistOperation,
        _mode: CombineMode,
        _other: &Operand,
        _env: &Environment,
    ) -> Result<DistHandle, DistError> {
        Err(DistError::NotYetImplemented(op.name().into()))
    }
}

/// Shared handle to a host distribution.
#[derive(Clone)]
pub struct DistHandle(Arc<dyn Distribution>);

impl DistHandle {
    pub fn new(dist: impl Distribution + 'static) -> Self {
        DistHandle(Arc::new(dist))
    }

    pub fn ptr_eq(&self, other: &DistHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for DistHandle {
    type Target = dyn Distribution;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl fmt::Debug for DistHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for DistHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}
