use std::fmt;

use sq_value::{
    CallContext, CombineMode, DistError, DistHandle, DistOperation, Distribution, Environment,
    ErrorMessage, IError, Lambda, Operand, Value,
};

/// Runs builtin lambdas directly; user lambdas need the reducer.
#[derive(Default)]
pub(crate) struct TestContext {
    environment: Environment,
}

impl CallContext for TestContext {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    fn call(&mut self, lambda: &Lambda, args: Vec<Value>) -> Result<Value, IError> {
        match lambda {
            Lambda::Builtin(builtin) => builtin.call(&args, self),
            Lambda::User(_) => Err(ErrorMessage::other("user lambdas need the reducer").into()),
        }
    }
}

#[derive(Debug)]
pub(crate) struct PointMass(pub(crate) f64);

impl fmt::Display for PointMass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PointMass({})", self.0)
    }
}

impl Distribution for PointMass {
    fn mean(&self, _env: &Environment) -> Result<f64, DistError> {
        Ok(self.0)
    }

    fn sample(&self, _env: &Environment) -> Result<f64, DistError> {
        Ok(self.0)
    }

    fn combine(
        &self,
        op: DistOperation,
        mode: CombineMode,
        other: &Operand,
        env: &Environment,
    ) -> Result<DistHandle, DistError> {
        match (op, mode, other) {
            (DistOperation::Add, CombineMode::Algebraic, Operand::Scalar(x)) => {
                Ok(DistHandle::new(PointMass(self.0 + x)))
            }
            (DistOperation::Add, CombineMode::Algebraic, Operand::Dist(d)) => {
                Ok(DistHandle::new(PointMass(self.0 + d.mean(env)?)))
            }
            _ => Err(DistError::NotYetImplemented(op.name().into())),
        }
    }
}

pub(crate) fn point_mass(x: f64) -> Value {
    Value::dist(DistHandle::new(PointMass(x)))
}
