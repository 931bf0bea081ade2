//! `Dist.*` delegates over the host distribution capability.

use sq_value::{CallContext, CombineMode, DistOperation, ErrorMessage, IError, Value};

use super::builtin::combine;
use crate::args;
use crate::{FnBody, FnDefinition, FrFunction, FrType as T};

const NAMESPACE: Option<&str> = Some("Dist");

fn at_point(name: &'static str, body: FnBody) -> FrFunction {
    FrFunction::new(NAMESPACE, name)
        .definition(FnDefinition::make(vec![T::Dist, T::Number], T::Number, body))
}

fn pointwise(name: &'static str, body: FnBody) -> FrFunction {
    FrFunction::new(NAMESPACE, name).definition(FnDefinition::make(
        vec![T::Dist, T::DistOrNumber],
        T::Dist,
        body,
    ))
}

fn sample_n(args: &[Value], context: &mut dyn CallContext) -> Result<Value, IError> {
    let dist = args::dist(args, 0)?;
    let n = args::number(args, 1)?;
    if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
        return Err(ErrorMessage::other(format!("Expected a non-negative integer, got: {n}")).into());
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = n as usize;
    let samples = dist.sample_n(n, context.environment())?;
    Ok(Value::array(samples.into_iter().map(Value::number).collect()))
}

pub(crate) fn functions() -> Vec<FrFunction> {
    vec![
        FrFunction::new(NAMESPACE, "mean").definition(FnDefinition::make(
            vec![T::Dist],
            T::Number,
            |args, context| {
                Ok(Value::number(
                    args::dist(args, 0)?.mean(context.environment())?,
                ))
            },
        )),
        FrFunction::new(NAMESPACE, "sample").definition(FnDefinition::make(
            vec![T::Dist],
            T::Number,
            |args, context| {
                Ok(Value::number(
                    args::dist(args, 0)?.sample(context.environment())?,
                ))
            },
        )),
        FrFunction::new(NAMESPACE, "sampleN").definition(FnDefinition::make(
            vec![T::Dist, T::Number],
            T::array(T::Number),
            sample_n,
        )),
        at_point("cdf", |args, context| {
            let x = args::number(args, 1)?;
            Ok(Value::number(args::dist(args, 0)?.cdf(x, context.environment())?))
        }),
        at_point("pdf", |args, context| {
            let x = args::number(args, 1)?;
            Ok(Value::number(args::dist(args, 0)?.pdf(x, context.environment())?))
        }),
        at_point("inv", |args, context| {
            let p = args::number(args, 1)?;
            Ok(Value::number(args::dist(args, 0)?.inv(p, context.environment())?))
        }),
        FrFunction::new(NAMESPACE, "toPointSet").definition(FnDefinition::make(
            vec![T::Dist],
            T::Dist,
            |args, context| {
                Ok(Value::dist(
                    args::dist(args, 0)?.to_point_set(context.environment())?,
                ))
            },
        )),
        pointwise("dotAdd", |args, context| {
            combine(DistOperation::Add, CombineMode::Pointwise, args, context)
        }),
        pointwise("dotSubtract", |args, context| {
            combine(DistOperation::Subtract, CombineMode::Pointwise, args, context)
        }),
        pointwise("dotMultiply", |args, context| {
            combine(DistOperation::Multiply, CombineMode::Pointwise, args, context)
        }),
        pointwise("dotDivide", |args, context| {
            combine(DistOperation::Divide, CombineMode::Pointwise, args, context)
        }),
        pointwise("dotPow", |args, context| {
            combine(DistOperation::Power, CombineMode::Pointwise, args, context)
        }),
    ]
}
