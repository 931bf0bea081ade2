//! Operators and other unqualified builtins.
//!
//! The lowering pass turns every infix and prefix operator into a call to
//! one of these names, so each must exist even without a namespace.

use std::cmp::Ordering;

use sq_value::{
    CallContext, CombineMode, DistError, DistOperation, ErrorMessage, IError, Operand, Value,
    ValueKind,
};

use crate::args;
use crate::{FnDefinition, FrFunction, FrType as T};

/// Name of the lookup function `a[i]` and `a.key` lower to.
pub(crate) const INDEX_FUNCTION: &str = "$_atIndex_$";

fn op(name: &'static str) -> FrFunction {
    FrFunction::new(None, name)
}

fn numbers(body: crate::FnBody) -> FnDefinition {
    FnDefinition::make(vec![T::Number, T::Number], T::Number, body)
}

fn dist_operand(value: &Value) -> Result<Operand, ErrorMessage> {
    match value.kind() {
        ValueKind::Dist(dist) => Ok(Operand::Dist(dist.clone())),
        ValueKind::Number(n) => Ok(Operand::Scalar(*n)),
        _ => Err(ErrorMessage::expected_type("Dist|Number", value)),
    }
}

pub(crate) fn combine(
    operation: DistOperation,
    mode: CombineMode,
    args: &[Value],
    context: &mut dyn CallContext,
) -> Result<Value, IError> {
    let left = args::dist(args, 0)?;
    let right = dist_operand(args::any(args, 1)?)?;
    let combined = left.combine(operation, mode, &right, context.environment())?;
    Ok(Value::dist(combined))
}

fn dists(body: crate::FnBody) -> FnDefinition {
    FnDefinition::make(vec![T::Dist, T::DistOrNumber], T::Dist, body)
}

fn comparison(name: &'static str, compare: crate::FnBody) -> FrFunction {
    op(name)
        .definition(FnDefinition::make(vec![T::Number, T::Number], T::Bool, compare))
        .definition(FnDefinition::make(vec![T::String, T::String], T::Bool, compare))
        .definition(FnDefinition::make(vec![T::Date, T::Date], T::Bool, compare))
        .definition(FnDefinition::make(
            vec![T::Duration, T::Duration],
            T::Bool,
            compare,
        ))
}

/// Order two values of the same comparable kind.
///
/// `None` for unordered numbers (NaN): every comparison with them is false.
fn ordering(args: &[Value]) -> Result<Option<Ordering>, IError> {
    let left = args::any(args, 0)?;
    let right = args::any(args, 1)?;
    match (left.kind(), right.kind()) {
        (ValueKind::Number(a), ValueKind::Number(b)) => Ok(a.partial_cmp(b)),
        (ValueKind::String(a), ValueKind::String(b)) => Ok(Some(a.cmp(b))),
        (ValueKind::Date(a), ValueKind::Date(b)) => Ok(a.partial_cmp(b)),
        (ValueKind::Duration(a), ValueKind::Duration(b)) => Ok(a.partial_cmp(b)),
        _ => Err(ErrorMessage::other(format!("Cannot compare {left} with {right}")).into()),
    }
}

fn at_index(args: &[Value], _: &mut dyn CallContext) -> Result<Value, IError> {
    let items = args::array(args, 0)?;
    let index = args::number(args, 1)?;
    #[allow(clippy::cast_possible_truncation)]
    let whole = index as i64;
    let found = if index.fract() == 0.0 {
        usize::try_from(whole).ok().and_then(|i| items.get(i))
    } else {
        None
    };
    found
        .cloned()
        .ok_or_else(|| ErrorMessage::ArrayIndexNotFound(whole).into())
}

fn at_key(args: &[Value], _: &mut dyn CallContext) -> Result<Value, IError> {
    let map = args::dict(args, 0)?;
    let key = args::string(args, 1)?;
    map.get(key)
        .cloned()
        .ok_or_else(|| ErrorMessage::DictPropertyNotFound(key.to_string()).into())
}

pub(crate) fn functions() -> Vec<FrFunction> {
    vec![
        op("add")
            .definition(numbers(|args, _| {
                Ok(Value::number(args::number(args, 0)? + args::number(args, 1)?))
            }))
            .definition(FnDefinition::make(vec![T::String, T::String], T::String, |args, _| {
                Ok(Value::string(format!(
                    "{}{}",
                    args::string(args, 0)?,
                    args::string(args, 1)?
                )))
            }))
            .definition(FnDefinition::make(vec![T::Date, T::Duration], T::Date, |args, _| {
                Ok(Value::date(args::date(args, 0)?.add(args::duration(args, 1)?)))
            }))
            .definition(FnDefinition::make(
                vec![T::Duration, T::Duration],
                T::Duration,
                |args, _| Ok(Value::duration(args::duration(args, 0)?.add(args::duration(args, 1)?))),
            ))
            .definition(FnDefinition::assert(
                vec![T::Date, T::Date],
                "Cannot add two dates",
            ))
            .definition(dists(|args, context| {
                combine(DistOperation::Add, CombineMode::Algebraic, args, context)
            })),
        op("subtract")
            .definition(numbers(|args, _| {
                Ok(Value::number(args::number(args, 0)? - args::number(args, 1)?))
            }))
            .definition(FnDefinition::make(vec![T::Date, T::Date], T::Duration, |args, _| {
                Ok(Value::duration(args::date(args, 0)?.since(args::date(args, 1)?)))
            }))
            .definition(FnDefinition::make(vec![T::Date, T::Duration], T::Date, |args, _| {
                Ok(Value::date(args::date(args, 0)?.subtract(args::duration(args, 1)?)))
            }))
            .definition(FnDefinition::make(
                vec![T::Duration, T::Duration],
                T::Duration,
                |args, _| {
                    Ok(Value::duration(
                        args::duration(args, 0)?.subtract(args::duration(args, 1)?),
                    ))
                },
            ))
            .definition(dists(|args, context| {
                combine(DistOperation::Subtract, CombineMode::Algebraic, args, context)
            })),
        op("multiply")
            .definition(numbers(|args, _| {
                Ok(Value::number(args::number(args, 0)? * args::number(args, 1)?))
            }))
            .definition(FnDefinition::make(vec![T::Duration, T::Number], T::Duration, |args, _| {
                Ok(Value::duration(args::duration(args, 0)?.scale(args::number(args, 1)?)))
            }))
            .definition(FnDefinition::make(vec![T::Number, T::Duration], T::Duration, |args, _| {
                Ok(Value::duration(args::duration(args, 1)?.scale(args::number(args, 0)?)))
            }))
            .definition(dists(|args, context| {
                combine(DistOperation::Multiply, CombineMode::Algebraic, args, context)
            })),
        op("divide")
            .definition(numbers(|args, _| {
                Ok(Value::number(args::number(args, 0)? / args::number(args, 1)?))
            }))
            .definition(FnDefinition::make(vec![T::Duration, T::Number], T::Duration, |args, _| {
                Ok(Value::duration(
                    args::duration(args, 0)?.scale(1.0 / args::number(args, 1)?),
                ))
            }))
            .definition(FnDefinition::make(vec![T::Duration, T::Duration], T::Number, |args, _| {
                Ok(Value::number(
                    args::duration(args, 0)?.to_ms() / args::duration(args, 1)?.to_ms(),
                ))
            }))
            .definition(dists(|args, context| {
                combine(DistOperation::Divide, CombineMode::Algebraic, args, context)
            })),
        op("pow")
            .definition(numbers(|args, _| {
                Ok(Value::number(args::number(args, 0)?.powf(args::number(args, 1)?)))
            }))
            .definition(dists(|args, context| {
                combine(DistOperation::Power, CombineMode::Algebraic, args, context)
            })),
        op("unaryMinus")
            .definition(FnDefinition::make(vec![T::Number], T::Number, |args, _| {
                Ok(Value::number(-args::number(args, 0)?))
            }))
            .definition(FnDefinition::make(vec![T::Duration], T::Duration, |args, _| {
                Ok(Value::duration(args::duration(args, 0)?.scale(-1.0)))
            }))
            .definition(FnDefinition::make(vec![T::Dist], T::Dist, |args, context| {
                let negated = args::dist(args, 0)?.combine(
                    DistOperation::Multiply,
                    CombineMode::Algebraic,
                    &Operand::Scalar(-1.0),
                    context.environment(),
                )?;
                Ok(Value::dist(negated))
            })),
        op("equal").definition(FnDefinition::make(vec![T::Any, T::Any], T::Bool, |args, _| {
            Ok(Value::bool(args::any(args, 0)?.is_equal(args::any(args, 1)?)?))
        })),
        op("unequal").definition(FnDefinition::make(vec![T::Any, T::Any], T::Bool, |args, _| {
            Ok(Value::bool(!args::any(args, 0)?.is_equal(args::any(args, 1)?)?))
        })),
        comparison("smaller", |args, _| {
            Ok(Value::bool(ordering(args)?.is_some_and(Ordering::is_lt)))
        }),
        comparison("smallerEq", |args, _| {
            Ok(Value::bool(ordering(args)?.is_some_and(Ordering::is_le)))
        }),
        comparison("larger", |args, _| {
            Ok(Value::bool(ordering(args)?.is_some_and(Ordering::is_gt)))
        }),
        comparison("largerEq", |args, _| {
            Ok(Value::bool(ordering(args)?.is_some_and(Ordering::is_ge)))
        }),
        op("and").definition(FnDefinition::make(vec![T::Bool, T::Bool], T::Bool, |args, _| {
            Ok(Value::bool(args::boolean(args, 0)? && args::boolean(args, 1)?))
        })),
        op("or").definition(FnDefinition::make(vec![T::Bool, T::Bool], T::Bool, |args, _| {
            Ok(Value::bool(args::boolean(args, 0)? || args::boolean(args, 1)?))
        })),
        op("not").definition(FnDefinition::make(vec![T::Bool], T::Bool, |args, _| {
            Ok(Value::bool(!args::boolean(args, 0)?))
        })),
        op("to")
            .description("Range distribution. Needs a host that supplies distributions.")
            .definition(FnDefinition::make(
                vec![T::DistOrNumber, T::DistOrNumber],
                T::Dist,
                |_, _| Err(DistError::NotYetImplemented("to".into()).into()),
            )),
        op(INDEX_FUNCTION)
            .definition(FnDefinition::make(
                vec![T::array(T::Any), T::Number],
                T::Any,
                at_index,
            ))
            .definition(FnDefinition::make(
                vec![T::dict(T::Any), T::String],
                T::Any,
                at_key,
            )),
        op("concat")
            .definition(FnDefinition::make(vec![T::String, T::String], T::String, |args, _| {
                Ok(Value::string(format!(
                    "{}{}",
                    args::string(args, 0)?,
                    args::string(args, 1)?
                )))
            }))
            .definition(FnDefinition::make(
                vec![T::array(T::Any), T::array(T::Any)],
                T::array(T::Any),
                |args, _| {
                    let mut items = args::array(args, 0)?.to_vec();
                    items.extend_from_slice(args::array(args, 1)?);
                    Ok(Value::array(items))
                },
            )),
        op("typeOf").definition(FnDefinition::make(vec![T::Any], T::String, |args, _| {
            Ok(Value::string(args::any(args, 0)?.type_name()))
        })),
        op("inspect")
            .description("Log a value and return it unchanged.")
            .definition(
                FnDefinition::make(vec![T::Any], T::Any, |args, _| {
                    let value = args::any(args, 0)?;
                    match args::optional(args, 1).and_then(Value::as_str) {
                        Some(label) => tracing::info!(target: "squiggle::inspect", "{label}: {value}"),
                        None => tracing::info!(target: "squiggle::inspect", "{value}"),
                    }
                    Ok(value.clone())
                })
                .with_optional(T::String),
            ),
    ]
}
