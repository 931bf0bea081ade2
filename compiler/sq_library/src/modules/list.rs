//! `List.*`. `map`, `filter` and `reduce` call back into the reducer
//! through the call context, so user lambdas run with the caller's frame
//! stack and depth limit.

use sq_value::{CallContext, ErrorMessage, IError, Lambda, Value};

use crate::args;
use crate::{FnDefinition, FrFunction, FrType as T};

const NAMESPACE: Option<&str> = Some("List");

fn list() -> T {
    T::array(T::Any)
}

fn count(n: f64) -> Result<usize, ErrorMessage> {
    if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
        return Err(ErrorMessage::other(format!(
            "Expected a non-negative integer, got: {n}"
        )));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = n as usize;
    Ok(n)
}

/// Call `f` with the item, and with the index too when `f` takes two
/// parameters.
fn call_with_index(
    context: &mut dyn CallContext,
    f: &Lambda,
    item: &Value,
    index: usize,
) -> Result<Value, IError> {
    if f.parameter_count() == Some(2) {
        #[allow(clippy::cast_precision_loss)]
        let index = Value::number(index as f64);
        context.call(f, vec![item.clone(), index])
    } else {
        context.call(f, vec![item.clone()])
    }
}

fn non_empty(args: &[Value]) -> Result<&[Value], IError> {
    let items = args::array(args, 0)?;
    if items.is_empty() {
        return Err(ErrorMessage::other("List must not be empty").into());
    }
    Ok(items)
}

fn map(args: &[Value], context: &mut dyn CallContext) -> Result<Value, IError> {
    let items = args::array(args, 0)?;
    let f = args::lambda(args, 1)?;
    let mapped = items
        .iter()
        .enumerate()
        .map(|(i, item)| call_with_index(context, f, item, i))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::array(mapped))
}

fn filter(args: &[Value], context: &mut dyn CallContext) -> Result<Value, IError> {
    let items = args::array(args, 0)?;
    let f = args::lambda(args, 1)?;
    let mut kept = Vec::new();
    for item in items {
        let keep = context.call(f, vec![item.clone()])?;
        match keep.as_bool() {
            Some(true) => kept.push(item.clone()),
            Some(false) => {}
            None => return Err(ErrorMessage::expected_type("Bool", &keep).into()),
        }
    }
    Ok(Value::array(kept))
}

fn reduce(args: &[Value], context: &mut dyn CallContext) -> Result<Value, IError> {
    let items = args::array(args, 0)?;
    let f = args::lambda(args, 2)?;
    let mut acc = args::any(args, 1)?.clone();
    for item in items {
        acc = context.call(f, vec![acc, item.clone()])?;
    }
    Ok(acc)
}

pub(crate) fn functions() -> Vec<FrFunction> {
    vec![
        FrFunction::new(NAMESPACE, "make")
            .requires_namespace()
            .definition(FnDefinition::make(vec![T::Number, T::Any], list(), |args, _| {
                let n = count(args::number(args, 0)?)?;
                Ok(Value::array(vec![args::any(args, 1)?.clone(); n]))
            })),
        FrFunction::new(NAMESPACE, "upTo")
            .requires_namespace()
            .definition(FnDefinition::make(
                vec![T::Number, T::Number],
                T::array(T::Number),
                |args, _| {
                    let low = args::number(args, 0)?.ceil();
                    let high = args::number(args, 1)?.floor();
                    let mut items = Vec::new();
                    let mut n = low;
                    while n <= high {
                        items.push(Value::number(n));
                        n += 1.0;
                    }
                    Ok(Value::array(items))
                },
            )),
        FrFunction::new(NAMESPACE, "length")
            .requires_namespace()
            .definition(FnDefinition::make(vec![list()], T::Number, |args, _| {
                #[allow(clippy::cast_precision_loss)]
                let length = args::array(args, 0)?.len() as f64;
                Ok(Value::number(length))
            })),
        FrFunction::new(NAMESPACE, "first")
            .requires_namespace()
            .definition(FnDefinition::make(vec![list()], T::Any, |args, _| {
                Ok(non_empty(args)?[0].clone())
            })),
        FrFunction::new(NAMESPACE, "last")
            .requires_namespace()
            .definition(FnDefinition::make(vec![list()], T::Any, |args, _| {
                let items = non_empty(args)?;
                Ok(items[items.len() - 1].clone())
            })),
        FrFunction::new(NAMESPACE, "reverse")
            .requires_namespace()
            .definition(FnDefinition::make(vec![list()], list(), |args, _| {
                Ok(Value::array(args::array(args, 0)?.iter().rev().cloned().collect()))
            })),
        FrFunction::new(NAMESPACE, "concat")
            .requires_namespace()
            .definition(FnDefinition::make(vec![list(), list()], list(), |args, _| {
                let mut items = args::array(args, 0)?.to_vec();
                items.extend_from_slice(args::array(args, 1)?);
                Ok(Value::array(items))
            })),
        FrFunction::new(NAMESPACE, "append")
            .requires_namespace()
            .definition(FnDefinition::make(vec![list(), T::Any], list(), |args, _| {
                let mut items = args::array(args, 0)?.to_vec();
                items.push(args::any(args, 1)?.clone());
                Ok(Value::array(items))
            })),
        FrFunction::new(NAMESPACE, "flatten")
            .requires_namespace()
            .definition(FnDefinition::make(vec![T::array(list())], list(), |args, _| {
                let mut items = Vec::new();
                for inner in args::array(args, 0)? {
                    items.extend_from_slice(inner.as_array().unwrap_or_default());
                }
                Ok(Value::array(items))
            })),
        FrFunction::new(NAMESPACE, "join")
            .requires_namespace()
            .definition(
                FnDefinition::make(vec![T::array(T::String)], T::String, |args, _| {
                    let separator = args::optional(args, 1).and_then(Value::as_str).unwrap_or(",");
                    let parts: Vec<&str> = args::array(args, 0)?
                        .iter()
                        .filter_map(Value::as_str)
                        .collect();
                    Ok(Value::string(parts.join(separator)))
                })
                .with_optional(T::String),
            ),
        FrFunction::new(NAMESPACE, "map")
            .definition(FnDefinition::make(vec![list(), T::Lambda], list(), map)),
        FrFunction::new(NAMESPACE, "filter")
            .definition(FnDefinition::make(vec![list(), T::Lambda], list(), filter)),
        FrFunction::new(NAMESPACE, "reduce").definition(FnDefinition::make(
            vec![list(), T::Any, T::Lambda],
            T::Any,
            reduce,
        )),
    ]
}
