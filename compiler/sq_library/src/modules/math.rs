use std::f64::consts;
use std::sync::Arc;

use sq_value::{Domain, ErrorMessage, IError, Namespace, Value};

use crate::args;
use crate::{FnBody, FnDefinition, FrFunction, FrType as T};

pub(crate) fn constants() -> Namespace {
    [
        ("pi", consts::PI),
        ("e", consts::E),
        ("ln2", consts::LN_2),
        ("ln10", consts::LN_10),
        ("log2e", consts::LOG2_E),
        ("log10e", consts::LOG10_E),
        ("sqrt2", consts::SQRT_2),
        ("sqrt1_2", consts::FRAC_1_SQRT_2),
        ("phi", 1.618_033_988_749_895),
        ("tau", consts::TAU),
    ]
    .into_iter()
    .map(|(name, value)| (Arc::<str>::from(format!("Math.{name}")), Value::number(value)))
    .collect()
}

fn unary(name: &'static str, body: FnBody) -> FrFunction {
    FrFunction::new(Some("Math"), name)
        .definition(FnDefinition::make(vec![T::Number], T::Number, body))
}

fn numbers(args: &[Value]) -> Result<Vec<f64>, ErrorMessage> {
    let items = args::array(args, 0)?;
    items
        .iter()
        .map(|item| {
            item.as_number()
                .ok_or_else(|| ErrorMessage::expected_type("Number", item))
        })
        .collect()
}

fn non_empty(args: &[Value]) -> Result<Vec<f64>, IError> {
    let items = numbers(args)?;
    if items.is_empty() {
        return Err(ErrorMessage::other("List is empty").into());
    }
    Ok(items)
}

fn list_of_numbers(name: &'static str, body: FnBody) -> FrFunction {
    FrFunction::new(Some("Number"), name).definition(FnDefinition::make(
        vec![T::array(T::Number)],
        T::Number,
        body,
    ))
}

pub(crate) fn functions() -> Vec<FrFunction> {
    vec![
        unary("sqrt", |args, _| Ok(Value::number(args::number(args, 0)?.sqrt()))),
        unary("sin", |args, _| Ok(Value::number(args::number(args, 0)?.sin()))),
        unary("cos", |args, _| Ok(Value::number(args::number(args, 0)?.cos()))),
        unary("tan", |args, _| Ok(Value::number(args::number(args, 0)?.tan()))),
        unary("asin", |args, _| Ok(Value::number(args::number(args, 0)?.asin()))),
        unary("acos", |args, _| Ok(Value::number(args::number(args, 0)?.acos()))),
        unary("atan", |args, _| Ok(Value::number(args::number(args, 0)?.atan()))),
        unary("exp", |args, _| Ok(Value::number(args::number(args, 0)?.exp()))),
        unary("log", |args, _| Ok(Value::number(args::number(args, 0)?.ln()))),
        unary("log10", |args, _| Ok(Value::number(args::number(args, 0)?.log10()))),
        unary("log2", |args, _| Ok(Value::number(args::number(args, 0)?.log2()))),
        unary("abs", |args, _| Ok(Value::number(args::number(args, 0)?.abs()))),
        unary("floor", |args, _| Ok(Value::number(args::number(args, 0)?.floor()))),
        unary("ceil", |args, _| Ok(Value::number(args::number(args, 0)?.ceil()))),
        unary("round", |args, _| Ok(Value::number(args::number(args, 0)?.round()))),
        FrFunction::new(Some("Math"), "min").definition(FnDefinition::make(
            vec![T::Number, T::Number],
            T::Number,
            |args, _| Ok(Value::number(args::number(args, 0)?.min(args::number(args, 1)?))),
        )),
        FrFunction::new(Some("Math"), "max").definition(FnDefinition::make(
            vec![T::Number, T::Number],
            T::Number,
            |args, _| Ok(Value::number(args::number(args, 0)?.max(args::number(args, 1)?))),
        )),
        list_of_numbers("sum", |args, _| Ok(Value::number(numbers(args)?.iter().sum()))),
        list_of_numbers("product", |args, _| {
            Ok(Value::number(numbers(args)?.iter().product()))
        }),
        list_of_numbers("min", |args, _| {
            Ok(Value::number(
                non_empty(args)?.into_iter().fold(f64::INFINITY, f64::min),
            ))
        }),
        list_of_numbers("max", |args, _| {
            Ok(Value::number(
                non_empty(args)?.into_iter().fold(f64::NEG_INFINITY, f64::max),
            ))
        }),
        list_of_numbers("mean", |args, _| {
            let items = non_empty(args)?;
            #[allow(clippy::cast_precision_loss)]
            let count = items.len() as f64;
            Ok(Value::number(items.iter().sum::<f64>() / count))
        }),
        FrFunction::new(Some("Number"), "rangeDomain")
            .requires_namespace()
            .definition(FnDefinition::make(
                vec![T::Number, T::Number],
                T::Domain,
                |args, _| {
                    let min = args::number(args, 0)?;
                    let max = args::number(args, 1)?;
                    if min > max {
                        return Err(ErrorMessage::other(format!(
                            "The range minimum ({min}) must be lower than the range maximum ({max})"
                        ))
                        .into());
                    }
                    Ok(Value::domain(Domain::NumericRange { min, max }))
                },
            )),
    ]
}
