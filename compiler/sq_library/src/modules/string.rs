use sq_value::{Value, ValueKind};

use crate::args;
use crate::{FnDefinition, FrFunction, FrType as T};

const NAMESPACE: Option<&str> = Some("String");

pub(crate) fn functions() -> Vec<FrFunction> {
    vec![
        FrFunction::new(NAMESPACE, "make")
            .requires_namespace()
            .description("Render any value as a string; strings are returned unquoted.")
            .definition(FnDefinition::make(vec![T::Any], T::String, |args, _| {
                let value = args::any(args, 0)?;
                Ok(match value.kind() {
                    ValueKind::String(_) => value.clone(),
                    _ => Value::string(value.to_string()),
                })
            })),
        FrFunction::new(NAMESPACE, "split")
            .requires_namespace()
            .definition(FnDefinition::make(
                vec![T::String, T::String],
                T::array(T::String),
                |args, _| {
                    let text = args::string(args, 0)?;
                    let separator = args::string(args, 1)?;
                    let parts: Vec<Value> = if separator.is_empty() {
                        text.chars().map(|c| Value::string(c.to_string())).collect()
                    } else {
                        text.split(separator).map(Value::string).collect()
                    };
                    Ok(Value::array(parts))
                },
            )),
        FrFunction::new(NAMESPACE, "length")
            .requires_namespace()
            .definition(FnDefinition::make(vec![T::String], T::Number, |args, _| {
                #[allow(clippy::cast_precision_loss)]
                let length = args::string(args, 0)?.chars().count() as f64;
                Ok(Value::number(length))
            })),
        FrFunction::new(NAMESPACE, "toUpperCase")
            .requires_namespace()
            .definition(FnDefinition::make(vec![T::String], T::String, |args, _| {
                Ok(Value::string(args::string(args, 0)?.to_uppercase()))
            })),
        FrFunction::new(NAMESPACE, "toLowerCase")
            .requires_namespace()
            .definition(FnDefinition::make(vec![T::String], T::String, |args, _| {
                Ok(Value::string(args::string(args, 0)?.to_lowercase()))
            })),
    ]
}
