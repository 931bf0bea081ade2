use std::sync::Arc;

use sq_value::{CallContext, ErrorMessage, IError, Value, ValueMap};

use crate::args;
use crate::{FnDefinition, FrFunction, FrType as T};

const NAMESPACE: Option<&str> = Some("Dict");

fn dict() -> T {
    T::dict(T::Any)
}

fn from_list(args: &[Value], _: &mut dyn CallContext) -> Result<Value, IError> {
    let mut map = ValueMap::new();
    for pair in args::array(args, 0)? {
        let (key, value) = match pair.as_array() {
            Some([key, value]) => (key, value),
            _ => return Err(ErrorMessage::expected_type("[String, any]", pair).into()),
        };
        let key = key
            .as_str()
            .ok_or_else(|| ErrorMessage::expected_type("String", key))?;
        map.insert(Arc::from(key), value.clone());
    }
    Ok(Value::dict(map))
}

fn map_values(args: &[Value], context: &mut dyn CallContext) -> Result<Value, IError> {
    let map = args::dict(args, 0)?;
    let f = args::lambda(args, 1)?;
    let mut mapped = ValueMap::new();
    for (key, value) in map {
        mapped.insert(Arc::clone(key), context.call(f, vec![value.clone()])?);
    }
    Ok(Value::dict(mapped))
}

pub(crate) fn functions() -> Vec<FrFunction> {
    vec![
        FrFunction::new(NAMESPACE, "keys")
            .requires_namespace()
            .definition(FnDefinition::make(vec![dict()], T::array(T::String), |args, _| {
                let keys = args::dict(args, 0)?
                    .keys()
                    .map(|key| Value::string(Arc::clone(key)))
                    .collect();
                Ok(Value::array(keys))
            })),
        FrFunction::new(NAMESPACE, "values")
            .requires_namespace()
            .definition(FnDefinition::make(vec![dict()], T::array(T::Any), |args, _| {
                Ok(Value::array(args::dict(args, 0)?.values().cloned().collect()))
            })),
        FrFunction::new(NAMESPACE, "toList")
            .requires_namespace()
            .definition(FnDefinition::make(vec![dict()], T::array(T::Any), |args, _| {
                let pairs = args::dict(args, 0)?
                    .iter()
                    .map(|(key, value)| {
                        Value::array(vec![Value::string(Arc::clone(key)), value.clone()])
                    })
                    .collect();
                Ok(Value::array(pairs))
            })),
        FrFunction::new(NAMESPACE, "fromList")
            .requires_namespace()
            .definition(FnDefinition::make(
                vec![T::array(T::Tuple(vec![T::String, T::Any]))],
                dict(),
                from_list,
            )),
        FrFunction::new(NAMESPACE, "has")
            .requires_namespace()
            .definition(FnDefinition::make(vec![dict(), T::String], T::Bool, |args, _| {
                Ok(Value::bool(
                    args::dict(args, 0)?.contains_key(args::string(args, 1)?),
                ))
            })),
        FrFunction::new(NAMESPACE, "set")
            .requires_namespace()
            .definition(FnDefinition::make(
                vec![dict(), T::String, T::Any],
                dict(),
                |args, _| {
                    let map = args::dict(args, 0)?.update(
                        Arc::from(args::string(args, 1)?),
                        args::any(args, 2)?.clone(),
                    );
                    Ok(Value::dict(map))
                },
            )),
        FrFunction::new(NAMESPACE, "delete")
            .requires_namespace()
            .definition(FnDefinition::make(vec![dict(), T::String], dict(), |args, _| {
                Ok(Value::dict(args::dict(args, 0)?.without(args::string(args, 1)?)))
            })),
        FrFunction::new(NAMESPACE, "merge")
            .requires_namespace()
            .description("Keys of the second dict win.")
            .definition(FnDefinition::make(vec![dict(), dict()], dict(), |args, _| {
                let older = args::dict(args, 0)?.clone();
                let newer = args::dict(args, 1)?;
                let merged = newer
                    .iter()
                    .fold(older, |merged, (key, value)| merged.update(Arc::clone(key), value.clone()));
                Ok(Value::dict(merged))
            })),
        FrFunction::new(NAMESPACE, "size")
            .requires_namespace()
            .definition(FnDefinition::make(vec![dict()], T::Number, |args, _| {
                #[allow(clippy::cast_precision_loss)]
                let size = args::dict(args, 0)?.len() as f64;
                Ok(Value::number(size))
            })),
        FrFunction::new(NAMESPACE, "mapValues")
            .requires_namespace()
            .definition(FnDefinition::make(vec![dict(), T::Lambda], dict(), map_values)),
    ]
}
