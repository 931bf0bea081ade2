//! `Tag.*`: attach and read presentation metadata.
//!
//! Tags never change what a value is; equality and arithmetic ignore them.

use std::sync::Arc;

use sq_value::{CallContext, IError, Value, ValueTags};

use crate::args;
use crate::{FnDefinition, FrFunction, FrType as T};

const NAMESPACE: Option<&str> = Some("Tag");

fn tagged(args: &[Value], tags: ValueTags) -> Result<Value, IError> {
    Ok(args::any(args, 0)?.with_tags(&tags))
}

fn string_tag(args: &[Value]) -> Result<Option<Arc<str>>, IError> {
    Ok(Some(Arc::from(args::string(args, 1)?)))
}

fn show_as(args: &[Value], context: &mut dyn CallContext) -> Result<Value, IError> {
    let value = args::any(args, 0)?;
    let shown = match args::any(args, 1)?.as_lambda() {
        Some(f) => context.call(f, vec![value.clone()])?,
        None => args::any(args, 1)?.clone(),
    };
    tagged(
        args,
        ValueTags {
            show_as: Some(shown),
            ..ValueTags::default()
        },
    )
}

fn getter(name: &'static str, body: crate::FnBody) -> FrFunction {
    FrFunction::new(NAMESPACE, name)
        .requires_namespace()
        .definition(FnDefinition::make(vec![T::Any], T::Any, body))
}

fn optional_string(value: Option<&Arc<str>>) -> Value {
    value.map_or_else(Value::void, |s| Value::string(Arc::clone(s)))
}

pub(crate) fn functions() -> Vec<FrFunction> {
    let displayable = T::or(T::Plot, T::or(T::Table, T::or(T::Calculator, T::Lambda)));
    vec![
        FrFunction::new(NAMESPACE, "name")
            .requires_namespace()
            .definition(FnDefinition::make(vec![T::Any, T::String], T::Any, |args, _| {
                tagged(
                    args,
                    ValueTags {
                        name: string_tag(args)?,
                        ..ValueTags::default()
                    },
                )
            })),
        getter("getName", |args, _| {
            Ok(optional_string(
                args::any(args, 0)?.tags().and_then(|t| t.name.as_ref()),
            ))
        }),
        FrFunction::new(NAMESPACE, "doc")
            .requires_namespace()
            .definition(FnDefinition::make(vec![T::Any, T::String], T::Any, |args, _| {
                tagged(
                    args,
                    ValueTags {
                        doc: string_tag(args)?,
                        ..ValueTags::default()
                    },
                )
            })),
        getter("getDoc", |args, _| {
            Ok(optional_string(
                args::any(args, 0)?.tags().and_then(|t| t.doc.as_ref()),
            ))
        }),
        FrFunction::new(NAMESPACE, "showAs")
            .requires_namespace()
            .definition(FnDefinition::make(vec![T::Any, displayable], T::Any, show_as)),
        getter("getShowAs", |args, _| {
            Ok(args::any(args, 0)?
                .tags()
                .and_then(|t| t.show_as.clone())
                .unwrap_or_else(Value::void))
        }),
        FrFunction::new(NAMESPACE, "format")
            .requires_namespace()
            .definition(FnDefinition::make(
                vec![T::DistOrNumber, T::String],
                T::Any,
                |args, _| {
                    tagged(
                        args,
                        ValueTags {
                            number_format: string_tag(args)?,
                            ..ValueTags::default()
                        },
                    )
                },
            ))
            .definition(FnDefinition::make(vec![T::Duration, T::String], T::Any, |args, _| {
                tagged(
                    args,
                    ValueTags {
                        number_format: string_tag(args)?,
                        ..ValueTags::default()
                    },
                )
            }))
            .definition(FnDefinition::make(vec![T::Date, T::String], T::Any, |args, _| {
                tagged(
                    args,
                    ValueTags {
                        date_format: string_tag(args)?,
                        ..ValueTags::default()
                    },
                )
            })),
        getter("getFormat", |args, _| {
            let tags = args::any(args, 0)?.tags();
            Ok(optional_string(tags.and_then(|t| {
                t.number_format.as_ref().or(t.date_format.as_ref())
            })))
        }),
        FrFunction::new(NAMESPACE, "hide")
            .requires_namespace()
            .definition(
                FnDefinition::make(vec![T::Any], T::Any, |args, _| {
                    let hidden = args::optional(args, 1).and_then(Value::as_bool).unwrap_or(true);
                    tagged(
                        args,
                        ValueTags {
                            hidden: Some(hidden),
                            ..ValueTags::default()
                        },
                    )
                })
                .with_optional(T::Bool),
            ),
        getter("getHide", |args, _| {
            let hidden = args::any(args, 0)?.tags().and_then(|t| t.hidden);
            Ok(Value::bool(hidden.unwrap_or(false)))
        }),
        getter("getAll", |args, _| {
            Ok(args::any(args, 0)?
                .tags()
                .map_or_else(|| Value::record(Vec::<(&str, Value)>::new()), ValueTags::to_value))
        }),
        getter("clear", |args, _| Ok(args::any(args, 0)?.without_tags())),
    ]
}
