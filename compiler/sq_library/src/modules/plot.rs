//! `Scale.*`, `Plot.*`, `Table.make` and `Calculator.make`.
//!
//! These only validate their options and build descriptor values. Drawing
//! and sampling the functions is left to the host.

use sq_value::{
    Calculator, CalculatorInput, CallContext, ErrorMessage, IError, LabeledDistribution, Lambda,
    Plot, PlotKind, Scale, ScaleKind, Table, TableColumn, Value, ValueKind,
};

use crate::args::{self, Fields};
use crate::RecordField as F;
use crate::{FnDefinition, FrFunction, FrType as T};

fn scale_fields(extra: Option<F>) -> T {
    let mut fields = vec![
        F::optional("min", T::Number),
        F::optional("max", T::Number),
        F::optional("tickFormat", T::String),
        F::optional("title", T::String),
    ];
    fields.extend(extra);
    T::Record(fields)
}

fn build_scale(kind: ScaleKind, options: &Fields<'_>) -> Result<Value, IError> {
    let scale = Scale {
        kind,
        min: options.number("min"),
        max: options.number("max"),
        tick_format: options.string("tickFormat"),
        title: options.string("title"),
    };
    if let (Some(min), Some(max)) = (scale.min, scale.max) {
        if min >= max {
            return Err(ErrorMessage::other(format!(
                "Max must be greater than min, got: min={min}, max={max}"
            ))
            .into());
        }
    }
    Ok(Value::scale(scale))
}

fn scale_function(
    name: &'static str,
    extra: Option<F>,
    body: crate::FnBody,
) -> FrFunction {
    FrFunction::new(Some("Scale"), name)
        .requires_namespace()
        .definition(FnDefinition::make(vec![], T::Scale, body).with_optional(scale_fields(extra)))
}

fn axis_fields(mut fields: Vec<F>) -> T {
    fields.extend([
        F::optional("xScale", T::Scale),
        F::optional("yScale", T::Scale),
        F::optional("title", T::String),
    ]);
    T::Record(fields)
}

fn single_parameter(function: &Lambda) -> Result<(), IError> {
    match function.parameter_count() {
        Some(1) | None => Ok(()),
        Some(n) => Err(ErrorMessage::other(format!(
            "Plots only work with functions that have one parameter. This function has {n} parameters."
        ))
        .into()),
    }
}

fn function_plot(args: &[Value], dist_fn: bool) -> Result<Value, IError> {
    let options = Fields::of(args::optional(args, 0));
    let function = options.lambda("fn")?;
    single_parameter(&function)?;
    let x_scale = options.scale("xScale").unwrap_or_else(Scale::linear);
    let y_scale = options.scale("yScale").unwrap_or_else(Scale::linear);
    let kind = if dist_fn {
        PlotKind::DistFn {
            function,
            x_scale,
            y_scale,
        }
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let points = options.number("points").map(|n| n.max(2.0) as usize);
        PlotKind::NumericFn {
            function,
            x_scale,
            y_scale,
            points,
        }
    };
    Ok(Value::plot(Plot {
        kind,
        title: options.string("title"),
    }))
}

fn labeled(value: &Value) -> Result<LabeledDistribution, IError> {
    match value.kind() {
        ValueKind::Dist(dist) => Ok(LabeledDistribution {
            name: None,
            dist: dist.clone(),
        }),
        ValueKind::Dict(_) => {
            let fields = Fields::of(Some(value));
            let dist = fields
                .get("value")
                .and_then(Value::as_dist)
                .cloned()
                .ok_or_else(|| ErrorMessage::expected_type("Dist", value))?;
            Ok(LabeledDistribution {
                name: fields.string("name"),
                dist,
            })
        }
        _ => Err(ErrorMessage::expected_type("Dist", value).into()),
    }
}

fn dists_plot(dists: Vec<LabeledDistribution>, options: &Fields<'_>) -> Value {
    Value::plot(Plot {
        kind: PlotKind::Dists {
            dists,
            x_scale: options.scale("xScale").unwrap_or_else(Scale::linear),
            y_scale: options.scale("yScale").unwrap_or_else(Scale::linear),
            show_summary: options.boolean("showSummary").unwrap_or(true),
        },
        title: options.string("title"),
    })
}

fn plot_dists(args: &[Value], _: &mut dyn CallContext) -> Result<Value, IError> {
    let options = Fields::of(args::optional(args, 0));
    let items = options
        .get("dists")
        .and_then(Value::as_array)
        .unwrap_or_default();
    let dists = items.iter().map(labeled).collect::<Result<Vec<_>, _>>()?;
    Ok(dists_plot(dists, &options))
}

fn plot_dist(args: &[Value], _: &mut dyn CallContext) -> Result<Value, IError> {
    let dist = labeled(args::any(args, 0)?)?;
    let options = Fields::of(args::optional(args, 1));
    Ok(dists_plot(vec![dist], &options))
}

fn scatter(args: &[Value], _: &mut dyn CallContext) -> Result<Value, IError> {
    let options = Fields::of(args::optional(args, 0));
    let dist = |key: &str| {
        options
            .get(key)
            .and_then(Value::as_dist)
            .cloned()
            .ok_or_else(|| ErrorMessage::other(format!("Missing field {key}")))
    };
    Ok(Value::plot(Plot {
        kind: PlotKind::Scatter {
            x: dist("xDist")?,
            y: dist("yDist")?,
            x_scale: options.scale("xScale").unwrap_or_else(Scale::linear),
            y_scale: options.scale("yScale").unwrap_or_else(Scale::linear),
        },
        title: options.string("title"),
    }))
}

fn table(args: &[Value], _: &mut dyn CallContext) -> Result<Value, IError> {
    let data = args::array(args, 0)?.to_vec();
    let options = Fields::of(args::optional(args, 1));
    let columns = options
        .get("columns")
        .and_then(Value::as_array)
        .unwrap_or_default()
        .iter()
        .map(|column| {
            let fields = Fields::of(Some(column));
            Ok(TableColumn {
                name: fields.string("name"),
                function: fields.lambda("fn")?,
            })
        })
        .collect::<Result<Vec<_>, ErrorMessage>>()?;
    Ok(Value::table(Table { data, columns }))
}

fn calculator(args: &[Value], _: &mut dyn CallContext) -> Result<Value, IError> {
    let function = args::lambda(args, 0)?.clone();
    let options = Fields::of(args::optional(args, 1));
    let parameters: Vec<String> = match &function {
        Lambda::User(lambda) => lambda.parameters.iter().map(|p| p.to_string()).collect(),
        Lambda::Builtin(_) => {
            return Err(ErrorMessage::other(
                "Calculator only works with user-defined functions",
            )
            .into());
        }
    };
    let inputs = match options.get("inputs").and_then(Value::as_array) {
        Some(names) => {
            if names.len() != parameters.len() {
                return Err(ErrorMessage::other(format!(
                    "Calculator function needs {} inputs, but {} were given",
                    parameters.len(),
                    names.len()
                ))
                .into());
            }
            names
                .iter()
                .map(|name| CalculatorInput {
                    name: name.as_str().map_or_else(|| name.to_string(), str::to_string),
                    default: None,
                    description: None,
                })
                .collect()
        }
        None => parameters
            .into_iter()
            .map(|name| CalculatorInput {
                name,
                default: None,
                description: None,
            })
            .collect(),
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let sample_count = options.number("sampleCount").map(|n| n.max(1.0) as usize);
    Ok(Value::calculator(Calculator {
        function,
        inputs,
        autorun: options.boolean("autorun").unwrap_or(true),
        title: options.string("title"),
        description: options.string("description"),
        sample_count,
    }))
}

pub(crate) fn functions() -> Vec<FrFunction> {
    vec![
        scale_function("linear", None, |args, _| {
            build_scale(ScaleKind::Linear, &Fields::of(args::optional(args, 0)))
        }),
        scale_function("log", None, |args, _| {
            build_scale(ScaleKind::Log, &Fields::of(args::optional(args, 0)))
        }),
        scale_function("symlog", Some(F::optional("constant", T::Number)), |args, _| {
            let options = Fields::of(args::optional(args, 0));
            let constant = options.number("constant").unwrap_or(1.0);
            if constant <= 0.0 {
                return Err(ErrorMessage::other("Symlog scale constant must be positive").into());
            }
            build_scale(ScaleKind::Symlog { constant }, &options)
        }),
        scale_function("power", Some(F::optional("exponent", T::Number)), |args, _| {
            let options = Fields::of(args::optional(args, 0));
            let exponent = options.number("exponent").unwrap_or(0.1);
            if exponent <= 0.0 {
                return Err(ErrorMessage::other("Power scale exponent must be positive").into());
            }
            build_scale(ScaleKind::Power { exponent }, &options)
        }),
        scale_function("date", None, |args, _| {
            build_scale(ScaleKind::Date, &Fields::of(args::optional(args, 0)))
        }),
        FrFunction::new(Some("Plot"), "numericFn")
            .requires_namespace()
            .definition(FnDefinition::make(
                vec![axis_fields(vec![
                    F::required("fn", T::Lambda),
                    F::optional("points", T::Number),
                ])],
                T::Plot,
                |args, _| function_plot(args, false),
            )),
        FrFunction::new(Some("Plot"), "distFn")
            .requires_namespace()
            .definition(FnDefinition::make(
                vec![axis_fields(vec![F::required("fn", T::Lambda)])],
                T::Plot,
                |args, _| function_plot(args, true),
            )),
        FrFunction::new(Some("Plot"), "dists")
            .requires_namespace()
            .definition(FnDefinition::make(
                vec![axis_fields(vec![
                    F::required("dists", T::array(T::Any)),
                    F::optional("showSummary", T::Bool),
                ])],
                T::Plot,
                plot_dists,
            )),
        FrFunction::new(Some("Plot"), "dist")
            .requires_namespace()
            .definition(
                FnDefinition::make(vec![T::Dist], T::Plot, plot_dist).with_optional(axis_fields(
                    vec![F::optional("showSummary", T::Bool)],
                )),
            ),
        FrFunction::new(Some("Plot"), "scatter")
            .requires_namespace()
            .definition(FnDefinition::make(
                vec![axis_fields(vec![
                    F::required("xDist", T::Dist),
                    F::required("yDist", T::Dist),
                ])],
                T::Plot,
                scatter,
            )),
        FrFunction::new(Some("Table"), "make")
            .requires_namespace()
            .definition(FnDefinition::make(
                vec![
                    T::array(T::Any),
                    T::Record(vec![F::required(
                        "columns",
                        T::array(T::Record(vec![
                            F::required("fn", T::Lambda),
                            F::optional("name", T::String),
                        ])),
                    )]),
                ],
                T::Table,
                table,
            )),
        FrFunction::new(Some("Calculator"), "make")
            .requires_namespace()
            .definition(
                FnDefinition::make(vec![T::Lambda], T::Calculator, calculator).with_optional(
                    T::Record(vec![
                        F::optional("title", T::String),
                        F::optional("description", T::String),
                        F::optional("inputs", T::array(T::String)),
                        F::optional("autorun", T::Bool),
                        F::optional("sampleCount", T::Number),
                    ]),
                ),
            ),
    ]
}
