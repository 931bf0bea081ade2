use sq_value::{Domain, ErrorMessage, IError, SDate, SDuration, Value};

use crate::args;
use crate::{FnBody, FnDefinition, FrFunction, FrType as T};

const DATE: Option<&str> = Some("Date");
const DURATION: Option<&str> = Some("Duration");

fn whole(n: f64, what: &str) -> Result<i64, IError> {
    if n.fract() != 0.0 || !n.is_finite() {
        return Err(ErrorMessage::other(format!("{what} must be an integer, got: {n}")).into());
    }
    #[allow(clippy::cast_possible_truncation)]
    let n = n as i64;
    Ok(n)
}

fn make_date(year: f64, month: f64, day: f64) -> Result<Value, IError> {
    let year = whole(year, "Year")?;
    let month = u32::try_from(whole(month, "Month")?).unwrap_or(0);
    let day = u32::try_from(whole(day, "Day")?).unwrap_or(0);
    SDate::from_ymd(year, month, day)
        .map(Value::date)
        .ok_or_else(|| ErrorMessage::other("Invalid date").into())
}

fn duration_from(name: &'static str, body: FnBody) -> FrFunction {
    FrFunction::new(DURATION, name)
        .requires_namespace()
        .definition(FnDefinition::make(vec![T::Number], T::Duration, body))
}

fn duration_to(name: &'static str, body: FnBody) -> FrFunction {
    FrFunction::new(DURATION, name)
        .requires_namespace()
        .definition(FnDefinition::make(vec![T::Duration], T::Number, body))
}

pub(crate) fn functions() -> Vec<FrFunction> {
    vec![
        FrFunction::new(DATE, "make")
            .requires_namespace()
            .definition(FnDefinition::make(
                vec![T::Number, T::Number, T::Number],
                T::Date,
                |args, _| {
                    make_date(
                        args::number(args, 0)?,
                        args::number(args, 1)?,
                        args::number(args, 2)?,
                    )
                },
            ))
            .definition(FnDefinition::make(vec![T::Number], T::Date, |args, _| {
                make_date(args::number(args, 0)?, 1.0, 1.0)
            })),
        FrFunction::new(DATE, "fromUnixTime")
            .requires_namespace()
            .definition(FnDefinition::make(vec![T::Number], T::Date, |args, _| {
                Ok(Value::date(SDate::from_unix_seconds(args::number(args, 0)?)))
            })),
        FrFunction::new(DATE, "toUnixTime")
            .requires_namespace()
            .definition(FnDefinition::make(vec![T::Date], T::Number, |args, _| {
                Ok(Value::number(args::date(args, 0)?.to_unix_seconds()))
            })),
        FrFunction::new(DATE, "rangeDomain")
            .requires_namespace()
            .definition(FnDefinition::make(vec![T::Date, T::Date], T::Domain, |args, _| {
                let min = args::date(args, 0)?;
                let max = args::date(args, 1)?;
                if min > max {
                    return Err(ErrorMessage::other(format!(
                        "The range minimum ({min}) must be lower than the range maximum ({max})"
                    ))
                    .into());
                }
                Ok(Value::domain(Domain::DateRange { min, max }))
            })),
        duration_from("fromMinutes", |args, _| {
            Ok(Value::duration(SDuration::from_minutes(args::number(args, 0)?)))
        }),
        duration_from("fromHours", |args, _| {
            Ok(Value::duration(SDuration::from_hours(args::number(args, 0)?)))
        }),
        duration_from("fromDays", |args, _| {
            Ok(Value::duration(SDuration::from_days(args::number(args, 0)?)))
        }),
        duration_from("fromYears", |args, _| {
            Ok(Value::duration(SDuration::from_years(args::number(args, 0)?)))
        }),
        duration_to("toMinutes", |args, _| {
            Ok(Value::number(args::duration(args, 0)?.to_minutes()))
        }),
        duration_to("toHours", |args, _| {
            Ok(Value::number(args::duration(args, 0)?.to_hours()))
        }),
        duration_to("toDays", |args, _| {
            Ok(Value::number(args::duration(args, 0)?.to_days()))
        }),
        duration_to("toYears", |args, _| {
            Ok(Value::number(args::duration(args, 0)?.to_years()))
        }),
    ]
}
