use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;
use crate::{BuiltinLambda, DistError, Distribution, Environment};

#[derive(Debug)]
struct PointMass(f64);

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
}

fn identity() -> Value {
    Value::lambda(Lambda::builtin(BuiltinLambda::new("identity", |args, _| {
        Ok(args.first().cloned().unwrap_or_else(Value::void))
    })))
}

#[test]
fn rendering() {
    assert_eq!(Value::number(2.0).to_string(), "2");
    assert_eq!(Value::number(0.5).to_string(), "0.5");
    assert_eq!(Value::number(f64::INFINITY).to_string(), "Infinity");
    assert_eq!(Value::number(-0.0).to_string(), "0");
    assert_eq!(Value::string("abc").to_string(), "'abc'");
    assert_eq!(
        Value::array(vec![Value::number(1.0), Value::bool(true)]).to_string(),
        "[1, true]"
    );
    assert_eq!(
        Value::record([("b", Value::number(2.0)), ("a", Value::number(6.0))]).to_string(),
        "{a: 6, b: 2}"
    );
    assert_eq!(Value::void().to_string(), "()");
    assert_eq!(identity().to_string(), "Builtin(identity)");
}

#[test]
fn type_names() {
    assert_eq!(Value::array(vec![]).type_name(), "List");
    assert_eq!(Value::dist(DistHandle::new(PointMass(1.0))).type_name(), "Distribution");
    assert_eq!(Value::void().type_name(), "Void");
}

#[test]
fn structural_equality() -> Result<(), ErrorMessage> {
    let a = Value::array(vec![Value::number(1.0), Value::string("x")]);
    let b = Value::array(vec![Value::number(1.0), Value::string("x")]);
    assert!(a.is_equal(&b)?);
    assert!(!a.is_equal(&Value::array(vec![Value::number(1.0)]))?);
    assert!(!Value::number(1.0).is_equal(&Value::string("1"))?);

    let r1 = Value::record([("k", Value::bool(true))]);
    let r2 = Value::record([("k", Value::bool(false))]);
    assert!(!r1.is_equal(&r2)?);
    assert!(r1.is_equal(&r1.clone())?);
    Ok(())
}

#[test]
fn equality_ignores_tags() -> Result<(), ErrorMessage> {
    let tags = ValueTags {
        name: Some(Arc::from("n")),
        ..ValueTags::default()
    };
    let tagged = Value::number(3.0).with_tags(&tags);
    assert!(tagged.is_equal(&Value::number(3.0))?);
    Ok(())
}

#[test]
fn unsupported_equality_is_an_error() {
    let err = identity().is_equal(&identity());
    assert_eq!(
        err.map_err(|e| e.to_string()),
        Err("Error: Equality is not defined for Lambda".to_string())
    );
    let dist = Value::dist(DistHandle::new(PointMass(1.0)));
    assert!(Value::number(1.0).is_equal(&dist).is_err());
    // nested inside a container
    let nested = Value::array(vec![identity()]);
    assert!(nested.is_equal(&nested.clone()).is_err());
}

#[test]
fn tags_merge_newest_wins() {
    let first = ValueTags {
        name: Some(Arc::from("old")),
        doc: Some(Arc::from("kept")),
        ..ValueTags::default()
    };
    let second = ValueTags {
        name: Some(Arc::from("new")),
        ..ValueTags::default()
    };
    let value = Value::number(1.0).with_tags(&first).with_tags(&second);
    let tags = value.tags().cloned().unwrap_or_default();
    assert_eq!(tags.name.as_deref(), Some("new"));
    assert_eq!(tags.doc.as_deref(), Some("kept"));
    assert!(value.without_tags().tags().is_none());
    assert_eq!(tags.to_value().to_string(), "{doc: 'kept', name: 'new'}");
}

#[test]
fn dates_render_as_calendar_days() {
    let date = SDate::from_ymd(2024, 2, 29);
    assert_eq!(date.map(|d| d.to_string()), Some("2024-02-29".to_string()));
    assert!(SDate::from_ymd(2023, 2, 29).is_none());
    assert_eq!(SDate::from_unix_ms(0.0).to_string(), "1970-01-01");
    assert_eq!(
        SDate::from_unix_ms(-1.0).ymd(),
        (1969, 12, 31),
    );
    let with_time = SDate::from_unix_ms(0.0).add(SDuration::from_hours(1.5));
    assert_eq!(with_time.to_string(), "1970-01-01 01:30:00");
}

#[test]
fn durations_pick_largest_unit() {
    assert_eq!(SDuration::from_days(3.0).to_string(), "3 days");
    assert_eq!(SDuration::from_minutes(90.0).to_string(), "1.5 hours");
    assert_eq!(SDuration::from_ms(250.0).to_string(), "250 ms");
    let a = SDate::from_ymd(2024, 1, 1);
    let b = SDate::from_ymd(2024, 1, 11);
    let gap = a.zip(b).map(|(a, b)| b.since(a).to_days());
    assert_eq!(gap, Some(10.0));
}

#[test]
fn domain_validation() {
    let domain = Domain::NumericRange { min: 0.0, max: 10.0 };
    assert!(domain.validate(&Value::number(5.0)).is_ok());
    assert_eq!(
        domain.validate(&Value::number(11.0)).map_err(|e| e.to_string()),
        Err("Error: Parameter 11 must be in domain Number.rangeDomain(0, 10)".to_string())
    );
    assert!(domain.validate(&Value::string("x")).is_err());
}
