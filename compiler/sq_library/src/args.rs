//! Argument extraction for native bodies.
//!
//! Dispatch has already matched the inputs, so a failure here means a body
//! disagrees with its own signature.

use sq_value::{
    DistHandle, ErrorMessage, Lambda, SDate, SDuration, Scale, Value, ValueMap,
};

fn arg(args: &[Value], index: usize) -> Result<&Value, ErrorMessage> {
    args.get(index)
        .ok_or_else(|| ErrorMessage::other(format!("Missing argument {index}")))
}

pub(crate) fn optional(args: &[Value], index: usize) -> Option<&Value> {
    args.get(index)
}

pub(crate) fn any(args: &[Value], index: usize) -> Result<&Value, ErrorMessage> {
    arg(args, index)
}

pub(crate) fn number(args: &[Value], index: usize) -> Result<f64, ErrorMessage> {
    let value = arg(args, index)?;
    value
        .as_number()
        .ok_or_else(|| ErrorMessage::expected_type("Number", value))
}

pub(crate) fn string(args: &[Value], index: usize) -> Result<&str, ErrorMessage> {
    let value = arg(args, index)?;
    value
        .as_str()
        .ok_or_else(|| ErrorMessage::expected_type("String", value))
}

pub(crate) fn boolean(args: &[Value], index: usize) -> Result<bool, ErrorMessage> {
    let value = arg(args, index)?;
    value
        .as_bool()
        .ok_or_else(|| ErrorMessage::expected_type("Bool", value))
}

pub(crate) fn date(args: &[Value], index: usize) -> Result<SDate, ErrorMessage> {
    let value = arg(args, index)?;
    value
        .as_date()
        .ok_or_else(|| ErrorMessage::expected_type("Date", value))
}

pub(crate) fn duration(args: &[Value], index: usize) -> Result<SDuration, ErrorMessage> {
    let value = arg(args, index)?;
    value
        .as_duration()
        .ok_or_else(|| ErrorMessage::expected_type("Duration", value))
}

pub(crate) fn array(args: &[Value], index: usize) -> Result<&[Value], ErrorMessage> {
    let value = arg(args, index)?;
    value
        .as_array()
        .ok_or_else(|| ErrorMessage::expected_type("List", value))
}

pub(crate) fn dict(args: &[Value], index: usize) -> Result<&ValueMap, ErrorMessage> {
    let value = arg(args, index)?;
    value
        .as_dict()
        .ok_or_else(|| ErrorMessage::expected_type("Dict", value))
}

pub(crate) fn lambda(args: &[Value], index: usize) -> Result<&Lambda, ErrorMessage> {
    let value = arg(args, index)?;
    value
        .as_lambda()
        .ok_or_else(|| ErrorMessage::expected_type("Function", value))
}

pub(crate) fn dist(args: &[Value], index: usize) -> Result<&DistHandle, ErrorMessage> {
    let value = arg(args, index)?;
    value
        .as_dist()
        .ok_or_else(|| ErrorMessage::expected_type("Dist", value))
}

/// Record field lookups for option dicts.
pub(crate) struct Fields<'a>(pub(crate) Option<&'a ValueMap>);

impl<'a> Fields<'a> {
    pub(crate) fn of(value: Option<&'a Value>) -> Self {
        Fields(value.and_then(Value::as_dict))
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.and_then(|map| map.get(key))
    }

    pub(crate) fn string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Value::as_str).map(str::to_string)
    }

    pub(crate) fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_number)
    }

    pub(crate) fn boolean(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub(crate) fn scale(&self, key: &str) -> Option<Scale> {
        self.get(key).and_then(Value::as_scale).cloned()
    }

    pub(crate) fn lambda(&self, key: &str) -> Result<Lambda, ErrorMessage> {
        match self.get(key) {
            Some(value) => value
                .as_lambda()
                .cloned()
                .ok_or_else(|| ErrorMessage::expected_type("Function", value)),
            None => Err(ErrorMessage::other(format!("Missing field {key}"))),
        }
    }
}
