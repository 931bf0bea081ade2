//! Type matchers for builtin function signatures.
//!
//! An [`FrType`] only answers "does this value fit?". Dispatch tries the
//! definitions of a name in order and runs the first whose inputs all fit.

use std::fmt;

use sq_value::{Value, ValueKind};

/// A field of an [`FrType::Record`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordField {
    pub key: &'static str,
    pub ty: FrType,
    pub optional: bool,
}

impl RecordField {
    pub fn required(key: &'static str, ty: FrType) -> Self {
        RecordField {
            key,
            ty,
            optional: false,
        }
    }

    pub fn optional(key: &'static str, ty: FrType) -> Self {
        RecordField {
            key,
            ty,
            optional: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FrType {
    Any,
    Number,
    String,
    Bool,
    Date,
    Duration,
    Lambda,
    Dist,
    DistOrNumber,
    Plot,
    Scale,
    Domain,
    Table,
    Calculator,
    Void,
    Array(Box<FrType>),
    Dict(Box<FrType>),
    Tuple(Vec<FrType>),
    /// A dict with a fixed set of keys. Unknown keys do not match.
    Record(Vec<RecordField>),
    /// Either of two shapes, tried left first.
    Or(Box<FrType>, Box<FrType>),
}

impl FrType {
    pub fn array(item: FrType) -> Self {
        FrType::Array(Box::new(item))
    }

    pub fn dict(item: FrType) -> Self {
        FrType::Dict(Box::new(item))
    }

    pub fn or(left: FrType, right: FrType) -> Self {
        FrType::Or(Box::new(left), Box::new(right))
    }

    pub fn matches(&self, value: &Value) -> bool {
        match (self, value.kind()) {
            (FrType::Any, _)
            | (FrType::Number, ValueKind::Number(_))
            | (FrType::String, ValueKind::String(_))
            | (FrType::Bool, ValueKind::Bool(_))
            | (FrType::Date, ValueKind::Date(_))
            | (FrType::Duration, ValueKind::Duration(_))
            | (FrType::Lambda, ValueKind::Lambda(_))
            | (FrType::Dist | FrType::DistOrNumber, ValueKind::Dist(_))
            | (FrType::DistOrNumber, ValueKind::Number(_))
            | (FrType::Plot, ValueKind::Plot(_))
            | (FrType::Scale, ValueKind::Scale(_))
            | (FrType::Domain, ValueKind::Domain(_))
            | (FrType::Table, ValueKind::Table(_))
            | (FrType::Calculator, ValueKind::Calculator(_))
            | (FrType::Void, ValueKind::Void) => true,
            (FrType::Array(item), ValueKind::Array(items)) => items.iter().all(|v| item.matches(v)),
            (FrType::Dict(item), ValueKind::Dict(map)) => map.values().all(|v| item.matches(v)),
            (FrType::Tuple(types), ValueKind::Array(items)) => {
                types.len() == items.len() && types.iter().zip(items.iter()).all(|(t, v)| t.matches(v))
            }
            (FrType::Record(fields), ValueKind::Dict(map)) => {
                let known = map
                    .keys()
                    .all(|key| fields.iter().any(|field| field.key == &**key));
                known
                    && fields.iter().all(|field| match map.get(field.key) {
                        Some(v) => field.ty.matches(v),
                        None => field.optional,
                    })
            }
            (FrType::Or(left, right), _) => left.matches(value) || right.matches(value),
            _ => false,
        }
    }
}

impl fmt::Display for FrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrType::Any => write!(f, "any"),
            FrType::Number => write!(f, "Number"),
            FrType::String => write!(f, "String"),
            FrType::Bool => write!(f, "Bool"),
            FrType::Date => write!(f, "Date"),
            FrType::Duration => write!(f, "Duration"),
            FrType::Lambda => write!(f, "Function"),
            FrType::Dist => write!(f, "Dist"),
            FrType::DistOrNumber => write!(f, "Dist|Number"),
            FrType::Plot => write!(f, "Plot"),
            FrType::Scale => write!(f, "Scale"),
            FrType::Domain => write!(f, "Domain"),
            FrType::Table => write!(f, "Table"),
            FrType::Calculator => write!(f, "Calculator"),
            FrType::Void => write!(f, "Void"),
            FrType::Array(item) => write!(f, "List({item})"),
            FrType::Dict(item) => write!(f, "Dict({item})"),
            FrType::Tuple(types) => {
                write!(f, "[")?;
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{ty}")?;
                }
                write!(f, "]")
            }
            FrType::Record(fields) => {
                write!(f, "{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    let mark = if field.optional { "?" } else { "" };
                    write!(f, "{}{mark}: {}", field.key, field.ty)?;
                }
                write!(f, "}}")
            }
            FrType::Or(left, right) => write!(f, "{left}|{right}"),
        }
    }
}
