//! The runtime value union.
//!
//! A [`Value`] is a [`ValueKind`] plus optional [`ValueTags`]. Tags never
//! influence evaluation or equality; they are presentation metadata that
//! travels with the value (`@name`, `@doc`, `Tag.format`, ...).
//!
//! Every variant is cheap to clone: scalars are copied, everything else is
//! behind an `Arc` or a persistent map.

mod descriptors;
mod tags;
mod time;

use std::fmt;
use std::sync::Arc;

pub use descriptors::{
    Calculator, CalculatorInput, Domain, LabeledDistribution, Plot, PlotKind, Scale, ScaleKind,
    Table, TableColumn,
};
pub use tags::ValueTags;
pub use time::{SDate, SDuration};

use crate::{DistHandle, ErrorMessage, Lambda};

/// Dict contents, ordered by key.
pub type ValueMap = im::OrdMap<Arc<str>, Value>;

#[derive(Clone)]
pub enum ValueKind {
    Number(f64),
    String(Arc<str>),
    Bool(bool),
    Date(SDate),
    Duration(SDuration),
    Array(Arc<Vec<Value>>),
    Dict(ValueMap),
    Lambda(Lambda),
    Dist(DistHandle),
    Plot(Arc<Plot>),
    Table(Arc<Table>),
    Calculator(Arc<Calculator>),
    Domain(Domain),
    Scale(Arc<Scale>),
    Void,
}

#[derive(Clone)]
pub struct Value {
    kind: ValueKind,
    tags: Option<Arc<ValueTags>>,
}

impl Value {
    pub fn new(kind: ValueKind) -> Self {
        Value { kind, tags: None }
    }

    #[inline]
    pub fn number(n: f64) -> Self {
        Value::new(ValueKind::Number(n))
    }

    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::new(ValueKind::String(s.into()))
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::new(ValueKind::Bool(b))
    }

    pub fn date(date: SDate) -> Self {
        Value::new(ValueKind::Date(date))
    }

    pub fn duration(duration: SDuration) -> Self {
        Value::new(ValueKind::Duration(duration))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::new(ValueKind::Array(Arc::new(items)))
    }

    pub fn dict(map: ValueMap) -> Self {
        Value::new(ValueKind::Dict(map))
    }

    /// Dict from `(key, value)` pairs; later duplicates win.
    pub fn record<K: Into<Arc<str>>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::dict(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn lambda(lambda: Lambda) -> Self {
        Value::new(ValueKind::Lambda(lambda))
    }

    pub fn dist(dist: DistHandle) -> Self {
        Value::new(ValueKind::Dist(dist))
    }

    pub fn plot(plot: Plot) -> Self {
        Value::new(ValueKind::Plot(Arc::new(plot)))
    }

    pub fn table(table: Table) -> Self {
        Value::new(ValueKind::Table(Arc::new(table)))
    }

    pub fn calculator(calculator: Calculator) -> Self {
        Value::new(ValueKind::Calculator(Arc::new(calculator)))
    }

    pub fn domain(domain: Domain) -> Self {
        Value::new(ValueKind::Domain(domain))
    }

    pub fn scale(scale: Scale) -> Self {
        Value::new(ValueKind::Scale(Arc::new(scale)))
    }

    #[inline]
    pub fn void() -> Self {
        Value::new(ValueKind::Void)
    }

    #[inline]
    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn tags(&self) -> Option<&ValueTags> {
        self.tags.as_deref()
    }

    /// Same value with `tags` merged over any existing ones.
    #[must_use]
    pub fn with_tags(&self, tags: &ValueTags) -> Value {
        let merged = match &self.tags {
            Some(existing) => existing.merge(tags),
            None => tags.clone(),
        };
        Value {
            kind: self.kind.clone(),
            tags: (!merged.is_empty()).then(|| Arc::new(merged)),
        }
    }

    #[must_use]
    pub fn without_tags(&self) -> Value {
        Value::new(self.kind.clone())
    }

    /// User-facing type name, as used in messages and `typeOf`.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ValueKind::Number(_) => "Number",
            ValueKind::String(_) => "String",
            ValueKind::Bool(_) => "Bool",
            ValueKind::Date(_) => "Date",
            ValueKind::Duration(_) => "Duration",
            ValueKind::Array(_) => "List",
            ValueKind::Dict(_) => "Dict",
            ValueKind::Lambda(_) => "Lambda",
            ValueKind::Dist(_) => "Distribution",
            ValueKind::Plot(_) => "Plot",
            ValueKind::Table(_) => "Table",
            ValueKind::Calculator(_) => "Calculator",
            ValueKind::Domain(_) => "Domain",
            ValueKind::Scale(_) => "Scale",
            ValueKind::Void => "Void",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.kind {
            ValueKind::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::String(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            ValueKind::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<SDate> {
        match self.kind {
            ValueKind::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<SDuration> {
        match self.kind {
            ValueKind::Duration(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match &self.kind {
            ValueKind::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&ValueMap> {
        match &self.kind {
            ValueKind::Dict(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_lambda(&self) -> Option<&Lambda> {
        match &self.kind {
            ValueKind::Lambda(lambda) => Some(lambda),
            _ => None,
        }
    }

    pub fn as_dist(&self) -> Option<&DistHandle> {
        match &self.kind {
            ValueKind::Dist(dist) => Some(dist),
            _ => None,
        }
    }

    pub fn as_scale(&self) -> Option<&Scale> {
        match &self.kind {
            ValueKind::Scale(scale) => Some(&**scale),
            _ => None,
        }
    }

    pub fn as_domain(&self) -> Option<&Domain> {
        match &self.kind {
            ValueKind::Domain(domain) => Some(domain),
            _ => None,
        }
    }

    /// Structural equality. Variants without a meaningful equality
    /// (functions, distributions, plots, tables, calculators) are an error,
    /// never a silent `false`.
    pub fn is_equal(&self, other: &Value) -> Result<bool, ErrorMessage> {
        use ValueKind as K;

        match (&self.kind, &other.kind) {
            (K::Number(a), K::Number(b)) => Ok(a == b),
            (K::String(a), K::String(b)) => Ok(a == b),
            (K::Bool(a), K::Bool(b)) => Ok(a == b),
            (K::Date(a), K::Date(b)) => Ok(a == b),
            (K::Duration(a), K::Duration(b)) => Ok(a == b),
            (K::Domain(a), K::Domain(b)) => Ok(a == b),
            (K::Scale(a), K::Scale(b)) => Ok(a == b),
            (K::Void, K::Void) => Ok(true),
            (K::Array(a), K::Array(b)) => {
                if a.len() != b.len() {
                    return Ok(false);
                }
                for (x, y) in a.iter().zip(b.iter()) {
                    if !x.is_equal(y)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (K::Dict(a), K::Dict(b)) => {
                if a.len() != b.len() {
                    return Ok(false);
                }
                for (key, x) in a {
                    let Some(y) = b.get(key) else {
                        return Ok(false);
                    };
                    if !x.is_equal(y)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (K::Lambda(_) | K::Dist(_) | K::Plot(_) | K::Table(_) | K::Calculator(_), _) => {
                Err(self.no_equality())
            }
            (_, K::Lambda(_) | K::Dist(_) | K::Plot(_) | K::Table(_) | K::Calculator(_)) => {
                Err(other.no_equality())
            }
            _ => Ok(false),
        }
    }

    fn no_equality(&self) -> ErrorMessage {
        ErrorMessage::other(format!("Equality is not defined for {}", self.type_name()))
    }
}

/// Number formatting shared by every rendering: integers print without a
/// fraction, non-finite values print as words.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let word = if n > 0.0 { "Infinity" } else { "-Infinity" };
        word.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValueKind::Number(n) => write!(f, "{}", format_number(*n)),
            ValueKind::String(s) => write!(f, "'{s}'"),
            ValueKind::Bool(b) => write!(f, "{b}"),
            ValueKind::Date(d) => write!(f, "{d}"),
            ValueKind::Duration(d) => write!(f, "{d}"),
            ValueKind::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            ValueKind::Dict(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            ValueKind::Lambda(lambda) => write!(f, "{lambda}"),
            ValueKind::Dist(dist) => write!(f, "{dist}"),
            ValueKind::Plot(plot) => write!(f, "{plot}"),
            ValueKind::Table(table) => write!(f, "{table}"),
            ValueKind::Calculator(calculator) => write!(f, "{calculator}"),
            ValueKind::Domain(domain) => write!(f, "{domain}"),
            ValueKind::Scale(scale) => write!(f, "{scale}"),
            ValueKind::Void => write!(f, "()"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tags() {
            Some(tags) => write!(f, "{self} {tags:?}"),
            None => write!(f, "{self}"),
        }
    }
}

#[cfg(test)]
mod tests;
