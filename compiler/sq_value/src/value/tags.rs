use std::sync::Arc;

use sq_ir::LocationRange;

use crate::Value;

/// Presentation metadata attached to a value.
///
/// Every field is optional; merging keeps the newer value of each field
/// that is set.
#[derive(Clone, Debug, Default)]
pub struct ValueTags {
    pub name: Option<Arc<str>>,
    pub doc: Option<Arc<str>>,
    /// Alternate value to display instead of this one.
    pub show_as: Option<Value>,
    pub number_format: Option<Arc<str>>,
    pub date_format: Option<Arc<str>>,
    pub hidden: Option<bool>,
    pub location: Option<LocationRange>,
}

impl ValueTags {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.doc.is_none()
            && self.show_as.is_none()
            && self.number_format.is_none()
            && self.date_format.is_none()
            && self.hidden.is_none()
            && self.location.is_none()
    }

    #[must_use]
    pub fn merge(&self, newer: &ValueTags) -> ValueTags {
        ValueTags {
            name: newer.name.clone().or_else(|| self.name.clone()),
            doc: newer.doc.clone().or_else(|| self.doc.clone()),
            show_as: newer.show_as.clone().or_else(|| self.show_as.clone()),
            number_format: newer
                .number_format
                .clone()
                .or_else(|| self.number_format.clone()),
            date_format: newer
                .date_format
                .clone()
                .or_else(|| self.date_format.clone()),
            hidden: newer.hidden.or(self.hidden),
            location: newer.location.clone().or_else(|| self.location.clone()),
        }
    }

    /// The set fields as a dict, keyed by their Squiggle names.
    pub fn to_value(&self) -> Value {
        let mut entries: Vec<(&str, Value)> = Vec::new();
        if let Some(name) = &self.name {
            entries.push(("name", Value::string(Arc::clone(name))));
        }
        if let Some(doc) = &self.doc {
            entries.push(("doc", Value::string(Arc::clone(doc))));
        }
        if let Some(show_as) = &self.show_as {
            entries.push(("showAs", show_as.clone()));
        }
        if let Some(format) = &self.number_format {
            entries.push(("numberFormat", Value::string(Arc::clone(format))));
        }
        if let Some(format) = &self.date_format {
            entries.push(("dateFormat", Value::string(Arc::clone(format))));
        }
        if let Some(hidden) = self.hidden {
            entries.push(("hidden", Value::bool(hidden)));
        }
        if let Some(location) = &self.location {
            entries.push(("location", Value::string(location.to_string())));
        }
        Value::record(entries)
    }
}
