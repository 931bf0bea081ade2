//! Persistent scopes.
//!
//! ```text
//!   Bindings ──parent──▶ Bindings ──parent──▶ Bindings (stdlib + linked)
//!      │                    │                    │
//!   Namespace            Namespace            Namespace
//! ```
//!
//! A [`Namespace`] is an `im::OrdMap`, so `set` copies only the path to the
//! changed key. [`Bindings`] chains namespaces for lexical scoping: lookups
//! walk outwards, writes only ever produce a new innermost namespace.
//! Nothing here is mutated in place, which is what lets a closure keep the
//! exact scope it was created in while evaluation continues.

use std::fmt;
use std::sync::Arc;

use crate::{Value, ValueMap};

/// Immutable name → value map.
#[derive(Clone, Default)]
pub struct Namespace(ValueMap);

impl Namespace {
    pub fn new() -> Self {
        Namespace::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn set(&self, name: impl Into<Arc<str>>, value: Value) -> Namespace {
        Namespace(self.0.update(name.into(), value))
    }

    #[must_use]
    pub fn remove(&self, name: &str) -> Namespace {
        Namespace(self.0.without(name))
    }

    /// Union of both; on collision `other` wins.
    #[must_use]
    pub fn merge(&self, other: &Namespace) -> Namespace {
        // not `union`, which keeps the larger map's value on collisions
        Namespace(
            other
                .0
                .iter()
                .fold(self.0.clone(), |merged, (name, value)| {
                    merged.update(Arc::clone(name), value.clone())
                }),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &Value)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Arc<str>> {
        self.0.keys()
    }

    /// The namespace as a dict value.
    pub fn to_value(&self) -> Value {
        Value::dict(self.0.clone())
    }

    pub fn as_map(&self) -> &ValueMap {
        &self.0
    }
}

impl From<ValueMap> for Namespace {
    fn from(map: ValueMap) -> Self {
        Namespace(map)
    }
}

impl FromIterator<(Arc<str>, Value)> for Namespace {
    fn from_iter<I: IntoIterator<Item = (Arc<str>, Value)>>(iter: I) -> Self {
        Namespace(iter.into_iter().collect())
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Namespace{self}")
    }
}

/// Renders like a dict: `{a: 1, b: 'x'}`.
impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}

/// One lexical scope plus the scopes that enclose it.
#[derive(Clone, Default)]
pub struct Bindings {
    namespace: Namespace,
    parent: Option<Arc<Bindings>>,
}

impl Bindings {
    pub fn new() -> Self {
        Bindings::default()
    }

    /// Root scope holding `namespace`.
    pub fn from_namespace(namespace: Namespace) -> Self {
        Bindings {
            namespace,
            parent: None,
        }
    }

    /// Innermost value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let mut scope = self;
        loop {
            if let Some(value) = scope.namespace.get(name) {
                return Some(value);
            }
            scope = scope.parent.as_deref()?;
        }
    }

    /// Bind `name` in the innermost scope. Enclosing scopes are shared, not
    /// copied, and never modified.
    #[must_use]
    pub fn set(&self, name: impl Into<Arc<str>>, value: Value) -> Bindings {
        Bindings {
            namespace: self.namespace.set(name, value),
            parent: self.parent.clone(),
        }
    }

    /// Push an empty scope on top of this one.
    #[must_use]
    pub fn extend(&self) -> Bindings {
        Bindings {
            namespace: Namespace::new(),
            parent: Some(Arc::new(self.clone())),
        }
    }

    /// Bindings of the innermost scope only.
    pub fn locals(&self) -> &Namespace {
        &self.namespace
    }

    pub fn parent(&self) -> Option<&Bindings> {
        self.parent.as_deref()
    }

    /// Number of scopes in the chain.
    pub fn depth(&self) -> usize {
        1 + self.parent.as_ref().map_or(0, |parent| parent.depth())
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings")
            .field("locals", &self.namespace)
            .field("depth", &self.depth())
            .finish()
    }
}
