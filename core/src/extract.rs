//! Attribute extraction: from a caller's input object to a [`Snapshot`]
//!
//! The engine never inspects caller types. It asks an extraction capability,
//! exactly once per evaluation, for a snapshot of the attributes named by the
//! table [`Schema`]:
//!
//! - [`AttributeSource`]: implemented by the input type itself
//! - [`Extractor<I>`]: a separate capability for inputs you do not own
//!   (closures `Fn(&I, &Schema) -> Result<Snapshot, ExtractionError>` qualify)
//!
//! Missing attributes are simply left out of the snapshot; matchers treat
//! them as absent. Only an input that cannot be read at all is an error.

use crate::{ExtractionError, Schema, Value};
use std::collections::{BTreeMap, HashMap};

/// Attribute name → value, for one evaluation.
///
/// An attribute with no entry is absent ("no data"), not an error.
///
/// # Example
///
/// ```
/// use dtable::{Snapshot, Value};
///
/// let snapshot = Snapshot::new()
///     .with("requesterId", "u3")
///     .with("amount", 2.0);
///
/// assert_eq!(snapshot.get("amount"), Some(&Value::Float(2.0)));
/// assert_eq!(snapshot.get("isApproved"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    values: BTreeMap<String, Value>,
}

impl Snapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value (builder pattern).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Add a value if present (builder pattern).
    #[must_use]
    pub fn with_optional(self, name: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    /// Set a value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Get a value by attribute name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Number of present attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no attribute is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate present attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keep only the attributes named by `schema`.
    #[must_use]
    pub fn project(mut self, schema: &Schema) -> Self {
        self.values.retain(|name, _| schema.contains(name));
        self
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Snapshot {
    fn from_iter<It: IntoIterator<Item = (K, V)>>(iter: It) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// An input that knows how to expose its attributes.
///
/// # Example
///
/// ```
/// use dtable::{AttributeSource, ExtractionError, Schema, Snapshot};
///
/// struct Order { amount: f64, coupon: Option<String> }
///
/// impl AttributeSource for Order {
///     fn snapshot(&self, _schema: &Schema) -> Result<Snapshot, ExtractionError> {
///         Ok(Snapshot::new()
///             .with("amount", self.amount)
///             .with_optional("coupon", self.coupon.clone()))
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `AttributeSource`",
    label = "the decision table cannot read attributes from `{Self}`",
    note = "implement `AttributeSource` for your input, or pass an `Extractor` to `evaluate_with`"
)]
pub trait AttributeSource {
    /// Produce the attribute snapshot for `schema`.
    ///
    /// Leave absent attributes out. Return an error only when the input
    /// cannot be read as the schema expects.
    fn snapshot(&self, schema: &Schema) -> Result<Snapshot, ExtractionError>;
}

impl AttributeSource for Snapshot {
    fn snapshot(&self, _schema: &Schema) -> Result<Snapshot, ExtractionError> {
        Ok(self.clone())
    }
}

impl AttributeSource for HashMap<String, Value> {
    fn snapshot(&self, schema: &Schema) -> Result<Snapshot, ExtractionError> {
        Ok(schema
            .iter()
            .filter_map(|name| self.get(name).map(|v| (name, v.clone())))
            .collect())
    }
}

impl AttributeSource for BTreeMap<String, Value> {
    fn snapshot(&self, schema: &Schema) -> Result<Snapshot, ExtractionError> {
        Ok(schema
            .iter()
            .filter_map(|name| self.get(name).map(|v| (name, v.clone())))
            .collect())
    }
}

impl<S: AttributeSource + ?Sized> AttributeSource for &S {
    fn snapshot(&self, schema: &Schema) -> Result<Snapshot, ExtractionError> {
        (**self).snapshot(schema)
    }
}

/// JSON objects: `null` is absent, scalars convert, arrays and nested
/// objects are not attribute values.
#[cfg(feature = "config")]
impl AttributeSource for serde_json::Value {
    fn snapshot(&self, schema: &Schema) -> Result<Snapshot, ExtractionError> {
        let object = self.as_object().ok_or(ExtractionError::NotAnObject {
            found: json_kind(self),
        })?;

        let mut snapshot = Snapshot::new();
        for name in schema.iter() {
            let Some(raw) = object.get(name) else {
                continue;
            };
            let value = match raw {
                serde_json::Value::Null => continue,
                serde_json::Value::Bool(b) => Value::Bool(*b),
                serde_json::Value::Number(n) => match n.as_i64() {
                    Some(i) => Value::Int(i),
                    None => n.as_f64()
                        .map_or_else(|| Value::Str(n.to_string()), Value::Float),
                },
                serde_json::Value::String(s) => Value::Str(s.clone()),
                other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                    return Err(ExtractionError::Incompatible {
                        attribute: name.to_string(),
                        found: json_kind(other),
                    });
                }
            };
            snapshot.insert(name, value);
        }
        Ok(snapshot)
    }
}

#[cfg(feature = "config")]
fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// A caller-supplied capability that reads attributes out of `I`.
///
/// Use this when the input type is foreign or when one input type feeds
/// tables with different schemas.
pub trait Extractor<I: ?Sized> {
    /// Produce the attribute snapshot of `input` for `schema`.
    fn extract(&self, input: &I, schema: &Schema) -> Result<Snapshot, ExtractionError>;
}

impl<I: ?Sized, F> Extractor<I> for F
where
    F: Fn(&I, &Schema) -> Result<Snapshot, ExtractionError>,
{
    fn extract(&self, input: &I, schema: &Schema) -> Result<Snapshot, ExtractionError> {
        self(input, schema)
    }
}
