//! dtable-test: Test domain for conformance testing
//!
//! Provides a simple string-keyed input and an [`AttributeSource`]
//! implementation for it. Values are inferred from their text the same way
//! the `dtable` CLI reads `--input k=v` pairs.
//!
//! # Example
//!
//! ```
//! use dtable_test::prelude::*;
//!
//! let input = TestInput::new()
//!     .with("requesterId", "u3")
//!     .with("amount", "2.0");
//!
//! let schema = Schema::new(["requesterId", "amount"]).unwrap();
//! let snapshot = input.snapshot(&schema).unwrap();
//! assert_eq!(snapshot.get("amount"), Some(&Value::Float(2.0)));
//! ```

use dtable::prelude::*;
use std::collections::HashMap;

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Test input: a simple string-to-string map.
///
/// Used for conformance testing where we need predictable,
/// controllable input data.
#[derive(Debug, Clone, Default)]
pub struct TestInput {
    values: HashMap<String, String>,
}

impl TestInput {
    /// Create an empty test input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key-value pair (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Get a raw value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TestInput {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Schema attributes are read by key; text is inferred with [`Value::infer`].
impl AttributeSource for TestInput {
    fn snapshot(&self, schema: &Schema) -> Result<Snapshot, ExtractionError> {
        Ok(schema
            .iter()
            .filter_map(|name| self.get(name).map(|raw| (name, Value::infer(raw))))
            .collect())
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::TestInput;
    pub use dtable::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_infers_kinds() {
        let input: TestInput = [("flag", "true"), ("n", "3"), ("x", "1.5"), ("id", "u1")]
            .into_iter()
            .collect();
        let schema = Schema::new(["flag", "n", "x", "id", "missing"]).unwrap();
        let snapshot = input.snapshot(&schema).unwrap();
        assert_eq!(snapshot.get("flag"), Some(&Value::Bool(true)));
        assert_eq!(snapshot.get("n"), Some(&Value::Int(3)));
        assert_eq!(snapshot.get("x"), Some(&Value::Float(1.5)));
        assert_eq!(snapshot.get("id"), Some(&Value::from("u1")));
        assert!(snapshot.get("missing").is_none());
    }

    #[test]
    fn test_input_ignores_unknown_keys() {
        let input = TestInput::new().with("a", "1").with("other", "2");
        let snapshot = input.snapshot(&Schema::new(["a"]).unwrap()).unwrap();
        assert_eq!(snapshot.len(), 1);
    }
}
