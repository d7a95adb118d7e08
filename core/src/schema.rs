//! `Schema`: The ordered attribute names of a decision table

use crate::TableError;
use std::fmt;

/// Ordered, unique attribute names shared by every rule of a table.
///
/// Position `i` in the schema is the attribute tested by matcher `i` of
/// every rule.
///
/// # Example
///
/// ```
/// use dtable::Schema;
///
/// let schema = Schema::new(["requesterId", "amount"]).unwrap();
/// assert_eq!(schema.position("amount"), Some(1));
/// assert!(Schema::new(["a", "a"]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    attributes: Vec<String>,
}

impl Schema {
    /// Create a schema.
    ///
    /// # Errors
    ///
    /// - [`TableError::EmptyAttributeName`] if a name is empty
    /// - [`TableError::DuplicateAttribute`] if a name appears twice
    pub fn new<I>(attributes: I) -> Result<Self, TableError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut seen: Vec<String> = Vec::new();
        for (position, name) in attributes.into_iter().enumerate() {
            let name = name.into();
            if name.is_empty() {
                return Err(TableError::EmptyAttributeName { position });
            }
            if seen.contains(&name) {
                return Err(TableError::DuplicateAttribute { name });
            }
            seen.push(name);
        }
        Ok(Self { attributes: seen })
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if the schema has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate attribute names in schema order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(String::as_str)
    }

    /// Attribute names in schema order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.attributes
    }

    /// Position of `name`, if it belongs to the schema.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a == name)
    }

    /// Returns `true` if `name` belongs to the schema.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.attributes.join(", "))
    }
}
