//! Matcher: Total predicate over one attribute value
//!
//! A `Matcher` is a closed set of variants dispatched by exhaustive `match`,
//! so [`test`](Matcher::test) and [`describe`](Matcher::describe) are
//! compiler-checked for every kind.
//!
//! # INV: Absent → false
//!
//! Every variant except [`Any`](Matcher::Any) and [`Not`](Matcher::Not)
//! evaluates to `false` when the attribute has no value. `Not` inverts its
//! inner result without special-casing absence.

use crate::{TableError, Value, MAX_REGEX_PATTERN_LENGTH};
use std::fmt;
use std::sync::Arc;

/// A predicate over a single attribute value, plus a stable description.
///
/// # Type Parameters
///
/// - `T`: The attribute value type. Decision tables use [`Value`]; any
///   `PartialOrd` type works for standalone matchers. Pairs that are not
///   comparable never satisfy an ordering matcher.
///
/// # Example
///
/// ```
/// use dtable::Matcher;
///
/// let m: Matcher<i64> = Matcher::gt(10);
/// assert!(m.test(Some(&11)));
/// assert!(!m.test(Some(&10)));
/// assert!(!m.test(None));
/// assert_eq!(m.describe(), "> 10");
/// ```
#[derive(Debug, Clone)]
pub enum Matcher<T> {
    /// Always matches, including absent values.
    Any,

    /// Value is present and contained in the set.
    ///
    /// Elements keep insertion order; that order is the rendering order in
    /// [`describe`](Matcher::describe). [`Matcher::one_of`] drops duplicates.
    In(Vec<T>),

    /// Value is present and greater than the target.
    Gt(T),

    /// Value is present and greater than or equal to the target.
    Ge(T),

    /// Value is present and less than the target.
    Lt(T),

    /// Value is present and less than or equal to the target.
    Le(T),

    /// Value is present and equal to the target.
    Eq(T),

    /// Value is present, whatever it is.
    IsSet,

    /// Value is present and satisfies a caller-supplied predicate.
    Test(TestFn<T>),

    /// Inverts the inner matcher.
    Not(Box<Matcher<T>>),
}

/// A labeled predicate carried by [`Matcher::Test`].
///
/// The label is what [`Matcher::describe`] prints, since a closure has no
/// textual form of its own.
pub struct TestFn<T> {
    label: String,
    predicate: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> TestFn<T> {
    /// Label used when none is given.
    pub const DEFAULT_LABEL: &'static str = "test";

    /// Wrap a predicate with a label.
    pub fn new(label: impl Into<String>, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the predicate.
    pub fn call(&self, value: &T) -> bool {
        (self.predicate)(value)
    }
}

impl<T> Clone for TestFn<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T> fmt::Debug for TestFn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TestFn").field(&self.label).finish()
    }
}

impl<T> Matcher<T> {
    /// Matches everything.
    #[must_use]
    pub fn any() -> Self {
        Self::Any
    }

    /// Matches present values.
    #[must_use]
    pub fn is_set() -> Self {
        Self::IsSet
    }

    /// Matches values greater than `target`.
    pub fn gt(target: impl Into<T>) -> Self {
        Self::Gt(target.into())
    }

    /// Matches values greater than or equal to `target`.
    pub fn ge(target: impl Into<T>) -> Self {
        Self::Ge(target.into())
    }

    /// Matches values less than `target`.
    pub fn lt(target: impl Into<T>) -> Self {
        Self::Lt(target.into())
    }

    /// Matches values less than or equal to `target`.
    pub fn le(target: impl Into<T>) -> Self {
        Self::Le(target.into())
    }

    /// Matches values equal to `target`.
    pub fn eq(target: impl Into<T>) -> Self {
        Self::Eq(target.into())
    }

    /// Matches values for which `predicate` returns `true`.
    ///
    /// Described as `test`.
    pub fn predicate(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self::Test(TestFn::new(TestFn::<T>::DEFAULT_LABEL, predicate))
    }

    /// Like [`predicate`](Self::predicate), described by `label` instead.
    pub fn labeled(
        label: impl Into<String>,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::Test(TestFn::new(label, predicate))
    }

    /// Inverts `inner`. Equivalent to `!inner`.
    #[must_use]
    pub fn negate(inner: Self) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Nesting depth: 1 for a leaf, plus one per `Not` wrapper.
    ///
    /// Validated against [`MAX_DEPTH`](crate::MAX_DEPTH) when a table is built.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Not(inner) => 1 + inner.depth(),
            _ => 1,
        }
    }

    /// Returns `true` if this is the `Any` variant.
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl<T: PartialEq> Matcher<T> {
    /// Matches values contained in `items`.
    ///
    /// Insertion order is kept; later duplicates are dropped.
    ///
    /// ```
    /// use dtable::Matcher;
    ///
    /// let m: Matcher<String> = Matcher::one_of(["u2", "u1", "u2"]);
    /// assert_eq!(m.describe(), "in( u2, u1 )");
    /// ```
    pub fn one_of<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        let mut set: Vec<T> = Vec::new();
        for item in items {
            let item = item.into();
            if !set.contains(&item) {
                set.push(item);
            }
        }
        Self::In(set)
    }
}

impl<T: PartialOrd> Matcher<T> {
    /// Evaluate against an optional value. Total: never panics.
    ///
    /// # Returns
    ///
    /// - `Any` → `true`, `IsSet` → whether a value is present
    /// - every other leaf → `false` when the value is absent
    /// - `Not` → the inverse of the inner result
    pub fn test(&self, value: Option<&T>) -> bool {
        match self {
            Self::Any => true,
            Self::In(set) => value.is_some_and(|v| set.iter().any(|e| e == v)),
            Self::Gt(target) => value.is_some_and(|v| v > target),
            Self::Ge(target) => value.is_some_and(|v| v >= target),
            Self::Lt(target) => value.is_some_and(|v| v < target),
            Self::Le(target) => value.is_some_and(|v| v <= target),
            Self::Eq(target) => value.is_some_and(|v| v == target),
            Self::IsSet => value.is_some(),
            Self::Test(f) => value.is_some_and(|v| f.call(v)),
            Self::Not(inner) => !inner.test(value),
        }
    }
}

impl<T: fmt::Display> Matcher<T> {
    /// Stable textual description, used in diagnosis reports.
    ///
    /// ```
    /// use dtable::{Matcher, Value};
    ///
    /// let m: Matcher<Value> = !Matcher::eq("Samba");
    /// assert_eq!(m.describe(), "not = Samba");
    /// ```
    #[must_use]
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl<T: fmt::Display> fmt::Display for Matcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("-"),
            Self::In(set) => {
                f.write_str("in( ")?;
                for (i, item) in set.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(" )")
            }
            Self::Gt(target) => write!(f, "> {target}"),
            Self::Ge(target) => write!(f, ">= {target}"),
            Self::Lt(target) => write!(f, "< {target}"),
            Self::Le(target) => write!(f, "<= {target}"),
            Self::Eq(target) => write!(f, "= {target}"),
            Self::IsSet => f.write_str("isSet"),
            Self::Test(t) => f.write_str(t.label()),
            Self::Not(inner) => write!(f, "not {inner}"),
        }
    }
}

impl<T> std::ops::Not for Matcher<T> {
    type Output = Self;

    fn not(self) -> Self {
        Self::negate(self)
    }
}

impl Matcher<Value> {
    /// Matches string values against a regular expression.
    ///
    /// Uses the `regex` crate (linear time, no backtracking). Non-string
    /// values never match. Described as `matches /pattern/`.
    ///
    /// # Errors
    ///
    /// - [`TableError::PatternTooLong`] if the pattern exceeds
    ///   [`MAX_REGEX_PATTERN_LENGTH`]
    /// - [`TableError::InvalidPattern`] if the pattern does not compile
    pub fn matches_regex(pattern: &str) -> Result<Self, TableError> {
        if pattern.len() > MAX_REGEX_PATTERN_LENGTH {
            return Err(TableError::PatternTooLong {
                len: pattern.len(),
                max: MAX_REGEX_PATTERN_LENGTH,
            });
        }
        let re = regex::Regex::new(pattern).map_err(|e| TableError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::labeled(format!("matches /{pattern}/"), move |v: &Value| {
            v.as_str().is_some_and(|s| re.is_match(s))
        }))
    }
}
