//! `Value`: Type-erased attribute data that flows between extraction and matching
//!
//! A decision table mixes attribute kinds (a requester id, an amount, a flag),
//! so matchers inside a table operate on one erased type. Extraction produces
//! `Value`s, [`Matcher<Value>`](crate::Matcher) consumes them.
//!
//! # Comparison rules
//!
//! - Values of the same kind compare naturally.
//! - `Int` and `Float` compare numerically with each other.
//! - Any other cross-kind pair is neither equal nor ordered, so an ordering
//!   or equality matcher over it evaluates to `false`.
//! - Floats use IEEE 754 total order (`NaN` equals itself, `-0.0 < 0.0`).

use std::cmp::Ordering;
use std::fmt;

/// The erased data type of a single attribute.
///
/// # Example
///
/// ```
/// use dtable::Value;
///
/// let amount = Value::from(2.0);
/// assert!(amount > Value::from(1));
/// assert_eq!(amount.to_string(), "2.0");
/// assert!(Value::from("u1").partial_cmp(&Value::from(1)).is_none());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum Value {
    /// Boolean flag.
    Bool(bool),

    /// Signed integer.
    Int(i64),

    /// Floating-point number.
    Float(f64),

    /// String data, such as identifiers or codes.
    Str(String),
}

impl Value {
    /// Infer a value from its textual form.
    ///
    /// `true`/`false` become [`Value::Bool`], integers become [`Value::Int`],
    /// other numbers become [`Value::Float`], anything else stays a string.
    ///
    /// ```
    /// use dtable::Value;
    ///
    /// assert_eq!(Value::infer("true"), Value::Bool(true));
    /// assert_eq!(Value::infer("42"), Value::Int(42));
    /// assert_eq!(Value::infer("2.5"), Value::Float(2.5));
    /// assert_eq!(Value::infer("u3"), Value::Str("u3".into()));
    /// ```
    #[must_use]
    pub fn infer(text: &str) -> Self {
        match text {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        if let Ok(i) = text.parse::<i64>() {
            return Self::Int(i);
        }
        match text.parse::<f64>() {
            // "inf"/"NaN" parse as floats but are almost always meant as text
            Ok(f) if f.is_finite() => Self::Float(f),
            _ => Self::Str(text.to_string()),
        }
    }

    /// Returns a string describing the kind of this value.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }

    /// Try to get the value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get the value as an integer.
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get the value as a float. Integers are widened.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get the value as a boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Value {
    #[allow(clippy::cast_precision_loss)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => Some(a.total_cmp(b)),
            (Self::Int(a), Self::Float(b)) => Some(cmp_int_float(*a, *b)),
            (Self::Float(a), Self::Int(b)) => Some(cmp_int_float(*b, *a).reverse()),
            (Self::Str(a), Self::Str(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Exact ordering of an integer against a float.
///
/// Casting the integer to `f64` rounds above 2^53, which would make
/// `Int(2^53 + 1) == Float(2^53)` while `Int(2^53 + 1) != Int(2^53)`.
/// NaN keeps its `total_cmp` position.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    // 2^63, exactly representable
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return (i as f64).total_cmp(&f);
    }
    if f >= LIMIT {
        return Ordering::Less;
    }
    if f < -LIMIT {
        return Ordering::Greater;
    }

    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal if f > whole => Ordering::Less,
        Ordering::Equal if f < whole => Ordering::Greater,
        ord => ord,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            // Debug keeps the fractional part: 1.0 renders as "1.0", not "1"
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
