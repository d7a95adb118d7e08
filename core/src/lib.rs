//! dtable - Decision-table evaluation engine
//!
//! A decision table is an ordered list of rules over a fixed, ordered list of
//! input attributes. Each rule holds one matcher per attribute and an output.
//! Evaluation tests every rule against an input, resolves the matches under a
//! hit policy, and returns the outcome together with a full diagnosis.
//!
//! # Architecture
//!
//! - [`Value`]: Erased attribute data (bool, int, float, string)
//! - [`Matcher<T>`]: Closed set of single-value predicates with descriptions
//! - [`Schema`]: Ordered, unique attribute names
//! - [`AttributeSource`] / [`Extractor`]: Turn an input into a [`Snapshot`]
//! - [`MatchingRule<O>`]: One matcher per attribute plus an output
//! - [`DecisionTable<O>`]: Immutable rules sharing a schema
//! - [`EvaluationPolicy`]: First, Unique or Collect
//! - [`DecisionResult<O>`] / [`Diagnosis`]: Outcome plus evaluation record
//!
//! # Key Design Insights
//!
//! 1. **Absent → false**: A missing attribute fails every matcher except `Any`
//!    (and whatever a `Not` makes of its inner result).
//!
//! 2. **Kind mismatch → false**: Comparing a string to a number is a
//!    non-match, never an error. Only extraction can fail at evaluation time.
//!
//! 3. **Eager tracing**: Every rule is traced on every evaluation, so the
//!    diagnosis is complete under every policy.
//!
//! # Example
//!
//! ```
//! use dtable::prelude::*;
//!
//! let table = DecisionTable::builder(["requesterId", "isDateSet", "amount", "isApproved"])
//!     .rule(
//!         [Matcher::one_of(["u1", "u2"]), Matcher::IsSet, Matcher::gt(0.0), Matcher::Any],
//!         false,
//!     )
//!     .rule([Matcher::Any, Matcher::Any, Matcher::gt(1.0), Matcher::Any], true)
//!     .build()
//!     .unwrap();
//!
//! let input = Snapshot::new()
//!     .with("requesterId", "u3")
//!     .with("isDateSet", true)
//!     .with("amount", 2.0)
//!     .with("isApproved", "true");
//!
//! let result = table.evaluate(&input, EvaluationPolicy::First).unwrap();
//! assert_eq!(result.output(), Some(&true));
//! println!("{}", table.explain(&result));
//! ```
//!
//! # Features
//!
//! - `config`: serde loading of tables from JSON/YAML ([`TableConfig`]) and
//!   `serde_json::Value` inputs

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod diagnosis;
mod extract;
mod matcher;
mod policy;
mod rule;
mod schema;
mod table;
mod trace;
mod value;

#[cfg(feature = "config")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use extract::{AttributeSource, Extractor, Snapshot};
pub use matcher::{Matcher, TestFn};
pub use policy::{EvaluationPolicy, ParsePolicyError};
pub use rule::MatchingRule;
pub use schema::Schema;
pub use table::{DecisionTable, TableBuilder};
pub use value::Value;

// Trace types
pub use trace::{DecisionResult, Diagnosis, RuleTrace};

// Diagnosis rendering
pub use diagnosis::{diagnose, summarize_list, summarize_optional};

// Config (feature-gated)
#[cfg(feature = "config")]
pub use config::{MatcherConfig, RuleConfig, TableConfig};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use dtable::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Extraction
        AttributeSource,
        // Core types
        DecisionTable,
        Extractor,
        Matcher,
        MatchingRule,
        Schema,
        Snapshot,
        TableBuilder,
        Value,
        // Evaluation
        DecisionResult,
        Diagnosis,
        EvaluationPolicy,
        RuleTrace,
        // Errors
        DecisionError,
        ExtractionError,
        TableError,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum allowed depth of a single matcher.
///
/// Each `Not` adds one level. Checked by [`TableBuilder::build`], which keeps
/// evaluation recursion bounded.
pub const MAX_DEPTH: usize = 32;

/// Maximum length for regex patterns passed to [`Matcher::matches_regex`].
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from table construction.
///
/// Raised by [`TableBuilder::build`] and config loading, never by evaluation.
/// Fix the rules and rebuild the table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A rule does not line up with the schema.
    #[error(
        "rule {rule} has {found} matchers for {expected} attributes{}",
        misplaced(.attribute)
    )]
    ShapeMismatch {
        /// Index of the offending rule.
        rule: usize,
        /// Number of schema attributes.
        expected: usize,
        /// Number of matchers the rule supplied.
        found: usize,
        /// Schema attribute at the first position that does not line up,
        /// when the rule named its attributes.
        attribute: Option<String>,
    },

    /// An attribute name appears twice in the schema.
    #[error("attribute \"{name}\" appears more than once in the schema")]
    DuplicateAttribute {
        /// The repeated name.
        name: String,
    },

    /// An attribute name is empty.
    #[error("attribute at position {position} has an empty name")]
    EmptyAttributeName {
        /// Position in the schema.
        position: usize,
    },

    /// A matcher nests deeper than [`MAX_DEPTH`].
    #[error(
        "matcher for \"{attribute}\" in rule {rule} has depth {depth}, but maximum allowed is {max}"
    )]
    DepthExceeded {
        /// Index of the offending rule.
        rule: usize,
        /// Attribute the matcher tests.
        attribute: String,
        /// Actual depth.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },

    /// A regex pattern failed to compile.
    #[error("invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The compiler's message.
        reason: String,
    },

    /// A regex pattern exceeds [`MAX_REGEX_PATTERN_LENGTH`].
    #[error("pattern length is {len}, but maximum allowed is {max}")]
    PatternTooLong {
        /// Actual length of the pattern.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// A table config is malformed.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// What is wrong with it.
        reason: String,
    },
}

fn misplaced(attribute: &Option<String>) -> String {
    attribute
        .as_ref()
        .map_or_else(String::new, |a| format!(", first misplaced attribute is \"{a}\""))
}

/// Errors from reading attribute values out of an input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    /// An attribute holds data that is not a scalar value.
    #[error("attribute \"{attribute}\" holds {found}, expected a scalar value")]
    Incompatible {
        /// The attribute being read.
        attribute: String,
        /// Kind of data found.
        found: &'static str,
    },

    /// The input is not a key/value object.
    #[error("input is {found}, expected an object")]
    NotAnObject {
        /// Kind of data found.
        found: &'static str,
    },

    /// Failure reported by a caller-supplied extractor.
    #[error("{0}")]
    Custom(String),
}

/// Errors from [`DecisionTable::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    /// The input could not be turned into a snapshot.
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
}
