//! Config types for loading decision tables from JSON/YAML.
//!
//! These types mirror the runtime types but are serde-deserializable:
//!
//! | Config type | Runtime type |
//! |-------------|--------------|
//! | [`TableConfig`] | [`DecisionTable`] |
//! | [`RuleConfig`] | [`MatchingRule`](crate::MatchingRule) |
//! | [`MatcherConfig`] | [`Matcher<Value>`](crate::Matcher) |
//!
//! ```yaml
//! schema: [requesterId, amount]
//! policy: first
//! rules:
//!   - when: [ { in: [u1, u2] }, { gt: 0.0 } ]
//!     then: false
//!   - when: [ "-", { not: { le: 1.0 } } ]
//!     then: true
//! ```

use crate::{DecisionTable, EvaluationPolicy, Matcher, TableError, Value};
use serde::Deserialize;

/// Configuration for a [`DecisionTable`].
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "O: Deserialize<'de>"), deny_unknown_fields)]
pub struct TableConfig<O> {
    /// Attribute names, in order.
    pub schema: Vec<String>,

    /// Rules, in table order.
    #[serde(default = "Vec::new")]
    pub rules: Vec<RuleConfig<O>>,

    /// Suggested policy for callers that do not pick one.
    #[serde(default)]
    pub policy: Option<EvaluationPolicy>,
}

/// Configuration for one rule: a matcher per schema attribute and an output.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "O: Deserialize<'de>"), deny_unknown_fields)]
pub struct RuleConfig<O> {
    /// Matchers, in schema order.
    pub when: Vec<MatcherConfig>,

    /// Output when every matcher accepts.
    pub then: O,
}

/// Configuration for a [`Matcher<Value>`](crate::Matcher).
///
/// Uses untagged deserialization over single-key maps, so order matters:
/// the bare keyword form is tried first. Each map must hold exactly one
/// key; `{ gt: 1, lt: 5 }` matches no variant and fails to load.
///
/// ```yaml
/// any          # also "-"
/// is_set
/// { in: [u1, u2] }
/// { gt: 0.0 }  # ge, lt, le, eq
/// { regex: "^u[0-9]+$" }
/// { not: { eq: Rock } }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MatcherConfig {
    /// `any`, `-` or `is_set`.
    Keyword(String),
    /// Set membership.
    In(InMatch),
    /// Strictly greater.
    Gt(GtMatch),
    /// Greater or equal.
    Ge(GeMatch),
    /// Strictly less.
    Lt(LtMatch),
    /// Less or equal.
    Le(LeMatch),
    /// Equality.
    Eq(EqMatch),
    /// Regex over string values.
    Regex(RegexMatch),
    /// Negation.
    Not(NotMatch),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct InMatch {
    pub r#in: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct GtMatch {
    pub gt: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct GeMatch {
    pub ge: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct LtMatch {
    pub lt: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct LeMatch {
    pub le: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct EqMatch {
    pub eq: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct RegexMatch {
    pub regex: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct NotMatch {
    pub not: Box<MatcherConfig>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Builder: Convert config to runtime types
// ═══════════════════════════════════════════════════════════════════════════════

impl<O> TableConfig<O> {
    /// Build a validated [`DecisionTable`].
    ///
    /// # Errors
    ///
    /// - [`TableError::InvalidConfig`] for an unknown matcher keyword
    /// - Any error of [`TableBuilder::build`](crate::TableBuilder::build)
    pub fn build(self) -> Result<DecisionTable<O>, TableError> {
        let mut builder = DecisionTable::builder(self.schema);
        for rule in self.rules {
            let matchers = rule
                .when
                .iter()
                .map(MatcherConfig::build)
                .collect::<Result<Vec<_>, _>>()?;
            builder = builder.rule(matchers, rule.then);
        }
        builder.build()
    }

    /// The configured policy, or `First`.
    #[must_use]
    pub fn policy(&self) -> EvaluationPolicy {
        self.policy.unwrap_or(EvaluationPolicy::First)
    }
}

impl MatcherConfig {
    /// Build a runtime matcher.
    ///
    /// # Errors
    ///
    /// - [`TableError::InvalidConfig`] for an unknown keyword
    /// - [`TableError::InvalidPattern`] / [`TableError::PatternTooLong`] for a bad regex
    pub fn build(&self) -> Result<Matcher<Value>, TableError> {
        Ok(match self {
            Self::Keyword(word) => match word.as_str() {
                "any" | "-" => Matcher::Any,
                "is_set" | "isSet" => Matcher::IsSet,
                other => {
                    return Err(TableError::InvalidConfig {
                        reason: format!(
                            "unknown matcher \"{other}\", expected any, -, is_set or a single-key map"
                        ),
                    })
                }
            },
            Self::In(m) => Matcher::one_of(m.r#in.iter().cloned()),
            Self::Gt(m) => Matcher::Gt(m.gt.clone()),
            Self::Ge(m) => Matcher::Ge(m.ge.clone()),
            Self::Lt(m) => Matcher::Lt(m.lt.clone()),
            Self::Le(m) => Matcher::Le(m.le.clone()),
            Self::Eq(m) => Matcher::Eq(m.eq.clone()),
            Self::Regex(m) => Matcher::matches_regex(&m.regex)?,
            Self::Not(m) => !m.not.build()?,
        })
    }
}
