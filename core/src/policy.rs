//! Hit policies: how a full set of rule traces becomes a result.

use crate::{MatchingRule, RuleTrace};
use std::fmt;
use std::str::FromStr;

/// Strategy for resolving rule traces into a decision.
///
/// Every policy sees the traces of *all* rules; none of them short-circuits
/// evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum EvaluationPolicy {
    /// Output of the lowest-index matching rule.
    First,
    /// Output of the only matching rule; several matches are ambiguous.
    Unique,
    /// Outputs of every matching rule, in table order.
    Collect,
}

impl EvaluationPolicy {
    /// All policies, in declaration order.
    pub const ALL: [Self; 3] = [Self::First, Self::Unique, Self::Collect];

    /// Resolve `traces` (one per rule, in table order) into an outcome.
    pub(crate) fn resolve<O: Clone>(self, rules: &[MatchingRule<O>], traces: &[RuleTrace]) -> Outcome<O> {
        let mut hits = traces
            .iter()
            .filter(|t| t.matched)
            .filter_map(|t| rules.get(t.rule_index))
            .map(MatchingRule::output);

        match self {
            Self::First => Outcome::First(hits.next().cloned()),
            Self::Unique => match (hits.next(), hits.next()) {
                (None, _) => Outcome::Unique {
                    output: None,
                    ambiguous: false,
                },
                (Some(only), None) => Outcome::Unique {
                    output: Some(only.clone()),
                    ambiguous: false,
                },
                (Some(_), Some(_)) => Outcome::Unique {
                    output: None,
                    ambiguous: true,
                },
            },
            Self::Collect => Outcome::Collect(hits.cloned().collect()),
        }
    }
}

impl fmt::Display for EvaluationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::First => "First",
            Self::Unique => "Unique",
            Self::Collect => "Collect",
        })
    }
}

/// Error returned when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown hit policy \"{0}\", expected first, unique or collect")]
pub struct ParsePolicyError(pub String);

impl FromStr for EvaluationPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParsePolicyError(s.to_string()))
    }
}

/// A policy's answer, before the diagnosis is attached.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outcome<O> {
    First(Option<O>),
    Unique { output: Option<O>, ambiguous: bool },
    Collect(Vec<O>),
}
