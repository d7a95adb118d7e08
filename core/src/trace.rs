//! Evaluation trace types: what every rule did, and what the policy made of it.
//!
//! Trace types are produced fresh by each [`DecisionTable::evaluate`](crate::DecisionTable::evaluate)
//! call and never stored by the engine.
//!
//! # Two Levels of Trace
//!
//! - [`RuleTrace`]: Per-rule: which attributes matched, did the rule match?
//! - [`Diagnosis`]: Per-evaluation: policy, input, every rule trace, result summary
//!
//! [`DecisionResult`] pairs the policy's answer with its `Diagnosis`.

use crate::{EvaluationPolicy, Snapshot};

/// Trace of one rule against one input.
///
/// # INV: `matched` == AND of `attribute_matches`
///
/// All attributes are evaluated (no short-circuit) so the diagnosis shows
/// every attribute outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTrace {
    /// Index of the rule in its table (0-based).
    pub rule_index: usize,
    /// Per-attribute outcome, in schema order.
    pub attribute_matches: Vec<bool>,
    /// Whether every attribute matched.
    pub matched: bool,
}

impl RuleTrace {
    /// Build a trace from per-attribute outcomes.
    #[must_use]
    pub fn new(rule_index: usize, attribute_matches: Vec<bool>) -> Self {
        let matched = attribute_matches.iter().all(|m| *m);
        Self {
            rule_index,
            attribute_matches,
            matched,
        }
    }
}

/// Full record of one evaluation.
///
/// # INV: `traces.len()` == number of rules in the table
///
/// Holds regardless of policy, including `First`.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    /// The policy that resolved the traces.
    pub policy: EvaluationPolicy,
    /// The attribute values the rules were tested against.
    pub input: Snapshot,
    /// One trace per rule, in table order.
    pub traces: Vec<RuleTrace>,
    /// The rendered result (`Optional[v]`, `Optional.empty`, `List[...]`).
    pub summary: String,
}

impl Diagnosis {
    /// Indices of the rules that matched, in table order.
    #[must_use]
    pub fn matched_rules(&self) -> Vec<usize> {
        self.traces
            .iter()
            .filter(|t| t.matched)
            .map(|t| t.rule_index)
            .collect()
    }
}

/// Result of evaluating a decision table under one policy.
///
/// # Example
///
/// ```ignore
/// match table.evaluate(&input, EvaluationPolicy::Unique)? {
///     DecisionResult::Unique { ambiguous: true, diagnosis, .. } => {
///         eprintln!("rule set defect:\n{}", table.explain_diagnosis(&diagnosis));
///     }
///     result => println!("{:?}", result.output()),
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionResult<O> {
    /// Output of the lowest-index matching rule.
    First {
        /// `None` when no rule matched.
        output: Option<O>,
        /// Full evaluation record.
        diagnosis: Diagnosis,
    },
    /// Output of the single matching rule.
    Unique {
        /// `None` when zero or several rules matched.
        output: Option<O>,
        /// `true` when two or more rules matched.
        ambiguous: bool,
        /// Full evaluation record.
        diagnosis: Diagnosis,
    },
    /// Outputs of every matching rule.
    Collect {
        /// In table order; empty when no rule matched.
        outputs: Vec<O>,
        /// Full evaluation record.
        diagnosis: Diagnosis,
    },
}

impl<O> DecisionResult<O> {
    /// The policy that produced this result.
    #[must_use]
    pub fn policy(&self) -> EvaluationPolicy {
        match self {
            Self::First { .. } => EvaluationPolicy::First,
            Self::Unique { .. } => EvaluationPolicy::Unique,
            Self::Collect { .. } => EvaluationPolicy::Collect,
        }
    }

    /// The evaluation record.
    #[must_use]
    pub fn diagnosis(&self) -> &Diagnosis {
        match self {
            Self::First { diagnosis, .. }
            | Self::Unique { diagnosis, .. }
            | Self::Collect { diagnosis, .. } => diagnosis,
        }
    }

    /// The single output of a `First` or `Unique` result.
    ///
    /// Always `None` for `Collect`; use [`outputs`](Self::outputs) instead.
    #[must_use]
    pub fn output(&self) -> Option<&O> {
        match self {
            Self::First { output, .. } | Self::Unique { output, .. } => output.as_ref(),
            Self::Collect { .. } => None,
        }
    }

    /// Every output this result carries, in table order.
    #[must_use]
    pub fn outputs(&self) -> &[O] {
        match self {
            Self::First { output, .. } | Self::Unique { output, .. } => output.as_slice(),
            Self::Collect { outputs, .. } => outputs,
        }
    }

    /// `true` only for a `Unique` result where several rules matched.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Unique { ambiguous: true, .. })
    }

    /// The rendered result summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.diagnosis().summary
    }
}
