//! `DecisionTable`: Ordered, immutable rules over one attribute schema
//!
//! The table is the entry point for evaluation. Every evaluation runs every
//! rule, then hands the traces to an [`EvaluationPolicy`].

use crate::diagnosis::{self, summarize_list, summarize_optional};
use crate::policy::Outcome;
use crate::{
    AttributeSource, DecisionError, DecisionResult, Diagnosis, EvaluationPolicy, Extractor,
    Matcher, MatchingRule, RuleTrace, Schema, Snapshot, TableError, Value, MAX_DEPTH,
};
use std::fmt::{Debug, Display};

/// A decision table: a schema plus ordered rules sharing one output type.
///
/// Built once with [`DecisionTable::builder`], then shared freely. The table
/// holds no mutable state, so concurrent evaluations need no locking.
///
/// # INV: Eager evaluation
///
/// Every rule is traced on every evaluation, under every policy. `First`
/// does not stop at the first match: the diagnosis must show all outcomes.
///
/// # Output bounds
///
/// Building, [`trace`](Self::trace) and [`explain`](Self::explain) accept any
/// `O`. The `evaluate*` methods need `O: Clone + Display`: outputs are cloned
/// into the [`DecisionResult`] and rendered into the diagnosis summary at
/// evaluation time. Wrap an output without `Display` in a newtype that
/// renders its identifier.
///
/// # Example
///
/// ```
/// use dtable::prelude::*;
///
/// let table = DecisionTable::builder(["requesterId", "amount"])
///     .rule([Matcher::one_of(["u1", "u2"]), Matcher::Any], "deny")
///     .rule([Matcher::Any, Matcher::gt(1000)], "review")
///     .rule([Matcher::Any, Matcher::Any], "approve")
///     .build()
///     .unwrap();
///
/// let input = Snapshot::new().with("requesterId", "u3").with("amount", 50);
/// let result = table.evaluate(&input, EvaluationPolicy::First).unwrap();
/// assert_eq!(result.output(), Some(&"approve"));
/// assert_eq!(result.diagnosis().traces.len(), 3);
/// ```
pub struct DecisionTable<O> {
    schema: Schema,
    rules: Vec<MatchingRule<O>>,
}

impl<O> DecisionTable<O> {
    /// Start building a table over the given attribute names.
    pub fn builder<I>(attributes: I) -> TableBuilder<O>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        TableBuilder::new(attributes)
    }

    /// The attribute schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The rules, in table order.
    #[must_use]
    pub fn rules(&self) -> &[MatchingRule<O>] {
        &self.rules
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Trace every rule against a snapshot, in table order.
    #[must_use]
    pub fn trace(&self, snapshot: &Snapshot) -> Vec<RuleTrace> {
        self.rules
            .iter()
            .map(|rule| rule.matches(snapshot, &self.schema))
            .collect()
    }

    /// Render a diagnosis report for the given evaluation parts.
    ///
    /// See [`diagnosis`](crate::diagnosis) for the layout.
    #[must_use]
    pub fn diagnose(
        &self,
        policy: EvaluationPolicy,
        snapshot: &Snapshot,
        traces: &[RuleTrace],
        summary: &str,
    ) -> String {
        diagnosis::diagnose(self, policy, snapshot, traces, summary)
    }

    /// Render the report of a recorded [`Diagnosis`].
    #[must_use]
    pub fn explain_diagnosis(&self, diagnosis: &Diagnosis) -> String {
        self.diagnose(
            diagnosis.policy,
            &diagnosis.input,
            &diagnosis.traces,
            &diagnosis.summary,
        )
    }

    /// Render the report of a result produced by this table.
    #[must_use]
    pub fn explain(&self, result: &DecisionResult<O>) -> String {
        self.explain_diagnosis(result.diagnosis())
    }
}

/// Evaluation. Selected outputs are cloned into the result and their
/// `Display` form becomes the diagnosis summary (`Optional[v]`, `List[...]`).
impl<O: Clone + Display> DecisionTable<O> {
    /// Evaluate an input that exposes its own attributes.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::Extraction`] if the input cannot be read.
    /// Missing attributes and kind mismatches are never errors; they are
    /// non-matches.
    pub fn evaluate<S>(
        &self,
        input: &S,
        policy: EvaluationPolicy,
    ) -> Result<DecisionResult<O>, DecisionError>
    where
        S: AttributeSource + ?Sized,
    {
        let snapshot = input.snapshot(&self.schema)?;
        Ok(self.evaluate_snapshot(snapshot, policy))
    }

    /// Evaluate an input through a caller-supplied extractor.
    ///
    /// The extractor is invoked exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::Extraction`] if the extractor fails.
    pub fn evaluate_with<I, E>(
        &self,
        input: &I,
        extractor: &E,
        policy: EvaluationPolicy,
    ) -> Result<DecisionResult<O>, DecisionError>
    where
        I: ?Sized,
        E: Extractor<I> + ?Sized,
    {
        let snapshot = extractor.extract(input, &self.schema)?;
        Ok(self.evaluate_snapshot(snapshot, policy))
    }

    /// Evaluate an already extracted snapshot. Infallible.
    ///
    /// Attributes outside the schema are dropped from the recorded input.
    #[must_use]
    pub fn evaluate_snapshot(&self, snapshot: Snapshot, policy: EvaluationPolicy) -> DecisionResult<O> {
        let input = snapshot.project(&self.schema);
        let traces = self.trace(&input);
        let outcome = policy.resolve(&self.rules, &traces);

        let matched = traces.iter().filter(|t| t.matched).count();
        tracing::trace!(%policy, rules = self.rules.len(), matched, "evaluated decision table");

        let summary = match &outcome {
            Outcome::First(output) | Outcome::Unique { output, .. } => {
                summarize_optional(output.as_ref())
            }
            Outcome::Collect(outputs) => summarize_list(outputs),
        };
        let diagnosis = Diagnosis {
            policy,
            input,
            traces,
            summary,
        };

        match outcome {
            Outcome::First(output) => DecisionResult::First { output, diagnosis },
            Outcome::Unique { output, ambiguous } => {
                if ambiguous {
                    tracing::warn!(
                        matched_rules = ?diagnosis.matched_rules(),
                        "ambiguous match under Unique policy"
                    );
                }
                DecisionResult::Unique {
                    output,
                    ambiguous,
                    diagnosis,
                }
            }
            Outcome::Collect(outputs) => DecisionResult::Collect { outputs, diagnosis },
        }
    }
}

impl<O: Debug> Debug for DecisionTable<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionTable")
            .field("schema", &self.schema)
            .field("rules", &self.rules)
            .finish()
    }
}

impl<O: Clone> Clone for DecisionTable<O> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            rules: self.rules.clone(),
        }
    }
}

// Note: No unsafe impl needed. Matchers hold `Arc<dyn Fn + Send + Sync>`, so
// the table is Send/Sync whenever `O` is.

enum PendingRule<O> {
    Positional(Vec<Matcher<Value>>, O),
    Named(Vec<(String, Matcher<Value>)>, O),
}

/// Builder for [`DecisionTable`].
///
/// Rules are collected as given and validated together by
/// [`build`](Self::build); no partially valid table is ever returned.
pub struct TableBuilder<O> {
    attributes: Vec<String>,
    rules: Vec<PendingRule<O>>,
}

impl<O> TableBuilder<O> {
    fn new<I>(attributes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
            rules: Vec::new(),
        }
    }

    /// Add a rule with one matcher per schema attribute, in schema order.
    #[must_use]
    pub fn rule<I>(mut self, matchers: I, output: O) -> Self
    where
        I: IntoIterator<Item = Matcher<Value>>,
    {
        self.rules
            .push(PendingRule::Positional(matchers.into_iter().collect(), output));
        self
    }

    /// Add a rule whose matchers are keyed by attribute name.
    ///
    /// The names must list the schema attributes in schema order; a rule
    /// that skips, repeats or reorders attributes fails [`build`](Self::build)
    /// with [`TableError::ShapeMismatch`].
    #[must_use]
    pub fn named_rule<I, S>(mut self, matchers: I, output: O) -> Self
    where
        I: IntoIterator<Item = (S, Matcher<Value>)>,
        S: Into<String>,
    {
        let matchers = matchers
            .into_iter()
            .map(|(name, matcher)| (name.into(), matcher))
            .collect();
        self.rules.push(PendingRule::Named(matchers, output));
        self
    }

    /// Validate and freeze the table.
    ///
    /// # Errors
    ///
    /// The first problem found, in this order:
    /// - [`TableError::EmptyAttributeName`] / [`TableError::DuplicateAttribute`] for the schema
    /// - [`TableError::ShapeMismatch`] for a rule that does not line up with the schema
    /// - [`TableError::DepthExceeded`] for a `Not` chain deeper than [`MAX_DEPTH`]
    pub fn build(self) -> Result<DecisionTable<O>, TableError> {
        let schema = Schema::new(self.attributes)?;

        let mut rules = Vec::with_capacity(self.rules.len());
        for (index, pending) in self.rules.into_iter().enumerate() {
            let (matchers, output) = match pending {
                PendingRule::Positional(matchers, output) => {
                    if matchers.len() != schema.len() {
                        return Err(TableError::ShapeMismatch {
                            rule: index,
                            expected: schema.len(),
                            found: matchers.len(),
                            attribute: None,
                        });
                    }
                    (matchers, output)
                }
                PendingRule::Named(named, output) => (align(&schema, index, named)?, output),
            };

            for (name, matcher) in schema.iter().zip(&matchers) {
                let depth = matcher.depth();
                if depth > MAX_DEPTH {
                    return Err(TableError::DepthExceeded {
                        rule: index,
                        attribute: name.to_string(),
                        depth,
                        max: MAX_DEPTH,
                    });
                }
            }

            rules.push(MatchingRule::new(index, matchers, output));
        }

        tracing::debug!(
            attributes = schema.len(),
            rules = rules.len(),
            "built decision table"
        );
        Ok(DecisionTable { schema, rules })
    }
}

/// Check that keyed matchers follow the schema exactly, then drop the keys.
fn align(
    schema: &Schema,
    rule: usize,
    named: Vec<(String, Matcher<Value>)>,
) -> Result<Vec<Matcher<Value>>, TableError> {
    if let Some(position) = schema
        .iter()
        .zip(&named)
        .position(|(expected, (found, _))| expected != found.as_str())
    {
        return Err(TableError::ShapeMismatch {
            rule,
            expected: schema.len(),
            found: named.len(),
            attribute: Some(schema.names()[position].clone()),
        });
    }
    if named.len() != schema.len() {
        return Err(TableError::ShapeMismatch {
            rule,
            expected: schema.len(),
            found: named.len(),
            attribute: schema.names().get(named.len()).cloned(),
        });
    }
    Ok(named.into_iter().map(|(_, matcher)| matcher).collect())
}

impl<O> Debug for TableBuilder<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableBuilder")
            .field("attributes", &self.attributes)
            .field("rules_len", &self.rules.len())
            .finish()
    }
}
