//! `MatchingRule`: One matcher per schema attribute, plus an output
//!
//! Rules are created by [`TableBuilder`](crate::TableBuilder), which checks
//! their shape against the table schema before any rule is published.

use crate::{Matcher, RuleTrace, Schema, Snapshot, Value};
use std::fmt::Debug;

/// A row of a decision table.
///
/// Attribute matchers are always AND-combined: the rule matches when every
/// matcher accepts its attribute's value.
///
/// # Type Parameters
///
/// - `O`: The output type of the table
#[derive(Clone)]
pub struct MatchingRule<O> {
    index: usize,
    matchers: Vec<Matcher<Value>>,
    output: O,
}

impl<O> MatchingRule<O> {
    pub(crate) fn new(index: usize, matchers: Vec<Matcher<Value>>, output: O) -> Self {
        Self {
            index,
            matchers,
            output,
        }
    }

    /// Position of this rule in its table.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Matchers, in schema order.
    #[must_use]
    pub fn matchers(&self) -> &[Matcher<Value>] {
        &self.matchers
    }

    /// Output produced when this rule matches.
    #[must_use]
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Deepest matcher nesting in this rule.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.matchers.iter().map(Matcher::depth).max().unwrap_or(0)
    }

    /// Test every matcher against the snapshot, in schema order.
    ///
    /// Does not short-circuit: the trace records every attribute outcome.
    /// An empty schema matches vacuously.
    #[must_use]
    pub fn matches(&self, snapshot: &Snapshot, schema: &Schema) -> RuleTrace {
        let attribute_matches = schema
            .iter()
            .zip(&self.matchers)
            .map(|(name, matcher)| matcher.test(snapshot.get(name)))
            .collect();
        RuleTrace::new(self.index, attribute_matches)
    }
}

impl<O: Debug> Debug for MatchingRule<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let matchers: Vec<String> = self.matchers.iter().map(Matcher::describe).collect();
        f.debug_struct("MatchingRule")
            .field("index", &self.index)
            .field("matchers", &matchers)
            .field("output", &self.output)
            .finish()
    }
}
