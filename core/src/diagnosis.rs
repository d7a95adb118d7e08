//! Diagnosis report: a deterministic text rendering of one evaluation.
//!
//! The layout is fixed so reports can be compared byte-for-byte in golden
//! tests:
//!
//! ```text
//! Hit Policy: First
//! Result: Optional[true]
//! Input:
//!   requesterId: u3
//!   amount: 2.0
//! Rule 0 [f]:
//!   requesterId  [f]: in( u1, u2 )
//!   amount  [t]: > 0.0
//! Rule 1 [t]:
//!   requesterId  [t]: -
//!   amount  [t]: > 1.0
//! ```
//!
//! Absent inputs render as nothing after `": "`.

use crate::{DecisionTable, EvaluationPolicy, RuleTrace, Snapshot};
use std::fmt::{self, Display};

/// Render the report of one evaluation.
///
/// Pure: identical arguments always produce identical text. Traces are
/// rendered in the order given, each against the rule its `rule_index`
/// names; a trace pointing outside the table renders its header only.
#[must_use]
pub fn diagnose<O>(
    table: &DecisionTable<O>,
    policy: EvaluationPolicy,
    snapshot: &Snapshot,
    traces: &[RuleTrace],
    summary: &str,
) -> String {
    Report {
        table,
        policy,
        snapshot,
        traces,
        summary,
    }
    .to_string()
}

/// Summary of a single optional output: `Optional[v]` or `Optional.empty`.
#[must_use]
pub fn summarize_optional<O: Display>(output: Option<&O>) -> String {
    match output {
        Some(o) => format!("Optional[{o}]"),
        None => "Optional.empty".to_string(),
    }
}

/// Summary of a list of outputs: `List[v1, v2]`.
#[must_use]
pub fn summarize_list<O: Display>(outputs: &[O]) -> String {
    let items: Vec<String> = outputs.iter().map(ToString::to_string).collect();
    format!("List[{}]", items.join(", "))
}

struct Report<'a, O> {
    table: &'a DecisionTable<O>,
    policy: EvaluationPolicy,
    snapshot: &'a Snapshot,
    traces: &'a [RuleTrace],
    summary: &'a str,
}

impl<O> Display for Report<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schema = self.table.schema();

        writeln!(f, "Hit Policy: {}", self.policy)?;
        writeln!(f, "Result: {}", self.summary)?;
        writeln!(f, "Input:")?;
        for name in schema.iter() {
            match self.snapshot.get(name) {
                Some(value) => writeln!(f, "  {name}: {value}")?,
                None => writeln!(f, "  {name}: ")?,
            }
        }

        for trace in self.traces {
            writeln!(f, "Rule {} [{}]:", trace.rule_index, flag(trace.matched))?;
            let Some(rule) = self.table.rules().get(trace.rule_index) else {
                continue;
            };
            let rows = schema
                .iter()
                .zip(&trace.attribute_matches)
                .zip(rule.matchers());
            for ((name, matched), matcher) in rows {
                writeln!(f, "  {name}  [{}]: {matcher}", flag(*matched))?;
            }
        }
        Ok(())
    }
}

fn flag(matched: bool) -> char {
    if matched {
        't'
    } else {
        'f'
    }
}
