//! Evaluate benchmarks: the hot path.
//!
//! Measures: single-matcher tests, full-table evaluation per policy, table
//! width scaling, regex matchers, and diagnosis rendering.

use dtable::prelude::*;

fn main() {
    divan::main();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Test fixtures
// ═══════════════════════════════════════════════════════════════════════════════

const ATTRIBUTES: [&str; 4] = ["requesterId", "isDateSet", "amount", "isApproved"];

fn approval_table() -> DecisionTable<bool> {
    DecisionTable::builder(ATTRIBUTES)
        .rule(
            [
                Matcher::one_of(["u1", "u2"]),
                Matcher::IsSet,
                Matcher::gt(0.0),
                Matcher::Any,
            ],
            false,
        )
        .rule(
            [Matcher::Any, Matcher::Any, Matcher::gt(1.0), Matcher::Any],
            true,
        )
        .build()
        .unwrap()
}

fn request(requester: &str, amount: f64) -> Snapshot {
    Snapshot::new()
        .with("requesterId", requester)
        .with("isDateSet", true)
        .with("amount", amount)
        .with("isApproved", "true")
}

/// `rules` rules over one integer attribute; rule `i` matches `n == i`.
fn wide_table(rules: usize) -> DecisionTable<usize> {
    let mut builder = DecisionTable::builder(["n"]);
    for i in 0..rules {
        builder = builder.rule([Matcher::eq(i64::try_from(i).unwrap())], i);
    }
    builder.build().unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Matchers
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench]
fn matcher_in_hit(bencher: divan::Bencher) {
    let m: Matcher<Value> = Matcher::one_of(["u1", "u2", "u3", "u4"]);
    let v = Value::from("u4");
    bencher.bench_local(|| m.test(Some(divan::black_box(&v))));
}

#[divan::bench]
fn matcher_gt_cross_kind(bencher: divan::Bencher) {
    let m: Matcher<Value> = Matcher::gt(1.0);
    let v = Value::from(2);
    bencher.bench_local(|| m.test(Some(divan::black_box(&v))));
}

#[divan::bench]
fn matcher_regex(bencher: divan::Bencher) {
    let m = Matcher::matches_regex("^u[0-9]+$").unwrap();
    let v = Value::from("u12345");
    bencher.bench_local(|| m.test(Some(divan::black_box(&v))));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Evaluation per policy
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench(args = [EvaluationPolicy::First, EvaluationPolicy::Unique, EvaluationPolicy::Collect])]
fn evaluate_policy(bencher: divan::Bencher, policy: EvaluationPolicy) {
    let table = approval_table();
    let input = request("u1", 2.0);
    bencher.bench_local(|| table.evaluate(divan::black_box(&input), policy));
}

#[divan::bench(args = [1, 10, 100, 1000])]
fn evaluate_width(bencher: divan::Bencher, rules: usize) {
    let table = wide_table(rules);
    let input = Snapshot::new().with("n", 0);
    bencher.bench_local(|| table.evaluate(divan::black_box(&input), EvaluationPolicy::First));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Diagnosis
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench]
fn explain_report(bencher: divan::Bencher) {
    let table = approval_table();
    let result = table
        .evaluate(&request("u3", 1.0), EvaluationPolicy::First)
        .unwrap();
    bencher.bench_local(|| table.explain(divan::black_box(&result)));
}
