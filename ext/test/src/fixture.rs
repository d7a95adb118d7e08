//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the dtable engine.
//!
//! ```yaml
//! name: first_policy
//! description: lowest-index match wins
//! table:
//!   schema: [amount]
//!   rules:
//!     - when: [ { gt: 1.0 } ]
//!       then: big
//! cases:
//!   - name: matches
//!     input: { amount: 2.0 }
//!     policy: first
//!     expect: Optional[big]
//! ```
//!
//! A fixture with `error` instead of cases asserts that the table fails to
//! load or build with a message containing that text.

use dtable::prelude::*;
use dtable::TableConfig;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    pub description: String,
    /// Kept raw so malformed tables can be asserted as load errors.
    pub table: serde_yaml::Value,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub cases: Vec<TestCase>,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub input: BTreeMap<String, Value>,
    /// Falls back to the table's policy.
    #[serde(default)]
    pub policy: Option<EvaluationPolicy>,
    /// Expected result summary (`Optional[v]`, `Optional.empty`, `List[...]`).
    pub expect: String,
    #[serde(default)]
    pub ambiguous: bool,
    /// Expected diagnosis report, byte for byte.
    #[serde(default)]
    pub diagnosis: Option<String>,
}

impl TestCase {
    /// Build a snapshot from this case's input map
    pub fn build_snapshot(&self) -> Snapshot {
        self.input
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Deserialize the table config
    pub fn table_config(&self) -> Result<TableConfig<Value>, String> {
        serde_yaml::from_value(self.table.clone()).map_err(|e| e.to_string())
    }

    /// Deserialize and build the table
    pub fn load_table(&self) -> Result<DecisionTable<Value>, String> {
        self.table_config()?.build().map_err(|e| e.to_string())
    }

    /// Run all test cases and return results
    ///
    /// # Errors
    ///
    /// Returns the load or build error if the table is invalid.
    pub fn run(&self) -> Result<Vec<CaseResult>, String> {
        let policy = self.table_config()?.policy();
        let table = self.load_table()?;

        Ok(self
            .cases
            .iter()
            .map(|case| {
                let snapshot = case.build_snapshot();
                let result = table.evaluate_snapshot(snapshot, case.policy.unwrap_or(policy));
                let report = table.explain(&result);

                let mut expected = format!("{} ambiguous={}", case.expect, case.ambiguous);
                let mut actual = format!("{} ambiguous={}", result.summary(), result.is_ambiguous());
                if let Some(golden) = &case.diagnosis {
                    expected = format!("{expected}\n{golden}");
                    actual = format!("{actual}\n{report}");
                }

                CaseResult {
                    case_name: case.name.clone(),
                    passed: actual == expected,
                    expected,
                    actual,
                }
            })
            .collect())
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        if let Some(needle) = &self.error {
            match self.load_table() {
                Ok(_) => panic!("Fixture '{}' built, expected error containing {needle:?}", self.name),
                Err(e) => assert!(
                    e.contains(needle.as_str()),
                    "Fixture '{}' failed with {e:?}, expected error containing {needle:?}",
                    self.name,
                ),
            }
            return;
        }

        let results = self
            .run()
            .unwrap_or_else(|e| panic!("Fixture '{}' table failed to build: {e}", self.name));
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed:\nexpected: {}\nactual:   {}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}
