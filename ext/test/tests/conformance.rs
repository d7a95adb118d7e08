//! Conformance tests that run YAML fixtures against dtable
//!
//! Run with: cargo test -p dtable-test --test conformance --features dtable-test/fixtures
//!
//! Note: This test file requires the `fixtures` feature to be enabled.

#![cfg(feature = "fixtures")]

use dtable_test::fixture::Fixture;
use dtable_test::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixtures live next to this crate's manifest
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and run every fixture in one file
fn run_fixture_file(name: &str) {
    let path = fixtures_dir().join(name);
    let yaml = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));

    // Parse potentially multiple fixtures (separated by ---)
    let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
        panic!("Failed to parse {}: {}", path.display(), e);
    });
    assert!(!fixtures.is_empty(), "{} holds no fixtures", path.display());

    for fixture in fixtures {
        println!("  Running: {}", fixture.name);
        fixture.run_and_assert();
    }
}

#[test]
fn test_matchers() {
    run_fixture_file("01_matchers.yaml");
}

#[test]
fn test_policies() {
    run_fixture_file("02_policies.yaml");
}

#[test]
fn test_diagnosis() {
    run_fixture_file("03_diagnosis.yaml");
}

#[test]
fn test_invalid_tables() {
    run_fixture_file("04_invalid.yaml");
}

#[test]
fn test_every_fixture_file_is_covered() {
    let mut names: Vec<String> = fs::read_dir(fixtures_dir())
        .expect("read fixtures dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".yaml"))
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "01_matchers.yaml",
            "02_policies.yaml",
            "03_diagnosis.yaml",
            "04_invalid.yaml"
        ]
    );
}

#[test]
fn test_string_input_against_loaded_table() {
    let yaml = fs::read_to_string(fixtures_dir().join("02_policies.yaml")).expect("read yaml");
    let fixture = Fixture::from_yaml_multi(&yaml)
        .expect("parse")
        .into_iter()
        .next()
        .expect("first fixture");
    let table = fixture.load_table().expect("valid table");

    let input = TestInput::new()
        .with("requesterId", "u3")
        .with("isDateSet", "true")
        .with("amount", "2.0")
        .with("isApproved", "true");
    let result = table.evaluate(&input, EvaluationPolicy::First).unwrap();
    assert_eq!(result.output(), Some(&Value::Bool(true)));
}

#[test]
fn test_json_input_against_loaded_table() {
    let yaml = fs::read_to_string(fixtures_dir().join("02_policies.yaml")).expect("read yaml");
    let fixture = Fixture::from_yaml_multi(&yaml)
        .expect("parse")
        .into_iter()
        .next()
        .expect("first fixture");
    let table = fixture.load_table().expect("valid table");

    let input = serde_json::json!({
        "requesterId": "u1",
        "isDateSet": true,
        "amount": 2.0,
        "isApproved": null,
    });
    let result = table.evaluate(&input, EvaluationPolicy::Unique).unwrap();
    assert!(result.is_ambiguous());
    assert_eq!(result.diagnosis().matched_rules(), vec![0, 1]);
}
