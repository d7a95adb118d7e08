//! dtable CLI: driving adapter for the dtable decision-table engine.
//!
//! Subcommands:
//! - `eval <table> [--policy P] [--input key=value...]`: print the result summary
//! - `explain <table> [--policy P] [--input key=value...]`: print the full diagnosis
//! - `check <table>`: validate that the table loads
//!
//! Tables are YAML unless the file ends in `.json`. Logging goes to stderr and
//! is controlled by `RUST_LOG` (default `warn`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dtable::{DecisionResult, DecisionTable, EvaluationPolicy, Snapshot, TableConfig, Value};

#[derive(Parser)]
#[command(name = "dtable")]
#[command(about = "Evaluate and explain decision tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a table and print the result summary
    Eval(EvalArgs),

    /// Evaluate a table and print the full diagnosis report
    Explain(EvalArgs),

    /// Validate that a table loads without errors
    Check {
        /// Table file (YAML, or JSON by extension)
        table: PathBuf,
    },
}

#[derive(Args)]
struct EvalArgs {
    /// Table file (YAML, or JSON by extension)
    table: PathBuf,

    /// Hit policy: first, unique or collect (default: the table's, else first)
    #[arg(long)]
    policy: Option<EvaluationPolicy>,

    /// Input attribute; values are read as bool, int or float where possible
    #[arg(long = "input", value_name = "KEY=VALUE", value_parser = parse_pair)]
    inputs: Vec<(String, String)>,

    /// Read the input from a JSON object file instead
    #[arg(long, value_name = "FILE", conflicts_with = "inputs")]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();
    print!("{}", execute(&cli.command)?);
    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn execute(command: &Command) -> Result<String> {
    match command {
        Command::Eval(args) => {
            let (_, result) = evaluate(args)?;
            Ok(format!("{}\n", result.summary()))
        }
        Command::Explain(args) => {
            let (table, result) = evaluate(args)?;
            Ok(table.explain(&result))
        }
        Command::Check { table } => {
            let (table, _) = load_table(table)?;
            Ok(format!(
                "Table valid: {} rules over {}\n",
                table.len(),
                table.schema()
            ))
        }
    }
}

fn evaluate(args: &EvalArgs) -> Result<(DecisionTable<Value>, DecisionResult<Value>)> {
    let (table, default_policy) = load_table(&args.table)?;
    let policy = args.policy.unwrap_or(default_policy);

    let result = match &args.json {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read \"{}\"", path.display()))?;
            let input: serde_json::Value =
                serde_json::from_str(&content).context("JSON parse error")?;
            table.evaluate(&input, policy)?
        }
        None => table.evaluate(&build_snapshot(&args.inputs), policy)?,
    };

    tracing::debug!(%policy, matched = ?result.diagnosis().matched_rules(), "evaluated");
    Ok((table, result))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Table loading
// ═══════════════════════════════════════════════════════════════════════════════

fn load_table(path: &Path) -> Result<(DecisionTable<Value>, EvaluationPolicy)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read \"{}\"", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config: TableConfig<Value> = if is_json {
        serde_json::from_str(&content).context("JSON parse error")?
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(&content).context("YAML parse error")?
    };

    let policy = config.policy();
    let table = config.build().context("table invalid")?;
    Ok((table, policy))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

fn parse_pair(pair: &str) -> Result<(String, String), String> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| format!("invalid input pair \"{pair}\", expected key=value"))?;
    if key.is_empty() {
        return Err(format!("invalid input pair \"{pair}\", key is empty"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

fn build_snapshot(pairs: &[(String, String)]) -> Snapshot {
    pairs
        .iter()
        .map(|(k, v)| (k.as_str(), Value::infer(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
schema: [requesterId, amount]
rules:
  - when: [ { in: [u1, u2] }, { gt: 0.0 } ]
    then: false
  - when: [ any, { gt: 1.0 } ]
    then: true
";

    fn write_table(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dtable-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn eval_args(table: PathBuf, policy: Option<EvaluationPolicy>, inputs: &[&str]) -> EvalArgs {
        EvalArgs {
            table,
            policy,
            inputs: inputs.iter().map(|p| parse_pair(p).unwrap()).collect(),
            json: None,
        }
    }

    #[test]
    fn parse_pair_splits_on_first_equals() {
        assert_eq!(
            parse_pair("expr=a=b").unwrap(),
            ("expr".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn parse_pair_rejects_bad_format() {
        assert!(parse_pair("badformat").is_err());
        assert!(parse_pair("=value").is_err());
    }

    #[test]
    fn build_snapshot_infers_values() {
        let pairs = vec![
            ("amount".to_string(), "2.0".to_string()),
            ("id".to_string(), "u1".to_string()),
        ];
        let snapshot = build_snapshot(&pairs);
        assert_eq!(snapshot.get("amount"), Some(&Value::Float(2.0)));
        assert_eq!(snapshot.get("id"), Some(&Value::from("u1")));
    }

    #[test]
    fn eval_prints_summary() {
        let path = write_table("eval.yaml", TABLE);
        let args = eval_args(path, None, &["requesterId=u3", "amount=2.0"]);
        assert_eq!(execute(&Command::Eval(args)).unwrap(), "Optional[true]\n");
    }

    #[test]
    fn eval_with_policy_override() {
        let path = write_table("collect.yaml", TABLE);
        let args = eval_args(
            path,
            Some(EvaluationPolicy::Collect),
            &["requesterId=u1", "amount=2.0"],
        );
        assert_eq!(
            execute(&Command::Eval(args)).unwrap(),
            "List[false, true]\n"
        );
    }

    #[test]
    fn explain_prints_report() {
        let path = write_table("explain.yaml", TABLE);
        let args = eval_args(path, None, &["requesterId=u3", "amount=1.0"]);
        let report = execute(&Command::Explain(args)).unwrap();
        assert!(report.starts_with("Hit Policy: First\nResult: Optional.empty\n"));
        assert!(report.contains("  amount  [f]: > 1.0\n"));
    }

    #[test]
    fn eval_json_input() {
        let path = write_table("json-input.yaml", TABLE);
        let input = write_table("input.json", r#"{"requesterId": "u1", "amount": 5}"#);
        let mut args = eval_args(path, Some(EvaluationPolicy::Unique), &[]);
        args.json = Some(input);
        // both rules match
        assert_eq!(execute(&Command::Eval(args)).unwrap(), "Optional.empty\n");
    }

    #[test]
    fn check_json_table() {
        let path = write_table(
            "table.json",
            r#"{"schema": ["a"], "rules": [{"when": ["-"], "then": 1}]}"#,
        );
        assert_eq!(
            execute(&Command::Check { table: path }).unwrap(),
            "Table valid: 1 rules over [a]\n"
        );
    }

    #[test]
    fn check_reports_invalid_table() {
        let path = write_table("bad.yaml", "schema: [a, b]\nrules:\n  - when: [any]\n    then: 1\n");
        let err = execute(&Command::Check { table: path }).unwrap_err();
        assert!(format!("{err:#}").contains("rule 0 has 1 matchers for 2 attributes"));
    }

    #[test]
    fn missing_table_file() {
        let err = load_table(Path::new("/nonexistent/table.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
