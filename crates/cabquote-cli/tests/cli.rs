//! Command-line tests for the `cabquote` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const QUOTE: &str = "\
Door color 1 BSS
3DB30 27 3-Drawers Base Cabinet 758.00 13DB30
WF330 FOR
BASE19 Base Accessory 30.00 1WF330 FOR
BASE
OPWM_1 Net Total $788.00
";

/// Temp workspace with a config whose data files live next to it.
fn workspace() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");

    let config = serde_json::json!({
        "store": {
            "rules_file": dir.path().join("rules.json"),
            "overrides_file": dir.path().join("overrides.json"),
            "catalog_file": dir.path().join("catalog.json"),
        }
    });
    fs::write(&config_path, config.to_string()).unwrap();

    (dir, config_path)
}

fn cabquote(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cabquote").unwrap();
    cmd.arg("-c").arg(config);
    cmd
}

#[test]
fn test_parse_json() {
    let (dir, config) = workspace();
    let input = dir.path().join("quote.txt");
    fs::write(&input, QUOTE).unwrap();

    let output = cabquote(&config).arg("parse").arg(&input).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["records"].as_array().unwrap().len(), 2);
    assert_eq!(json["records"][0]["sequence_number"], "19");
    assert_eq!(json["records"][1]["sku"], "3DB30-PLY-BSS");
    assert_eq!(json["reconciliation"]["status"], "MATCH");
}

#[test]
fn test_parse_text_format() {
    let (dir, config) = workspace();
    let input = dir.path().join("quote.txt");
    fs::write(&input, QUOTE).unwrap();

    cabquote(&config)
        .args(["parse", "--format", "text"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("3DB30-PLY-BSS"))
        .stdout(predicate::str::contains("MATCH"));
}

#[test]
fn test_parse_uses_overrides_file() {
    let (dir, config) = workspace();
    fs::write(
        dir.path().join("overrides.json"),
        r#"{"3DB30-PLY-BSS": "3DB30-BSS"}"#,
    )
    .unwrap();
    let input = dir.path().join("quote.txt");
    fs::write(&input, QUOTE).unwrap();

    cabquote(&config)
        .arg("parse")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"3DB30-BSS\""));
}

#[test]
fn test_strict_fails_on_mismatch() {
    let (dir, config) = workspace();
    let input = dir.path().join("quote.txt");
    fs::write(&input, QUOTE.replace("$788.00", "$800.00")).unwrap();

    cabquote(&config)
        .args(["parse", "--strict"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Reconciliation failed"));

    cabquote(&config).arg("parse").arg(&input).assert().success();
}

#[test]
fn test_parse_missing_input() {
    let (dir, config) = workspace();

    cabquote(&config)
        .arg("parse")
        .arg(dir.path().join("missing.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_batch_writes_outputs() {
    let (dir, config) = workspace();
    let inputs = dir.path().join("in");
    let outputs = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("a.txt"), QUOTE).unwrap();
    fs::write(inputs.join("b.txt"), QUOTE).unwrap();

    cabquote(&config)
        .arg("batch")
        .arg(inputs.join("*.txt").to_str().unwrap())
        .arg("-o")
        .arg(&outputs)
        .args(["-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt"));

    assert!(outputs.join("a.json").exists());
    assert!(outputs.join("b.json").exists());
}

#[test]
fn test_batch_empty_file_needs_continue_on_error() {
    let (dir, config) = workspace();
    let inputs = dir.path().join("in");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("a.txt"), QUOTE).unwrap();
    fs::write(inputs.join("empty.txt"), "").unwrap();
    let pattern = inputs.join("*.txt");

    cabquote(&config)
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .assert()
        .failure();

    cabquote(&config)
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .arg("--continue-on-error")
        .assert()
        .success()
        .stdout(predicate::str::contains("ERROR"));
}

#[test]
fn test_sku_resolve_with_rule_set() {
    let (dir, config) = workspace();
    fs::write(
        dir.path().join("rules.json"),
        r#"{"custom": {"rules": [{"id": "wall", "pattern": "wall", "format_template": "{user_code}-W-{door_color}"}]}}"#,
    )
    .unwrap();

    cabquote(&config)
        .args([
            "sku",
            "resolve",
            "--code",
            "W3030",
            "--description",
            "Wall Cabinet",
            "--context",
            "BSS",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("W3030-PLY-BSS"));

    cabquote(&config)
        .args([
            "sku",
            "resolve",
            "--code",
            "W3030",
            "--description",
            "Wall Cabinet",
            "--context",
            "BSS",
            "--rule-set",
            "custom",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("W3030-W-BSS"));
}

#[test]
fn test_sku_lookup() {
    let (dir, config) = workspace();
    fs::write(
        dir.path().join("catalog.json"),
        r#"{"B30-PLY-BSS": {"unit_price": "245.00", "category": "BOX"}}"#,
    )
    .unwrap();

    let output = cabquote(&config)
        .args(["sku", "lookup", "--category", "BOX", "--product", "b30", "--door-variant", "BSS"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["sku"], "B30-PLY-BSS");
    assert_eq!(json["matched"], "exact");
}

#[test]
fn test_config_init_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg").join("config.json");

    cabquote(&path)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(path.exists());

    cabquote(&path)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cabquote(&path)
        .args(["config", "get", "parser.fragment_window"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3"));

    cabquote(&path)
        .args(["config", "set", "parser.fragment_window", "4"])
        .assert()
        .success();

    cabquote(&path)
        .args(["config", "get", "parser.fragment_window"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4"));
}
