//! CLI integration tests
//!
//! These tests run the built binary against the fixture schemas.

#![cfg(feature = "cli")]

use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_xsd2jsonschema"))
}

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

#[test]
fn test_cli_convert_to_stdout() {
    let output = bin()
        .args(["convert", "--stdout"])
        .arg(fixtures_dir().join("simple.xsd"))
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "convert should succeed");
    let schema: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["properties"]["person"]["type"], "object");
    assert!(String::from_utf8_lossy(&output.stdout).contains("\n  "), "should pretty-print");
}

#[test]
fn test_cli_convert_compact() {
    let output = bin()
        .args(["convert", "--stdout", "--compact"])
        .arg(fixtures_dir().join("simple.xsd"))
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end().lines().count(), 1);
}

#[test]
fn test_cli_convert_default_output_file() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let schema_path = dir.join("order.xsd");
    fs::copy(fixtures_dir().join("complex.xsd"), &schema_path).unwrap();

    let output = bin()
        .arg("convert")
        .arg(&schema_path)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let written = dir.join("order_schema.json");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("order_schema.json"), "should report the output path");

    let schema: Value = serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
    assert!(schema["properties"].get("order").is_some());
}

#[test]
fn test_cli_convert_with_options() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let out = dir.join("out.json");

    let output = bin()
        .args(["convert", "--attr-prefix", "_", "--no-one-of", "-o"])
        .arg(&out)
        .arg(fixtures_dir().join("choice_test.xsd"))
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let schema: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert!(schema["properties"]["payment"].get("oneOf").is_none());
}

#[test]
fn test_cli_config_file() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let config = dir.join("config.json");
    fs::write(&config, r#"{"attr_prefix": "$"}"#).unwrap();

    let output = bin()
        .args(["convert", "--stdout", "--config"])
        .arg(&config)
        .arg(fixtures_dir().join("simple.xsd"))
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let schema: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(schema["properties"]["person"]["properties"].get("$id").is_some());
}

#[test]
fn test_cli_recursion_limit() {
    let output = bin()
        .args(["convert", "--stdout", "--max-depth", "4"])
        .arg(fixtures_dir().join("recursive.xsd"))
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("schema too deep"), "stderr: {}", stderr);
}

#[test]
fn test_cli_missing_file() {
    let output = bin()
        .args(["convert", "--stdout", "/nonexistent/schema.xsd"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error"));
}

#[test]
fn test_cli_malformed_schema() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let schema_path = dir.join("broken.xsd");
    fs::write(&schema_path, "<xs:schema").unwrap();

    let output = bin()
        .args(["convert", "--stdout"])
        .arg(&schema_path)
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid XML"));
    assert!(!dir.join("broken_schema.json").exists());
}

#[test]
fn test_cli_stdout_conflicts_with_output() {
    let output = bin()
        .args(["convert", "--stdout", "-o", "x.json"])
        .arg(fixtures_dir().join("simple.xsd"))
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}
