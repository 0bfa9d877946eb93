//! Integration tests for output formatting
//!
//! - JSON reports are machine readable
//! - Pretty reports degrade to plain symbols without color
//! - --quiet suppresses the report
//! - Format selection from flags and the config file

mod common;

use common::{stderr, stdout, TestProject, DUPLICATE_LOCK};

#[test]
fn test_json_output_is_valid() {
    let project = TestProject::with_lockfile(DUPLICATE_LOCK);
    let output = project.run(&["-o", "json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");

    let deps = value["dependencies"].as_object().unwrap();
    assert_eq!(deps.len(), 3);
    assert_eq!(
        value["reverse_dependencies"]["nixpkgs_2"],
        serde_json::json!(["home-manager"])
    );
    assert_eq!(value["duplicates"].as_array().unwrap().len(), 1);
}

#[test]
fn test_pretty_output_without_color() {
    let project = TestProject::with_lockfile(DUPLICATE_LOCK);
    let output = project.run(&["--no-color"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Flint - Dependency Analysis Report"));
    assert!(out.contains("[!] Found 1 inputs with multiple versions (1 total duplicates)"));
    assert!(out.contains("Repository: github:NixOS/nixpkgs"));
    assert!(!out.contains('\u{1b}'), "no ANSI escapes expected");
}

#[test]
fn test_quiet_suppresses_report() {
    let project = TestProject::with_lockfile(DUPLICATE_LOCK);
    let output = project.run(&["-q"]);

    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_invalid_output_format() {
    let project = TestProject::with_lockfile(DUPLICATE_LOCK);
    let output = project.run(&["-o", "yaml"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("valid formats are json, plain, pretty"));
}

#[test]
fn test_config_file_selects_format() {
    let project = TestProject::with_lockfile(DUPLICATE_LOCK);
    project.write_config("[output]\nformat = \"json\"\n");
    let output = project.run(&[]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(serde_json::from_str::<serde_json::Value>(&stdout(&output)).is_ok());
}

#[test]
fn test_invalid_config_file() {
    let project = TestProject::with_lockfile(DUPLICATE_LOCK);
    project.write_config("[output\n");
    let output = project.run(&[]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to parse config file"));
}

#[test]
fn test_version_flag() {
    let project = TestProject::new();
    let output = project.run(&["--version"]);

    assert!(output.status.success());
    assert!(stdout(&output).starts_with("flint "));
}
