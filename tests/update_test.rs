//! Integration tests for `flint updates`
//!
//! Only cases that never reach the network: structural lockfile errors and
//! inputs that are pinned or unsupported.

mod common;

use common::{stderr, stdout, TestProject};

#[test]
fn test_missing_root_node() {
    let project = TestProject::with_lockfile(r#"{"nodes": {"a": {}}, "root": "root", "version": 7}"#);
    let output = project.run(&["updates"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Root node 'root' not found"));
}

#[test]
fn test_root_without_inputs() {
    let project = TestProject::with_lockfile(r#"{"nodes": {"root": {}}, "root": "root", "version": 7}"#);
    let output = project.run(&["updates"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("No root inputs found"));
}

#[test]
fn test_offline_inputs_report_per_input() {
    let project = TestProject::with_lockfile(
        r#"{
  "nodes": {
    "frozen": {
      "locked": {"type": "github", "owner": "o", "repo": "r", "rev": "0123456789abcdef0123456789abcdef01234567"},
      "original": {"type": "github", "owner": "o", "repo": "r", "ref": "0123456789abcdef0123456789abcdef01234567"}
    },
    "local": {"locked": {"type": "path", "path": "/src"}, "original": {"type": "path", "path": "/src"}},
    "private": {
      "locked": {"type": "git", "url": "ssh://git@example.com/private.git", "rev": "abc"},
      "original": {"type": "git", "url": "ssh://git@example.com/private.git"}
    },
    "root": {"inputs": {"frozen": "frozen", "local": "local", "private": "private", "gone": "missing"}}
  },
  "root": "root",
  "version": 7
}"#,
    );
    let output = project.run(&["updates", "-o", "json", "--fail-if-outdated"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    let updates = value["updates"].as_array().unwrap();
    assert_eq!(updates.len(), 4);

    let by_name = |name: &str| {
        updates
            .iter()
            .find(|u| u["input_name"] == name)
            .unwrap_or_else(|| panic!("missing {name}"))
            .clone()
    };

    let frozen = by_name("frozen");
    assert_eq!(frozen["is_update"], false);
    assert_eq!(frozen["latest_rev"], frozen["current_rev"]);
    assert!(frozen.get("error").is_none());

    assert_eq!(by_name("local")["error"], "unsupported input type: path");
    assert!(by_name("private")["error"].as_str().unwrap().contains("ssh"));
    assert_eq!(by_name("gone")["error"], "input node missing not found");
}

#[test]
fn test_plain_output_lists_every_input() {
    let project = TestProject::with_lockfile(
        r#"{
  "nodes": {
    "local": {"locked": {"type": "path", "path": "/src"}},
    "root": {"inputs": {"local": "local"}}
  }
}"#,
    );
    let output = project.run(&["updates", "-o", "plain"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "local: error: unsupported input type: path\n");
}
