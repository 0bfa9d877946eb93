//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test project context
///
/// Creates a temporary directory holding a lockfile and an isolated config
/// directory, and runs the flint binary inside it.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Create a project with `flake.lock` already written
    pub fn with_lockfile(content: &str) -> Self {
        let project = Self::new();
        project.create_file("flake.lock", content);
        project
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Config directory handed to flint through `FLINT_CONFIG_DIR`
    pub fn config_dir(&self) -> PathBuf {
        self.dir.path().join(".config")
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Write the global config file
    #[allow(dead_code)]
    pub fn write_config(&self, content: &str) {
        self.create_file(".config/config.toml", content);
    }

    /// Run flint with `args` in the project directory
    ///
    /// Color is disabled and ambient configuration is cleared so output is
    /// stable across machines.
    pub fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_flint"));
        cmd.current_dir(self.path())
            .env("FLINT_CONFIG_DIR", self.config_dir())
            .env("NO_COLOR", "1")
            .env_remove("FLINT_LOCKFILE")
            .env_remove("RUST_LOG")
            .env_remove("GITHUB_TOKEN")
            .env_remove("GITLAB_TOKEN");
        for arg in args {
            cmd.arg(arg);
        }
        cmd.output().expect("Failed to execute flint")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Stdout of a finished command
#[allow(dead_code)]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of a finished command
#[allow(dead_code)]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Lockfile where nixpkgs is locked twice: once by the root and once by
/// home-manager
#[allow(dead_code)]
pub const DUPLICATE_LOCK: &str = r#"{
  "nodes": {
    "home-manager": {
      "inputs": {"nixpkgs": "nixpkgs_2"},
      "locked": {
        "lastModified": 1759000000,
        "narHash": "sha256-hm",
        "owner": "nix-community",
        "repo": "home-manager",
        "rev": "3333333333333333333333333333333333333333",
        "type": "github"
      },
      "original": {"owner": "nix-community", "repo": "home-manager", "type": "github"}
    },
    "nixpkgs": {
      "locked": {
        "lastModified": 1759381078,
        "narHash": "sha256-aaa",
        "owner": "NixOS",
        "repo": "nixpkgs",
        "rev": "1111111111111111111111111111111111111111",
        "type": "github"
      },
      "original": {"owner": "NixOS", "ref": "nixos-unstable", "repo": "nixpkgs", "type": "github"}
    },
    "nixpkgs_2": {
      "locked": {
        "lastModified": 1758000000,
        "narHash": "sha256-bbb",
        "owner": "NixOS",
        "repo": "nixpkgs",
        "rev": "2222222222222222222222222222222222222222",
        "type": "github"
      },
      "original": {"owner": "NixOS", "ref": "nixos-unstable", "repo": "nixpkgs", "type": "github"}
    },
    "root": {
      "inputs": {"home-manager": "home-manager", "nixpkgs": "nixpkgs"}
    }
  },
  "root": "root",
  "version": 7
}"#;

/// Lockfile where every repository is locked once
#[allow(dead_code)]
pub const CLEAN_LOCK: &str = r#"{
  "nodes": {
    "home-manager": {
      "inputs": {"nixpkgs": ["nixpkgs"]},
      "locked": {
        "narHash": "sha256-hm",
        "owner": "nix-community",
        "repo": "home-manager",
        "rev": "3333333333333333333333333333333333333333",
        "type": "github"
      }
    },
    "nixpkgs": {
      "locked": {
        "narHash": "sha256-aaa",
        "owner": "NixOS",
        "repo": "nixpkgs",
        "rev": "1111111111111111111111111111111111111111",
        "type": "github"
      }
    },
    "root": {
      "inputs": {"home-manager": "home-manager", "nixpkgs": "nixpkgs"}
    }
  },
  "root": "root",
  "version": 7
}"#;
