//! Flint - flake input linter
//!
//! Analyzes a Nix `flake.lock` for repositories locked at more than one
//! revision and checks root inputs for newer upstream revisions.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Lockfile model, graph analysis and update resolution
//! - [`infra`] - Infrastructure layer (HTTP, git processes, directories)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
