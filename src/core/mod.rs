//! Core business logic module
//!
//! Lockfile model, graph analysis, duplicate detection and update
//! resolution. Network and process access goes through [`crate::infra`].
//!
//! # Submodules
//!
//! - [`lock`] - flake.lock parsing
//! - [`identity`] - Identity and version-qualified URLs
//! - [`graph`] - Forward and reverse reference maps
//! - [`duplicates`] - Repositories locked at several versions
//! - [`update`] - Newest upstream revisions of root inputs
//! - [`global_config`] - Global configuration management

pub mod duplicates;
pub mod global_config;
pub mod graph;
pub mod identity;
pub mod lock;
pub mod update;
