//! Infrastructure layer
//!
//! Handles all I/O operations: network, filesystem, and external processes.
//! This module is the only place where side effects occur.

pub mod dirs;
pub mod git;
pub mod github;
pub mod gitlab;
pub mod http;
