//! Error types for flint
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Lockfile loading errors
#[derive(Error, Debug)]
pub enum LockError {
    /// Lockfile could not be read
    #[error("Failed to read lockfile '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Lockfile is not a valid flake.lock document
    #[error("Failed to decode lockfile '{path}': {error}")]
    Parse { path: PathBuf, error: String },
}

/// Structural errors that abort an update check before any lookup starts
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UpdateError {
    /// The lockfile names a root node that does not exist
    #[error("Root node '{root}' not found in lockfile")]
    NoRootNode { root: String },

    /// The root node declares no inputs
    #[error("No root inputs found")]
    NoRootInputs,
}

/// Per-input resolution errors
///
/// These never abort a batch; they are recorded on the input's status.
#[derive(Error, Debug)]
pub enum ForgeError {
    /// Input points at a node missing from the lockfile
    #[error("input node {node} not found")]
    NodeNotFound { node: String },

    /// Input node has no locked section
    #[error("input {input} has no locked version")]
    NotLocked { input: String },

    /// Root input is a follows path rather than a node name
    #[error("input follows another input")]
    Follows,

    /// Input reference has an unrecognized shape
    #[error("invalid input reference type")]
    InvalidReference,

    /// Source type has no update strategy
    #[error("unsupported input type: {kind}")]
    UnsupportedType { kind: String },

    /// Tarball URL does not follow a known forge layout
    #[error("cannot parse tarball URL: {url}")]
    UnparseableTarball { url: String },

    /// SSH transports need credentials flint does not manage
    #[error("git+ssh URLs not supported: {url}")]
    SshUnsupported { url: String },

    /// Clone URL does not match the forge's expected layout
    #[error("invalid {forge} URL format: {url}")]
    InvalidForgeUrl { forge: String, url: String },

    /// Transport-level HTTP failure
    #[error("{forge} API request failed: {error}")]
    Request { forge: String, error: String },

    /// Unexpected HTTP status
    #[error("{forge} API returned status {status}{}", reference.as_ref().map(|r| format!(" for ref {r}")).unwrap_or_default())]
    Status {
        forge: String,
        status: u16,
        reference: Option<String>,
    },

    /// Response body could not be decoded
    #[error("failed to decode {forge} response: {error}")]
    Decode { forge: String, error: String },

    /// The git executable is not installed
    #[error("git executable not found in PATH")]
    GitUnavailable,

    /// git ls-remote failed or timed out
    #[error("git ls-remote failed: {error}")]
    LsRemote { error: String },

    /// git ls-remote printed nothing usable
    #[error("could not parse git ls-remote output")]
    LsRemoteOutput,

    /// Remote has no API integration and the git fallback is turned off
    #[error("no API available for {url} and git fallback is disabled")]
    FallbackDisabled { url: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    Read { path: String, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    Parse { path: String, error: String },

    /// Unknown output format
    #[error("invalid output format '{format}': valid formats are json, plain, pretty")]
    InvalidOutputFormat { format: String },
}

/// Top-level flint error type
#[derive(Error, Debug)]
pub enum FlintError {
    /// Lockfile error
    #[error("Lockfile error: {0}")]
    Lock(#[from] LockError),

    /// Update check error
    #[error("Update check error: {0}")]
    Update(#[from] UpdateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Duplicate inputs were found and the caller asked to fail on them
    #[error("multiple versions detected: exiting with error as requested")]
    MultipleVersions,

    /// Outdated inputs were found and the caller asked to fail on them
    #[error("{count} input(s) have newer revisions available")]
    Outdated { count: usize },
}
