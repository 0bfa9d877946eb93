//! Default configuration values

/// Lockfile read when `--lockfile` is not given
pub const DEFAULT_LOCKFILE: &str = "flake.lock";

/// Root node name used when the lockfile omits `root`
pub const DEFAULT_ROOT_NODE: &str = "root";

/// Per-request HTTP timeout (in seconds)
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// Idle connections kept per host
pub const HTTP_MAX_IDLE_PER_HOST: usize = 5;

/// How long an idle pooled connection is kept (in seconds)
pub const HTTP_IDLE_TIMEOUT_SECS: u64 = 30;

/// Upper bound on a single `git ls-remote` invocation (in seconds)
pub const GIT_LS_REMOTE_TIMEOUT_SECS: u64 = 30;

/// Config file name inside the flint config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
