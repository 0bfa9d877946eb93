//! Platform-specific directory management
//!
//! Follows the XDG Base Directory Specification on Linux and standard
//! locations on macOS. `FLINT_CONFIG_DIR` overrides the config directory.

use std::env;
use std::path::PathBuf;

use crate::config::defaults::CONFIG_FILE_NAME;

/// Environment variable overriding the config directory
pub const ENV_CONFIG_DIR: &str = "FLINT_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "flint";

/// Platform-specific directory provider for flint
#[derive(Debug, Clone)]
pub struct FlintDirs {
    config_dir: PathBuf,
}

impl FlintDirs {
    /// Create a new `FlintDirs` instance
    ///
    /// Checks the environment first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Create an instance rooted at an explicit config directory
    #[must_use]
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/flint` or `~/.config/flint`
    /// - macOS: `~/Library/Application Support/flint`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Get the global config file path
    #[must_use]
    pub fn global_config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    fn resolve_config_dir() -> PathBuf {
        match env::var(ENV_CONFIG_DIR) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => Self::platform_config_dir(),
        }
    }

    fn platform_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for FlintDirs {
    fn default() -> Self {
        Self::new()
    }
}
