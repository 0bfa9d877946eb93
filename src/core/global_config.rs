//! Global configuration management
//!
//! Reads user preferences from `config.toml` in the config directory.
//! Every field is optional; command-line flags take precedence.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::config::{defaults, urls};
use crate::error::ConfigError;
use crate::infra::dirs::FlintDirs;
use crate::infra::http::ClientOptions;

/// Global configuration for flint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Output preferences
    #[serde(default)]
    pub output: OutputConfig,

    /// Network settings
    #[serde(default)]
    pub network: NetworkConfig,

    /// Update check settings
    #[serde(default)]
    pub updates: UpdatesConfig,
}

/// Output preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format (json, plain, pretty)
    pub format: Option<String>,

    /// Enable colored output
    pub color: Option<bool>,

    /// Merge duplicate dependants by default
    pub merge: Option<bool>,
}

/// Network settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// GitHub API token
    pub github_token: Option<String>,

    /// GitLab API token
    pub gitlab_token: Option<String>,

    /// GitHub API base URL
    pub github_api_url: Option<String>,

    /// GitLab API base URL
    pub gitlab_api_url: Option<String>,
}

/// Update check settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatesConfig {
    /// Fall back to `git ls-remote` for remotes without an API
    pub git_fallback: Option<bool>,
}

impl GlobalConfig {
    /// Load global configuration from the config directory
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the file exists but is not valid TOML.
    pub fn load(dirs: &FlintDirs) -> Result<Self, ConfigError> {
        Self::load_from_path(&dirs.global_config_path())
    }

    /// Load global configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Get the effective request timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.network
                .timeout_secs
                .unwrap_or(defaults::HTTP_TIMEOUT_SECS),
        )
    }

    /// Whether the git fallback is enabled
    #[must_use]
    pub fn git_fallback(&self) -> bool {
        self.updates.git_fallback.unwrap_or(true)
    }

    /// HTTP client options, with explicit tokens taking precedence
    #[must_use]
    pub fn client_options(
        &self,
        github_token: Option<String>,
        gitlab_token: Option<String>,
    ) -> ClientOptions {
        ClientOptions {
            timeout: self.timeout(),
            github_api: self
                .network
                .github_api_url
                .clone()
                .unwrap_or_else(|| urls::GITHUB_API.to_string()),
            gitlab_api: self
                .network
                .gitlab_api_url
                .clone()
                .unwrap_or_else(|| urls::GITLAB_API.to_string()),
            github_token: github_token.or_else(|| self.network.github_token.clone()),
            gitlab_token: gitlab_token.or_else(|| self.network.gitlab_token.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GlobalConfig::default();
        assert!(config.output.format.is_none());
        assert!(config.network.github_token.is_none());
        assert!(config.git_fallback());
        assert_eq!(config.timeout(), Duration::from_secs(defaults::HTTP_TIMEOUT_SECS));
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let config = GlobalConfig::load_from_path(&config_path).unwrap();
        assert!(config.output.color.is_none());
    }

    #[test]
    fn test_load_from_dirs() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("config.toml"), "[output]\nformat = \"json\"\n").unwrap();

        let config = GlobalConfig::load(&FlintDirs::with_config_dir(temp_dir.path())).unwrap();
        assert_eq!(config.output.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_load_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let content = r#"
[output]
format = "plain"
color = false
merge = true

[network]
timeout_secs = 3
github_token = "from-file"
github_api_url = "https://ghe.example.com/api/v3"

[updates]
git_fallback = false
"#;
        fs::write(&config_path, content).unwrap();

        let config = GlobalConfig::load_from_path(&config_path).unwrap();
        assert_eq!(config.output.format.as_deref(), Some("plain"));
        assert_eq!(config.output.color, Some(false));
        assert_eq!(config.output.merge, Some(true));
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert!(!config.git_fallback());

        let options = config.client_options(None, None);
        assert_eq!(options.github_api, "https://ghe.example.com/api/v3");
        assert_eq!(options.gitlab_api, urls::GITLAB_API);
        assert_eq!(options.github_token.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_explicit_token_overrides_file() {
        let mut config = GlobalConfig::default();
        config.network.github_token = Some("from-file".to_string());

        let options = config.client_options(Some("from-env".to_string()), None);
        assert_eq!(options.github_token.as_deref(), Some("from-env"));
        assert!(options.gitlab_token.is_none());
    }

    #[test]
    fn test_load_invalid_toml_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        fs::write(&config_path, "invalid toml [[[").unwrap();

        let result = GlobalConfig::load_from_path(&config_path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
