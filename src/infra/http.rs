//! Shared HTTP client for forge APIs
//!
//! One [`ForgeClient`] is built per invocation and cloned into every update
//! worker; clones share the underlying connection pool.

use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

use crate::config::{defaults, urls};
use crate::error::ForgeError;

/// Forges with a dedicated REST integration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forge {
    GitHub,
    GitLab,
}

impl fmt::Display for Forge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub => f.write_str("GitHub"),
            Self::GitLab => f.write_str("GitLab"),
        }
    }
}

/// Settings used to build a [`ForgeClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Per-request timeout
    pub timeout: Duration,
    /// GitHub REST API base URL
    pub github_api: String,
    /// GitLab REST API base URL
    pub gitlab_api: String,
    /// Token sent to the GitHub API
    pub github_token: Option<String>,
    /// Token sent to the GitLab API
    pub gitlab_token: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(defaults::HTTP_TIMEOUT_SECS),
            github_api: urls::GITHUB_API.to_string(),
            gitlab_api: urls::GITLAB_API.to_string(),
            github_token: None,
            gitlab_token: None,
        }
    }
}

/// HTTP client for forge REST APIs
#[derive(Clone)]
pub struct ForgeClient {
    client: reqwest::Client,
    github_api: String,
    gitlab_api: String,
    github_token: Option<String>,
    gitlab_token: Option<String>,
}

impl fmt::Debug for ForgeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForgeClient")
            .field("github_api", &self.github_api)
            .field("gitlab_api", &self.gitlab_api)
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("gitlab_token", &self.gitlab_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ForgeClient {
    /// Create a client with default settings
    pub fn new() -> Self {
        Self::with_options(ClientOptions::default())
    }

    /// Create a client with custom settings
    pub fn with_options(options: ClientOptions) -> Self {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .pool_max_idle_per_host(defaults::HTTP_MAX_IDLE_PER_HOST)
            .pool_idle_timeout(Duration::from_secs(defaults::HTTP_IDLE_TIMEOUT_SECS))
            .user_agent(concat!("flint/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            github_api: options.github_api.trim_end_matches('/').to_string(),
            gitlab_api: options.gitlab_api.trim_end_matches('/').to_string(),
            github_token: options.github_token,
            gitlab_token: options.gitlab_token,
        }
    }

    /// Base URL of the given forge's API
    pub fn api_base(&self, forge: Forge) -> &str {
        match forge {
            Forge::GitHub => &self.github_api,
            Forge::GitLab => &self.gitlab_api,
        }
    }

    /// Send a GET request to a forge API
    ///
    /// Only transport failures are errors here; status handling is left to
    /// the caller so it can retry a 404 under another ref namespace.
    pub async fn get(&self, forge: Forge, url: &str) -> Result<reqwest::Response, ForgeError> {
        tracing::debug!("Fetching: {url}");

        let mut request = self.client.get(url);
        request = match forge {
            Forge::GitHub => {
                let request = request.header("Accept", "application/vnd.github+json");
                match &self.github_token {
                    Some(token) => request.bearer_auth(token),
                    None => request,
                }
            }
            Forge::GitLab => match &self.gitlab_token {
                Some(token) => request.header("PRIVATE-TOKEN", token),
                None => request,
            },
        };

        request.send().await.map_err(|e| ForgeError::Request {
            forge: forge.to_string(),
            error: e.to_string(),
        })
    }

    /// GET a URL and decode a successful JSON response
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        forge: Forge,
        url: &str,
        reference: Option<&str>,
    ) -> Result<T, ForgeError> {
        let response = self.get(forge, url).await?;
        decode(forge, response, reference).await
    }
}

impl Default for ForgeClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a JSON body, rejecting non-200 responses
pub async fn decode<T: DeserializeOwned>(
    forge: Forge,
    response: reqwest::Response,
    reference: Option<&str>,
) -> Result<T, ForgeError> {
    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(ForgeError::Status {
            forge: forge.to_string(),
            status: status.as_u16(),
            reference: reference.map(str::to_string),
        });
    }

    response.json::<T>().await.map_err(|e| ForgeError::Decode {
        forge: forge.to_string(),
        error: e.to_string(),
    })
}
