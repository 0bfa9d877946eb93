//! Upstream API endpoints

/// GitHub REST API base URL
pub const GITHUB_API: &str = "https://api.github.com";

/// GitLab REST API base URL
pub const GITLAB_API: &str = "https://gitlab.com/api/v4";

/// Host whose clone URLs are resolved through the GitHub API
pub const GITHUB_HOST: &str = "github.com";

/// Host whose clone URLs are resolved through the GitLab API
pub const GITLAB_HOST: &str = "gitlab.com";
