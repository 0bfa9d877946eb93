//! GitLab REST lookups
//!
//! Resolves a branch or tag of a gitlab.com project to a commit hash.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use crate::error::ForgeError;
use crate::infra::http::{decode, Forge, ForgeClient};

#[derive(Debug, Deserialize)]
struct Project {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct Commit {
    id: String,
}

/// Branch or tag; both carry the commit they point at
#[derive(Debug, Deserialize)]
struct NamedRef {
    commit: Commit,
}

fn repo_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"gitlab\.com[/:]([^/]+)/([^/]+?)(?:\.git)?/?$").expect("valid regex")
    })
}

/// Extract `(owner, repo)` from a gitlab.com clone URL
pub fn parse_repo_url(url: &str) -> Result<(String, String), ForgeError> {
    repo_url_regex()
        .captures(url)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .ok_or_else(|| ForgeError::InvalidForgeUrl {
            forge: Forge::GitLab.to_string(),
            url: url.to_string(),
        })
}

/// Percent-encode `/` for use inside a single path segment
fn encode_segment(s: &str) -> String {
    s.replace('/', "%2F")
}

/// Latest commit of `git_ref` in a gitlab.com project
///
/// An empty ref or `HEAD` means the default branch. Branches are tried
/// before tags.
pub async fn latest_commit(
    client: &ForgeClient,
    clone_url: &str,
    git_ref: &str,
) -> Result<String, ForgeError> {
    let (owner, repo) = parse_repo_url(clone_url)?;
    let base = format!(
        "{}/projects/{}",
        client.api_base(Forge::GitLab),
        encode_segment(&format!("{owner}/{repo}"))
    );

    let git_ref = if git_ref.is_empty() || git_ref == "HEAD" {
        let project: Project = client.get_json(Forge::GitLab, &base, None).await?;
        tracing::debug!("Default branch of {owner}/{repo} is {}", project.default_branch);
        project.default_branch
    } else {
        git_ref.to_string()
    };

    let encoded = encode_segment(&git_ref);
    let mut response = client
        .get(Forge::GitLab, &format!("{base}/repository/branches/{encoded}"))
        .await?;
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        tracing::debug!("{git_ref} is not a branch of {owner}/{repo}, trying tags");
        response = client
            .get(Forge::GitLab, &format!("{base}/repository/tags/{encoded}"))
            .await?;
    }

    let found: NamedRef = decode(Forge::GitLab, response, Some(&git_ref)).await?;
    Ok(found.commit.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::http::ClientOptions;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CLONE_URL: &str = "https://gitlab.com/group/project.git";
    const COMMIT: &str = "0123456789abcdef0123456789abcdef01234567";

    fn client_for(server: &MockServer) -> ForgeClient {
        ForgeClient::with_options(ClientOptions {
            gitlab_api: server.uri(),
            ..ClientOptions::default()
        })
    }

    async fn mount_json(server: &MockServer, at: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    async fn mount_status(server: &MockServer, at: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(status))
            .mount(server)
            .await;
    }

    #[test]
    fn test_parse_repo_url() {
        assert_eq!(
            parse_repo_url(CLONE_URL).unwrap(),
            ("group".to_string(), "project".to_string())
        );
        assert!(parse_repo_url("https://github.com/a/b.git").is_err());
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("group/project"), "group%2Fproject");
        assert_eq!(encode_segment("main"), "main");
    }

    #[tokio::test]
    async fn test_branch_lookup() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/projects/group%2Fproject/repository/branches/main",
            json!({"name": "main", "commit": {"id": COMMIT}}),
        )
        .await;

        let rev = latest_commit(&client_for(&server), CLONE_URL, "main").await.unwrap();
        assert_eq!(rev, COMMIT);
    }

    #[tokio::test]
    async fn test_default_branch_then_tag_fallback() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/projects/group%2Fproject",
            json!({"default_branch": "v2"}),
        )
        .await;
        mount_status(&server, "/projects/group%2Fproject/repository/branches/v2", 404).await;
        mount_json(
            &server,
            "/projects/group%2Fproject/repository/tags/v2",
            json!({"name": "v2", "commit": {"id": COMMIT}}),
        )
        .await;

        let rev = latest_commit(&client_for(&server), CLONE_URL, "").await.unwrap();
        assert_eq!(rev, COMMIT);
    }

    #[tokio::test]
    async fn test_missing_ref_reports_status() {
        let server = MockServer::start().await;
        mount_status(&server, "/projects/group%2Fproject/repository/branches/gone", 404).await;
        mount_status(&server, "/projects/group%2Fproject/repository/tags/gone", 404).await;

        let err = latest_commit(&client_for(&server), CLONE_URL, "gone")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "GitLab API returned status 404 for ref gone");
    }
}
