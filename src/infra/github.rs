//! GitHub REST lookups
//!
//! Resolves a branch or tag of a github.com repository to a commit hash.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use crate::error::ForgeError;
use crate::infra::http::{decode, Forge, ForgeClient};

#[derive(Debug, Deserialize)]
struct Repository {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct GitObject {
    sha: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct GitRef {
    object: GitObject,
}

#[derive(Debug, Deserialize)]
struct AnnotatedTag {
    object: GitObject,
}

fn repo_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"github\.com[/:]([^/]+)/([^/]+?)(?:\.git)?/?$").expect("valid regex")
    })
}

/// Extract `(owner, repo)` from a github.com clone URL
pub fn parse_repo_url(url: &str) -> Result<(String, String), ForgeError> {
    repo_url_regex()
        .captures(url)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .ok_or_else(|| ForgeError::InvalidForgeUrl {
            forge: Forge::GitHub.to_string(),
            url: url.to_string(),
        })
}

/// Latest commit of `git_ref` in a github.com repository
///
/// An empty ref or `HEAD` means the default branch. Branches are tried
/// before tags; annotated tags are peeled to their commit.
pub async fn latest_commit(
    client: &ForgeClient,
    clone_url: &str,
    git_ref: &str,
) -> Result<String, ForgeError> {
    let (owner, repo) = parse_repo_url(clone_url)?;
    let base = format!("{}/repos/{owner}/{repo}", client.api_base(Forge::GitHub));

    let git_ref = if git_ref.is_empty() || git_ref == "HEAD" {
        let repository: Repository = client.get_json(Forge::GitHub, &base, None).await?;
        tracing::debug!("Default branch of {owner}/{repo} is {}", repository.default_branch);
        repository.default_branch
    } else {
        git_ref.to_string()
    };

    let mut response = client
        .get(Forge::GitHub, &format!("{base}/git/refs/heads/{git_ref}"))
        .await?;
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        tracing::debug!("{git_ref} is not a branch of {owner}/{repo}, trying tags");
        response = client
            .get(Forge::GitHub, &format!("{base}/git/refs/tags/{git_ref}"))
            .await?;
    }
    let found: GitRef = decode(Forge::GitHub, response, Some(&git_ref)).await?;

    if found.object.kind != "tag" {
        return Ok(found.object.sha);
    }

    let tag_url = format!("{base}/git/tags/{}", found.object.sha);
    match client.get_json::<AnnotatedTag>(Forge::GitHub, &tag_url, None).await {
        Ok(tag) => Ok(tag.object.sha),
        Err(e) => {
            tracing::debug!("Could not peel tag {git_ref}: {e}");
            Ok(found.object.sha)
        }
    }
}
