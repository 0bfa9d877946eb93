//! Update checking for root inputs
//!
//! Each input declared on the root node is resolved to the newest upstream
//! commit of the branch or tag it tracks. Inputs are resolved concurrently,
//! one task per input; a failure only marks that input's status.
//!
//! github.com and gitlab.com are queried through their REST APIs. Every other
//! remote is asked with `git ls-remote`.

use regex::Regex;
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use tokio::task::AbortHandle;

use crate::config::urls;
use crate::core::identity::{flake_ref, is_commit_hash};
use crate::core::lock::{FlakeLock, InputRef, Locked, Node, SourceType};
use crate::error::{ForgeError, UpdateError};
use crate::infra::git::{self, GitCli, RemoteRefLister};
use crate::infra::http::ForgeClient;
use crate::infra::{github, gitlab};

/// Update state of one root input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateStatus {
    /// Name under which the root node declares the input
    pub input_name: String,
    /// Currently locked revision
    pub current_rev: String,
    /// Flake reference of the locked source
    pub current_url: String,
    /// Newest upstream revision
    pub latest_rev: String,
    /// Flake reference the newest revision was found at
    pub latest_url: String,
    /// Whether a different upstream revision exists
    pub is_update: bool,
    /// Why the input could not be resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UpdateStatus {
    fn new(input_name: impl Into<String>) -> Self {
        Self {
            input_name: input_name.into(),
            ..Self::default()
        }
    }

    fn failed(mut self, error: impl ToString) -> Self {
        let error = error.to_string();
        tracing::warn!("{}: {error}", self.input_name);
        self.error = Some(error);
        self
    }
}

/// Update states of every root input, ordered by input name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateResults {
    pub updates: Vec<UpdateStatus>,
}

impl UpdateResults {
    /// Inputs with a newer upstream revision
    pub fn outdated(&self) -> impl Iterator<Item = &UpdateStatus> {
        self.updates.iter().filter(|s| s.is_update)
    }

    /// Inputs that could not be resolved
    pub fn failed(&self) -> impl Iterator<Item = &UpdateStatus> {
        self.updates.iter().filter(|s| s.error.is_some())
    }

    /// Status of the named input
    pub fn get(&self, input_name: &str) -> Option<&UpdateStatus> {
        self.updates.iter().find(|s| s.input_name == input_name)
    }
}

/// Where to look for an input's newest revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Pinned to an exact commit; no lookup needed
    Pinned,
    /// Resolve `git_ref` (empty for the default branch) at `clone_url`
    Remote { clone_url: String, git_ref: String },
}

fn tarball_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(https?://[^/]+/[^/]+/[^/]+)/(?:archive|releases/download)/(?:refs/tags/)?([^/]+)(?:/[^/]+)?(?:\.tar\.gz|\.zip|\.tar\.xz)",
        )
        .expect("valid regex")
    })
}

/// Reconstruct the repository behind a forge-style tarball URL
///
/// `https://host/owner/repo/archive/<ref>.tar.gz` and
/// `https://host/owner/repo/releases/download/<ref>/<asset>.tar.gz` map to
/// `https://host/owner/repo.git` at `<ref>`. A commit hash ref is pinned.
/// Anything after the archive suffix, such as a query string, is ignored.
pub fn tarball_lookup(url: &str) -> Result<Lookup, ForgeError> {
    let caps = tarball_regex()
        .captures(url)
        .ok_or_else(|| ForgeError::UnparseableTarball {
            url: url.to_string(),
        })?;

    let git_ref = &caps[2];
    if is_commit_hash(git_ref) {
        return Ok(Lookup::Pinned);
    }

    Ok(Lookup::Remote {
        clone_url: format!("{}.git", &caps[1]),
        git_ref: git_ref.to_string(),
    })
}

fn forge_clone_url(kind: &SourceType, host: &str, owner: &str, repo: &str) -> String {
    match kind {
        SourceType::Sourcehut => {
            let host = if host.is_empty() { "git.sr.ht" } else { host };
            format!("https://{host}/{owner}/{repo}")
        }
        _ => {
            let default_host = format!("{kind}.com");
            let host = if host.is_empty() { default_host.as_str() } else { host };
            format!("https://{host}/{owner}/{repo}.git")
        }
    }
}

fn git_lookup(url: &str, git_ref: &str) -> Result<Lookup, ForgeError> {
    if git::is_ssh_url(url) {
        return Err(ForgeError::SshUnsupported {
            url: url.to_string(),
        });
    }
    Ok(Lookup::Remote {
        clone_url: url.to_string(),
        git_ref: git_ref.to_string(),
    })
}

fn or_else<'a>(preferred: &'a str, fallback: &'a str) -> &'a str {
    if preferred.is_empty() {
        fallback
    } else {
        preferred
    }
}

/// Decide how to find the newest revision of a locked node
///
/// The `original` descriptor says what the user asked to track and drives
/// the decision; without one the locked descriptor is used. Sourcehut is
/// only recognized on the locked descriptor.
pub fn plan_lookup(node: &Node, locked: &Locked) -> Result<Lookup, ForgeError> {
    if let Some(original) = &node.original {
        if is_commit_hash(&original.git_ref) {
            return Ok(Lookup::Pinned);
        }

        let kind = original.source_type();
        return match kind {
            SourceType::Github | SourceType::Gitlab => Ok(Lookup::Remote {
                clone_url: forge_clone_url(
                    &kind,
                    or_else(&locked.host, &original.host),
                    or_else(&locked.owner, &original.owner),
                    or_else(&locked.repo, &original.repo),
                ),
                git_ref: original.git_ref.clone(),
            }),
            SourceType::Git => git_lookup(or_else(&locked.url, &original.url), &original.git_ref),
            SourceType::Tarball => tarball_lookup(or_else(&locked.url, &original.url)),
            _ => Err(ForgeError::UnsupportedType {
                kind: original.kind.clone(),
            }),
        };
    }

    match locked.source_type() {
        forge if forge.is_forge() => Ok(Lookup::Remote {
            clone_url: forge_clone_url(&forge, &locked.host, &locked.owner, &locked.repo),
            git_ref: locked.git_ref.clone(),
        }),
        SourceType::Git => git_lookup(&locked.url, &locked.git_ref),
        SourceType::Tarball => tarball_lookup(&locked.url),
        _ => Err(ForgeError::UnsupportedType {
            kind: locked.kind.clone(),
        }),
    }
}

/// Host part of a URL, without scheme, credentials or port
fn url_host(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split('/').next().unwrap_or_default();
    let host = authority.rsplit('@').next().unwrap_or(authority);
    host.split(':').next().unwrap_or(host)
}

/// Aborts every spawned lookup if `check_updates` is dropped early
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Resolves newest upstream revisions for a lockfile's root inputs
#[derive(Debug, Clone)]
pub struct UpdateChecker {
    client: ForgeClient,
    lister: Arc<dyn RemoteRefLister>,
    git_fallback: bool,
}

impl UpdateChecker {
    /// Create a checker using the system `git` for the fallback
    pub fn new(client: ForgeClient) -> Self {
        Self {
            client,
            lister: Arc::new(GitCli::new()),
            git_fallback: true,
        }
    }

    /// Use a different ref lister for remotes without an API
    #[must_use]
    pub fn with_lister(mut self, lister: Arc<dyn RemoteRefLister>) -> Self {
        self.lister = lister;
        self
    }

    /// Enable or disable the `git ls-remote` fallback
    #[must_use]
    pub fn git_fallback(mut self, enabled: bool) -> Self {
        self.git_fallback = enabled;
        self
    }

    /// Resolve every root input of `lock`
    ///
    /// Fails only when the root node is missing or declares no inputs. All
    /// other problems are recorded on the affected input's status.
    pub async fn check_updates(&self, lock: &FlakeLock) -> Result<UpdateResults, UpdateError> {
        let root = lock.root_node().ok_or_else(|| UpdateError::NoRootNode {
            root: lock.root.clone(),
        })?;
        if root.inputs.is_empty() {
            return Err(UpdateError::NoRootInputs);
        }

        tracing::debug!("Checking {} root inputs", root.inputs.len());

        let mut names = Vec::with_capacity(root.inputs.len());
        let mut handles = Vec::with_capacity(root.inputs.len());
        for (name, reference) in &root.inputs {
            let checker = self.clone();
            let input_name = name.clone();
            let reference = reference.clone();
            let node = match &reference {
                InputRef::Node(target) => lock.node(target).cloned(),
                _ => None,
            };
            names.push(name.clone());
            handles.push(tokio::spawn(async move {
                checker.check_input(input_name, reference, node).await
            }));
        }

        let guard = AbortOnDrop(handles.iter().map(|h| h.abort_handle()).collect());
        let joined = futures::future::join_all(handles).await;
        drop(guard);

        let updates = names
            .into_iter()
            .zip(joined)
            .map(|(name, result)| {
                result.unwrap_or_else(|e| UpdateStatus::new(name).failed(format!("update task failed: {e}")))
            })
            .collect();

        Ok(UpdateResults { updates })
    }

    async fn check_input(&self, input_name: String, reference: InputRef, node: Option<Node>) -> UpdateStatus {
        let status = UpdateStatus::new(input_name);

        let target = match &reference {
            InputRef::Node(target) => target,
            InputRef::Follows(_) => return status.failed(ForgeError::Follows),
            InputRef::Unknown(_) => return status.failed(ForgeError::InvalidReference),
        };
        let Some(node) = node else {
            return status.failed(ForgeError::NodeNotFound {
                node: target.clone(),
            });
        };
        let Some(locked) = node.locked.as_ref() else {
            let input = status.input_name.clone();
            return status.failed(ForgeError::NotLocked { input });
        };

        self.resolve(status, &node, locked).await
    }

    async fn resolve(&self, mut status: UpdateStatus, node: &Node, locked: &Locked) -> UpdateStatus {
        status.current_rev = locked.rev.clone();
        status.current_url = flake_ref(locked);

        let lookup = match plan_lookup(node, locked) {
            Ok(lookup) => lookup,
            Err(e) => return status.failed(e),
        };

        match lookup {
            Lookup::Pinned => {
                tracing::info!("{} is pinned to a commit, skipping", status.input_name);
                status.latest_rev = status.current_rev.clone();
                status.latest_url = status.current_url.clone();
            }
            Lookup::Remote { clone_url, git_ref } => {
                match self.latest_commit(&clone_url, &git_ref).await {
                    Ok(rev) => {
                        status.is_update = !rev.is_empty() && rev != status.current_rev;
                        status.latest_rev = rev;
                        status.latest_url = status.current_url.clone();
                    }
                    Err(e) => return status.failed(format!("failed to get latest revision: {e}")),
                }
            }
        }

        status
    }

    /// Newest commit of `git_ref` at `clone_url`
    ///
    /// API errors fall through to `git ls-remote` when the fallback is on.
    pub async fn latest_commit(&self, clone_url: &str, git_ref: &str) -> Result<String, ForgeError> {
        let host = url_host(clone_url);
        let api = if host == urls::GITHUB_HOST {
            Some(github::latest_commit(&self.client, clone_url, git_ref).await)
        } else if host == urls::GITLAB_HOST {
            Some(gitlab::latest_commit(&self.client, clone_url, git_ref).await)
        } else {
            None
        };

        let api_error = match api {
            Some(Ok(rev)) => return Ok(rev),
            Some(Err(e)) => {
                tracing::debug!("API lookup for {clone_url} failed: {e}");
                Some(e)
            }
            None => None,
        };

        if !self.git_fallback {
            return Err(api_error.unwrap_or_else(|| ForgeError::FallbackDisabled {
                url: clone_url.to_string(),
            }));
        }

        tracing::debug!("Falling back to git ls-remote for {clone_url}");
        let git_ref = (!git_ref.is_empty() && git_ref != "HEAD").then_some(git_ref);
        match git::resolve_commit(self.lister.as_ref(), clone_url, git_ref).await {
            Ok(rev) => Ok(rev),
            Err(e) => Err(api_error.unwrap_or(e)),
        }
    }
}
