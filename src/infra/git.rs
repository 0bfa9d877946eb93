//! Remote ref listing through the git CLI
//!
//! Used for remotes without a REST integration. The lookup is a single
//! `git ls-remote`; nothing is cloned.

use futures::future::BoxFuture;
use std::fmt;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::defaults;
use crate::error::ForgeError;

/// Lists refs of a remote repository
///
/// `git_ref` of `None` asks for the remote's `HEAD`. Implementations return
/// the raw `ls-remote` output; see [`parse_ls_remote`].
pub trait RemoteRefLister: Send + Sync + fmt::Debug {
    fn ls_remote<'a>(
        &'a self,
        url: &'a str,
        git_ref: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, ForgeError>>;
}

/// [`RemoteRefLister`] backed by the system `git` executable
#[derive(Debug, Clone)]
pub struct GitCli {
    timeout: Duration,
}

impl GitCli {
    /// Create a lister with the default timeout
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(defaults::GIT_LS_REMOTE_TIMEOUT_SECS),
        }
    }

    async fn run(&self, args: Vec<String>) -> Result<String, ForgeError> {
        let git = which::which("git").map_err(|_| ForgeError::GitUnavailable)?;

        tracing::debug!(target: "git", "Executing command: git {}", args.join(" "));

        let mut cmd = Command::new(git);
        cmd.args(&args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match timeout(self.timeout, cmd.output()).await {
            Ok(result) => result.map_err(|e| ForgeError::LsRemote {
                error: e.to_string(),
            })?,
            Err(_) => {
                tracing::warn!(
                    target: "git",
                    "Command timed out after {} seconds: git {}",
                    self.timeout.as_secs(),
                    args.join(" ")
                );
                return Err(ForgeError::LsRemote {
                    error: format!("timed out after {} seconds", self.timeout.as_secs()),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!(
                target: "git",
                "Command failed with exit code: {:?}",
                output.status.code()
            );
            return Err(ForgeError::LsRemote { error: stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteRefLister for GitCli {
    fn ls_remote<'a>(
        &'a self,
        url: &'a str,
        git_ref: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, ForgeError>> {
        Box::pin(self.run(ls_remote_args(url, git_ref)))
    }
}

/// Arguments for `git ls-remote`
///
/// A named ref is queried together with its peeled form (`ref^{}`) so that
/// annotated tags resolve to the tagged commit.
pub fn ls_remote_args(url: &str, git_ref: Option<&str>) -> Vec<String> {
    match git_ref {
        None => vec!["ls-remote".into(), url.into(), "HEAD".into()],
        Some(name) => vec![
            "ls-remote".into(),
            "--heads".into(),
            "--tags".into(),
            url.into(),
            name.into(),
            format!("{name}^{{}}"),
        ],
    }
}

/// Pick the commit hash out of `git ls-remote` output
///
/// For `HEAD` the first hash wins. For a named ref a peeled tag line
/// (`...^{}`) wins over the first hash.
pub fn parse_ls_remote(output: &str, git_ref: Option<&str>) -> Result<String, ForgeError> {
    let mut first = None;
    for line in output.lines() {
        let mut fields = line.split_whitespace();
        let (Some(hash), name) = (fields.next(), fields.next()) else {
            continue;
        };

        if git_ref.is_none() {
            return Ok(hash.to_string());
        }
        let Some(name) = name else {
            continue;
        };
        if name.ends_with("^{}") {
            return Ok(hash.to_string());
        }
        first.get_or_insert(hash);
    }

    first.map(str::to_string).ok_or(ForgeError::LsRemoteOutput)
}

/// Turn a locked git URL into something `git ls-remote` can reach anonymously
///
/// `git://` becomes `https://`, and a bare `host/path` gets an `https://`
/// scheme.
pub fn normalize_git_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("git://") {
        return format!("https://{rest}");
    }
    if url.contains("://") {
        return url.to_string();
    }
    format!("https://{url}")
}

/// Whether a URL uses an SSH transport
pub fn is_ssh_url(url: &str) -> bool {
    if url.starts_with("ssh://") || url.starts_with("git+ssh://") {
        return true;
    }
    // scp-like syntax: user@host:path
    !url.contains("://")
        && url
            .split_once(':')
            .is_some_and(|(user_host, _)| user_host.contains('@'))
}

/// Resolve a remote ref to a commit hash with `lister`
pub async fn resolve_commit(
    lister: &dyn RemoteRefLister,
    url: &str,
    git_ref: Option<&str>,
) -> Result<String, ForgeError> {
    let url = normalize_git_url(url);
    let output = lister.ls_remote(&url, git_ref).await?;
    parse_ls_remote(&output, git_ref)
}
