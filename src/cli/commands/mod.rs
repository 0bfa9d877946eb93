//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod check;
pub mod updates;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::RunContext;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report inputs locked at more than one version (default)
    Check(CheckArgs),

    /// Check root inputs for newer upstream revisions
    Updates(UpdatesArgs),
}

/// Options for `flint check`
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Merge all dependants into one list for each input
    #[arg(short, long)]
    pub merge: bool,

    /// Exit with an error if any input has multiple versions
    #[arg(long)]
    pub fail_if_multiple_versions: bool,
}

/// Options for `flint updates`
#[derive(Args, Debug, Clone, Default)]
pub struct UpdatesArgs {
    /// Exit with an error if any input has a newer revision
    #[arg(long)]
    pub fail_if_outdated: bool,

    /// Never run `git ls-remote` for remotes without an API
    #[arg(long)]
    pub no_git_fallback: bool,

    /// GitHub API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitLab API token
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub gitlab_token: Option<String>,
}

impl Commands {
    /// Execute the command
    pub async fn run(self, ctx: &RunContext) -> Result<()> {
        match self {
            Self::Check(args) => check::execute(ctx, &args),
            Self::Updates(args) => updates::execute(ctx, args).await,
        }
    }
}
