//! CLI implementation for `flint updates`
//!
//! Resolves the newest upstream revision of every root input.

use anyhow::{Context, Result};
use std::io::{self, Write};

use super::UpdatesArgs;
use crate::cli::output::{create_spinner, write_update_report, OutputFormat};
use crate::cli::RunContext;
use crate::core::lock::FlakeLock;
use crate::core::update::UpdateChecker;
use crate::error::FlintError;
use crate::infra::http::ForgeClient;

/// Execute the updates command
pub async fn execute(ctx: &RunContext, args: UpdatesArgs) -> Result<()> {
    let lock = FlakeLock::load(&ctx.lockfile).map_err(FlintError::from)?;

    let options = ctx.config.client_options(args.github_token, args.gitlab_token);
    let checker = UpdateChecker::new(ForgeClient::with_options(options))
        .git_fallback(ctx.config.git_fallback() && !args.no_git_fallback);

    let spinner = (!ctx.quiet && ctx.report.format != OutputFormat::Json)
        .then(|| create_spinner("Checking inputs for updates..."));

    let results = checker.check_updates(&lock).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let results = results.map_err(FlintError::from)?;

    if !ctx.quiet {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_update_report(&mut out, &results, &ctx.report)
            .and_then(|()| out.flush())
            .context("Failed to write report")?;
    }

    let outdated = results.outdated().count();
    if args.fail_if_outdated && outdated > 0 {
        return Err(FlintError::Outdated { count: outdated }.into());
    }
    Ok(())
}
