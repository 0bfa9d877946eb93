//! Check command implementation
//!
//! Implements `flint check`: reports repositories locked at several versions.

use anyhow::{Context, Result};
use std::io::{self, Write};

use super::CheckArgs;
use crate::cli::output::{should_fail_on_duplicates, write_duplicate_report, ReportOptions};
use crate::cli::RunContext;
use crate::core::duplicates::find_duplicates;
use crate::core::graph::analyze;
use crate::core::lock::FlakeLock;
use crate::error::FlintError;

/// Execute the check command
pub fn execute(ctx: &RunContext, args: &CheckArgs) -> Result<()> {
    let lock = FlakeLock::load(&ctx.lockfile).map_err(FlintError::from)?;
    tracing::info!("Checking {}", ctx.lockfile.display());

    let relations = analyze(&lock);
    let groups = find_duplicates(&relations);
    tracing::debug!("Found {} duplicate groups", groups.len());

    if !ctx.quiet {
        let options = ReportOptions {
            merge: args.merge || ctx.report.merge,
            ..ctx.report
        };
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_duplicate_report(&mut out, &relations, &groups, &options)
            .and_then(|()| out.flush())
            .context("Failed to write report")?;
    }

    if should_fail_on_duplicates(args.fail_if_multiple_versions, &groups) {
        return Err(FlintError::MultipleVersions.into());
    }
    Ok(())
}
