//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::config::defaults::DEFAULT_LOCKFILE;
use crate::core::global_config::GlobalConfig;
use crate::error::FlintError;
use crate::infra::dirs::FlintDirs;
use commands::{CheckArgs, Commands};
use output::{color_enabled, validate_output_format, ReportOptions};

/// Flint - flake input linter
///
/// Analyze a flake.lock for inputs locked at several versions and check root
/// inputs for upstream updates.
#[derive(Parser, Debug)]
#[command(name = "flint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to flake.lock
    #[arg(short, long, global = true, env = "FLINT_LOCKFILE", default_value = DEFAULT_LOCKFILE)]
    pub lockfile: PathBuf,

    /// Output format: plain, pretty, or json
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Options for the default `check` command
    #[command(flatten)]
    pub check: CheckArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct RunContext {
    pub lockfile: PathBuf,
    pub report: ReportOptions,
    pub quiet: bool,
    pub config: GlobalConfig,
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let config = GlobalConfig::load(&FlintDirs::new())
            .map_err(FlintError::from)
            .context("Failed to load configuration")?;
        let ctx = self.context(config)?;

        match self.command {
            Some(cmd) => cmd.run(&ctx).await,
            None => commands::check::execute(&ctx, &self.check),
        }
    }

    /// Merge flags with the config file
    fn context(&self, config: GlobalConfig) -> Result<RunContext> {
        let format = self
            .output
            .as_deref()
            .or(config.output.format.as_deref())
            .unwrap_or("pretty");
        let format = validate_output_format(format).map_err(FlintError::from)?;

        let color = color_enabled(self.no_color, config.output.color);
        if !color {
            colored::control::set_override(false);
        }

        Ok(RunContext {
            lockfile: self.lockfile.clone(),
            report: ReportOptions {
                format,
                merge: config.output.merge.unwrap_or(false),
                verbose: self.verbose > 0,
                color,
            },
            quiet: self.quiet,
            config,
        })
    }
}
