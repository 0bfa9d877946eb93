//! Flint CLI - flake input linter
//!
//! Entry point for the flint command-line application.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use flint::cli::output::display_error;
use flint::cli::Cli;

/// Log filter from `RUST_LOG`, else from the `-v` count
fn env_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        };
        EnvFilter::default().add_directive(level.into())
    })
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli.run().await {
        display_error(&e);
        std::process::exit(1);
    }
}
