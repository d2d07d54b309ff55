//! Binary crate for the `wxfetch` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Wiring settings into the core fetchers
//! - Human-friendly output plus the delimited strings for downstream scripts

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod output;

/// Logs go to stderr; stdout is reserved for the report.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cmd = cli::Cli::parse();
    match cmd.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // diagnostics share stdout with the report
            println!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
