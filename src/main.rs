//! branch-sync CLI

mod cli;

use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("branch_sync=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();

    match cli::run_sync_command(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            error!("one or more branch pairs failed to sync");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
