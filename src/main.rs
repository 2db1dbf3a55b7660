//! abuse - Load generation against a running lakeFS instance

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string())),
        )
        .with_writer(std::io::stderr)
        .init();

    let summaries = cli.run().await?;

    if cli.should_fail(&summaries) {
        let failures: u64 = summaries.iter().map(|s| s.failures).sum();
        tracing::error!(failures, "Run finished with failed requests");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
