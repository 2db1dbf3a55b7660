//! CLI argument parsing and command dispatch

mod commands;
mod executors;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use stress_client::{ClientConfig, LakeFsClient, RefUri};
use stress_core::{RunSummary, DEFAULT_WORK_BUFFER};

/// Abuse a running lakeFS instance. See sub commands for more info.
#[derive(Parser, Debug)]
#[command(name = "abuse")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// lakeFS server endpoint
    #[arg(long, global = true, env = "LAKECTL_SERVER_ENDPOINT_URL", default_value = "http://127.0.0.1:8000")]
    pub endpoint: String,

    /// Access key ID
    #[arg(long, global = true, env = "LAKECTL_CREDENTIALS_ACCESS_KEY_ID", default_value = "", hide_default_value = true)]
    pub access_key_id: String,

    /// Secret access key
    #[arg(long, global = true, env = "LAKECTL_CREDENTIALS_SECRET_ACCESS_KEY", default_value = "", hide_env_values = true, hide_default_value = true)]
    pub secret_access_key: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 60)]
    pub request_timeout: u64,

    /// Exit non-zero if any individual request failed
    #[arg(long, global = true)]
    pub fail_on_errors: bool,

    /// Print run summaries as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read keys from a file and generate random reads from the source ref for those keys
    RandomRead(RandomReadArgs),

    /// Generate random writes to the source branch
    RandomWrite(RandomWriteArgs),

    /// Create a lot of branches very quickly
    CreateBranches(CreateBranchesArgs),
}

/// Sizing shared by every load command
#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Amount of things to do
    #[arg(long, default_value_t = 1_000_000)]
    pub amount: usize,

    /// Amount of things to do in parallel
    #[arg(long, default_value_t = 100)]
    pub parallelism: usize,

    /// Maximum number of tokens waiting to be worked on
    #[arg(long, default_value_t = DEFAULT_WORK_BUFFER)]
    pub queue_capacity: usize,
}

#[derive(Args, Debug)]
pub struct RandomReadArgs {
    /// Source ref URI (lakefs://<repository>/<ref>)
    #[arg(value_parser = parse_ref_uri)]
    pub source: RefUri,

    /// Read keys from this file ("-" for stdin)
    #[arg(long)]
    pub from_file: String,

    #[command(flatten)]
    pub load: LoadArgs,
}

#[derive(Args, Debug)]
pub struct RandomWriteArgs {
    /// Source branch URI (lakefs://<repository>/<branch>)
    #[arg(value_parser = parse_ref_uri)]
    pub source: RefUri,

    /// Prefix to create paths under
    #[arg(long, default_value = "abuse/")]
    pub prefix: String,

    #[command(flatten)]
    pub load: LoadArgs,
}

#[derive(Args, Debug)]
pub struct CreateBranchesArgs {
    /// Source ref URI (lakefs://<repository>/<ref>)
    #[arg(value_parser = parse_ref_uri)]
    pub source: RefUri,

    /// Prefix to create branches under
    #[arg(long, default_value = "abuse-")]
    pub branch_prefix: String,

    /// Only clean up past runs
    #[arg(long)]
    pub clean_only: bool,

    #[command(flatten)]
    pub load: LoadArgs,
}

fn parse_ref_uri(value: &str) -> std::result::Result<RefUri, String> {
    value.parse().map_err(|e: stress_client::ClientError| e.to_string())
}

impl Cli {
    /// Log filter directive implied by `--verbose`
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Run the selected command and return the summaries of its runs
    pub async fn run(&self) -> Result<Vec<RunSummary>> {
        let config = ClientConfig::new(
            &self.endpoint,
            &self.access_key_id,
            &self.secret_access_key,
        )
        .with_request_timeout(Duration::from_secs(self.request_timeout));
        let client = LakeFsClient::new(&config).context("Failed to create lakeFS client")?;

        tracing::debug!(endpoint = %self.endpoint, "Connecting to lakeFS");

        let summaries = match &self.command {
            Commands::RandomRead(args) => vec![commands::random_read(self, client, args).await?],
            Commands::RandomWrite(args) => vec![commands::random_write(self, client, args).await?],
            Commands::CreateBranches(args) => commands::create_branches(self, client, args).await?,
        };

        Ok(summaries)
    }

    /// Print one run summary in the selected format
    pub fn report(&self, label: &str, summary: &RunSummary) -> Result<()> {
        if self.json {
            let json = serde_json::to_string(summary).context("Failed to serialize run summary")?;
            println!("{}", json);
        } else {
            println!("\n{}", label);
            println!("{}", summary);
        }
        Ok(())
    }

    /// Whether the finished runs should produce a failing exit status
    pub fn should_fail(&self, summaries: &[RunSummary]) -> bool {
        self.fail_on_errors && summaries.iter().any(|s| !s.is_clean())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_random_read_defaults() {
        let cli = Cli::try_parse_from([
            "abuse",
            "random-read",
            "lakefs://repo/main",
            "--from-file",
            "keys.txt",
        ])
        .unwrap();

        match &cli.command {
            Commands::RandomRead(args) => {
                assert_eq!(args.source.repository, "repo");
                assert_eq!(args.source.reference, "main");
                assert_eq!(args.from_file, "keys.txt");
                assert_eq!(args.load.amount, 1_000_000);
                assert_eq!(args.load.parallelism, 100);
                assert_eq!(args.load.queue_capacity, DEFAULT_WORK_BUFFER);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(!cli.fail_on_errors);
        assert_eq!(cli.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_create_branches_flags() {
        let cli = Cli::try_parse_from([
            "abuse",
            "create-branches",
            "lakefs://repo/main",
            "--clean-only",
            "--amount",
            "10",
            "--parallelism",
            "4",
            "--verbose",
            "--fail-on-errors",
        ])
        .unwrap();

        match &cli.command {
            Commands::CreateBranches(args) => {
                assert!(args.clean_only);
                assert_eq!(args.branch_prefix, "abuse-");
                assert_eq!(args.load.amount, 10);
                assert_eq!(args.load.parallelism, 4);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(cli.fail_on_errors);
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_random_write_prefix_default() {
        let cli = Cli::try_parse_from(["abuse", "random-write", "lakefs://repo/dev"]).unwrap();
        match cli.command {
            Commands::RandomWrite(args) => assert_eq!(args.prefix, "abuse/"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_uri() {
        let err = Cli::try_parse_from(["abuse", "random-write", "s3://bucket/key"]).unwrap_err();
        assert!(err.to_string().contains("invalid URI"));
    }
}
