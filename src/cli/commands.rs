//! The load commands

use anyhow::{Context, Result};
use stress_client::{LakeFsClient, ObjectStageCreation};
use stress_core::{
    read_lines, GeneratorBuilder, IndexedNames, PrefixDiscovery, RandomSample, RunSummary, Signal,
};

use super::executors::{BranchListing, CreateBranch, DeleteBranch, StageObject, StatObject};
use super::{Cli, CreateBranchesArgs, LoadArgs, RandomReadArgs, RandomWriteArgs};

/// Checksum of the empty object every random write points at
const RANDOM_WRITE_CHECKSUM: &str = "00695c7307b0480c7b6bdc873cf05c15";

/// Page size used when discovering branches to clean up
const BRANCH_PAGE_SIZE: usize = 1000;

/// Report a finished run, or the partial tally of one whose setup failed
fn settle(cli: &Cli, label: &str, outcome: stress_core::Result<RunSummary>) -> Result<RunSummary> {
    match outcome {
        Ok(summary) => {
            cli.report(label, &summary)?;
            Ok(summary)
        }
        Err(e) => {
            if let Some(partial) = e.partial() {
                cli.report(label, partial)?;
            }
            Err(e.into())
        }
    }
}

fn builder_for(load: &LoadArgs, signals: &[Signal]) -> GeneratorBuilder {
    GeneratorBuilder::new(load.parallelism)
        .queue_capacity(load.queue_capacity)
        .with_signal_handlers_for(signals.iter().copied())
}

pub async fn random_read(
    cli: &Cli,
    client: LakeFsClient,
    args: &RandomReadArgs,
) -> Result<RunSummary> {
    let keys = read_lines(&args.from_file)
        .await
        .with_context(|| format!("Failed to read keys from: {}", args.from_file))?;
    println!("read a total of {} keys from key file", keys.len());

    let sample = RandomSample::new(keys, args.load.amount).context("Nothing to read")?;
    let generator = builder_for(&args.load, &Signal::defaults()).build()?;

    let outcome = generator
        .execute(
            sample,
            StatObject {
                client,
                repository: args.source.repository.clone(),
                reference: args.source.reference.clone(),
            },
        )
        .await;

    settle(cli, "random-read", outcome).context("Random read run failed")
}

pub async fn random_write(
    cli: &Cli,
    client: LakeFsClient,
    args: &RandomWriteArgs,
) -> Result<RunSummary> {
    let repository = client
        .get_repository(&args.source.repository)
        .await
        .with_context(|| format!("Failed to get repository: {}", args.source.repository))?;

    let staging = ObjectStageCreation {
        physical_address: format!("{}/random-write", repository.storage_namespace),
        checksum: RANDOM_WRITE_CHECKSUM.to_string(),
        size_bytes: 0,
    };

    tracing::info!(
        repository = %repository.id,
        physical_address = %staging.physical_address,
        "Staging random writes"
    );

    let generator = builder_for(&args.load, &Signal::defaults()).build()?;
    let outcome = generator
        .execute(
            IndexedNames::new(format!("{}file-", args.prefix), args.load.amount),
            StageObject {
                client,
                repository: args.source.repository.clone(),
                branch: args.source.reference.clone(),
                staging,
            },
        )
        .await;

    settle(cli, "random-write", outcome).context("Random write run failed")
}

pub async fn create_branches(
    cli: &Cli,
    client: LakeFsClient,
    args: &CreateBranchesArgs,
) -> Result<Vec<RunSummary>> {
    let repository = &args.source.repository;

    // Cleanup runs to completion; signals only interrupt the create pass
    let cleanup = builder_for(&args.load, &[]).build()?;
    let discovery = PrefixDiscovery::new(
        BranchListing {
            client: client.clone(),
            repository: repository.clone(),
        },
        args.branch_prefix.clone(),
        BRANCH_PAGE_SIZE,
    );

    tracing::info!(prefix = %args.branch_prefix, "Deleting branches from previous runs");

    let outcome = cleanup
        .execute(
            discovery,
            DeleteBranch {
                client: client.clone(),
                repository: repository.clone(),
            },
        )
        .await;
    let deleted = settle(cli, "delete-branches", outcome).context("Branch cleanup failed")?;

    if args.clean_only {
        return Ok(vec![deleted]);
    }

    let generator = builder_for(&args.load, &Signal::defaults()).build()?;
    let outcome = generator
        .execute(
            IndexedNames::new(format!("{}-", args.branch_prefix), args.load.amount),
            CreateBranch {
                client,
                repository: repository.clone(),
                source: args.source.reference.clone(),
            },
        )
        .await;
    let created = settle(cli, "create-branches", outcome).context("Branch creation run failed")?;

    Ok(vec![deleted, created])
}
