//! stress-core: Bounded-concurrency work generator for load testing
//!
//! This crate provides the generator used by the `abuse` load commands,
//! including:
//!
//! - Work tokens and per-token results
//! - Core traits (Enumerator, Executor)
//! - The generator lifecycle (setup, run, draining cancellation)
//! - Result collection, latency statistics and the run summary
//! - Ready-made enumerators (random sample, indexed names, prefix discovery)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod config;
pub mod enumerate;
pub mod error;
pub mod generator;
pub mod metrics;
pub mod queue;
pub mod result;
pub mod signal;
pub mod token;
pub mod traits;
pub mod worker;

pub use channel::{ChannelConfig, DEFAULT_RESULT_BUFFER, DEFAULT_WORK_BUFFER};
pub use config::{ConfigError, GeneratorConfig};
pub use enumerate::{read_lines, IndexedNames, Page, PageSource, PrefixDiscovery, RandomSample};
pub use error::*;
pub use generator::{Generator, GeneratorBuilder, RunSummary, SetupSummary};
pub use metrics::*;
pub use queue::TokenSink;
pub use result::WorkResult;
pub use signal::{Signal, SignalWatcher};
pub use token::WorkToken;
pub use traits::*;
pub use worker::{Worker, WorkerStats};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::time::Duration;

    // =========================================================================
    // Serialization tests
    // =========================================================================

    #[test]
    fn test_config_from_json() {
        let config: GeneratorConfig = serde_json::from_str(
            r#"{"parallelism": 16, "signals": ["interrupt", "terminate"]}"#,
        )
        .unwrap();

        assert_eq!(config.parallelism, 16);
        assert_eq!(config.signals, Signal::defaults().to_vec());
        assert_eq!(config.channels, ChannelConfig::default());
        assert!(config.validate().is_ok());
    }

    // =========================================================================
    // End-to-end through the public API
    // =========================================================================

    #[tokio::test]
    async fn test_indexed_names_end_to_end() {
        let generator = GeneratorBuilder::new(10)
            .queue_capacity(16)
            .progress_interval(None)
            .build()
            .unwrap();

        let summary = generator
            .execute(IndexedNames::new("abuse-", 1_000), |token: WorkToken| async move {
                WorkResult::measure(async move {
                    if token.as_str().ends_with('7') {
                        Err(format!("rejected {}", token))
                    } else {
                        Ok(())
                    }
                })
                .await
            })
            .await
            .unwrap();

        assert_eq!(summary.total, 1_000);
        assert_eq!(summary.failures, 100);
        assert_eq!(summary.successes, 900);
        assert!(!summary.cancelled);
        assert!(summary.duration > Duration::ZERO);
    }
}
