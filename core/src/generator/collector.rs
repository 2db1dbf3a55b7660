//! Result collection and the run summary

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::metrics::{LatencyBuckets, LatencyHistogram, LatencyPercentiles};
use crate::result::WorkResult;

/// Final tally of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Results tallied (successes + failures)
    pub total: u64,

    /// Tokens whose executor reported success
    pub successes: u64,

    /// Tokens whose executor reported an error
    pub failures: u64,

    /// First few error messages, in arrival order
    pub error_samples: Vec<String>,

    /// Latency percentiles (milliseconds) across all results
    pub latency: LatencyPercentiles,

    /// Fixed-bucket latency histogram
    pub buckets: LatencyBuckets,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Overall throughput
    pub results_per_second: f64,

    /// Whether the run ended through draining cancellation
    pub cancelled: bool,

    /// When the run started
    pub started_at: DateTime<Utc>,
}

impl RunSummary {
    /// Get the success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.total > 0 {
            self.successes as f64 / self.total as f64
        } else {
            0.0
        }
    }

    /// Get the error rate (0.0 - 1.0)
    pub fn error_rate(&self) -> f64 {
        if self.total > 0 {
            self.failures as f64 / self.total as f64
        } else {
            0.0
        }
    }

    /// True when no token failed
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "completed: {}, errors: {}, rate: {:.2} done/second",
            self.total, self.failures, self.results_per_second
        )?;
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        writeln!(f)?;

        if !self.error_samples.is_empty() {
            writeln!(f, "sample errors:")?;
            for message in &self.error_samples {
                writeln!(f, "  {}", message)?;
            }
        }

        writeln!(f, "Histogram (ms):")?;
        write!(f, "{}", self.buckets)
    }
}

/// Single owner of the running tally
///
/// Workers never touch these counters; every result passes through
/// [`ResultCollector::record`] on the collector task.
#[derive(Debug)]
pub(crate) struct ResultCollector {
    successes: u64,
    failures: u64,
    histogram: LatencyHistogram,
    buckets: LatencyBuckets,
    error_samples: Vec<String>,
    sample_limit: usize,
    started: Instant,
    started_at: DateTime<Utc>,
}

/// Tally position at the previous progress report
struct Checkpoint {
    total: u64,
    at: Instant,
}

impl ResultCollector {
    pub(crate) fn new(sample_limit: usize) -> Self {
        Self {
            successes: 0,
            failures: 0,
            histogram: LatencyHistogram::new(),
            buckets: LatencyBuckets::new(),
            error_samples: Vec::with_capacity(sample_limit),
            sample_limit,
            started: Instant::now(),
            started_at: Utc::now(),
        }
    }

    pub(crate) fn total(&self) -> u64 {
        self.successes + self.failures
    }

    pub(crate) fn record(&mut self, result: WorkResult) {
        self.histogram.record(result.elapsed);
        self.buckets.record(result.elapsed);

        match result.error {
            None => self.successes += 1,
            Some(error) => {
                self.failures += 1;
                tracing::debug!(
                    error = %error,
                    elapsed_ms = result.elapsed.as_millis() as u64,
                    "Work item failed"
                );
                if self.error_samples.len() < self.sample_limit {
                    self.error_samples.push(error.to_string());
                }
            }
        }
    }

    /// Consume results until every sender is gone
    pub(crate) async fn collect(
        mut self,
        mut results_rx: mpsc::Receiver<WorkResult>,
        progress_interval: Option<Duration>,
    ) -> Self {
        let Some(period) = progress_interval else {
            while let Some(result) = results_rx.recv().await {
                self.record(result);
            }
            return self;
        };

        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut checkpoint = Checkpoint {
            total: 0,
            at: Instant::now(),
        };

        loop {
            tokio::select! {
                next = results_rx.recv() => match next {
                    Some(result) => self.record(result),
                    None => break,
                },
                _ = ticker.tick() => self.report_progress(&mut checkpoint),
            }
        }

        self
    }

    fn report_progress(&self, checkpoint: &mut Checkpoint) {
        let now = Instant::now();
        let total = self.total();
        let window = now.duration_since(checkpoint.at).as_secs_f64();
        let rate = if window > 0.0 {
            (total - checkpoint.total) as f64 / window
        } else {
            0.0
        };

        tracing::info!(
            completed = total,
            errors = self.failures,
            rate = (rate * 100.0).round() / 100.0,
            "Progress"
        );

        checkpoint.total = total;
        checkpoint.at = now;
    }

    /// Freeze the tally into a summary
    pub(crate) fn finish(self, cancelled: bool) -> RunSummary {
        let duration = self.started.elapsed();
        let total = self.total();
        let secs = duration.as_secs_f64();
        let results_per_second = if secs > 0.0 {
            total as f64 / secs
        } else {
            0.0
        };

        RunSummary {
            total,
            successes: self.successes,
            failures: self.failures,
            error_samples: self.error_samples,
            latency: self.histogram.percentiles(),
            buckets: self.buckets,
            duration,
            results_per_second,
            cancelled,
            started_at: self.started_at,
        }
    }
}
