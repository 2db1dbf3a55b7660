//! Worker statistics tracking

use std::time::{Duration, Instant};

use crate::result::WorkResult;

/// Statistics tracked by each worker
///
/// These are diagnostics only. The authoritative tally lives in the
/// collector, which sees every result exactly once.
#[derive(Debug, Default, Clone)]
pub struct WorkerStats {
    /// Worker identifier
    pub worker_id: usize,

    /// Number of tokens that succeeded
    pub completed: usize,

    /// Number of tokens that failed
    pub errors: usize,

    /// Worker start time
    pub started_at: Option<Instant>,

    /// Worker end time
    pub ended_at: Option<Instant>,
}

impl WorkerStats {
    /// Create new empty stats for a worker
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            ..Default::default()
        }
    }

    /// Start tracking (records start time)
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stop tracking (records end time)
    pub fn stop(&mut self) {
        self.ended_at = Some(Instant::now());
    }

    /// Get total number of tokens processed (completed + errors)
    pub fn processed(&self) -> usize {
        self.completed + self.errors
    }

    /// Record the outcome of one token
    pub fn record(&mut self, result: &WorkResult) {
        if result.is_success() {
            self.completed += 1;
        } else {
            self.errors += 1;
        }
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at.map(|start| {
            self.ended_at
                .map(|end| end.duration_since(start))
                .unwrap_or_else(|| start.elapsed())
        })
    }
}
