//! Generator execution logic

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::GeneratorConfig;
use crate::error::{Result, StressError};
use crate::queue::{work_queue, TokenSink};
use crate::signal::SignalWatcher;
use crate::token::WorkToken;
use crate::traits::{Enumerator, Executor};
use crate::worker::Worker;

use super::collector::{ResultCollector, RunSummary};

/// Outcome of the setup phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupSummary {
    /// Tokens accepted into the work queue
    pub tokens: usize,

    /// Time spent enumerating
    pub elapsed: Duration,

    /// Whether enumeration stopped early because of cancellation
    pub cancelled: bool,
}

/// Generator manages one run's lifecycle
///
/// Each generator owns its own queue and cancellation flag, so several
/// generators used one after another in the same process never observe
/// each other's state. Setup and run may each be invoked once.
pub struct Generator {
    /// Generator configuration
    pub(crate) config: GeneratorConfig,

    /// Monotonic draining-cancel flag
    pub(crate) cancel: CancellationToken,

    /// Producer half of the work queue, taken by setup
    work_tx: Mutex<Option<async_channel::Sender<WorkToken>>>,

    /// Consumer half of the work queue, taken by run
    work_rx: Mutex<Option<async_channel::Receiver<WorkToken>>>,

    /// Set once run has been requested, so a full queue will be drained
    run_requested: Arc<AtomicBool>,
}

impl Generator {
    /// Create a generator with `parallelism` workers and default settings
    ///
    /// # Errors
    ///
    /// Returns [`StressError::Config`] if `parallelism` is zero.
    pub fn new(parallelism: usize) -> Result<Self> {
        Self::from_config(GeneratorConfig::new(parallelism))
    }

    /// Create a generator from a full configuration
    ///
    /// Use [`GeneratorBuilder`](super::GeneratorBuilder) for a more ergonomic construction.
    pub fn from_config(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;

        let (work_tx, work_rx) = work_queue(config.channels.work_buffer);

        Ok(Self {
            config,
            cancel: CancellationToken::new(),
            work_tx: Mutex::new(Some(work_tx)),
            work_rx: Mutex::new(Some(work_rx)),
            run_requested: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get the generator configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Number of workers run will start
    pub fn parallelism(&self) -> usize {
        self.config.parallelism
    }

    /// Enter draining-cancel state
    ///
    /// Workers stop taking tokens, in-flight tokens finish and are tallied,
    /// and the enumerator's next `add` fails with [`StressError::Cancelled`].
    /// Calling this again has no further effect.
    pub fn cancel(&self) {
        if !self.cancel.is_cancelled() {
            tracing::info!("Cancellation requested, draining in-flight work");
            self.cancel.cancel();
        }
    }

    /// Check whether draining-cancel state has been entered
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A handle on the cancellation flag, for wiring external triggers
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Populate the work queue
    ///
    /// Runs `enumerator` on the calling task and closes the queue once it
    /// returns. `add` waits while the queue is full, so either the
    /// enumeration fits in the queue capacity or run must already be
    /// draining it (see [`Generator::execute`]). A full queue with no run
    /// requested yet is logged once at `warn`.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::PhaseReused`] on a second call, or the
    /// enumerator's own error. An enumeration error also requests
    /// cancellation so no further work is dispatched.
    pub async fn setup<E: Enumerator>(&self, mut enumerator: E) -> Result<SetupSummary> {
        let tx = take(&self.work_tx).ok_or(StressError::PhaseReused("setup"))?;
        let started = Instant::now();
        let sink = TokenSink::new(tx, self.cancel.clone())
            .with_consumer(Arc::clone(&self.run_requested));

        tracing::debug!(capacity = sink.capacity(), "Enumerating work");

        let outcome = enumerator.enumerate(sink.clone()).await;
        sink.close();

        let summary = SetupSummary {
            tokens: sink.added(),
            elapsed: started.elapsed(),
            cancelled: self.cancel.is_cancelled(),
        };

        match outcome {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    tokens = summary.tokens,
                    "Enumeration failed, cancelling run"
                );
                self.cancel.cancel();
                return Err(e);
            }
        }

        tracing::info!(
            tokens = summary.tokens,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            cancelled = summary.cancelled,
            "Setup complete"
        );

        Ok(summary)
    }

    /// Drain the work queue through the worker pool
    ///
    /// Spawns exactly `parallelism` workers plus one result collector, arms
    /// the configured signal handlers for the duration of the run, and
    /// returns once every dispatched token has been tallied.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::SetupMissing`] if setup has not started,
    /// [`StressError::PhaseReused`] on a second call, and
    /// [`StressError::Task`] if the collector task panicked.
    pub async fn run<X: Executor>(&self, executor: X) -> Result<RunSummary> {
        if lock(&self.work_tx).is_some() {
            return Err(StressError::SetupMissing);
        }
        let queue = take(&self.work_rx).ok_or(StressError::PhaseReused("run"))?;
        self.run_requested.store(true, Ordering::Release);

        let parallelism = self.config.parallelism;
        let watcher = SignalWatcher::spawn(&self.config.signals, self.cancel.clone());

        tracing::info!(
            parallelism,
            signals = watcher.armed(),
            queued = queue.len(),
            "Starting run"
        );

        let (results_tx, results_rx) = mpsc::channel(self.config.channels.result_buffer);
        let collector = tokio::spawn(
            ResultCollector::new(self.config.error_sample_limit)
                .collect(results_rx, self.config.progress_interval),
        );

        let executor = Arc::new(executor);
        let mut handles = Vec::with_capacity(parallelism);
        for worker_id in 0..parallelism {
            let worker = Worker::new(
                worker_id,
                queue.clone(),
                results_tx.clone(),
                Arc::clone(&executor),
                self.cancel.clone(),
            );
            handles.push(tokio::spawn(worker.run()));
        }

        // Workers hold the only remaining handles
        drop(queue);
        drop(results_tx);

        for (idx, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(stats) => {
                    tracing::debug!(
                        worker_id = stats.worker_id,
                        completed = stats.completed,
                        errors = stats.errors,
                        "Worker joined"
                    );
                }
                Err(e) => {
                    tracing::error!(worker_id = idx, error = %e, "Worker task panicked");
                }
            }
        }

        let summary = collector.await?.finish(self.cancel.is_cancelled());
        drop(watcher);

        tracing::info!(
            total = summary.total,
            successes = summary.successes,
            failures = summary.failures,
            elapsed_secs = summary.duration.as_secs_f64(),
            rps = summary.results_per_second,
            cancelled = summary.cancelled,
            "Run completed"
        );

        Ok(summary)
    }

    /// Run setup and run concurrently on this generator
    ///
    /// Workers start draining while the enumerator is still adding, so the
    /// enumeration may be arbitrarily larger than the queue capacity.
    ///
    /// # Errors
    ///
    /// A setup error cancels the run and is returned once in-flight work has
    /// drained. Tokens added before the failure may already have run; when
    /// any did, their tally is logged and carried in
    /// [`StressError::SetupAborted`]. Otherwise the run's own result is
    /// returned.
    pub async fn execute<E, X>(&self, enumerator: E, executor: X) -> Result<RunSummary>
    where
        E: Enumerator,
        X: Executor,
    {
        self.run_requested.store(true, Ordering::Release);

        // Setup is polled first, so it claims the queue before run checks for it
        let (setup, run) = tokio::join!(self.setup(enumerator), self.run(executor));

        match (setup, run) {
            (Ok(_), run) => run,
            (Err(e), Ok(partial)) if partial.total > 0 => {
                tracing::warn!(
                    total = partial.total,
                    successes = partial.successes,
                    failures = partial.failures,
                    "Setup failed after work had already run"
                );
                Err(StressError::SetupAborted {
                    source: Box::new(e),
                    partial: Box::new(partial),
                })
            }
            (Err(e), _) => Err(e),
        }
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("config", &self.config)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

fn lock<T>(slot: &Mutex<T>) -> MutexGuard<'_, T> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn take<T>(slot: &Mutex<Option<T>>) -> Option<T> {
    lock(slot).take()
}
