//! Worker execution loop

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::result::WorkResult;
use crate::token::WorkToken;
use crate::traits::Executor;

use super::stats::WorkerStats;

/// Raised in place of a result when an executor panics on a token
#[derive(Debug, thiserror::Error)]
#[error("executor panicked: {0}")]
pub struct ExecutorPanic(
    /// Panic message
    pub String,
);

/// Worker drains the shared queue: take -> execute -> report -> repeat
///
/// Workers share the queue receiver, the executor (via Arc) and the result
/// sender; they never talk to each other.
pub struct Worker<X: Executor> {
    /// Worker identifier, unique within one run
    id: usize,

    /// Shared work queue (multi-consumer)
    queue: async_channel::Receiver<WorkToken>,

    /// Channel sender for results
    results_tx: mpsc::Sender<WorkResult>,

    /// Caller-supplied executor
    executor: Arc<X>,

    /// Generator-wide cancellation flag
    cancel: CancellationToken,
}

impl<X: Executor> Worker<X> {
    /// Create a new worker
    pub fn new(
        id: usize,
        queue: async_channel::Receiver<WorkToken>,
        results_tx: mpsc::Sender<WorkResult>,
        executor: Arc<X>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            queue,
            results_tx,
            executor,
            cancel,
        }
    }

    /// Run the worker loop until the queue is exhausted or cancellation is requested
    pub async fn run(self) -> WorkerStats {
        let mut stats = WorkerStats::new(self.id);
        stats.start();

        tracing::debug!(worker_id = self.id, "Worker started");

        loop {
            let token = tokio::select! {
                biased;

                // No new dispatch once draining has begun
                _ = self.cancel.cancelled() => {
                    tracing::debug!(worker_id = self.id, "Worker observed cancellation");
                    break;
                }

                next = self.queue.recv() => match next {
                    Ok(token) => token,
                    Err(_) => {
                        tracing::debug!(worker_id = self.id, "Work queue exhausted");
                        break;
                    }
                },
            };

            let result = self.execute_one(token).await;
            stats.record(&result);

            if self.results_tx.send(result).await.is_err() {
                tracing::warn!(worker_id = self.id, "Result channel closed, worker stopping");
                break;
            }
        }

        stats.stop();
        tracing::debug!(
            worker_id = self.id,
            completed = stats.completed,
            errors = stats.errors,
            elapsed_ms = ?stats.elapsed().map(|d| d.as_millis()),
            "Worker finished"
        );

        stats
    }

    /// Execute a single token, turning a panic into a failed result
    async fn execute_one(&self, token: WorkToken) -> WorkResult {
        let started = Instant::now();
        let label = token.to_string();

        match AssertUnwindSafe(self.executor.execute(token))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(
                    worker_id = self.id,
                    token = %label,
                    panic = %message,
                    "Executor panicked"
                );
                WorkResult::failure(started.elapsed(), ExecutorPanic(message))
            }
        }
    }

    /// Get the worker ID
    pub fn id(&self) -> usize {
        self.id
    }
}

impl<X: Executor> std::fmt::Debug for Worker<X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
