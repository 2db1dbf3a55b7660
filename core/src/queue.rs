//! Bounded work queue plumbing between the enumerator and the workers

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::{Result, StressError};
use crate::token::WorkToken;

/// Creates the bounded queue shared by an enumerator and a worker pool
pub(crate) fn work_queue(
    capacity: usize,
) -> (
    async_channel::Sender<WorkToken>,
    async_channel::Receiver<WorkToken>,
) {
    async_channel::bounded(capacity)
}

/// Capability handed to an [`Enumerator`](crate::Enumerator) for adding tokens
///
/// Cloning is cheap; every clone feeds the same queue. `add` waits while the
/// queue is full, so memory stays bounded no matter how many tokens an
/// enumeration produces.
#[derive(Debug, Clone)]
pub struct TokenSink {
    tx: async_channel::Sender<WorkToken>,
    cancel: CancellationToken,
    added: Arc<AtomicUsize>,
    consumer: Option<Arc<AtomicBool>>,
    stall_reported: Arc<AtomicBool>,
}

impl TokenSink {
    pub(crate) fn new(tx: async_channel::Sender<WorkToken>, cancel: CancellationToken) -> Self {
        Self {
            tx,
            cancel,
            added: Arc::new(AtomicUsize::new(0)),
            consumer: None,
            stall_reported: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Warn once if the queue fills up while `consumer` is still unset
    pub(crate) fn with_consumer(mut self, consumer: Arc<AtomicBool>) -> Self {
        self.consumer = Some(consumer);
        self
    }

    /// Enqueue one token, waiting for space if the queue is full
    ///
    /// # Errors
    ///
    /// Returns [`StressError::EmptyToken`] for an empty token,
    /// [`StressError::Cancelled`] once the generator is draining, and
    /// [`StressError::QueueClosed`] if the queue has been closed.
    pub async fn add(&self, token: impl Into<String>) -> Result<()> {
        let token = WorkToken::new(token)?;
        self.push(token).await
    }

    /// Enqueue an already-validated token
    pub async fn push(&self, token: WorkToken) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(StressError::Cancelled);
        }

        let token = match self.tx.try_send(token) {
            Ok(()) => {
                self.added.fetch_add(1, Ordering::Relaxed);
                return Ok(());
            }
            Err(async_channel::TrySendError::Closed(_)) => return Err(StressError::QueueClosed),
            Err(async_channel::TrySendError::Full(token)) => token,
        };
        self.report_stall();

        tokio::select! {
            biased;

            _ = self.cancel.cancelled() => Err(StressError::Cancelled),

            sent = self.tx.send(token) => match sent {
                Ok(()) => {
                    self.added.fetch_add(1, Ordering::Relaxed);
                    Ok(())
                }
                Err(_) => Err(StressError::QueueClosed),
            },
        }
    }

    fn report_stall(&self) {
        let Some(consumer) = &self.consumer else {
            return;
        };
        if consumer.load(Ordering::Acquire) || self.stall_reported.swap(true, Ordering::Relaxed) {
            return;
        }
        tracing::warn!(
            capacity = self.capacity(),
            "Work queue is full and run has not started; setup waits until run drains it"
        );
    }

    /// Number of tokens successfully enqueued through this sink and its clones
    pub fn added(&self) -> usize {
        self.added.load(Ordering::Relaxed)
    }

    /// Number of tokens currently waiting in the queue
    pub fn queued(&self) -> usize {
        self.tx.len()
    }

    /// Maximum number of tokens the queue holds at once
    pub fn capacity(&self) -> usize {
        self.tx.capacity().unwrap_or(usize::MAX)
    }

    /// Close the queue; workers drain what is left and then stop
    pub(crate) fn close(&self) {
        self.tx.close();
    }
}
