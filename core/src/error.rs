//! Error types for stress-core

use thiserror::Error;

use crate::config::ConfigError;
use crate::generator::RunSummary;

/// Boxed error carried by failed work items and enumeration sources
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core error type
///
/// Per-item failures never show up here: they travel inside a
/// [`WorkResult`](crate::WorkResult) and end up in the run summary.
#[derive(Error, Debug)]
pub enum StressError {
    /// Invalid generator configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A work token was empty
    #[error("work token must not be empty")]
    EmptyToken,

    /// The enumerator failed before the run could start
    #[error("enumeration failed: {0}")]
    Enumeration(#[source] BoxError),

    /// Setup failed after the workers had already executed some tokens
    #[error("setup failed after {} items ran: {source}", .partial.total)]
    SetupAborted {
        /// The enumerator's error
        #[source]
        source: Box<StressError>,
        /// Tally of the items that ran before the failure
        partial: Box<RunSummary>,
    },

    /// Setup or run was invoked twice on the same generator
    #[error("{0} already invoked on this generator")]
    PhaseReused(&'static str),

    /// Run was invoked before setup had started
    #[error("run invoked before setup")]
    SetupMissing,

    /// Draining-cancel state was entered; no more tokens are accepted
    #[error("generator is draining after cancellation")]
    Cancelled,

    /// The work queue closed while tokens were still being added
    #[error("work queue closed")]
    QueueClosed,

    /// A worker or collector task panicked
    #[error("task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StressError {
    /// Wrap an arbitrary error raised while enumerating work
    pub fn enumeration<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        StressError::Enumeration(err.into())
    }

    /// Tally of work that already ran when setup failed, if any
    pub fn partial(&self) -> Option<&RunSummary> {
        match self {
            StressError::SetupAborted { partial, .. } => Some(partial),
            _ => None,
        }
    }

    /// True when the error only reports that cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StressError::Cancelled)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StressError>;
