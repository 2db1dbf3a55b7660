//! Core traits for enumerating and executing work
//!
//! These are the two seams between the generator and the command layer.
//! The generator knows nothing about the remote API; command code supplies
//! an [`Enumerator`] that decides *what* to do and an [`Executor`] that
//! does it for one token at a time.

use std::future::Future;

use crate::error::Result;
use crate::queue::TokenSink;
use crate::result::WorkResult;
use crate::token::WorkToken;

// ============================================================================
// Enumerator Trait
// ============================================================================

/// Produces the work tokens of a run
///
/// Called exactly once, during setup. Implementations may do their own I/O
/// (reading a key file, paging through a remote listing) and must
/// terminate. Returning an error aborts the run before any work starts.
///
/// Closures of the shape `FnMut(TokenSink) -> impl Future<Output = Result<()>>`
/// implement this trait.
pub trait Enumerator: Send {
    /// Add every token of the run to `sink`
    fn enumerate(&mut self, sink: TokenSink) -> impl Future<Output = Result<()>> + Send;
}

impl<F, Fut> Enumerator for F
where
    F: FnMut(TokenSink) -> Fut + Send,
    Fut: Future<Output = Result<()>> + Send,
{
    fn enumerate(&mut self, sink: TokenSink) -> impl Future<Output = Result<()>> + Send {
        (self)(sink)
    }
}

// ============================================================================
// Executor Trait
// ============================================================================

/// Executes one work token
///
/// Shared by all workers of a run, so implementations must be `Sync`. The
/// executor measures its own elapsed time and folds any failure into the
/// returned [`WorkResult`]; it must not panic on remote errors.
///
/// Closures of the shape `Fn(WorkToken) -> impl Future<Output = WorkResult>`
/// implement this trait.
pub trait Executor: Send + Sync + 'static {
    /// Perform the unit of work for `token`
    fn execute(&self, token: WorkToken) -> impl Future<Output = WorkResult> + Send;
}

impl<F, Fut> Executor for F
where
    F: Fn(WorkToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = WorkResult> + Send,
{
    fn execute(&self, token: WorkToken) -> impl Future<Output = WorkResult> + Send {
        (self)(token)
    }
}
