//! Worker module for executing work tokens
//!
//! A Worker is one of the `parallelism` tokio tasks a generator starts for
//! a run. Its loop: **take -> execute -> report -> repeat**.
//!
//! 1. Takes the next token from the shared work queue
//! 2. Hands it to the caller's executor
//! 3. Sends the resulting [`WorkResult`](crate::WorkResult) to the collector
//! 4. Repeats until the queue is closed and empty, or cancellation is requested
//!
//! Cancellation is only observed between tokens. A token that has been taken
//! always runs to completion and always produces exactly one result, even if
//! the executor panics.

mod executor;
mod stats;

pub use executor::Worker;
pub use stats::WorkerStats;
