//! Generator for load-run lifecycle management
//!
//! The Generator coordinates one complete run:
//! - Feeding enumerated tokens into a bounded work queue (setup)
//! - Spawning exactly `parallelism` workers and one result collector (run)
//! - Arming OS signal handlers for draining cancellation
//! - Producing the final [`RunSummary`]
//!
//! # Example
//!
//! ```ignore
//! use stress_core::{GeneratorBuilder, Signal, TokenSink, WorkResult, WorkToken};
//!
//! let generator = GeneratorBuilder::new(100)
//!     .with_signal_handlers_for(Signal::defaults())
//!     .build()?;
//!
//! let summary = generator
//!     .execute(
//!         |sink: TokenSink| async move {
//!             for i in 0..1_000 {
//!                 sink.add(format!("item-{}", i)).await?;
//!             }
//!             Ok(())
//!         },
//!         |token: WorkToken| async move { WorkResult::measure(do_work(token)).await },
//!     )
//!     .await?;
//!
//! println!("{}", summary);
//! ```

mod builder;
mod collector;
mod executor;

pub use builder::GeneratorBuilder;
pub use collector::RunSummary;
#[cfg(test)]
pub(crate) use collector::ResultCollector;
pub use executor::{Generator, SetupSummary};
