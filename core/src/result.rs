//! Per-token outcome

use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::BoxError;

/// Outcome of executing one work token
///
/// Built by the executor, which owns the timing. A failure here is
/// recorded in the tally and never stops the run.
#[derive(Debug)]
pub struct WorkResult {
    /// Time the executor spent on the token
    pub elapsed: Duration,

    /// Error encountered, if any
    pub error: Option<BoxError>,
}

impl WorkResult {
    /// A successful outcome
    pub fn success(elapsed: Duration) -> Self {
        Self {
            elapsed,
            error: None,
        }
    }

    /// A failed outcome
    pub fn failure(elapsed: Duration, error: impl Into<BoxError>) -> Self {
        Self {
            elapsed,
            error: Some(error.into()),
        }
    }

    /// Build a result from an operation that started at `started`
    pub fn from_outcome<T, E>(started: Instant, outcome: Result<T, E>) -> Self
    where
        E: Into<BoxError>,
    {
        let elapsed = started.elapsed();
        match outcome {
            Ok(_) => Self::success(elapsed),
            Err(e) => Self::failure(elapsed, e),
        }
    }

    /// Time a fallible future and turn its outcome into a result
    pub async fn measure<F, T, E>(operation: F) -> Self
    where
        F: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        let started = Instant::now();
        let outcome = operation.await;
        Self::from_outcome(started, outcome)
    }

    /// Check if the token succeeded
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Check if the token failed
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_and_failure() {
        let ok = WorkResult::success(Duration::from_millis(5));
        assert!(ok.is_success());
        assert_eq!(ok.elapsed, Duration::from_millis(5));

        let failed = WorkResult::failure(Duration::from_millis(7), "status 500");
        assert!(failed.is_error());
        assert_eq!(failed.error.unwrap().to_string(), "status 500");
    }

    #[test]
    fn test_from_outcome() {
        let started = Instant::now();
        let result = WorkResult::from_outcome::<(), _>(started, Err("boom"));
        assert!(result.is_error());

        let result = WorkResult::from_outcome::<_, BoxError>(started, Ok(42));
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_measure_times_the_future() {
        let result = WorkResult::measure(async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok::<_, BoxError>(())
        })
        .await;

        assert!(result.is_success());
        assert!(result.elapsed >= Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_measure_captures_error() {
        let result =
            WorkResult::measure(async { Err::<(), _>(std::io::Error::other("reset")) }).await;
        assert_eq!(result.error.unwrap().to_string(), "reset");
    }
}
