//! Latency statistics and percentile calculation

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bounds (milliseconds) of the fixed latency buckets
pub const BUCKET_BOUNDS_MS: [u64; 16] = [
    1, 2, 5, 7, 10, 15, 25, 50, 75, 100, 250, 350, 500, 750, 1000, 5000,
];

/// Latency percentiles (all values in milliseconds)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct LatencyPercentiles {
    /// Minimum value
    pub min: f64,
    /// 50th percentile (median)
    pub p50: f64,
    /// 75th percentile
    pub p75: f64,
    /// 90th percentile
    pub p90: f64,
    /// 95th percentile
    pub p95: f64,
    /// 99th percentile
    pub p99: f64,
    /// Maximum value
    pub max: f64,
    /// Mean value
    pub mean: f64,
    /// Standard deviation
    pub stddev: f64,
}

/// In-memory histogram for percentile calculation
///
/// Backed by HdrHistogram so memory stays constant no matter how many
/// results a run produces.
pub struct LatencyHistogram {
    histogram: hdrhistogram::Histogram<u64>,
}

impl LatencyHistogram {
    /// Create a new histogram
    /// Configured for microsecond precision with max 1 hour latency
    pub fn new() -> Self {
        let histogram = hdrhistogram::Histogram::new_with_bounds(1, 3_600_000_000, 3)
            .expect("Failed to create histogram");
        Self { histogram }
    }

    /// Record a duration; values above one hour are clamped
    pub fn record(&mut self, duration: Duration) {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        self.histogram.saturating_record(micros);
    }

    /// Get the number of recorded values
    pub fn len(&self) -> u64 {
        self.histogram.len()
    }

    /// Check if the histogram is empty
    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
    }

    /// Calculate percentiles from the histogram
    pub fn percentiles(&self) -> LatencyPercentiles {
        if self.histogram.is_empty() {
            return LatencyPercentiles::default();
        }

        LatencyPercentiles {
            min: self.histogram.min() as f64 / 1000.0,
            p50: self.histogram.value_at_quantile(0.50) as f64 / 1000.0,
            p75: self.histogram.value_at_quantile(0.75) as f64 / 1000.0,
            p90: self.histogram.value_at_quantile(0.90) as f64 / 1000.0,
            p95: self.histogram.value_at_quantile(0.95) as f64 / 1000.0,
            p99: self.histogram.value_at_quantile(0.99) as f64 / 1000.0,
            max: self.histogram.max() as f64 / 1000.0,
            mean: self.histogram.mean() / 1000.0,
            stddev: self.histogram.stdev() / 1000.0,
        }
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LatencyHistogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LatencyHistogram")
            .field("len", &self.len())
            .finish()
    }
}

/// Fixed-bucket latency histogram
///
/// `counts[i]` holds results that took at most `BUCKET_BOUNDS_MS[i]`
/// milliseconds and more than the previous bound; the last slot holds
/// everything slower than the largest bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyBuckets {
    counts: Vec<u64>,
}

impl LatencyBuckets {
    /// Create an empty bucket set
    pub fn new() -> Self {
        Self {
            counts: vec![0; BUCKET_BOUNDS_MS.len() + 1],
        }
    }

    /// Record a duration into its bucket
    pub fn record(&mut self, duration: Duration) {
        let ms = duration.as_secs_f64() * 1000.0;
        let idx = BUCKET_BOUNDS_MS
            .iter()
            .position(|&bound| ms <= bound as f64)
            .unwrap_or(BUCKET_BOUNDS_MS.len());
        self.counts[idx] += 1;
    }

    /// Per-bucket counts, the last entry being the overflow bucket
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total number of recorded values
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Cumulative counts: results at or under each bound, then the total
    pub fn cumulative(&self) -> Vec<u64> {
        self.counts
            .iter()
            .scan(0u64, |acc, &count| {
                *acc += count;
                Some(*acc)
            })
            .collect()
    }
}

impl Default for LatencyBuckets {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LatencyBuckets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cumulative = self.cumulative();
        for (bound, count) in BUCKET_BOUNDS_MS.iter().zip(&cumulative) {
            writeln!(f, "{}\t{}", bound, count)?;
        }
        write!(f, "inf\t{}", cumulative.last().copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_percentiles() {
        let mut histogram = LatencyHistogram::new();

        for i in 1..=100 {
            histogram.record(Duration::from_millis(i));
        }

        let percentiles = histogram.percentiles();
        assert!((percentiles.min - 1.0).abs() < 0.1);
        assert!((percentiles.max - 100.0).abs() < 0.1);
        assert!((percentiles.p50 - 50.0).abs() < 1.0);
        assert!((percentiles.mean - 50.5).abs() < 0.5);
    }

    #[test]
    fn test_empty_histogram() {
        let histogram = LatencyHistogram::new();
        let percentiles = histogram.percentiles();

        assert_eq!(percentiles, LatencyPercentiles::default());
        assert!(histogram.is_empty());
    }

    #[test]
    fn test_histogram_clamps_huge_values() {
        let mut histogram = LatencyHistogram::new();
        histogram.record(Duration::from_secs(10 * 3600));
        histogram.record(Duration::ZERO);

        assert_eq!(histogram.len(), 2);
    }

    #[test]
    fn test_buckets_boundaries() {
        let mut buckets = LatencyBuckets::new();
        buckets.record(Duration::from_micros(500)); // <= 1
        buckets.record(Duration::from_millis(1)); // <= 1
        buckets.record(Duration::from_millis(3)); // <= 5
        buckets.record(Duration::from_millis(5000)); // <= 5000
        buckets.record(Duration::from_secs(6)); // overflow

        let counts = buckets.counts();
        assert_eq!(counts.len(), BUCKET_BOUNDS_MS.len() + 1);
        assert_eq!(counts[0], 2);
        assert_eq!(counts[2], 1);
        assert_eq!(counts[15], 1);
        assert_eq!(counts[16], 1);
        assert_eq!(buckets.total(), 5);
    }

    #[test]
    fn test_buckets_cumulative_display() {
        let mut buckets = LatencyBuckets::new();
        buckets.record(Duration::from_millis(2));
        buckets.record(Duration::from_millis(20));

        let cumulative = buckets.cumulative();
        assert_eq!(cumulative[0], 0);
        assert_eq!(cumulative[1], 1);
        assert_eq!(*cumulative.last().unwrap(), 2);

        let rendered = buckets.to_string();
        assert!(rendered.starts_with("1\t0\n2\t1\n"));
        assert!(rendered.ends_with("inf\t2"));
    }
}
