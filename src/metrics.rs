//! Latency statistics for inference performance analysis
//!
//! This module keeps the append-only latency history of a simulator and
//! derives the aggregate report (mean, spread, percentiles) from it on
//! demand.

use crate::error::StatsError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inference latency target of the edge hardware, in milliseconds
pub const DEFAULT_LATENCY_TARGET_MS: f64 = 50.0;

/// Ordered, append-only record of inference latencies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyHistory {
    latencies_ms: Vec<f64>,
}

impl LatencyHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one latency
    pub fn record(&mut self, latency_ms: f64) {
        self.latencies_ms.push(latency_ms);
    }

    /// Number of recorded latencies
    pub fn len(&self) -> usize {
        self.latencies_ms.len()
    }

    /// True before the first inference
    pub fn is_empty(&self) -> bool {
        self.latencies_ms.is_empty()
    }

    /// Recorded latencies in call order
    pub fn as_slice(&self) -> &[f64] {
        &self.latencies_ms
    }

    /// Aggregate statistics over the whole history
    pub fn stats(&self) -> Result<LatencyStats, StatsError> {
        LatencyStats::from_latencies(&self.latencies_ms)
    }

    /// Aggregate statistics over the entries recorded from `start` on
    pub fn stats_since(&self, start: usize) -> Result<LatencyStats, StatsError> {
        LatencyStats::from_latencies(self.latencies_ms.get(start..).unwrap_or(&[]))
    }
}

/// Aggregate latency statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    /// Number of latencies
    pub count: usize,
    /// Mean latency
    pub mean_ms: f64,
    /// Population standard deviation
    pub std_ms: f64,
    /// Fastest call
    pub min_ms: f64,
    /// Slowest call
    pub max_ms: f64,
    /// 95th percentile (linear interpolation)
    pub p95_ms: f64,
    /// 99th percentile (linear interpolation)
    pub p99_ms: f64,
}

impl LatencyStats {
    /// Compute statistics; fails on an empty slice
    pub fn from_latencies(latencies_ms: &[f64]) -> Result<Self, StatsError> {
        if latencies_ms.is_empty() {
            return Err(StatsError::Empty);
        }

        let count = latencies_ms.len();
        let mean = latencies_ms.iter().sum::<f64>() / count as f64;
        let variance = latencies_ms
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / count as f64;

        let mut sorted = latencies_ms.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        Ok(Self {
            count,
            mean_ms: mean,
            std_ms: variance.sqrt(),
            min_ms: sorted[0],
            max_ms: sorted[count - 1],
            p95_ms: percentile(&sorted, 95.0),
            p99_ms: percentile(&sorted, 99.0),
        })
    }

    /// True when the mean latency is strictly below `target_ms`
    pub fn meets_target(&self, target_ms: f64) -> bool {
        self.mean_ms < target_ms
    }

    /// Performance band of the mean latency
    pub fn rating(&self) -> PerformanceRating {
        PerformanceRating::from_mean_ms(self.mean_ms)
    }

    /// Generate a human-readable report
    pub fn report(&self) -> String {
        let mut report = String::new();

        report.push_str(&format!("Total inferences: {}\n", self.count));
        report.push_str(&format!("Average time: {:.4} ms\n", self.mean_ms));
        report.push_str(&format!("Standard deviation: {:.4} ms\n", self.std_ms));
        report.push_str(&format!("Minimum time: {:.4} ms\n", self.min_ms));
        report.push_str(&format!("Maximum time: {:.4} ms\n", self.max_ms));
        report.push_str(&format!("95th percentile: {:.4} ms\n", self.p95_ms));
        report.push_str(&format!("99th percentile: {:.4} ms\n", self.p99_ms));
        report.push_str(&format!("Performance rating: {}\n", self.rating()));

        report
    }
}

/// Ordered performance bands of the mean latency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerformanceRating {
    /// Below 1 ms
    Excellent,
    /// Below 10 ms
    VeryGood,
    /// Below 50 ms
    Good,
    /// 50 ms or more
    NeedsOptimization,
}

impl PerformanceRating {
    /// Band for a mean latency
    pub fn from_mean_ms(mean_ms: f64) -> Self {
        if mean_ms < 1.0 {
            PerformanceRating::Excellent
        } else if mean_ms < 10.0 {
            PerformanceRating::VeryGood
        } else if mean_ms < 50.0 {
            PerformanceRating::Good
        } else {
            PerformanceRating::NeedsOptimization
        }
    }

    /// Upper-case label
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceRating::Excellent => "EXCELLENT",
            PerformanceRating::VeryGood => "VERY GOOD",
            PerformanceRating::Good => "GOOD",
            PerformanceRating::NeedsOptimization => "NEEDS OPTIMIZATION",
        }
    }
}

impl fmt::Display for PerformanceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentile of a **sorted** slice, interpolating linearly between ranks.
///
/// `pct` is clamped to [0, 100]. Returns NaN for an empty slice; callers
/// guard emptiness first.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let rank = pct.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_history_fails() {
        let history = LatencyHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.stats(), Err(StatsError::Empty));
        assert_eq!(LatencyStats::from_latencies(&[]), Err(StatsError::Empty));
    }

    #[test]
    fn test_single_latency() {
        let stats = LatencyStats::from_latencies(&[4.2]).unwrap();
        assert_eq!(stats.count, 1);
        assert_relative_eq!(stats.mean_ms, 4.2);
        assert_relative_eq!(stats.std_ms, 0.0);
        assert_relative_eq!(stats.p95_ms, 4.2);
        assert_relative_eq!(stats.p99_ms, 4.2);
    }

    #[test]
    fn test_stats_values() {
        let latencies = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let stats = LatencyStats::from_latencies(&latencies).unwrap();
        assert_eq!(stats.count, 10);
        assert_relative_eq!(stats.mean_ms, 5.5);
        assert_relative_eq!(stats.min_ms, 1.0);
        assert_relative_eq!(stats.max_ms, 10.0);
        // population std of 1..=10
        assert_relative_eq!(stats.std_ms, 8.25f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(stats.p95_ms, 9.55, epsilon = 1e-12);
        assert_relative_eq!(stats.p99_ms, 9.91, epsilon = 1e-12);
    }

    #[test]
    fn test_unsorted_input() {
        let stats = LatencyStats::from_latencies(&[9.0, 1.0, 5.0]).unwrap();
        assert_relative_eq!(stats.min_ms, 1.0);
        assert_relative_eq!(stats.max_ms, 9.0);
        assert!(stats.p95_ms <= stats.p99_ms);
    }

    #[test]
    fn test_percentile_interpolation() {
        let sorted = [10.0, 20.0, 30.0, 40.0];
        assert_relative_eq!(percentile(&sorted, 0.0), 10.0);
        assert_relative_eq!(percentile(&sorted, 50.0), 25.0);
        assert_relative_eq!(percentile(&sorted, 100.0), 40.0);
        assert!(percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn test_history_append_order() {
        let mut history = LatencyHistory::new();
        history.record(3.0);
        history.record(1.0);
        history.record(2.0);
        assert_eq!(history.as_slice(), &[3.0, 1.0, 2.0]);
        assert_eq!(history.stats_since(1).unwrap().count, 2);
        assert_eq!(history.stats_since(3), Err(StatsError::Empty));
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(PerformanceRating::from_mean_ms(0.5), PerformanceRating::Excellent);
        assert_eq!(PerformanceRating::from_mean_ms(1.0), PerformanceRating::VeryGood);
        assert_eq!(PerformanceRating::from_mean_ms(9.99), PerformanceRating::VeryGood);
        assert_eq!(PerformanceRating::from_mean_ms(10.0), PerformanceRating::Good);
        assert_eq!(
            PerformanceRating::from_mean_ms(50.0),
            PerformanceRating::NeedsOptimization
        );
        assert!(PerformanceRating::Excellent < PerformanceRating::NeedsOptimization);
    }

    #[test]
    fn test_meets_target() {
        let fast = LatencyStats::from_latencies(&[1.0, 2.0]).unwrap();
        let slow = LatencyStats::from_latencies(&[50.0, 50.0]).unwrap();
        assert!(fast.meets_target(DEFAULT_LATENCY_TARGET_MS));
        assert!(!slow.meets_target(DEFAULT_LATENCY_TARGET_MS));
    }

    #[test]
    fn test_report_contents() {
        let stats = LatencyStats::from_latencies(&[0.2, 0.4]).unwrap();
        let report = stats.report();
        assert!(report.contains("Total inferences: 2"));
        assert!(report.contains("EXCELLENT"));
    }
}
