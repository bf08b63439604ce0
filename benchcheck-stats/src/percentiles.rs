//! Percentile Computation
//!
//! Linear interpolation between closest ranks, the same convention as
//! numpy's default, so quartiles line up with the published figures.

use serde::{Deserialize, Serialize};

/// Standard percentiles of one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    /// 25th percentile (first quartile)
    pub p25: f64,
    /// 50th percentile (median)
    pub p50: f64,
    /// 75th percentile (third quartile)
    pub p75: f64,
    /// 90th percentile
    pub p90: f64,
    /// 95th percentile
    pub p95: f64,
    /// 99th percentile
    pub p99: f64,
}

/// Compute a single percentile from samples
///
/// # Examples
///
/// ```
/// # use benchcheck_stats::compute_percentile;
/// let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(compute_percentile(&samples, 50.0), 3.0);
/// assert_eq!(compute_percentile(&samples, 25.0), 2.0);
/// ```
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    let sorted = sorted_copy(samples);
    percentile_of_sorted(&sorted, percentile)
}

/// Compute all standard percentiles with a single sort
pub fn compute_percentiles(samples: &[f64]) -> Percentiles {
    let sorted = sorted_copy(samples);
    Percentiles {
        p25: percentile_of_sorted(&sorted, 25.0),
        p50: percentile_of_sorted(&sorted, 50.0),
        p75: percentile_of_sorted(&sorted, 75.0),
        p90: percentile_of_sorted(&sorted, 90.0),
        p95: percentile_of_sorted(&sorted, 95.0),
        p99: percentile_of_sorted(&sorted, 99.0),
    }
}

fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let p = (percentile / 100.0).clamp(0.0, 1.0);
            let rank = p * (n - 1) as f64;
            let lower_idx = rank.floor() as usize;
            let upper_idx = (lower_idx + 1).min(n - 1);
            let fraction = rank - lower_idx as f64;
            sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
        }
    }
}
