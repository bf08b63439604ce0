//! Summary Statistics
//!
//! Descriptive statistics for one metric: central tendency, spread and
//! quartiles. Unlike [`crate::estimate`], this never fails; degenerate inputs
//! produce zeros so every group can still be described in a report.

use crate::percentiles::compute_percentiles;
use serde::{Deserialize, Serialize};

/// Descriptive statistics for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Number of samples
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (ddof = 1), 0 for fewer than two samples
    pub std_dev: f64,
    /// Median
    pub median: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// First quartile
    pub q25: f64,
    /// Third quartile
    pub q75: f64,
    /// std_dev / mean as a ratio (0 when mean is 0)
    pub coefficient_of_variation: f64,
}

impl SummaryStatistics {
    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.q75 - self.q25
    }

    /// Check if distribution appears stable (CV below threshold ratio)
    pub fn is_stable(&self, cv_threshold: f64) -> bool {
        self.coefficient_of_variation.abs() < cv_threshold
    }
}

/// Compute summary statistics for `samples`
pub fn compute_summary(samples: &[f64]) -> SummaryStatistics {
    if samples.is_empty() {
        return SummaryStatistics {
            count: 0,
            mean: 0.0,
            std_dev: 0.0,
            median: 0.0,
            min: 0.0,
            max: 0.0,
            q25: 0.0,
            q75: 0.0,
            coefficient_of_variation: 0.0,
        };
    }

    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;

    let std_dev = if samples.len() < 2 {
        0.0
    } else {
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        variance.sqrt()
    };

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let percentiles = compute_percentiles(samples);

    let coefficient_of_variation = if mean == 0.0 { 0.0 } else { std_dev / mean };

    SummaryStatistics {
        count: samples.len(),
        mean,
        std_dev,
        median: percentiles.p50,
        min,
        max,
        q25: percentiles.p25,
        q75: percentiles.p75,
        coefficient_of_variation,
    }
}
