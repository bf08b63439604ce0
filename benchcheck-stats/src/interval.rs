//! Confidence Intervals
//!
//! Two-sided Student's t interval for the mean:
//! `mean ± t*(level, n-1) · s / sqrt(n)` with Bessel-corrected `s`.
//!
//! The exact t quantile is used for every sample size. The z approximation is
//! never substituted, even for large n.

use crate::MIN_SAMPLES;
use crate::distributions::student_t_quantile;
use crate::error::{StatsError, check_confidence_level, check_finite};
use serde::{Deserialize, Serialize};

/// Confidence interval for the mean of one metric within one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalEstimate {
    /// Sample mean
    pub mean: f64,
    /// Sample standard deviation (ddof = 1)
    pub std_dev: f64,
    /// Number of samples
    pub sample_size: usize,
    /// Confidence level (e.g., 0.95)
    pub confidence_level: f64,
    /// Lower bound of the interval
    pub lower_bound: f64,
    /// Upper bound of the interval
    pub upper_bound: f64,
    /// Half-width of the interval
    pub margin_of_error: f64,
    /// Two-sided t critical value used
    pub critical_value: f64,
}

impl IntervalEstimate {
    /// Width of the interval
    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }

    /// Whether `value` lies inside the interval (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower_bound && value <= self.upper_bound
    }

    /// Standard error of the mean
    pub fn standard_error(&self) -> f64 {
        self.std_dev / (self.sample_size as f64).sqrt()
    }
}

/// Compute a t-based confidence interval for the mean of `samples`
///
/// Fails with [`StatsError::InsufficientSample`] when fewer than two samples
/// are supplied, since the sample standard deviation is undefined.
pub fn estimate(samples: &[f64], confidence_level: f64) -> Result<IntervalEstimate, StatsError> {
    if samples.len() < MIN_SAMPLES {
        return Err(StatsError::InsufficientSample {
            got: samples.len(),
            min: MIN_SAMPLES,
        });
    }
    check_confidence_level(confidence_level)?;
    check_finite(samples)?;

    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);

    build(mean, variance.sqrt(), samples.len(), confidence_level)
}

/// Compute a confidence interval from a published mean / std-dev / n triple
///
/// Useful for reproducing intervals stated in reports where only summary
/// figures are available.
pub fn estimate_from_summary(
    mean: f64,
    std_dev: f64,
    sample_size: usize,
    confidence_level: f64,
) -> Result<IntervalEstimate, StatsError> {
    if sample_size < MIN_SAMPLES {
        return Err(StatsError::InsufficientSample {
            got: sample_size,
            min: MIN_SAMPLES,
        });
    }
    check_confidence_level(confidence_level)?;
    if !mean.is_finite() {
        return Err(StatsError::domain("mean must be finite"));
    }
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(StatsError::domain(format!(
            "std_dev must be finite and non-negative, got {std_dev}"
        )));
    }

    build(mean, std_dev, sample_size, confidence_level)
}

fn build(
    mean: f64,
    std_dev: f64,
    sample_size: usize,
    confidence_level: f64,
) -> Result<IntervalEstimate, StatsError> {
    let df = (sample_size - 1) as f64;
    let critical_value = student_t_quantile(1.0 - (1.0 - confidence_level) / 2.0, df);
    let margin_of_error = critical_value * std_dev / (sample_size as f64).sqrt();

    Ok(IntervalEstimate {
        mean,
        std_dev,
        sample_size,
        confidence_level,
        lower_bound: mean - margin_of_error,
        upper_bound: mean + margin_of_error,
        margin_of_error,
        critical_value,
    })
}
