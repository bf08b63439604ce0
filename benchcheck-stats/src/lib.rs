#![warn(missing_docs)]
//! BenchCheck Statistical Engine
//!
//! Provides the statistical machinery used to validate benchmark datasets:
//! - Student's t confidence intervals (exact quantiles, no z substitution)
//! - Cohen's d effect size with a guard against under-sampled comparisons
//! - Statistical power from the noncentral t distribution
//! - Summary statistics and percentiles per metric

mod distributions;
mod effect;
mod error;
mod interval;
mod percentiles;
mod power;
mod summary;

pub use distributions::{
    noncentral_t_cdf, normal_cdf, normal_quantile, student_t_cdf, student_t_quantile,
};
pub use effect::{EffectInterpretation, EffectSize, EffectSizeEstimate, cohens_d};
pub use error::StatsError;
pub use interval::{IntervalEstimate, estimate, estimate_from_summary};
pub use percentiles::{Percentiles, compute_percentile, compute_percentiles};
pub use power::{PowerEstimate, PowerMethod, power, power_with, required_sample_size};
pub use summary::{SummaryStatistics, compute_summary};

/// Minimum samples for any variance-based statistic
pub const MIN_SAMPLES: usize = 2;

/// Default confidence level (95%)
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Default significance level for power calculations
pub const DEFAULT_ALPHA: f64 = 0.05;
