//! Effect Size
//!
//! Cohen's d between two independent groups using the pooled (ddof = 1)
//! standard deviation.
//!
//! A single extreme value on either side is not a sample. Comparing a peak
//! measurement from one population against a datasheet constant inflates
//! d arbitrarily, so any group with fewer than two samples is refused with
//! [`StatsError::InvalidComparison`].

use crate::MIN_SAMPLES;
use crate::error::{StatsError, check_finite};
use serde::{Deserialize, Serialize};

/// Interpretation of effect size magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectInterpretation {
    /// |d| < 0.2 - negligible difference
    Negligible,
    /// 0.2 <= |d| < 0.5 - small difference
    Small,
    /// 0.5 <= |d| < 0.8 - medium difference
    Medium,
    /// |d| >= 0.8 - large difference
    Large,
}

impl EffectInterpretation {
    /// Classify an effect size using Cohen's conventions
    pub fn from_d(d: f64) -> Self {
        let abs_d = d.abs();
        if abs_d < 0.2 {
            EffectInterpretation::Negligible
        } else if abs_d < 0.5 {
            EffectInterpretation::Small
        } else if abs_d < 0.8 {
            EffectInterpretation::Medium
        } else {
            EffectInterpretation::Large
        }
    }
}

impl std::fmt::Display for EffectInterpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectInterpretation::Negligible => write!(f, "negligible"),
            EffectInterpretation::Small => write!(f, "small"),
            EffectInterpretation::Medium => write!(f, "medium"),
            EffectInterpretation::Large => write!(f, "large"),
        }
    }
}

/// Unlabelled Cohen's d result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSize {
    /// Mean of group A
    pub mean_a: f64,
    /// Mean of group B
    pub mean_b: f64,
    /// Samples in group A
    pub n_a: usize,
    /// Samples in group B
    pub n_b: usize,
    /// Pooled standard deviation
    pub pooled_std_dev: f64,
    /// (mean_a - mean_b) / pooled_std_dev
    pub cohens_d: f64,
    /// Magnitude class (informational only)
    pub interpretation: EffectInterpretation,
}

impl EffectSize {
    /// Attach metric and group labels
    pub fn labelled(
        self,
        metric: impl Into<String>,
        group_a_id: impl Into<String>,
        group_b_id: impl Into<String>,
    ) -> EffectSizeEstimate {
        EffectSizeEstimate {
            metric: metric.into(),
            group_a_id: group_a_id.into(),
            group_b_id: group_b_id.into(),
            mean_a: self.mean_a,
            mean_b: self.mean_b,
            n_a: self.n_a,
            n_b: self.n_b,
            pooled_std_dev: self.pooled_std_dev,
            cohens_d: self.cohens_d,
            interpretation: self.interpretation,
        }
    }
}

/// Cohen's d comparing two named groups on one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSizeEstimate {
    /// Metric compared
    pub metric: String,
    /// Identifier of group A
    pub group_a_id: String,
    /// Identifier of group B
    pub group_b_id: String,
    /// Mean of group A
    pub mean_a: f64,
    /// Mean of group B
    pub mean_b: f64,
    /// Samples in group A
    pub n_a: usize,
    /// Samples in group B
    pub n_b: usize,
    /// Pooled standard deviation
    pub pooled_std_dev: f64,
    /// Signed effect size; positive when group A's mean is larger
    pub cohens_d: f64,
    /// Magnitude class (informational only)
    pub interpretation: EffectInterpretation,
}

/// Compute Cohen's d for `group_a` versus `group_b`
///
/// `s_p = sqrt(((n_a-1)·var_a + (n_b-1)·var_b) / (n_a+n_b-2))`,
/// `d = (mean_a - mean_b) / s_p`.
pub fn cohens_d(group_a: &[f64], group_b: &[f64]) -> Result<EffectSize, StatsError> {
    if group_a.len() < MIN_SAMPLES {
        return Err(StatsError::invalid_comparison(format!(
            "group A has {} sample(s); two-sample comparison needs at least {} independent samples per group",
            group_a.len(),
            MIN_SAMPLES
        )));
    }
    if group_b.len() < MIN_SAMPLES {
        return Err(StatsError::invalid_comparison(format!(
            "group B has {} sample(s); two-sample comparison needs at least {} independent samples per group",
            group_b.len(),
            MIN_SAMPLES
        )));
    }
    check_finite(group_a)?;
    check_finite(group_b)?;

    let (mean_a, var_a) = mean_and_variance(group_a);
    let (mean_b, var_b) = mean_and_variance(group_b);

    let n_a = group_a.len() as f64;
    let n_b = group_b.len() as f64;
    let pooled_std_dev =
        ((((n_a - 1.0) * var_a) + ((n_b - 1.0) * var_b)) / (n_a + n_b - 2.0)).sqrt();

    if pooled_std_dev <= 0.0 {
        return Err(StatsError::invalid_comparison(
            "pooled standard deviation is zero; effect size is undefined",
        ));
    }

    let d = (mean_a - mean_b) / pooled_std_dev;

    Ok(EffectSize {
        mean_a,
        mean_b,
        n_a: group_a.len(),
        n_b: group_b.len(),
        pooled_std_dev,
        cohens_d: d,
        interpretation: EffectInterpretation::from_d(d),
    })
}

fn mean_and_variance(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance)
}
