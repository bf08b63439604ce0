//! Requested Computations
//!
//! Effect-size comparisons and power computations are only run when asked
//! for. Both parse from the compact forms accepted on the command line:
//! `GROUP_A::GROUP_B::metric` and `d:n`.

use crate::error::ValidationError;
use benchcheck_core::{GroupKey, Metric};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Cohen's d between two configuration groups on one metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    /// Group A identifier, e.g. `resnet18_cores4_batch8`
    pub group_a: String,
    /// Group B identifier
    pub group_b: String,
    /// Metric to compare
    pub metric: Metric,
}

impl ComparisonRequest {
    /// Build a request from two configuration keys
    pub fn new(group_a: &GroupKey, group_b: &GroupKey, metric: Metric) -> Self {
        Self {
            group_a: group_a.id(),
            group_b: group_b.id(),
            metric,
        }
    }
}

impl FromStr for ComparisonRequest {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidRequest {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.split("::").map(str::trim).collect();
        let [group_a, group_b, metric] = parts.as_slice() else {
            return Err(invalid("expected GROUP_A::GROUP_B::metric"));
        };
        if group_a.is_empty() || group_b.is_empty() {
            return Err(invalid("group identifiers must not be empty"));
        }
        let metric = metric
            .parse::<Metric>()
            .map_err(|_| ValidationError::UnknownMetric(metric.to_string()))?;

        Ok(Self {
            group_a: group_a.to_string(),
            group_b: group_b.to_string(),
            metric,
        })
    }
}

/// Power for a hypothesized effect size at a given sample size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerRequest {
    /// Standardized effect size
    pub effect_size: f64,
    /// Number of observations
    pub sample_size: usize,
}

impl FromStr for PowerRequest {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ValidationError::InvalidRequest {
            input: s.to_string(),
            reason,
        };

        let (d, n) = s
            .split_once(':')
            .ok_or_else(|| invalid("expected EFFECT:SAMPLES".to_string()))?;
        let effect_size = d
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(format!("effect size: {}", e)))?;
        let sample_size = n
            .trim()
            .parse::<usize>()
            .map_err(|e| invalid(format!("sample size: {}", e)))?;

        Ok(Self {
            effect_size,
            sample_size,
        })
    }
}

/// Computations to run on top of the per-group intervals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// Effect-size comparisons, reported in this order
    pub comparisons: Vec<ComparisonRequest>,
    /// Power computations, reported in this order
    pub power: Vec<PowerRequest>,
}

impl ValidationRequest {
    /// Add a comparison
    pub fn compare(mut self, request: ComparisonRequest) -> Self {
        self.comparisons.push(request);
        self
    }

    /// Add a power computation
    pub fn power(mut self, effect_size: f64, sample_size: usize) -> Self {
        self.power.push(PowerRequest {
            effect_size,
            sample_size,
        });
        self
    }

    /// Add the cross product of effect sizes and sample sizes
    pub fn power_grid(mut self, effect_sizes: &[f64], sample_sizes: &[usize]) -> Self {
        for &d in effect_sizes {
            for &n in sample_sizes {
                self = self.power(d, n);
            }
        }
        self
    }
}
