//! Statistical Power
//!
//! Power of a one-sample (or paired) t-test to detect a standardized effect
//! `d` with `n` observations: noncentrality `δ = d·√n`, `df = n - 1`.
//!
//! The noncentral t distribution is used whenever there is at least one
//! degree of freedom. With a single observation the normal approximation is
//! the only option.

use crate::distributions::{noncentral_t_cdf, normal_cdf, normal_quantile, student_t_quantile};
use crate::error::StatsError;
use serde::{Deserialize, Serialize};

/// Upper bound for [`required_sample_size`] searches
const MAX_SAMPLE_SIZE: usize = 100_000_000;

/// How power is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerMethod {
    /// Exact noncentral t (default)
    #[default]
    NoncentralT,
    /// Large-sample normal approximation
    NormalApproximation,
}

/// Power result with the inputs that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerEstimate {
    /// Hypothesized standardized effect size
    pub effect_size: f64,
    /// Number of observations
    pub sample_size: usize,
    /// Significance level
    pub alpha: f64,
    /// Two-sided test
    pub two_sided: bool,
    /// Method actually used
    pub method: PowerMethod,
    /// Probability of rejecting H0 when the effect is real, in [0, 1]
    pub power: f64,
}

/// Statistical power using the noncentral t distribution
pub fn power(
    effect_size: f64,
    sample_size: usize,
    alpha: f64,
    two_sided: bool,
) -> Result<f64, StatsError> {
    power_with(
        effect_size,
        sample_size,
        alpha,
        two_sided,
        PowerMethod::NoncentralT,
    )
    .map(|estimate| estimate.power)
}

/// Statistical power with an explicit method
///
/// `NoncentralT` silently falls back to `NormalApproximation` when
/// `sample_size == 1`; the returned estimate records which was used.
pub fn power_with(
    effect_size: f64,
    sample_size: usize,
    alpha: f64,
    two_sided: bool,
    method: PowerMethod,
) -> Result<PowerEstimate, StatsError> {
    if sample_size < 1 {
        return Err(StatsError::domain(format!(
            "sample_size must be at least 1, got {sample_size}"
        )));
    }
    if !(alpha.is_finite() && alpha > 0.0 && alpha < 1.0) {
        return Err(StatsError::domain(format!(
            "alpha must be in (0, 1), got {alpha}"
        )));
    }
    if !effect_size.is_finite() {
        return Err(StatsError::domain(format!(
            "effect_size must be finite, got {effect_size}"
        )));
    }

    let method = if sample_size == 1 {
        PowerMethod::NormalApproximation
    } else {
        method
    };

    let n = sample_size as f64;
    let delta = effect_size * n.sqrt();
    let tail_alpha = if two_sided { alpha / 2.0 } else { alpha };

    let power = match method {
        PowerMethod::NoncentralT => {
            let df = n - 1.0;
            let crit = student_t_quantile(1.0 - tail_alpha, df);
            let upper = 1.0 - noncentral_t_cdf(crit, df, delta);
            if two_sided {
                upper + noncentral_t_cdf(-crit, df, delta)
            } else {
                upper
            }
        }
        PowerMethod::NormalApproximation => {
            let z = normal_quantile(1.0 - tail_alpha);
            let upper = normal_cdf(delta - z);
            if two_sided {
                upper + normal_cdf(-delta - z)
            } else {
                upper
            }
        }
    };

    Ok(PowerEstimate {
        effect_size,
        sample_size,
        alpha,
        two_sided,
        method,
        power: power.clamp(0.0, 1.0),
    })
}

/// Smallest sample size whose power reaches `target_power`
///
/// Power grows monotonically with n for a fixed non-zero effect, so the
/// search doubles an upper bound and then bisects.
pub fn required_sample_size(
    effect_size: f64,
    alpha: f64,
    target_power: f64,
    two_sided: bool,
) -> Result<usize, StatsError> {
    if !(target_power.is_finite() && target_power > 0.0 && target_power < 1.0) {
        return Err(StatsError::domain(format!(
            "target_power must be in (0, 1), got {target_power}"
        )));
    }
    if effect_size == 0.0 {
        return Err(StatsError::domain(
            "effect_size of zero cannot reach any target power",
        ));
    }
    // One-sided tests only have power in the hypothesized direction
    let effect_size = if two_sided {
        effect_size.abs()
    } else {
        effect_size
    };
    if effect_size < 0.0 {
        return Err(StatsError::domain(
            "one-sided power for a negative effect size cannot reach the target",
        ));
    }

    let reaches = |n: usize| -> Result<bool, StatsError> {
        Ok(power(effect_size, n, alpha, two_sided)? >= target_power)
    };

    let mut lo = 1;
    let mut hi = 2;
    while !reaches(hi)? {
        lo = hi;
        hi = hi.saturating_mul(2);
        if hi > MAX_SAMPLE_SIZE {
            return Err(StatsError::domain(format!(
                "target power {target_power} needs more than {MAX_SAMPLE_SIZE} samples"
            )));
        }
    }
    if reaches(lo)? {
        return Ok(lo);
    }

    // Invariant: !reaches(lo) && reaches(hi)
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if reaches(mid)? {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    Ok(hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textbook_power() {
        // d = 0.5, n = 50, alpha = 0.05 two-sided: 0.934 from standard tables
        let p = power(0.5, 50, 0.05, true).unwrap();
        assert!(p > 0.93 && p < 0.95, "power = {p}");
        assert!((p - 0.9338).abs() < 0.002, "power = {p}");
    }

    #[test]
    fn test_normal_approximation_is_close_for_large_n() {
        let exact = power(0.3, 200, 0.05, true).unwrap();
        let approx = power_with(0.3, 200, 0.05, true, PowerMethod::NormalApproximation)
            .unwrap()
            .power;
        assert!((exact - approx).abs() < 0.01);
    }

    #[test]
    fn test_zero_effect_gives_alpha() {
        let p = power(0.0, 30, 0.05, true).unwrap();
        assert!((p - 0.05).abs() < 1e-9, "power = {p}");
        let p = power(0.0, 30, 0.05, false).unwrap();
        assert!((p - 0.05).abs() < 1e-9, "power = {p}");
    }

    #[test]
    fn test_power_increases_with_n_and_d() {
        let a = power(0.3, 20, 0.05, true).unwrap();
        let b = power(0.3, 80, 0.05, true).unwrap();
        let c = power(0.6, 80, 0.05, true).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_two_sided_is_symmetric_in_d() {
        let pos = power(0.4, 25, 0.05, true).unwrap();
        let neg = power(-0.4, 25, 0.05, true).unwrap();
        assert!((pos - neg).abs() < 1e-9);
    }

    #[test]
    fn test_single_observation_uses_normal_approximation() {
        let est = power_with(1.0, 1, 0.05, true, PowerMethod::NoncentralT).unwrap();
        assert_eq!(est.method, PowerMethod::NormalApproximation);
        assert!(est.power > 0.0 && est.power < 1.0);
    }

    #[test]
    fn test_domain_errors() {
        assert!(matches!(power(0.5, 0, 0.05, true), Err(StatsError::Domain { .. })));
        assert!(matches!(power(0.5, 10, 0.0, true), Err(StatsError::Domain { .. })));
        assert!(matches!(power(0.5, 10, 1.0, true), Err(StatsError::Domain { .. })));
        assert!(matches!(power(f64::NAN, 10, 0.05, true), Err(StatsError::Domain { .. })));
    }

    /// "Power > 99%" needs checking, not asserting: a small effect at n = 50
    /// is far from it, while n in the thousands gets there.
    #[test]
    fn test_claimed_high_power_depends_on_n() {
        assert!(power(0.2, 50, 0.05, true).unwrap() < 0.5);
        assert!(power(0.2, 1199, 0.05, true).unwrap() > 0.99);
    }

    #[test]
    fn test_required_sample_size() {
        // Classic one-sample result: d = 0.5, 80% power -> n = 34
        let n = required_sample_size(0.5, 0.05, 0.80, true).unwrap();
        assert_eq!(n, 34);
        assert!(power(0.5, n, 0.05, true).unwrap() >= 0.80);
        assert!(power(0.5, n - 1, 0.05, true).unwrap() < 0.80);

        let smaller_effect = required_sample_size(0.3, 0.05, 0.80, true).unwrap();
        assert!(smaller_effect > n);
    }

    #[test]
    fn test_required_sample_size_domain() {
        assert!(required_sample_size(0.0, 0.05, 0.8, true).is_err());
        assert!(required_sample_size(0.5, 0.05, 1.0, true).is_err());
        assert!(required_sample_size(-0.5, 0.05, 0.8, false).is_err());
    }
}
