//! Statistical Errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from interval, effect size and power computations.
///
/// Serializable so per-group failures can be carried inside a report
/// next to the groups that succeeded.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatsError {
    /// Too few samples for a variance-based statistic
    #[error("Not enough samples: got {got}, need at least {min}")]
    InsufficientSample {
        /// Samples supplied
        got: usize,
        /// Samples required
        min: usize,
    },

    /// Two groups cannot be compared as independent samples
    #[error("Invalid comparison: {reason}")]
    InvalidComparison {
        /// Why the comparison was refused
        reason: String,
    },

    /// Parameter outside the domain of the function
    #[error("Domain error: {message}")]
    Domain {
        /// Which parameter was out of range
        message: String,
    },

    /// Confidence level not in (0, 1)
    #[error("Invalid confidence level: {level} (must be between 0 and 1)")]
    InvalidConfidenceLevel {
        /// Rejected level
        level: f64,
    },

    /// NaN or infinite sample value
    #[error("Non-finite sample at index {index}")]
    NonFiniteSample {
        /// Position of the offending sample
        index: usize,
    },
}

impl StatsError {
    pub(crate) fn domain(message: impl Into<String>) -> Self {
        StatsError::Domain {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_comparison(reason: impl Into<String>) -> Self {
        StatsError::InvalidComparison {
            reason: reason.into(),
        }
    }
}

pub(crate) fn check_confidence_level(level: f64) -> Result<(), StatsError> {
    if level.is_finite() && level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(StatsError::InvalidConfidenceLevel { level })
    }
}

pub(crate) fn check_finite(samples: &[f64]) -> Result<(), StatsError> {
    match samples.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(StatsError::NonFiniteSample { index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serializes_with_kind_tag() {
        let err = StatsError::InsufficientSample { got: 1, min: 2 };
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains(r#""kind":"insufficient_sample""#));
        let back: StatsError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_confidence_level_bounds() {
        assert!(check_confidence_level(0.95).is_ok());
        assert!(check_confidence_level(0.0).is_err());
        assert!(check_confidence_level(1.0).is_err());
        assert!(check_confidence_level(f64::NAN).is_err());
    }

    #[test]
    fn test_check_finite() {
        assert!(check_finite(&[1.0, 2.0]).is_ok());
        assert_eq!(
            check_finite(&[1.0, f64::NAN, 3.0]),
            Err(StatsError::NonFiniteSample { index: 1 })
        );
    }
}
