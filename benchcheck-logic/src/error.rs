//! Validation Errors

use benchcheck_core::SchemaError;
use benchcheck_stats::StatsError;
use thiserror::Error;

/// Errors that stop a validation run or a direct group comparison
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The dataset could not be loaded; the run is aborted
    #[error("Load failed: {0}")]
    Load(#[from] SchemaError),

    /// A cancellation token fired between group computations
    #[error("Validation cancelled")]
    Cancelled,

    /// No configuration group has the requested identifier
    #[error("Unknown group: {0}")]
    UnknownGroup(String),

    /// Metric name not recognized
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Malformed comparison or power request
    #[error("Invalid request `{input}`: {reason}")]
    InvalidRequest {
        /// Text as supplied
        input: String,
        /// What is wrong with it
        reason: String,
    },

    /// A statistic could not be computed
    #[error(transparent)]
    Stats(#[from] StatsError),
}
