#![warn(missing_docs)]
//! BenchCheck Logic - Validation Orchestration
//!
//! Drives a dataset through the validation pipeline and derives the
//! dataset-level analyses that go into the report:
//! - `Validator` state machine (load, check, estimate, report)
//! - Requested Cohen's d comparisons and power computations
//! - Dataset-wide statistics, peak configurations and core-count scaling
//! - The overall assessment with per-category validity rates

mod assessment;
mod cancel;
mod error;
mod peaks;
mod request;
mod scaling;
mod validator;

pub use assessment::{AssessmentThresholds, assess, validity_rates};
pub use cancel::CancellationToken;
pub use error::ValidationError;
pub use peaks::{TOP_CONFIGURATIONS, find_peaks, top_configurations};
pub use request::{ComparisonRequest, PowerRequest, ValidationRequest};
pub use scaling::analyze_scaling;
pub use validator::{ValidationState, Validator, ValidatorOptions, compare_groups};
