#![warn(missing_docs)]
//! # BenchCheck
//!
//! Statistical validation of benchmark measurement datasets.
//!
//! BenchCheck takes the raw runs of a hardware benchmark campaign and answers
//! whether the numbers hold up:
//! - **Consistency**: every record's derived efficiency must match
//!   throughput / power, and values must sit inside physical limits; each
//!   record is also scored against expected operating ranges
//! - **Confidence Intervals**: Student-t intervals for every metric of every
//!   `(model, cores, batch_size)` configuration group
//! - **Effect Sizes**: Cohen's d between two groups, refused for groups too
//!   small to have a variance
//! - **Statistical Power**: noncentral-t power and required sample sizes
//! - **Assessment**: peaks, core-count scaling and an overall PASSED/FAILED
//!
//! ## Quick Start
//!
//! ```ignore
//! use benchcheck::prelude::*;
//!
//! let rows: Vec<RawRecord> = load_records(std::path::Path::new("runs.csv"))?;
//! let report = Validator::new(ValidatorOptions::default()).run(rows)?;
//! println!("{}", format_human_output(&report));
//! ```

// Re-export core types
pub use benchcheck_core::{
    CategoryResults, CheckResult, ConfigurationGroup, ConsistencyPolicy, FieldError, GroupField,
    GroupKey, LoadMode, MeasurementRecord, MeasurementStore, Metric, PhysicalLimits,
    PlausibilityRanges, PlausibleRange, RawRecord, Rejection, SchemaError,
};

// Re-export logic types
pub use benchcheck_logic::{
    AssessmentThresholds, CancellationToken, ComparisonRequest, PowerRequest, ValidationError,
    ValidationRequest, ValidationState, Validator, ValidatorOptions, compare_groups,
};

// Re-export report types
pub use benchcheck_report::{
    Assessment, AssessmentStatus, DatasetStatistics, MetricOverview, Outcome, OutputFormat,
    TopConfiguration, ValidationReport, ValidityRates, generate_json_report, parse_json_report,
};

// Re-export stats
pub use benchcheck_stats::{
    EffectSizeEstimate, IntervalEstimate, PowerEstimate, StatsError, SummaryStatistics, cohens_d,
    compute_summary, estimate, estimate_from_summary, power, required_sample_size,
};

// Re-export loading and formatting
pub use benchcheck_cli::{BenchCheckConfig, format_human_output, load_records};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        GroupKey, Metric, RawRecord, ValidationReport, ValidationRequest, Validator,
        ValidatorOptions, format_human_output, load_records,
    };
}

/// Run the BenchCheck CLI.
///
/// ```ignore
/// fn main() {
///     benchcheck::run().unwrap();
/// }
/// ```
pub use benchcheck_cli::run;
