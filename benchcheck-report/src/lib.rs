#![warn(missing_docs)]
//! BenchCheck Report - Validation Output
//!
//! The `ValidationReport` value produced by a validation run and its
//! serialized forms:
//! - JSON (machine-readable, pretty-printed)
//! - Human-readable terminal output (rendered by the CLI)

mod json;
mod report;

pub use json::{generate_json_report, parse_json_report};
pub use report::{
    Assessment, AssessmentStatus, ComparisonOutcome, DataQuality, DatasetStatistics, FailureInfo,
    GroupReport, MetricOverview, Outcome, PeakGroup, PeakRecord, Peaks, PowerOutcome, ReportMeta,
    ReportSummary, ScalingPoint, ScalingSeries, StatisticalValidity, TopConfiguration,
    ValidationReport, ValidityRates, ValueRange,
};

/// Version of the JSON report layout
pub const SCHEMA_VERSION: u32 = 1;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// Human-readable terminal output
    #[default]
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Human);
        assert!("html".parse::<OutputFormat>().is_err());
    }
}
