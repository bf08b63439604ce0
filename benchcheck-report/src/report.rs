//! Report Data Structures

use benchcheck_core::{GroupKey, LoadMode, Metric, Rejection};
use benchcheck_stats::{
    EffectSizeEstimate, IntervalEstimate, PowerEstimate, StatsError, SummaryStatistics,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Complete validation report
///
/// Built once at the end of a run and never mutated afterwards. Groups keep
/// the order in which their first record appeared in the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Run metadata
    pub meta: ReportMeta,
    /// Record and group totals
    pub summary: ReportSummary,
    /// Records that failed the consistency check, in input order
    pub failures: Vec<FailureInfo>,
    /// Rows refused at ingestion, in input order
    pub rejected: Vec<Rejection>,
    /// Statistics over every record regardless of configuration
    pub overall: DatasetStatistics,
    /// Per-configuration statistics
    pub groups: Vec<GroupReport>,
    /// Requested Cohen's d comparisons, in request order
    pub effect_sizes: Vec<ComparisonOutcome>,
    /// Requested power computations, in request order
    pub power: Vec<PowerOutcome>,
    /// Peak configurations across the dataset
    pub peaks: Peaks,
    /// Core-count scaling per (model, batch size)
    pub scaling: Vec<ScalingSeries>,
    /// Overall verdict
    pub assessment: Assessment,
}

impl ValidationReport {
    /// Look up a group by its identifier (e.g. `resnet18_cores1_batch1`)
    pub fn group(&self, id: &str) -> Option<&GroupReport> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Groups with at least one metric that could not be estimated
    pub fn flagged_groups(&self) -> impl Iterator<Item = &GroupReport> {
        self.groups.iter().filter(|g| !g.is_fully_estimated())
    }

    /// Whether the overall assessment passed
    pub fn is_passed(&self) -> bool {
        self.assessment.status == AssessmentStatus::Passed
    }
}

/// Report metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Report layout version
    pub schema_version: u32,
    /// benchcheck version that produced the report
    pub version: String,
    /// When the report was produced
    pub timestamp: DateTime<Utc>,
    /// Confidence level used for every interval
    pub confidence_level: f64,
    /// Relative tolerance of the efficiency check
    pub efficiency_tolerance: f64,
    /// How invalid rows were handled at ingestion
    pub load_mode: LoadMode,
}

/// Totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Records that made it into the store
    pub total_records: usize,
    /// Records passing every consistency check
    pub passed_consistency: usize,
    /// Records failing at least one consistency check
    pub failed_consistency: usize,
    /// Rows refused at ingestion
    pub rejected_records: usize,
    /// Configuration groups
    pub total_groups: usize,
    /// Groups where every metric has an interval
    pub estimated_groups: usize,
    /// Groups flagged with at least one per-metric error
    pub flagged_groups: usize,
}

/// Dataset-wide statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatistics {
    /// Records in the store
    pub total_records: usize,
    /// Distinct models
    pub models_tested: usize,
    /// Distinct `(model, cores, batch_size)` configurations
    pub configurations_tested: usize,
    /// Interval and descriptive statistics for every metric over all records
    pub metrics: BTreeMap<Metric, MetricOverview>,
}

impl DatasetStatistics {
    /// Interval for one metric over the whole dataset, if it could be estimated
    pub fn interval(&self, metric: Metric) -> Option<&IntervalEstimate> {
        self.metrics.get(&metric).and_then(|m| m.interval.ok())
    }
}

/// One metric summarized across the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricOverview {
    /// Confidence interval for the mean, or why it could not be computed
    pub interval: Outcome<IntervalEstimate>,
    /// Count, mean, spread, quartiles and CV
    pub summary: SummaryStatistics,
}

/// A record that failed the consistency check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureInfo {
    /// Position of the record in the original input
    pub index: usize,
    /// Model of the failing record
    pub model: String,
    /// Configuration group of the failing record
    pub group_id: String,
    /// Failure reasons joined with "; "
    pub reason: String,
}

/// Result of one requested or per-group computation
///
/// Serializes as `{"ok": ...}` or `{"error": {"kind": ...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome<T> {
    /// Computed value
    Ok(T),
    /// Why the value could not be computed
    Error(StatsError),
}

impl<T> Outcome<T> {
    /// Borrow as a `Result`
    pub fn as_result(&self) -> Result<&T, &StatsError> {
        match self {
            Outcome::Ok(value) => Ok(value),
            Outcome::Error(err) => Err(err),
        }
    }

    /// The value, if computed
    pub fn ok(&self) -> Option<&T> {
        self.as_result().ok()
    }

    /// The error, if any
    pub fn err(&self) -> Option<&StatsError> {
        self.as_result().err()
    }

    /// Whether the value was computed
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }
}

impl<T> From<Result<T, StatsError>> for Outcome<T> {
    fn from(result: Result<T, StatsError>) -> Self {
        match result {
            Ok(value) => Outcome::Ok(value),
            Err(err) => Outcome::Error(err),
        }
    }
}

/// Statistics for one configuration group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupReport {
    /// Group identifier, `{model}_cores{N}_batch{M}`
    pub id: String,
    /// Configuration key
    pub key: GroupKey,
    /// Records in the group
    pub sample_size: usize,
    /// Confidence interval or per-group error for every metric
    pub intervals: BTreeMap<Metric, Outcome<IntervalEstimate>>,
    /// Descriptive statistics for every metric
    pub summaries: BTreeMap<Metric, SummaryStatistics>,
}

impl GroupReport {
    /// Interval for one metric, if it could be estimated
    pub fn interval(&self, metric: Metric) -> Option<&IntervalEstimate> {
        self.intervals.get(&metric).and_then(Outcome::ok)
    }

    /// Whether every metric has an interval
    pub fn is_fully_estimated(&self) -> bool {
        self.intervals.values().all(Outcome::is_ok)
    }
}

/// One requested Cohen's d comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOutcome {
    /// Identifier of group A
    pub group_a: String,
    /// Identifier of group B
    pub group_b: String,
    /// Metric compared
    pub metric: Metric,
    /// Effect size, or why the comparison was refused
    pub result: Outcome<EffectSizeEstimate>,
}

/// One requested power computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerOutcome {
    /// Hypothesized effect size
    pub effect_size: f64,
    /// Sample size
    pub sample_size: usize,
    /// Power, or the domain error
    pub result: Outcome<PowerEstimate>,
}

/// A single record holding an extreme value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakRecord {
    /// Position in the original input
    pub index: usize,
    /// Configuration group of the record
    pub group_id: String,
    /// The extreme value
    pub value: f64,
}

/// The group with the best mean for a metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakGroup {
    /// Group identifier
    pub group_id: String,
    /// Group mean
    pub mean: f64,
    /// Records in the group
    pub sample_size: usize,
}

/// Closed value range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

/// Extremes across the dataset
///
/// Single-record peaks are reported for reference only. They are never fed
/// into an effect-size comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peaks {
    /// Highest single throughput
    pub max_throughput: PeakRecord,
    /// Highest single efficiency
    pub max_efficiency: PeakRecord,
    /// Lowest single latency
    pub min_latency: PeakRecord,
    /// Hottest single record
    pub max_temperature: PeakRecord,
    /// Power draw range
    pub power_range: ValueRange,
    /// Group with the highest mean throughput
    pub best_throughput_group: PeakGroup,
    /// Group with the highest mean efficiency
    pub best_efficiency_group: PeakGroup,
    /// Highest mean throughput first, at most five entries
    pub top_configurations: Vec<TopConfiguration>,
}

/// Averages of one configuration in the throughput ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopConfiguration {
    /// Group identifier
    pub group_id: String,
    /// Mean throughput (fps)
    pub avg_throughput_fps: f64,
    /// Highest single throughput in the group (fps)
    pub max_throughput_fps: f64,
    /// Mean efficiency (fps/W)
    pub avg_efficiency_fps_per_w: f64,
    /// Mean power (W)
    pub avg_power_w: f64,
    /// Records in the group
    pub sample_size: usize,
}

/// Throughput scaling for one core count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingPoint {
    /// Core count
    pub cores: u32,
    /// Mean throughput of the group
    pub mean_throughput_fps: f64,
    /// `mean_throughput / baseline_throughput`
    pub speedup: f64,
    /// `speedup / cores`; 1.0 is perfectly linear
    pub scaling_efficiency: f64,
}

/// Core-count scaling for one (model, batch size)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingSeries {
    /// Model
    pub model: String,
    /// Batch size
    pub batch_size: u32,
    /// Mean throughput of the single-core group
    pub baseline_throughput_fps: f64,
    /// Points in ascending core order, starting with the baseline
    pub points: Vec<ScalingPoint>,
}

/// Data-quality grade derived from the consistency rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataQuality {
    /// Consistency rate at or above the excellent threshold
    Excellent,
    /// Consistency rate at or above the good threshold
    Good,
    /// Anything lower
    Poor,
}

/// Statistical-validity grade derived from the record count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatisticalValidity {
    /// More records than the high threshold
    High,
    /// More records than the medium threshold
    Medium,
    /// Anything lower
    Low,
}

/// Overall pass/fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssessmentStatus {
    /// Dataset is consistent and large enough
    Passed,
    /// Dataset fails at least one criterion
    Failed,
}

macro_rules! upper_display {
    ($ty:ty { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(match self {
                    $(Self::$variant => $text,)+
                })
            }
        }
    };
}

upper_display!(DataQuality { Excellent => "EXCELLENT", Good => "GOOD", Poor => "POOR" });
upper_display!(StatisticalValidity { High => "HIGH", Medium => "MEDIUM", Low => "LOW" });
upper_display!(AssessmentStatus { Passed => "PASSED", Failed => "FAILED" });

/// Percentage of records passing each check category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidityRates {
    /// Derived fields agree with the raw fields
    pub mathematical_consistency: f64,
    /// Latency and throughput inside the plausibility ranges
    pub physical_validity: f64,
    /// Power and temperature inside the plausibility ranges
    pub range_validation: f64,
}

/// Overall verdict for the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Percentage of records passing the consistency check
    pub consistency_rate: f64,
    /// Per-category pass rates
    pub validity: ValidityRates,
    /// Grade for the consistency rate
    pub data_quality: DataQuality,
    /// Grade for the record count
    pub statistical_validity: StatisticalValidity,
    /// PASSED or FAILED
    pub status: AssessmentStatus,
}
