//! Consistency Checks
//!
//! Verifies that each record's derived fields agree with the raw fields and
//! that every value is physically plausible.
//!
//! Besides the overall verdict every record is scored in three categories:
//! mathematical consistency, physical validity (latency and throughput inside
//! the plausibility ranges) and range validation (power and temperature
//! inside the plausibility ranges). The categories are reported on their own
//! and do not change `passed`.
//!
//! `check_all` always returns exactly one result per input record, in input
//! order, whether it runs serially or on the rayon pool.

use crate::record::MeasurementRecord;
use crate::store::PhysicalLimits;
use crate::{DEFAULT_EFFICIENCY_TOLERANCE, DEFAULT_THROUGHPUT_LATENCY_TOLERANCE};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Which checks run and how strict they are
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyPolicy {
    /// Relative tolerance for `efficiency == throughput / power`
    pub efficiency_tolerance: f64,
    /// Physical range constraints
    pub limits: PhysicalLimits,
    /// Also require `throughput ≈ batch_size / latency`
    pub check_throughput_latency: bool,
    /// Relative tolerance for the throughput/latency check
    pub throughput_latency_tolerance: f64,
    /// Expected operating ranges scored per category
    pub plausibility: PlausibilityRanges,
}

impl Default for ConsistencyPolicy {
    fn default() -> Self {
        Self {
            efficiency_tolerance: DEFAULT_EFFICIENCY_TOLERANCE,
            limits: PhysicalLimits::default(),
            // Pipelined accelerators overlap batches, so latency alone does
            // not determine throughput
            check_throughput_latency: false,
            throughput_latency_tolerance: DEFAULT_THROUGHPUT_LATENCY_TOLERANCE,
            plausibility: PlausibilityRanges::default(),
        }
    }
}

/// Inclusive value range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlausibleRange {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl PlausibleRange {
    /// Range `[min, max]`
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies inside the range; NaN never does
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Operating ranges a healthy benchmark run is expected to stay within
///
/// Unlike [`PhysicalLimits`] these never reject a record. They only feed the
/// physical-validity and range-validation categories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlausibilityRanges {
    /// Latency (ms)
    pub latency_ms: PlausibleRange,
    /// Throughput (fps)
    pub throughput_fps: PlausibleRange,
    /// Board power (W)
    pub power_w: PlausibleRange,
    /// Device temperature (°C)
    pub temperature_c: PlausibleRange,
}

impl Default for PlausibilityRanges {
    fn default() -> Self {
        Self {
            latency_ms: PlausibleRange::new(0.1, 1000.0),
            throughput_fps: PlausibleRange::new(1.0, 10_000.0),
            power_w: PlausibleRange::new(10.0, 100.0),
            temperature_c: PlausibleRange::new(20.0, 100.0),
        }
    }
}

/// Per-category verdicts for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResults {
    /// Derived fields agree with the raw fields
    pub mathematical: bool,
    /// Latency and throughput inside their plausibility ranges
    pub physical: bool,
    /// Power and temperature inside their plausibility ranges
    pub range: bool,
}

impl CategoryResults {
    /// Every category passed
    pub const ALL_PASSED: Self = Self {
        mathematical: true,
        physical: true,
        range: true,
    };
}

/// Outcome of checking one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether every check passed
    pub passed: bool,
    /// Failure reasons joined with "; ", absent on success
    pub reason: Option<String>,
    /// Category verdicts
    pub categories: CategoryResults,
}

impl CheckResult {
    /// A result passing the check and every category
    pub fn pass() -> Self {
        Self {
            passed: true,
            reason: None,
            categories: CategoryResults::ALL_PASSED,
        }
    }
}

/// Check a single record. Pure and total: never panics on any `f64` input.
pub fn check(record: &MeasurementRecord, policy: &ConsistencyPolicy) -> CheckResult {
    let mut reasons = Vec::new();

    if let Err(err) = policy.limits.check(record) {
        reasons.push(format!("physical range: {}", err));
    }

    let mut mathematical = true;
    let expected = record.expected_efficiency();
    if !relative_match(record.efficiency_fps_per_w, expected, policy.efficiency_tolerance) {
        mathematical = false;
        reasons.push(format!(
            "efficiency mismatch: recorded {} fps/W, throughput/power gives {} fps/W",
            record.efficiency_fps_per_w, expected
        ));
    }

    if policy.check_throughput_latency {
        let expected = record.expected_throughput();
        if !relative_match(
            record.throughput_fps,
            expected,
            policy.throughput_latency_tolerance,
        ) {
            mathematical = false;
            reasons.push(format!(
                "throughput mismatch: recorded {} fps, batch/latency gives {} fps",
                record.throughput_fps, expected
            ));
        }
    }

    let ranges = &policy.plausibility;
    let categories = CategoryResults {
        mathematical,
        physical: ranges.latency_ms.contains(record.latency_ms)
            && ranges.throughput_fps.contains(record.throughput_fps),
        range: ranges.power_w.contains(record.power_w)
            && ranges.temperature_c.contains(record.temperature_c),
    };

    CheckResult {
        passed: reasons.is_empty(),
        reason: (!reasons.is_empty()).then(|| reasons.join("; ")),
        categories,
    }
}

/// Check every record on the rayon pool; output order matches input order
pub fn check_all(records: &[MeasurementRecord], policy: &ConsistencyPolicy) -> Vec<CheckResult> {
    records.par_iter().map(|r| check(r, policy)).collect()
}

/// Single-threaded reference implementation of [`check_all`]
pub fn check_all_serial(
    records: &[MeasurementRecord],
    policy: &ConsistencyPolicy,
) -> Vec<CheckResult> {
    records.iter().map(|r| check(r, policy)).collect()
}

/// `|actual - expected| <= tolerance * |expected|`, false for non-finite input
fn relative_match(actual: f64, expected: f64, tolerance: f64) -> bool {
    if !actual.is_finite() || !expected.is_finite() {
        return false;
    }
    let scale = expected.abs().max(f64::MIN_POSITIVE);
    (actual - expected).abs() <= tolerance * scale
}
