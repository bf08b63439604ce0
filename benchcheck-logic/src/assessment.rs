//! Overall Assessment
//!
//! Grades a dataset from its consistency rate and record count, and reports
//! the pass rate of each check category alongside the grade.

use benchcheck_core::CheckResult;
use benchcheck_report::{
    Assessment, AssessmentStatus, DataQuality, StatisticalValidity, ValidityRates,
};
use serde::{Deserialize, Serialize};

/// Cut-offs for the assessment grades
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentThresholds {
    /// Consistency rate (%) at or above which data quality is EXCELLENT
    pub excellent_rate: f64,
    /// Consistency rate (%) at or above which data quality is GOOD
    pub good_rate: f64,
    /// Records above which statistical validity is HIGH
    pub high_validity_records: usize,
    /// Records above which statistical validity is MEDIUM
    pub medium_validity_records: usize,
    /// Minimum consistency rate (%) for PASSED
    pub pass_rate: f64,
    /// Records required (strictly more than) for PASSED
    pub pass_min_records: usize,
}

impl Default for AssessmentThresholds {
    fn default() -> Self {
        Self {
            excellent_rate: 95.0,
            good_rate: 90.0,
            high_validity_records: 1000,
            medium_validity_records: 100,
            pass_rate: 95.0,
            pass_min_records: 1000,
        }
    }
}

/// Grade a run from its per-record check results
pub fn assess(checks: &[CheckResult], thresholds: &AssessmentThresholds) -> Assessment {
    let passed = checks.iter().filter(|c| c.passed).count();
    grade(passed, checks.len(), validity_rates(checks), thresholds)
}

/// Percentage of records passing each category; all zero for no records
pub fn validity_rates(checks: &[CheckResult]) -> ValidityRates {
    let rate = |passing: fn(&CheckResult) -> bool| {
        percentage(checks.iter().filter(|c| passing(c)).count(), checks.len())
    };
    ValidityRates {
        mathematical_consistency: rate(|c| c.categories.mathematical),
        physical_validity: rate(|c| c.categories.physical),
        range_validation: rate(|c| c.categories.range),
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn grade(
    passed: usize,
    total: usize,
    validity: ValidityRates,
    thresholds: &AssessmentThresholds,
) -> Assessment {
    let consistency_rate = percentage(passed, total);

    let data_quality = if consistency_rate >= thresholds.excellent_rate {
        DataQuality::Excellent
    } else if consistency_rate >= thresholds.good_rate {
        DataQuality::Good
    } else {
        DataQuality::Poor
    };

    let statistical_validity = if total > thresholds.high_validity_records {
        StatisticalValidity::High
    } else if total > thresholds.medium_validity_records {
        StatisticalValidity::Medium
    } else {
        StatisticalValidity::Low
    };

    let status =
        if consistency_rate >= thresholds.pass_rate && total > thresholds.pass_min_records {
            AssessmentStatus::Passed
        } else {
            AssessmentStatus::Failed
        };

    Assessment {
        consistency_rate,
        validity,
        data_quality,
        statistical_validity,
        status,
    }
}
