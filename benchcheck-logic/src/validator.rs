//! Validation Orchestrator
//!
//! Runs the full pipeline over a dataset:
//!
//! ```text
//! Idle -> Loading -> Checking -> Estimating -> Reported
//!            |           |            |
//!            +-----------+------------+--> Aborted
//! ```
//!
//! Only a failed load (or cancellation) aborts a run. Inconsistent records,
//! under-sampled groups and refused comparisons are collected into the report
//! so one bad group never hides the results of the others.

use crate::assessment::{AssessmentThresholds, assess};
use crate::cancel::CancellationToken;
use crate::error::ValidationError;
use crate::peaks::find_peaks;
use crate::request::{ComparisonRequest, PowerRequest, ValidationRequest};
use crate::scaling::analyze_scaling;
use benchcheck_core::{
    CheckResult, ConfigurationGroup, ConsistencyPolicy, GroupKey, LoadMode, MeasurementStore,
    Metric, RawRecord, Rejection, SchemaError, check_all, check_all_serial,
};
use benchcheck_report::{
    ComparisonOutcome, DatasetStatistics, FailureInfo, GroupReport, MetricOverview, Outcome,
    PowerOutcome, ReportMeta, ReportSummary, SCHEMA_VERSION, ValidationReport,
};
use benchcheck_stats::{
    DEFAULT_ALPHA, DEFAULT_CONFIDENCE_LEVEL, EffectSizeEstimate, PowerMethod, StatsError,
    cohens_d, compute_summary, estimate, power_with,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Lifecycle of a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationState {
    /// Not started
    Idle,
    /// Ingesting and validating rows
    Loading,
    /// Running per-record consistency checks
    Checking,
    /// Computing per-group and requested statistics
    Estimating,
    /// Report produced
    Reported,
    /// Load failed or run cancelled
    Aborted,
}

/// Settings for a validation run
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorOptions {
    /// Confidence level for every interval
    pub confidence_level: f64,
    /// Reject bad rows individually or abort on the first one
    pub load_mode: LoadMode,
    /// Consistency tolerances and physical limits
    pub policy: ConsistencyPolicy,
    /// Assessment grade cut-offs
    pub thresholds: AssessmentThresholds,
    /// Significance level for requested power computations
    pub alpha: f64,
    /// Two-sided power computations
    pub two_sided: bool,
    /// Run checks and group estimation on the rayon pool
    pub parallel: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            load_mode: LoadMode::default(),
            policy: ConsistencyPolicy::default(),
            thresholds: AssessmentThresholds::default(),
            alpha: DEFAULT_ALPHA,
            two_sided: true,
            parallel: true,
        }
    }
}

/// Drives a dataset through loading, checking and estimation
#[derive(Debug, Clone)]
pub struct Validator {
    options: ValidatorOptions,
    request: ValidationRequest,
    cancel: Option<CancellationToken>,
    state: ValidationState,
}

impl Validator {
    /// Create an idle validator
    pub fn new(options: ValidatorOptions) -> Self {
        Self {
            options,
            request: ValidationRequest::default(),
            cancel: None,
            state: ValidationState::Idle,
        }
    }

    /// Comparisons and power computations to include in the report
    pub fn with_request(mut self, request: ValidationRequest) -> Self {
        self.request = request;
        self
    }

    /// Poll `token` between group computations
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> ValidationState {
        self.state
    }

    /// Settings in use
    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Load `raw` and validate it
    ///
    /// Returns `Err` only when the run is aborted: the load failed, the
    /// confidence level is invalid, or the run was cancelled.
    pub fn run<I>(&mut self, raw: I) -> Result<ValidationReport, ValidationError>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        self.transition(ValidationState::Loading);
        let result = self.check_options().and_then(|()| {
            MeasurementStore::load(
                raw,
                self.options.load_mode,
                &self.options.policy.limits,
            )
            .map_err(ValidationError::from)
        });

        match result {
            Ok(outcome) => self.validate_store(&outcome.store, outcome.rejected),
            Err(err) => {
                tracing::error!(error = %err, "load failed");
                self.transition(ValidationState::Aborted);
                Err(err)
            }
        }
    }

    /// Validate an already-loaded store
    pub fn validate_store(
        &mut self,
        store: &MeasurementStore,
        rejected: Vec<Rejection>,
    ) -> Result<ValidationReport, ValidationError> {
        let result = self.check_options().and_then(|()| self.evaluate(store, rejected));
        match &result {
            Ok(report) => {
                tracing::info!(
                    records = report.summary.total_records,
                    failed = report.summary.failed_consistency,
                    groups = report.summary.total_groups,
                    status = %report.assessment.status,
                    "validation complete"
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "validation aborted");
                self.transition(ValidationState::Aborted);
            }
        }
        result
    }

    fn evaluate(
        &mut self,
        store: &MeasurementStore,
        rejected: Vec<Rejection>,
    ) -> Result<ValidationReport, ValidationError> {
        self.ensure_running()?;
        self.transition(ValidationState::Checking);

        let checks = if self.options.parallel {
            check_all(store.records(), &self.options.policy)
        } else {
            check_all_serial(store.records(), &self.options.policy)
        };
        let failures = collect_failures(store, &checks);
        let passed = checks.len() - failures.len();
        tracing::debug!(passed, failed = failures.len(), "consistency checked");

        self.ensure_running()?;
        self.transition(ValidationState::Estimating);

        let groups = store.configuration_groups();
        let level = self.options.confidence_level;
        let cancel = self.cancel.as_ref();
        let group_reports: Vec<GroupReport> = if self.options.parallel {
            groups
                .par_iter()
                .map(|group| estimate_group(group, level, cancel))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            groups
                .iter()
                .map(|group| estimate_group(group, level, cancel))
                .collect::<Result<Vec<_>, _>>()?
        };

        self.ensure_running()?;
        let overall = dataset_statistics(store, groups.len(), level);
        let effect_sizes = self
            .request
            .comparisons
            .iter()
            .map(|request| run_comparison(&groups, request))
            .collect();
        let power = self
            .request
            .power
            .iter()
            .map(|request| run_power(request, self.options.alpha, self.options.two_sided))
            .collect();

        let peaks = find_peaks(store, &groups).ok_or(SchemaError::Empty)?;
        let scaling = analyze_scaling(store);
        let assessment = assess(&checks, &self.options.thresholds);

        let estimated_groups = group_reports
            .iter()
            .filter(|g| g.is_fully_estimated())
            .count();
        let summary = ReportSummary {
            total_records: store.len(),
            passed_consistency: passed,
            failed_consistency: failures.len(),
            rejected_records: rejected.len(),
            total_groups: group_reports.len(),
            estimated_groups,
            flagged_groups: group_reports.len() - estimated_groups,
        };

        let report = ValidationReport {
            meta: ReportMeta {
                schema_version: SCHEMA_VERSION,
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: chrono::Utc::now(),
                confidence_level: level,
                efficiency_tolerance: self.options.policy.efficiency_tolerance,
                load_mode: self.options.load_mode,
            },
            summary,
            failures,
            rejected,
            overall,
            groups: group_reports,
            effect_sizes,
            power,
            peaks,
            scaling,
            assessment,
        };

        self.transition(ValidationState::Reported);
        Ok(report)
    }

    fn check_options(&self) -> Result<(), ValidationError> {
        let level = self.options.confidence_level;
        if !(level.is_finite() && level > 0.0 && level < 1.0) {
            return Err(StatsError::InvalidConfidenceLevel { level }.into());
        }
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), ValidationError> {
        if is_cancelled(self.cancel.as_ref()) {
            return Err(ValidationError::Cancelled);
        }
        Ok(())
    }

    fn transition(&mut self, next: ValidationState) {
        tracing::debug!(from = ?self.state, to = ?next, "validator state");
        self.state = next;
    }
}

/// Cohen's d between two groups of `store`
pub fn compare_groups(
    store: &MeasurementStore,
    group_a: &GroupKey,
    group_b: &GroupKey,
    metric: Metric,
) -> Result<EffectSizeEstimate, ValidationError> {
    let a = store
        .group(group_a)
        .ok_or_else(|| ValidationError::UnknownGroup(group_a.id()))?;
    let b = store
        .group(group_b)
        .ok_or_else(|| ValidationError::UnknownGroup(group_b.id()))?;
    Ok(effect_between(&a, &b, metric)?)
}

fn is_cancelled(cancel: Option<&CancellationToken>) -> bool {
    cancel.is_some_and(CancellationToken::is_cancelled)
}

fn collect_failures(store: &MeasurementStore, checks: &[CheckResult]) -> Vec<FailureInfo> {
    store
        .records()
        .iter()
        .zip(checks)
        .enumerate()
        .filter(|(_, (_, check))| !check.passed)
        .map(|(i, (record, check))| FailureInfo {
            index: store.source_index(i).unwrap_or(i),
            model: record.model.clone(),
            group_id: record.group_key().id(),
            reason: check.reason.clone().unwrap_or_default(),
        })
        .collect()
}

fn estimate_group(
    group: &ConfigurationGroup<'_>,
    confidence_level: f64,
    cancel: Option<&CancellationToken>,
) -> Result<GroupReport, ValidationError> {
    if is_cancelled(cancel) {
        return Err(ValidationError::Cancelled);
    }

    let mut intervals = BTreeMap::new();
    let mut summaries = BTreeMap::new();
    for metric in Metric::ALL {
        let values = group.values(metric);
        let interval = estimate(&values, confidence_level);
        if let Err(err) = &interval {
            tracing::debug!(group = %group.key, %metric, error = %err, "interval not estimated");
        }
        intervals.insert(metric, Outcome::from(interval));
        summaries.insert(metric, compute_summary(&values));
    }

    Ok(GroupReport {
        id: group.key.id(),
        key: group.key.clone(),
        sample_size: group.len(),
        intervals,
        summaries,
    })
}

fn dataset_statistics(
    store: &MeasurementStore,
    configurations: usize,
    confidence_level: f64,
) -> DatasetStatistics {
    let models: BTreeSet<&str> = store.records().iter().map(|r| r.model.as_str()).collect();

    let metrics = Metric::ALL
        .into_iter()
        .map(|metric| {
            let values: Vec<f64> = store.records().iter().map(|r| r.value(metric)).collect();
            let interval = estimate(&values, confidence_level);
            if let Err(err) = &interval {
                tracing::debug!(%metric, error = %err, "dataset interval not estimated");
            }
            let overview = MetricOverview {
                interval: Outcome::from(interval),
                summary: compute_summary(&values),
            };
            (metric, overview)
        })
        .collect();

    DatasetStatistics {
        total_records: store.len(),
        models_tested: models.len(),
        configurations_tested: configurations,
        metrics,
    }
}

fn effect_between(
    a: &ConfigurationGroup<'_>,
    b: &ConfigurationGroup<'_>,
    metric: Metric,
) -> Result<EffectSizeEstimate, StatsError> {
    cohens_d(&a.values(metric), &b.values(metric))
        .map(|effect| effect.labelled(metric.as_str(), a.key.id(), b.key.id()))
}

fn run_comparison(
    groups: &[ConfigurationGroup<'_>],
    request: &ComparisonRequest,
) -> ComparisonOutcome {
    let find = |id: &str| {
        groups
            .iter()
            .find(|g| g.key.id() == id)
            .ok_or_else(|| StatsError::InvalidComparison {
                reason: format!("unknown group `{}`", id),
            })
    };

    let result = find(&request.group_a)
        .and_then(|a| Ok((a, find(&request.group_b)?)))
        .and_then(|(a, b)| effect_between(a, b, request.metric));
    if let Err(err) = &result {
        tracing::warn!(
            group_a = %request.group_a,
            group_b = %request.group_b,
            error = %err,
            "comparison refused"
        );
    }

    ComparisonOutcome {
        group_a: request.group_a.clone(),
        group_b: request.group_b.clone(),
        metric: request.metric,
        result: result.into(),
    }
}

fn run_power(request: &PowerRequest, alpha: f64, two_sided: bool) -> PowerOutcome {
    PowerOutcome {
        effect_size: request.effect_size,
        sample_size: request.sample_size,
        result: power_with(
            request.effect_size,
            request.sample_size,
            alpha,
            two_sided,
            PowerMethod::NoncentralT,
        )
        .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchcheck_core::MeasurementRecord;
    use benchcheck_report::AssessmentStatus;

    fn record(model: &str, cores: u32, i: usize) -> MeasurementRecord {
        // deterministic spread around a per-configuration base
        let jitter = ((i * 37) % 11) as f64 - 5.0;
        let throughput = 100.0 * cores as f64 + jitter;
        let power = 8.0 + cores as f64 + jitter * 0.05;
        MeasurementRecord {
            model: model.to_string(),
            cores,
            batch_size: 1,
            latency_ms: 1000.0 / throughput,
            throughput_fps: throughput,
            power_w: power,
            efficiency_fps_per_w: throughput / power,
            temperature_c: 45.0 + jitter * 0.5,
        }
    }

    fn dataset(groups: &[(&str, u32, usize)]) -> Vec<RawRecord> {
        groups
            .iter()
            .flat_map(|&(model, cores, n)| (0..n).map(move |i| record(model, cores, i)))
            .map(RawRecord::from)
            .collect()
    }

    #[test]
    fn test_three_groups_with_one_broken_record() {
        let mut raw = dataset(&[("net", 1, 10), ("net", 2, 10), ("net", 4, 10)]);
        let broken = raw[13].efficiency_fps_per_w.unwrap_or_default();
        raw[13].efficiency_fps_per_w = Some(broken * 1.5);

        let mut validator = Validator::new(ValidatorOptions::default());
        let report = validator.run(raw).unwrap();

        assert_eq!(validator.state(), ValidationState::Reported);
        assert_eq!(report.summary.total_records, 30);
        assert_eq!(report.summary.failed_consistency, 1);
        assert_eq!(report.summary.passed_consistency, 29);
        assert_eq!(report.failures[0].index, 13);
        assert_eq!(report.failures[0].group_id, "net_cores2_batch1");
        assert!(report.failures[0].reason.contains("efficiency mismatch"));

        assert_eq!(report.groups.len(), 3);
        for group in &report.groups {
            for metric in Metric::ALL {
                let ci = group.interval(metric).unwrap();
                assert!(ci.lower_bound <= ci.mean && ci.mean <= ci.upper_bound);
            }
        }
        assert_eq!(report.summary.flagged_groups, 0);
        assert_eq!(report.assessment.status, AssessmentStatus::Failed);
    }

    #[test]
    fn test_single_record_group_is_flagged_not_fatal() {
        let raw = dataset(&[("net", 1, 5), ("net", 8, 1)]);
        let report = Validator::new(ValidatorOptions::default())
            .run(raw)
            .unwrap();

        assert_eq!(report.summary.flagged_groups, 1);
        let lonely = report.group("net_cores8_batch1").unwrap();
        assert!(matches!(
            lonely.intervals[&Metric::LatencyMs].err(),
            Some(StatsError::InsufficientSample { got: 1, min: 2 })
        ));
        assert!(report.group("net_cores1_batch1").unwrap().is_fully_estimated());
    }

    #[test]
    fn test_strict_load_aborts() {
        let mut raw = dataset(&[("net", 1, 3)]);
        raw[1].power_w = None;

        let options = ValidatorOptions {
            load_mode: LoadMode::Strict,
            ..Default::default()
        };
        let mut validator = Validator::new(options);
        let err = validator.run(raw).unwrap_err();

        assert!(matches!(err, ValidationError::Load(SchemaError::Invalid { index: 1, .. })));
        assert_eq!(validator.state(), ValidationState::Aborted);
    }

    #[test]
    fn test_lenient_load_reports_rejections() {
        let mut raw = dataset(&[("net", 1, 4)]);
        raw[2].temperature_c = Some(400.0);

        let report = Validator::new(ValidatorOptions::default())
            .run(raw)
            .unwrap();
        assert_eq!(report.summary.total_records, 3);
        assert_eq!(report.summary.rejected_records, 1);
        assert_eq!(report.rejected[0].index, 2);
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let mut validator =
            Validator::new(ValidatorOptions::default()).with_cancellation(token);

        let err = validator.run(dataset(&[("net", 1, 3)])).unwrap_err();
        assert_eq!(err, ValidationError::Cancelled);
        assert_eq!(validator.state(), ValidationState::Aborted);
    }

    #[test]
    fn test_cancelled_while_loading_large_serial_run() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        let groups: Vec<(String, u32, usize)> =
            (0..40).map(|i| (format!("net{i}"), 1 + i % 4, 25)).collect();
        let specs: Vec<(&str, u32, usize)> =
            groups.iter().map(|(m, c, n)| (m.as_str(), *c, *n)).collect();
        let raw = dataset(&specs);
        let last = raw.len() - 1;

        // cancel from inside the run, once the last row has been handed over
        let rows = raw.into_iter().enumerate().map(move |(i, row)| {
            if i == last {
                canceller.cancel();
            }
            row
        });

        let mut validator = Validator::new(ValidatorOptions {
            parallel: false,
            ..Default::default()
        })
        .with_cancellation(token);
        let err = validator.run(rows).unwrap_err();
        assert_eq!(err, ValidationError::Cancelled);
        assert_eq!(validator.state(), ValidationState::Aborted);
    }

    #[test]
    fn test_estimation_stops_at_next_group_boundary() {
        let store = MeasurementStore::load(
            dataset(&[("a", 1, 5), ("b", 1, 5), ("c", 1, 5)]),
            LoadMode::Strict,
            &Default::default(),
        )
        .unwrap()
        .store;
        let groups = store.configuration_groups();
        let token = CancellationToken::new();

        let mut computed = Vec::new();
        let mut stopped = None;
        for group in &groups {
            match estimate_group(group, 0.95, Some(&token)) {
                Ok(report) => computed.push(report.id),
                Err(err) => {
                    stopped = Some(err);
                    break;
                }
            }
            // cancelled after the first group finished
            token.cancel();
        }

        assert_eq!(computed, vec!["a_cores1_batch1"]);
        assert_eq!(stopped, Some(ValidationError::Cancelled));
    }

    #[test]
    fn test_badly_typed_row_lenient_and_strict() {
        let mut raw = dataset(&[("net", 1, 5)]);
        raw.push(RawRecord::unparseable("invalid digit found in string"));
        raw.extend(dataset(&[("net", 1, 2)]));

        let report = Validator::new(ValidatorOptions::default())
            .run(raw.clone())
            .unwrap();
        assert_eq!(report.summary.total_records, 7);
        assert_eq!(report.summary.rejected_records, 1);
        assert_eq!(report.rejected[0].index, 5);
        assert!(report.rejected[0].reason.contains("could not be parsed"));

        let mut strict = Validator::new(ValidatorOptions {
            load_mode: LoadMode::Strict,
            ..Default::default()
        });
        let err = strict.run(raw).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Load(SchemaError::Invalid {
                index: 5,
                error: benchcheck_core::FieldError::Unparseable { .. }
            })
        ));
        assert_eq!(strict.state(), ValidationState::Aborted);
    }

    #[test]
    fn test_dataset_wide_statistics() {
        let raw = dataset(&[("net", 1, 10), ("net", 2, 10), ("cnn", 1, 5)]);
        let report = Validator::new(ValidatorOptions::default())
            .run(raw)
            .unwrap();

        let overall = &report.overall;
        assert_eq!(overall.total_records, 25);
        assert_eq!(overall.models_tested, 2);
        assert_eq!(overall.configurations_tested, 3);
        assert_eq!(overall.metrics.len(), Metric::ALL.len());

        let throughput = &overall.metrics[&Metric::ThroughputFps];
        assert_eq!(throughput.summary.count, 25);
        let ci = overall.interval(Metric::ThroughputFps).unwrap();
        assert_eq!(ci.sample_size, 25);
        assert_eq!(ci.confidence_level, 0.95);
        assert!((ci.mean - throughput.summary.mean).abs() < 1e-9);
        assert!(ci.lower_bound < ci.mean && ci.mean < ci.upper_bound);
    }

    #[test]
    fn test_single_record_dataset_statistics_flagged() {
        let report = Validator::new(ValidatorOptions::default())
            .run(dataset(&[("net", 4, 1)]))
            .unwrap();
        assert!(matches!(
            report.overall.metrics[&Metric::LatencyMs].interval.err(),
            Some(StatsError::InsufficientSample { got: 1, .. })
        ));
        assert_eq!(report.overall.metrics[&Metric::LatencyMs].summary.count, 1);
    }

    #[test]
    fn test_validity_rates_in_assessment() {
        // single-core runs draw about 9 W, below the 10 W operating range
        let mut raw = dataset(&[("net", 1, 10), ("net", 4, 10)]);
        let broken = raw[15].efficiency_fps_per_w.unwrap_or_default();
        raw[15].efficiency_fps_per_w = Some(broken * 2.0);

        let report = Validator::new(ValidatorOptions::default())
            .run(raw)
            .unwrap();
        let validity = report.assessment.validity;
        assert_eq!(validity.mathematical_consistency, 95.0);
        assert_eq!(validity.physical_validity, 100.0);
        assert_eq!(validity.range_validation, 50.0);
        assert_eq!(report.assessment.consistency_rate, 95.0);
        assert_eq!(report.summary.failed_consistency, 1);
    }

    #[test]
    fn test_invalid_confidence_level_aborts() {
        let options = ValidatorOptions {
            confidence_level: 1.5,
            ..Default::default()
        };
        let mut validator = Validator::new(options);
        let err = validator.run(dataset(&[("net", 1, 3)])).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Stats(StatsError::InvalidConfidenceLevel { .. })
        ));
        assert_eq!(validator.state(), ValidationState::Aborted);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let mut raw = dataset(&[("a", 1, 12), ("b", 2, 7), ("a", 4, 9), ("c", 1, 1)]);
        raw[5].efficiency_fps_per_w = Some(1.0);
        raw[20].efficiency_fps_per_w = Some(2.0);

        let parallel = Validator::new(ValidatorOptions::default())
            .run(raw.clone())
            .unwrap();
        let serial = Validator::new(ValidatorOptions {
            parallel: false,
            ..Default::default()
        })
        .run(raw)
        .unwrap();

        assert_eq!(parallel.summary, serial.summary);
        assert_eq!(parallel.failures, serial.failures);
        assert_eq!(parallel.groups, serial.groups);
        assert_eq!(parallel.scaling, serial.scaling);
    }

    #[test]
    fn test_requested_comparisons() {
        let raw = dataset(&[("net", 1, 10), ("net", 2, 10), ("peak", 1, 1)]);
        let request = ValidationRequest::default()
            .compare("net_cores2_batch1::net_cores1_batch1::throughput".parse().unwrap())
            .compare("net_cores1_batch1::net_cores2_batch1::throughput".parse().unwrap())
            .compare("peak_cores1_batch1::net_cores1_batch1::throughput".parse().unwrap())
            .compare("net_cores1_batch1::missing_cores1_batch1::power".parse().unwrap());

        let report = Validator::new(ValidatorOptions::default())
            .with_request(request)
            .run(raw)
            .unwrap();

        let forward = report.effect_sizes[0].result.ok().unwrap();
        let backward = report.effect_sizes[1].result.ok().unwrap();
        assert!(forward.cohens_d > 0.0);
        assert_eq!(forward.cohens_d, -backward.cohens_d);
        assert_eq!(forward.group_a_id, "net_cores2_batch1");

        assert!(matches!(
            report.effect_sizes[2].result.err(),
            Some(StatsError::InvalidComparison { .. })
        ));
        assert!(matches!(
            report.effect_sizes[3].result.err(),
            Some(StatsError::InvalidComparison { reason }) if reason.contains("missing_cores1_batch1")
        ));
    }

    #[test]
    fn test_requested_power() {
        let request = ValidationRequest::default().power(0.5, 50).power(0.5, 0);
        let report = Validator::new(ValidatorOptions::default())
            .with_request(request)
            .run(dataset(&[("net", 1, 3)]))
            .unwrap();

        let estimate = report.power[0].result.ok().unwrap();
        assert!(estimate.power > 0.93 && estimate.power < 0.95);
        assert!(matches!(
            report.power[1].result.err(),
            Some(StatsError::Domain { .. })
        ));
    }

    #[test]
    fn test_compare_groups_direct() {
        let outcome = MeasurementStore::load(
            dataset(&[("net", 1, 4), ("net", 2, 4)]),
            LoadMode::Strict,
            &Default::default(),
        )
        .unwrap();
        let a = GroupKey::configuration("net", 1, 1);
        let b = GroupKey::configuration("net", 2, 1);

        let effect = compare_groups(&outcome.store, &a, &b, Metric::ThroughputFps).unwrap();
        assert!(effect.cohens_d < 0.0);

        let missing = GroupKey::configuration("net", 16, 1);
        assert_eq!(
            compare_groups(&outcome.store, &a, &missing, Metric::ThroughputFps).unwrap_err(),
            ValidationError::UnknownGroup("net_cores16_batch1".to_string())
        );
    }
}
