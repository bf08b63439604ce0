//! JSON Output

use crate::report::ValidationReport;

/// Generate a prettified JSON report.
///
/// Serializes the validation report into machine-readable JSON format.
pub fn generate_json_report(report: &ValidationReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Read back a report produced by [`generate_json_report`]
pub fn parse_json_report(json: &str) -> Result<ValidationReport, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SCHEMA_VERSION;
    use crate::report::*;
    use benchcheck_core::{GroupKey, LoadMode, Metric};
    use benchcheck_stats::{StatsError, compute_summary, estimate};
    use std::collections::BTreeMap;

    fn peak(value: f64) -> PeakRecord {
        PeakRecord {
            index: 0,
            group_id: "m_cores1_batch1".to_string(),
            value,
        }
    }

    fn fixture() -> ValidationReport {
        let throughput = [100.0, 102.0, 98.0];
        let mut intervals = BTreeMap::new();
        intervals.insert(
            Metric::ThroughputFps,
            Outcome::from(estimate(&throughput, 0.95)),
        );
        intervals.insert(
            Metric::LatencyMs,
            Outcome::Error(StatsError::InsufficientSample { got: 1, min: 2 }),
        );
        let mut summaries = BTreeMap::new();
        summaries.insert(Metric::ThroughputFps, compute_summary(&throughput));

        let mut overall = BTreeMap::new();
        overall.insert(
            Metric::ThroughputFps,
            MetricOverview {
                interval: Outcome::from(estimate(&throughput, 0.95)),
                summary: compute_summary(&throughput),
            },
        );

        let group = PeakGroup {
            group_id: "m_cores1_batch1".to_string(),
            mean: 100.0,
            sample_size: 3,
        };

        ValidationReport {
            meta: ReportMeta {
                schema_version: SCHEMA_VERSION,
                version: "0.1.0".to_string(),
                timestamp: chrono::Utc::now(),
                confidence_level: 0.95,
                efficiency_tolerance: 1e-6,
                load_mode: LoadMode::Lenient,
            },
            summary: ReportSummary {
                total_records: 3,
                passed_consistency: 3,
                total_groups: 1,
                flagged_groups: 1,
                ..Default::default()
            },
            failures: Vec::new(),
            rejected: Vec::new(),
            overall: DatasetStatistics {
                total_records: 3,
                models_tested: 1,
                configurations_tested: 1,
                metrics: overall,
            },
            groups: vec![GroupReport {
                id: "m_cores1_batch1".to_string(),
                key: GroupKey::configuration("m", 1, 1),
                sample_size: 3,
                intervals,
                summaries,
            }],
            effect_sizes: Vec::new(),
            power: Vec::new(),
            peaks: Peaks {
                max_throughput: peak(102.0),
                max_efficiency: peak(10.2),
                min_latency: peak(9.8),
                max_temperature: peak(45.0),
                power_range: ValueRange {
                    min: 10.0,
                    max: 10.0,
                },
                best_throughput_group: group.clone(),
                best_efficiency_group: group,
                top_configurations: vec![TopConfiguration {
                    group_id: "m_cores1_batch1".to_string(),
                    avg_throughput_fps: 100.0,
                    max_throughput_fps: 102.0,
                    avg_efficiency_fps_per_w: 10.0,
                    avg_power_w: 10.0,
                    sample_size: 3,
                }],
            },
            scaling: Vec::new(),
            assessment: Assessment {
                consistency_rate: 100.0,
                validity: ValidityRates {
                    mathematical_consistency: 100.0,
                    physical_validity: 100.0,
                    range_validation: 100.0,
                },
                data_quality: DataQuality::Excellent,
                statistical_validity: StatisticalValidity::Low,
                status: AssessmentStatus::Failed,
            },
        }
    }

    #[test]
    fn test_json_layout() {
        let json = generate_json_report(&fixture()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["total_records"], 3);
        assert_eq!(value["assessment"]["status"], "FAILED");
        assert_eq!(value["assessment"]["data_quality"], "EXCELLENT");
        assert_eq!(value["assessment"]["validity"]["range_validation"], 100.0);
        assert_eq!(value["overall"]["configurations_tested"], 1);
        let overall = &value["overall"]["metrics"]["throughput_fps"];
        assert!(overall["interval"]["ok"]["margin_of_error"].is_number());
        assert_eq!(overall["summary"]["count"], 3);
        assert_eq!(value["peaks"]["top_configurations"][0]["max_throughput_fps"], 102.0);

        let group = &value["groups"][0];
        assert_eq!(group["id"], "m_cores1_batch1");
        assert!(group["intervals"]["throughput_fps"]["ok"]["lower_bound"].is_number());
        assert_eq!(
            group["intervals"]["latency_ms"]["error"]["kind"],
            "insufficient_sample"
        );
    }

    #[test]
    fn test_parse_back() {
        let report = fixture();
        let json = generate_json_report(&report).unwrap();
        let parsed = parse_json_report(&json).unwrap();
        assert_eq!(parsed.summary, report.summary);
        assert_eq!(parsed.assessment.status, AssessmentStatus::Failed);
        assert_eq!(parsed.meta.timestamp, report.meta.timestamp);
        assert_eq!(parsed.flagged_groups().count(), 1);
        assert!(parsed.group("m_cores1_batch1").is_some());
        assert!(
            parsed.groups[0]
                .interval(Metric::ThroughputFps)
                .is_some_and(|ci| ci.contains(100.0))
        );
    }
}
