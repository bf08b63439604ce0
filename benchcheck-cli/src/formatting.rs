//! Output Formatting
//!
//! Human-readable output formatting for validation reports.
//!
//! Generates terminal-friendly output with:
//! - Consistency totals and the first failing records
//! - Dataset-wide statistics for every metric
//! - Per-group confidence intervals (✓ estimated, ⚠ flagged)
//! - Requested effect sizes and power values
//! - Peaks, the top configurations, core-count scaling and the assessment

use benchcheck_core::Metric;
use benchcheck_report::{Outcome, PowerOutcome, ValidationReport};

/// Failing records listed before the output is truncated
const MAX_LISTED_FAILURES: usize = 10;

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &ValidationReport) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("BenchCheck Validation\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    // Consistency
    let summary = &report.summary;
    section(&mut output, "Consistency");
    output.push_str(&format!(
        "  Records: {}  Passed: {}  Failed: {}  Rejected at load: {}\n",
        summary.total_records,
        summary.passed_consistency,
        summary.failed_consistency,
        summary.rejected_records
    ));
    for failure in report.failures.iter().take(MAX_LISTED_FAILURES) {
        output.push_str(&format!(
            "  ✗ #{} {}: {}\n",
            failure.index, failure.group_id, failure.reason
        ));
    }
    if report.failures.len() > MAX_LISTED_FAILURES {
        output.push_str(&format!(
            "  ... and {} more\n",
            report.failures.len() - MAX_LISTED_FAILURES
        ));
    }
    for rejection in &report.rejected {
        output.push_str(&format!("  ⊘ #{} {}\n", rejection.index, rejection.reason));
    }

    // Overall
    let overall = &report.overall;
    section(
        &mut output,
        &format!(
            "Overall Statistics ({:.0}% CI)",
            report.meta.confidence_level * 100.0
        ),
    );
    output.push_str(&format!(
        "  Models: {}  Configurations: {}  Records: {}\n",
        overall.models_tested, overall.configurations_tested, overall.total_records
    ));
    for (metric, overview) in &overall.metrics {
        let stats = &overview.summary;
        let interval = match &overview.interval {
            Outcome::Ok(ci) => format!(
                "[{:.4}, {:.4}] ±{:.4}",
                ci.lower_bound, ci.upper_bound, ci.margin_of_error
            ),
            Outcome::Error(err) => err.to_string(),
        };
        output.push_str(&format!(
            "      {:<22} {:>12.4}  sd {:.4}  median {:.4}  range {:.4} - {:.4}  cv {:.1}%  {}\n",
            metric.as_str(),
            stats.mean,
            stats.std_dev,
            stats.median,
            stats.min,
            stats.max,
            stats.coefficient_of_variation * 100.0,
            interval
        ));
    }

    // Groups
    section(
        &mut output,
        &format!(
            "Configuration Groups ({:.0}% CI)",
            report.meta.confidence_level * 100.0
        ),
    );
    for group in &report.groups {
        let icon = if group.is_fully_estimated() { "✓" } else { "⚠" };
        output.push_str(&format!("  {} {} (n={})\n", icon, group.id, group.sample_size));

        for metric in Metric::ALL {
            let Some(outcome) = group.intervals.get(&metric) else {
                continue;
            };
            match outcome {
                Outcome::Ok(ci) => output.push_str(&format!(
                    "      {:<22} {:>12.4}  [{:.4}, {:.4}]  sd {:.4}\n",
                    metric.as_str(),
                    ci.mean,
                    ci.lower_bound,
                    ci.upper_bound,
                    ci.std_dev
                )),
                Outcome::Error(err) => {
                    output.push_str(&format!("      {:<22} {}\n", metric.as_str(), err))
                }
            }
        }
    }

    // Effect sizes
    if !report.effect_sizes.is_empty() {
        section(&mut output, "Effect Sizes (Cohen's d)");
        for comparison in &report.effect_sizes {
            let label = format!(
                "{} vs {} ({})",
                comparison.group_a, comparison.group_b, comparison.metric
            );
            match &comparison.result {
                Outcome::Ok(effect) => output.push_str(&format!(
                    "  {}: d = {:.4} ({}), pooled sd {:.4}\n",
                    label, effect.cohens_d, effect.interpretation, effect.pooled_std_dev
                )),
                Outcome::Error(err) => output.push_str(&format!("  {}: {}\n", label, err)),
            }
        }
    }

    // Power
    if !report.power.is_empty() {
        section(&mut output, "Statistical Power");
        for outcome in &report.power {
            output.push_str(&format!("  {}\n", format_power_line(outcome)));
        }
    }

    // Peaks
    let peaks = &report.peaks;
    section(&mut output, "Peaks");
    output.push_str(&format!(
        "  max throughput  {:.2} fps  (#{} {})\n",
        peaks.max_throughput.value, peaks.max_throughput.index, peaks.max_throughput.group_id
    ));
    output.push_str(&format!(
        "  max efficiency  {:.2} fps/W  (#{} {})\n",
        peaks.max_efficiency.value, peaks.max_efficiency.index, peaks.max_efficiency.group_id
    ));
    output.push_str(&format!(
        "  min latency     {:.3} ms  (#{} {})\n",
        peaks.min_latency.value, peaks.min_latency.index, peaks.min_latency.group_id
    ));
    output.push_str(&format!(
        "  max temperature {:.1} °C  (#{} {})\n",
        peaks.max_temperature.value, peaks.max_temperature.index, peaks.max_temperature.group_id
    ));
    output.push_str(&format!(
        "  power range     {:.2} - {:.2} W\n",
        peaks.power_range.min, peaks.power_range.max
    ));
    output.push_str(&format!(
        "  best group by throughput: {} ({:.2} fps, n={})\n",
        peaks.best_throughput_group.group_id,
        peaks.best_throughput_group.mean,
        peaks.best_throughput_group.sample_size
    ));
    output.push_str(&format!(
        "  best group by efficiency: {} ({:.2} fps/W, n={})\n",
        peaks.best_efficiency_group.group_id,
        peaks.best_efficiency_group.mean,
        peaks.best_efficiency_group.sample_size
    ));
    if !peaks.top_configurations.is_empty() {
        output.push_str("  top configurations by mean throughput:\n");
        for (rank, top) in peaks.top_configurations.iter().enumerate() {
            output.push_str(&format!(
                "      {}. {:<28} {:>10.2} fps (max {:.2})  {:.2} fps/W  {:.2} W\n",
                rank + 1,
                top.group_id,
                top.avg_throughput_fps,
                top.max_throughput_fps,
                top.avg_efficiency_fps_per_w,
                top.avg_power_w
            ));
        }
    }

    // Scaling
    if !report.scaling.is_empty() {
        section(&mut output, "Core Scaling");
        for series in &report.scaling {
            output.push_str(&format!(
                "  {} batch {} (1-core baseline {:.2} fps)\n",
                series.model, series.batch_size, series.baseline_throughput_fps
            ));
            for point in &series.points {
                output.push_str(&format!(
                    "      {:>3} cores  {:>10.2} fps  {:>6.2}x  {:>6.1}%\n",
                    point.cores,
                    point.mean_throughput_fps,
                    point.speedup,
                    point.scaling_efficiency * 100.0
                ));
            }
        }
    }

    // Assessment
    let assessment = &report.assessment;
    section(&mut output, "Assessment");
    let validity = &assessment.validity;
    output.push_str(&format!(
        "  Consistency rate: {:.2}%\n  Mathematical consistency: {:.2}%\n  Physical validity: {:.2}%\n  Range validation: {:.2}%\n  Data quality: {}\n  Statistical validity: {}\n  Status: {}\n",
        assessment.consistency_rate,
        validity.mathematical_consistency,
        validity.physical_validity,
        validity.range_validation,
        assessment.data_quality,
        assessment.statistical_validity,
        assessment.status
    ));

    output
}

/// One line describing a power computation
pub fn format_power_line(outcome: &PowerOutcome) -> String {
    match &outcome.result {
        Outcome::Ok(estimate) => format!(
            "d = {}, n = {}: power {:.4} ({:.1}%, α = {}, {})",
            outcome.effect_size,
            outcome.sample_size,
            estimate.power,
            estimate.power * 100.0,
            estimate.alpha,
            if estimate.two_sided {
                "two-sided"
            } else {
                "one-sided"
            }
        ),
        Outcome::Error(err) => format!(
            "d = {}, n = {}: {}",
            outcome.effect_size, outcome.sample_size, err
        ),
    }
}

fn section(output: &mut String, title: &str) {
    output.push_str(&format!("\n{}\n", title));
    output.push_str(&"-".repeat(60));
    output.push('\n');
}
