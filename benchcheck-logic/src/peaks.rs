//! Peak Configurations
//!
//! Extremes are located both per record and per group mean. Ties go to the
//! earliest record or group so the result does not depend on evaluation order.

use benchcheck_core::{ConfigurationGroup, MeasurementStore, Metric};
use benchcheck_report::{PeakGroup, PeakRecord, Peaks, TopConfiguration, ValueRange};

/// Entries in the throughput ranking
pub const TOP_CONFIGURATIONS: usize = 5;

/// Locate the dataset extremes; `None` only for an empty store
pub fn find_peaks(store: &MeasurementStore, groups: &[ConfigurationGroup<'_>]) -> Option<Peaks> {
    let power = store.records().iter().map(|r| r.power_w);
    let power_range = ValueRange {
        min: power.clone().reduce(f64::min)?,
        max: power.reduce(f64::max)?,
    };

    Some(Peaks {
        max_throughput: peak_record(store, Metric::ThroughputFps, Extreme::Max)?,
        max_efficiency: peak_record(store, Metric::EfficiencyFpsPerW, Extreme::Max)?,
        min_latency: peak_record(store, Metric::LatencyMs, Extreme::Min)?,
        max_temperature: peak_record(store, Metric::TemperatureC, Extreme::Max)?,
        power_range,
        best_throughput_group: best_group(groups, Metric::ThroughputFps)?,
        best_efficiency_group: best_group(groups, Metric::EfficiencyFpsPerW)?,
        top_configurations: top_configurations(groups, TOP_CONFIGURATIONS),
    })
}

/// Groups ranked by mean throughput, highest first
///
/// The sort is stable, so groups with equal means keep their input order.
pub fn top_configurations(
    groups: &[ConfigurationGroup<'_>],
    limit: usize,
) -> Vec<TopConfiguration> {
    let mut ranked: Vec<TopConfiguration> = groups
        .iter()
        .filter(|group| !group.is_empty())
        .map(|group| {
            let throughput = group.values(Metric::ThroughputFps);
            TopConfiguration {
                group_id: group.key.id(),
                avg_throughput_fps: mean(&throughput),
                max_throughput_fps: throughput.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                avg_efficiency_fps_per_w: mean(&group.values(Metric::EfficiencyFpsPerW)),
                avg_power_w: mean(&group.values(Metric::PowerW)),
                sample_size: group.len(),
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.avg_throughput_fps.total_cmp(&a.avg_throughput_fps));
    ranked.truncate(limit);
    ranked
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[derive(Clone, Copy)]
enum Extreme {
    Min,
    Max,
}

impl Extreme {
    fn beats(self, candidate: f64, current: f64) -> bool {
        match self {
            Extreme::Min => candidate < current,
            Extreme::Max => candidate > current,
        }
    }
}

fn peak_record(store: &MeasurementStore, metric: Metric, extreme: Extreme) -> Option<PeakRecord> {
    let mut best: Option<(usize, f64)> = None;
    for (i, record) in store.records().iter().enumerate() {
        let value = record.value(metric);
        match best {
            Some((_, current)) if !extreme.beats(value, current) => {}
            _ => best = Some((i, value)),
        }
    }

    let (i, value) = best?;
    Some(PeakRecord {
        index: store.source_index(i)?,
        group_id: store.get(i)?.group_key().id(),
        value,
    })
}

fn best_group(groups: &[ConfigurationGroup<'_>], metric: Metric) -> Option<PeakGroup> {
    let mut best: Option<(&ConfigurationGroup<'_>, f64)> = None;
    for group in groups {
        let values = group.values(metric);
        if values.is_empty() {
            continue;
        }
        let mean = mean(&values);
        match best {
            Some((_, current)) if mean <= current => {}
            _ => best = Some((group, mean)),
        }
    }

    best.map(|(group, mean)| PeakGroup {
        group_id: group.key.id(),
        mean,
        sample_size: group.len(),
    })
}
