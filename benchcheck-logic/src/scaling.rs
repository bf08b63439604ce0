//! Core-Count Scaling
//!
//! For every (model, batch size) that was measured on a single core and on at
//! least one other core count:
//!
//! - `speedup = mean_throughput(cores) / mean_throughput(1)`
//! - `scaling_efficiency = speedup / cores`
//!
//! A perfectly linear accelerator scores 1.0 at every core count.

use benchcheck_core::{GroupField, MeasurementStore, Metric};
use benchcheck_report::{ScalingPoint, ScalingSeries};
use std::collections::BTreeMap;

/// Scaling series in order of first appearance of each (model, batch size)
pub fn analyze_scaling(store: &MeasurementStore) -> Vec<ScalingSeries> {
    store
        .group_by(&[GroupField::Model, GroupField::BatchSize])
        .into_iter()
        .filter_map(|family| {
            let mut by_cores: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
            for record in &family.records {
                let entry = by_cores.entry(record.cores).or_insert((0.0, 0));
                entry.0 += record.value(Metric::ThroughputFps);
                entry.1 += 1;
            }
            if by_cores.len() < 2 {
                return None;
            }

            let (sum, count) = by_cores.get(&1)?;
            let baseline = sum / *count as f64;

            let points = by_cores
                .iter()
                .map(|(&cores, &(sum, count))| {
                    let mean = sum / count as f64;
                    let speedup = mean / baseline;
                    ScalingPoint {
                        cores,
                        mean_throughput_fps: mean,
                        speedup,
                        scaling_efficiency: speedup / cores as f64,
                    }
                })
                .collect();

            Some(ScalingSeries {
                model: family.key.model.clone()?,
                batch_size: family.key.batch_size?,
                baseline_throughput_fps: baseline,
                points,
            })
        })
        .collect()
}
