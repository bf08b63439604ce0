//! Measurement Records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One benchmark run, validated at ingestion and immutable afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Network identifier (e.g., "resnet18-imagenet")
    pub model: String,
    /// Accelerator cores used
    pub cores: u32,
    /// Batch size
    pub batch_size: u32,
    /// Per-inference latency in milliseconds
    pub latency_ms: f64,
    /// Frames per second
    pub throughput_fps: f64,
    /// Board power in watts
    pub power_w: f64,
    /// Derived: throughput_fps / power_w
    pub efficiency_fps_per_w: f64,
    /// Device temperature in degrees Celsius
    pub temperature_c: f64,
}

impl MeasurementRecord {
    /// Configuration key `(model, cores, batch_size)`
    pub fn group_key(&self) -> GroupKey {
        GroupKey::configuration(&self.model, self.cores, self.batch_size)
    }

    /// Key restricted to the given fields
    pub fn key_for(&self, fields: &[GroupField]) -> GroupKey {
        let mut key = GroupKey::default();
        for field in fields {
            match field {
                GroupField::Model => key.model = Some(self.model.clone()),
                GroupField::Cores => key.cores = Some(self.cores),
                GroupField::BatchSize => key.batch_size = Some(self.batch_size),
            }
        }
        key
    }

    /// Value of a metric column
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::LatencyMs => self.latency_ms,
            Metric::ThroughputFps => self.throughput_fps,
            Metric::PowerW => self.power_w,
            Metric::EfficiencyFpsPerW => self.efficiency_fps_per_w,
            Metric::TemperatureC => self.temperature_c,
        }
    }

    /// Efficiency implied by the raw fields
    pub fn expected_efficiency(&self) -> f64 {
        self.throughput_fps / self.power_w
    }

    /// Throughput implied by batch size and latency
    pub fn expected_throughput(&self) -> f64 {
        self.batch_size as f64 / (self.latency_ms / 1000.0)
    }
}

/// Un-validated row as read from a dataset
///
/// Every field is optional so that missing columns surface as
/// [`crate::FieldError::Missing`] instead of a parse failure. Aliases
/// accept the column names used by the raw benchmark dumps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    /// Network identifier
    #[serde(alias = "model_name")]
    pub model: Option<String>,
    /// Accelerator cores used
    #[serde(alias = "core_count")]
    pub cores: Option<u32>,
    /// Batch size
    pub batch_size: Option<u32>,
    /// Latency in milliseconds
    pub latency_ms: Option<f64>,
    /// Frames per second
    pub throughput_fps: Option<f64>,
    /// Power in watts
    #[serde(alias = "power_consumption_watts", alias = "power_watts")]
    pub power_w: Option<f64>,
    /// Derived efficiency
    #[serde(alias = "efficiency_fps_per_watt")]
    pub efficiency_fps_per_w: Option<f64>,
    /// Temperature in degrees Celsius
    #[serde(alias = "temperature_celsius")]
    pub temperature_c: Option<f64>,
    /// Set when the row could not be decoded into the fields above
    #[serde(skip)]
    pub parse_error: Option<String>,
}

impl RawRecord {
    /// Placeholder for a row whose values could not be decoded
    ///
    /// The row keeps its position in the input, so the store can reject it
    /// (or abort in strict mode) under its original index.
    pub fn unparseable(reason: impl Into<String>) -> Self {
        Self {
            parse_error: Some(reason.into()),
            ..Default::default()
        }
    }
}

impl From<&MeasurementRecord> for RawRecord {
    fn from(record: &MeasurementRecord) -> Self {
        Self {
            model: Some(record.model.clone()),
            cores: Some(record.cores),
            batch_size: Some(record.batch_size),
            latency_ms: Some(record.latency_ms),
            throughput_fps: Some(record.throughput_fps),
            power_w: Some(record.power_w),
            efficiency_fps_per_w: Some(record.efficiency_fps_per_w),
            temperature_c: Some(record.temperature_c),
            parse_error: None,
        }
    }
}

impl From<MeasurementRecord> for RawRecord {
    fn from(record: MeasurementRecord) -> Self {
        Self::from(&record)
    }
}

/// Numeric columns that are aggregated per group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// latency_ms
    LatencyMs,
    /// throughput_fps
    ThroughputFps,
    /// power_w
    PowerW,
    /// efficiency_fps_per_w
    EfficiencyFpsPerW,
    /// temperature_c
    TemperatureC,
}

impl Metric {
    /// All metrics in column order
    pub const ALL: [Metric; 5] = [
        Metric::LatencyMs,
        Metric::ThroughputFps,
        Metric::PowerW,
        Metric::EfficiencyFpsPerW,
        Metric::TemperatureC,
    ];

    /// Column name
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::LatencyMs => "latency_ms",
            Metric::ThroughputFps => "throughput_fps",
            Metric::PowerW => "power_w",
            Metric::EfficiencyFpsPerW => "efficiency_fps_per_w",
            Metric::TemperatureC => "temperature_c",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latency_ms" | "latency" => Ok(Metric::LatencyMs),
            "throughput_fps" | "throughput" => Ok(Metric::ThroughputFps),
            "power_w" | "power" => Ok(Metric::PowerW),
            "efficiency_fps_per_w" | "efficiency" => Ok(Metric::EfficiencyFpsPerW),
            "temperature_c" | "temperature" => Ok(Metric::TemperatureC),
            other => Err(format!("Unknown metric: {}", other)),
        }
    }
}

/// Record fields that can participate in a grouping key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupField {
    /// model
    Model,
    /// cores
    Cores,
    /// batch_size
    BatchSize,
}

impl GroupField {
    /// The full configuration key `(model, cores, batch_size)`
    pub const CONFIGURATION: [GroupField; 3] =
        [GroupField::Model, GroupField::Cores, GroupField::BatchSize];
}

/// Grouping key; fields not selected for grouping are `None`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    /// Model, when grouped by model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Core count, when grouped by cores
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,
    /// Batch size, when grouped by batch size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
}

impl GroupKey {
    /// Full configuration key
    pub fn configuration(model: impl Into<String>, cores: u32, batch_size: u32) -> Self {
        Self {
            model: Some(model.into()),
            cores: Some(cores),
            batch_size: Some(batch_size),
        }
    }

    /// Stable identifier, e.g. `resnet18_cores4_batch8`
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(3);
        if let Some(model) = &self.model {
            parts.push(model.clone());
        }
        if let Some(cores) = self.cores {
            parts.push(format!("cores{}", cores));
        }
        if let Some(batch) = self.batch_size {
            parts.push(format!("batch{}", batch));
        }
        if parts.is_empty() {
            f.write_str("all")
        } else {
            f.write_str(&parts.join("_"))
        }
    }
}

impl FromStr for GroupKey {
    type Err = String;

    /// Parse `{model}_cores{N}_batch{M}`
    ///
    /// The core and batch tokens are taken from the right-hand end only, so
    /// the model may itself contain underscores or `coresN`/`batchN` text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn suffix<'a>(rest: &'a str, prefix: &str) -> (Option<&'a str>, Option<u32>) {
            let (head, tail) = match rest.rsplit_once('_') {
                Some((head, tail)) => (Some(head), tail),
                None => (None, rest),
            };
            match tail.strip_prefix(prefix).and_then(|n| n.parse::<u32>().ok()) {
                Some(n) => (head, Some(n)),
                None => (Some(rest), None),
            }
        }

        let (rest, batch_size) = suffix(s, "batch");
        let (rest, cores) = match rest {
            Some(rest) => suffix(rest, "cores"),
            None => (None, None),
        };

        let key = GroupKey {
            model: rest.filter(|m| !m.is_empty()).map(str::to_string),
            cores,
            batch_size,
        };
        if key == GroupKey::default() {
            return Err(format!("Invalid group key: {}", s));
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MeasurementRecord {
        MeasurementRecord {
            model: "resnet18-imagenet".to_string(),
            cores: 4,
            batch_size: 8,
            latency_ms: 10.0,
            throughput_fps: 800.0,
            power_w: 16.0,
            efficiency_fps_per_w: 50.0,
            temperature_c: 48.5,
        }
    }

    #[test]
    fn test_group_key_display_and_parse() {
        let key = record().group_key();
        assert_eq!(key.id(), "resnet18-imagenet_cores4_batch8");
        assert_eq!(key.id().parse::<GroupKey>().unwrap(), key);

        let underscored: GroupKey = "yolo_v5_cores2_batch1".parse().unwrap();
        assert_eq!(underscored.model.as_deref(), Some("yolo_v5"));
        assert_eq!(underscored.cores, Some(2));
    }

    #[test]
    fn test_group_key_parse_takes_suffix_tokens_only() {
        let key: GroupKey = "net_batch2_v1_cores1_batch1".parse().unwrap();
        assert_eq!(key, GroupKey::configuration("net_batch2_v1", 1, 1));

        let key: GroupKey = "cores8_net_cores2_batch4".parse().unwrap();
        assert_eq!(key.model.as_deref(), Some("cores8_net"));
        assert_eq!(key.cores, Some(2));

        let round_trip = GroupKey::configuration("net_cores3", 1, 2);
        assert_eq!(round_trip.id().parse::<GroupKey>().unwrap(), round_trip);
    }

    #[test]
    fn test_group_key_parse_partial_and_invalid() {
        let key: GroupKey = "resnet18_batch8".parse().unwrap();
        assert_eq!(key.model.as_deref(), Some("resnet18"));
        assert_eq!(key.cores, None);
        assert_eq!(key.batch_size, Some(8));

        let key: GroupKey = "cores4".parse().unwrap();
        assert_eq!(key.cores, Some(4));
        assert_eq!(key.model, None);

        assert!("".parse::<GroupKey>().is_err());
    }

    #[test]
    fn test_partial_key() {
        let key = record().key_for(&[GroupField::Model, GroupField::BatchSize]);
        assert_eq!(key.to_string(), "resnet18-imagenet_batch8");
        assert_eq!(key.cores, None);
    }

    #[test]
    fn test_metric_values_and_names() {
        let r = record();
        assert_eq!(r.value(Metric::PowerW), 16.0);
        assert_eq!(r.expected_efficiency(), 50.0);
        assert_eq!(r.expected_throughput(), 800.0);
        for metric in Metric::ALL {
            assert_eq!(metric.as_str().parse::<Metric>().unwrap(), metric);
        }
        assert!("bandwidth".parse::<Metric>().is_err());
    }

    #[test]
    fn test_raw_record_accepts_dump_column_names() {
        let json = r#"{
            "model_name": "mobilenetv2",
            "core_count": 1,
            "batch_size": 1,
            "latency_ms": 2.5,
            "throughput_fps": 400.0,
            "power_consumption_watts": 8.0,
            "efficiency_fps_per_watt": 50.0,
            "temperature_celsius": 41.0
        }"#;
        let raw: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(raw.model.as_deref(), Some("mobilenetv2"));
        assert_eq!(raw.cores, Some(1));
        assert_eq!(raw.power_w, Some(8.0));
        assert_eq!(raw.temperature_c, Some(41.0));
    }

    #[test]
    fn test_raw_record_missing_fields_default_to_none() {
        let raw: RawRecord = serde_json::from_str(r#"{"model": "x"}"#).unwrap();
        assert_eq!(raw.latency_ms, None);
    }
}
