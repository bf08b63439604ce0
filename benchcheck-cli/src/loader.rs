//! Dataset Loading
//!
//! Reads raw measurement rows from disk. Three layouts are understood:
//!
//! - CSV with a header row (`model,cores,batch_size,latency_ms,...`)
//! - a JSON array of flat records (or `{"records": [...]}`)
//! - the nested benchmark dump
//!   `{"detailed_results": {model: {config: {"measurements": [...]}}}}`
//!
//! In the nested layout, measurements inherit the model from their parent key
//! and `cores`/`batch_size` from `coresN`/`batchN` tokens in the config name
//! when they do not carry them. Measurements flagged `"is_valid": false` are
//! skipped. Loading never validates values; that is the store's job.
//!
//! A row whose values cannot be decoded (text in a numeric column, a negative
//! core count) does not fail the file. It is kept in place as an unparseable
//! [`RawRecord`] so the store can reject it under its own index, or abort
//! the load in strict mode. Only an unreadable file or malformed document
//! fails here.

use anyhow::{Context, bail};
use benchcheck_core::RawRecord;
use serde_json::Value;
use std::path::Path;

/// Load raw rows from a CSV or JSON file, picking the parser by extension
pub fn load_records(path: &Path) -> anyhow::Result<Vec<RawRecord>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let records = match extension.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            read_csv(file).with_context(|| format!("Failed to parse {}", path.display()))?
        }
        "json" => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_json(&content).with_context(|| format!("Failed to parse {}", path.display()))?
        }
        other => bail!(
            "Unsupported input format '{}' for {} (expected .csv or .json)",
            other,
            path.display()
        ),
    };

    tracing::debug!(rows = records.len(), path = %path.display(), "dataset read");
    Ok(records)
}

/// Read CSV rows with a header
pub fn read_csv<R: std::io::Read>(reader: R) -> anyhow::Result<Vec<RawRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv_reader.headers().context("CSV header")?.clone();

    let mut records = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = match result {
            Ok(record) => decode_row(record.deserialize(Some(&headers)), row),
            Err(err) if matches!(err.kind(), csv::ErrorKind::UnequalLengths { .. }) => {
                decode_row(Err(err), row)
            }
            Err(err) => return Err(err).with_context(|| format!("CSV row {}", row + 1)),
        };
        records.push(record);
    }
    Ok(records)
}

/// Parse any of the supported JSON layouts
pub fn parse_json(content: &str) -> anyhow::Result<Vec<RawRecord>> {
    let value: Value = serde_json::from_str(content)?;
    match value {
        Value::Array(rows) => Ok(decode_array(rows)),
        Value::Object(mut map) => {
            if let Some(detailed) = map.remove("detailed_results") {
                parse_detailed_results(detailed)
            } else if let Some(records) = map.remove("records") {
                let Value::Array(rows) = records else {
                    bail!("`records` must be an array");
                };
                Ok(decode_array(rows))
            } else {
                bail!("Expected a JSON array, a `records` array or `detailed_results`")
            }
        }
        _ => bail!("Expected a JSON array or object at the top level"),
    }
}

fn decode_array(rows: Vec<Value>) -> Vec<RawRecord> {
    rows.into_iter()
        .enumerate()
        .map(|(row, value)| decode_row(serde_json::from_value(value), row))
        .collect()
}

/// Keep an undecodable row in place as an unparseable record
fn decode_row<E: std::fmt::Display>(result: Result<RawRecord, E>, row: usize) -> RawRecord {
    match result {
        Ok(record) => record,
        Err(err) => {
            tracing::debug!(row, error = %err, "row could not be decoded");
            RawRecord::unparseable(err.to_string())
        }
    }
}

fn parse_detailed_results(detailed: Value) -> anyhow::Result<Vec<RawRecord>> {
    let Value::Object(models) = detailed else {
        bail!("`detailed_results` must be an object keyed by model");
    };

    let mut records = Vec::new();
    for (model, configs) in models {
        let Value::Object(configs) = configs else {
            continue;
        };
        for (config_name, config) in configs {
            let Some(Value::Array(measurements)) = config.get("measurements") else {
                continue;
            };
            let (cores, batch_size) = parse_config_name(&config_name);

            for measurement in measurements {
                if measurement.get("is_valid").and_then(Value::as_bool) == Some(false) {
                    continue;
                }
                let mut record = match serde_json::from_value::<RawRecord>(measurement.clone()) {
                    Ok(record) => record,
                    Err(err) => {
                        let reason = format!("{}/{}: {}", model, config_name, err);
                        records.push(decode_row(Err(reason), records.len()));
                        continue;
                    }
                };
                record.model.get_or_insert_with(|| model.clone());
                if record.cores.is_none() {
                    record.cores = cores;
                }
                if record.batch_size.is_none() {
                    record.batch_size = batch_size;
                }
                records.push(record);
            }
        }
    }
    Ok(records)
}

/// Extract `(cores, batch_size)` from names like `cores4_batch8`
fn parse_config_name(name: &str) -> (Option<u32>, Option<u32>) {
    let mut cores = None;
    let mut batch = None;
    for token in name.split(|c: char| c == '_' || c == '-') {
        if let Some(n) = token.strip_prefix("cores").and_then(|n| n.parse().ok()) {
            cores = Some(n);
        } else if let Some(n) = token.strip_prefix("batch").and_then(|n| n.parse().ok()) {
            batch = Some(n);
        }
    }
    (cores, batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_csv() {
        let data = "\
model,cores,batch_size,latency_ms,throughput_fps,power_w,efficiency_fps_per_w,temperature_c
resnet18,1,1,10.2,98.0,9.8,10.0,45.5
resnet18,1,1,10.4,96.0,,9.9,46.0
";
        let records = read_csv(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].model.as_deref(), Some("resnet18"));
        assert_eq!(records[0].power_w, Some(9.8));
        assert_eq!(records[1].power_w, None);
    }

    #[test]
    fn test_csv_with_dump_column_names() {
        let data = "\
model_name,core_count,batch_size,latency_ms,throughput_fps,power_consumption_watts,efficiency_fps_per_watt,temperature_celsius
mobilenet,2,4,3.0,1333.0,12.0,111.08,50.0
";
        let records = read_csv(data.as_bytes()).unwrap();
        assert_eq!(records[0].cores, Some(2));
        assert_eq!(records[0].temperature_c, Some(50.0));
    }

    #[test]
    fn test_parse_flat_json() {
        let json = r#"[{"model": "a", "cores": 1, "batch_size": 1, "latency_ms": 1.0}]"#;
        let records = parse_json(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].latency_ms, Some(1.0));

        let wrapped = r#"{"records": [{"model": "a"}, {"model": "b"}]}"#;
        assert_eq!(parse_json(wrapped).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_detailed_results() {
        let json = r#"{
            "detailed_results": {
                "yolov5s": {
                    "cores4_batch8": {
                        "measurements": [
                            {"latency_ms": 20.0, "throughput_fps": 400.0,
                             "power_consumption_watts": 16.0, "efficiency_fps_per_watt": 25.0,
                             "temperature_celsius": 52.0},
                            {"latency_ms": 99.0, "is_valid": false},
                            {"model_name": "override", "core_count": 2, "latency_ms": 21.0}
                        ]
                    },
                    "summary": {"mean": 1.0}
                }
            }
        }"#;
        let records = parse_json(json).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].model.as_deref(), Some("yolov5s"));
        assert_eq!(records[0].cores, Some(4));
        assert_eq!(records[0].batch_size, Some(8));
        assert_eq!(records[0].power_w, Some(16.0));

        assert_eq!(records[1].model.as_deref(), Some("override"));
        assert_eq!(records[1].cores, Some(2));
        assert_eq!(records[1].batch_size, Some(8));
    }

    #[test]
    fn test_badly_typed_csv_row_stays_in_place() {
        let mut data = String::from(
            "model,cores,batch_size,latency_ms,throughput_fps,power_w,efficiency_fps_per_w,temperature_c\n",
        );
        for _ in 0..5 {
            data.push_str("net,1,1,10.0,100.0,10.0,10.0,45.0\n");
        }
        data.push_str("net,-1,1,10.0,100.0,10.0,10.0,45.0\n");
        data.push_str("net,1,1,10.0\n");
        data.push_str("net,2,1,10.0,100.0,10.0,10.0,45.0\n");

        let records = read_csv(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 8);
        assert!(records[..5].iter().all(|r| r.parse_error.is_none()));
        assert!(records[5].parse_error.is_some());
        assert_eq!(records[5].cores, None);
        assert!(records[6].parse_error.is_some());
        assert_eq!(records[7].cores, Some(2));
    }

    #[test]
    fn test_badly_typed_json_row_stays_in_place() {
        let json = r#"[
            {"model": "a", "latency_ms": 1.0},
            {"model": "a", "latency_ms": "n/a"},
            {"model": "b", "latency_ms": 2.0}
        ]"#;
        let records = parse_json(json).unwrap();
        assert_eq!(records.len(), 3);
        let reason = records[1].parse_error.as_deref().unwrap();
        assert!(reason.contains("invalid type"), "{reason}");
        assert_eq!(records[2].model.as_deref(), Some("b"));

        let detailed = r#"{"detailed_results": {"net": {"cores1_batch1": {"measurements": [
            {"latency_ms": 1.0},
            {"latency_ms": true}
        ]}}}}"#;
        let records = parse_json(detailed).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].model.as_deref(), Some("net"));
        assert!(records[1].parse_error.as_deref().unwrap().starts_with("net/cores1_batch1"));
    }

    #[test]
    fn test_parse_config_name() {
        assert_eq!(parse_config_name("cores4_batch8"), (Some(4), Some(8)));
        assert_eq!(parse_config_name("batch16-cores2"), (Some(2), Some(16)));
        assert_eq!(parse_config_name("default"), (None, None));
    }

    #[test]
    fn test_load_records_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("runs.csv");
        let mut file = std::fs::File::create(&csv_path).unwrap();
        writeln!(file, "model,cores,batch_size").unwrap();
        writeln!(file, "a,1,1").unwrap();
        assert_eq!(load_records(&csv_path).unwrap().len(), 1);

        let json_path = dir.path().join("runs.JSON");
        std::fs::write(&json_path, r#"[{"model": "a"}]"#).unwrap();
        assert_eq!(load_records(&json_path).unwrap().len(), 1);

        let txt_path = dir.path().join("runs.txt");
        std::fs::write(&txt_path, "").unwrap();
        assert!(load_records(&txt_path).is_err());

        assert!(load_records(&dir.path().join("missing.csv")).is_err());
    }
}
