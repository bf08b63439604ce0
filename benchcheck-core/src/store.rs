//! Measurement Store
//!
//! Owns every record for the duration of a validation run. Records are
//! validated once at ingestion and never mutated or removed afterwards;
//! downstream components only see borrowed views.

use crate::error::{FieldError, SchemaError};
use crate::record::{GroupField, GroupKey, MeasurementRecord, Metric, RawRecord};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Physical range constraints applied at ingestion and by the consistency checker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalLimits {
    /// Lowest plausible instrument temperature (°C)
    pub temperature_min_c: f64,
    /// Highest plausible instrument temperature (°C)
    pub temperature_max_c: f64,
}

impl Default for PhysicalLimits {
    fn default() -> Self {
        Self {
            temperature_min_c: -40.0,
            temperature_max_c: 150.0,
        }
    }
}

impl PhysicalLimits {
    /// Check a fully-typed record against the limits
    pub fn check(&self, record: &MeasurementRecord) -> Result<(), FieldError> {
        if record.model.trim().is_empty() {
            return Err(FieldError::EmptyModel);
        }
        if record.cores == 0 {
            return Err(FieldError::ZeroCount { field: "cores" });
        }
        if record.batch_size == 0 {
            return Err(FieldError::ZeroCount {
                field: "batch_size",
            });
        }

        for (field, value) in [
            ("latency_ms", record.latency_ms),
            ("throughput_fps", record.throughput_fps),
            ("power_w", record.power_w),
        ] {
            if !value.is_finite() {
                return Err(FieldError::NonFinite { field });
            }
            if value <= 0.0 {
                return Err(FieldError::NonPositive { field, value });
            }
        }

        if !record.efficiency_fps_per_w.is_finite() {
            return Err(FieldError::NonFinite {
                field: "efficiency_fps_per_w",
            });
        }
        if record.efficiency_fps_per_w < 0.0 {
            return Err(FieldError::Negative {
                field: "efficiency_fps_per_w",
                value: record.efficiency_fps_per_w,
            });
        }

        if !record.temperature_c.is_finite() {
            return Err(FieldError::NonFinite {
                field: "temperature_c",
            });
        }
        if record.temperature_c < self.temperature_min_c
            || record.temperature_c > self.temperature_max_c
        {
            return Err(FieldError::OutOfRange {
                field: "temperature_c",
                value: record.temperature_c,
                min: self.temperature_min_c,
                max: self.temperature_max_c,
            });
        }

        Ok(())
    }
}

/// How ingestion reacts to a bad row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Reject bad rows individually and keep loading (default)
    #[default]
    Lenient,
    /// Abort the whole load on the first bad row
    Strict,
}

/// A row refused at ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    /// Position in the input sequence
    pub index: usize,
    /// Human-readable reason
    pub reason: String,
}

/// Result of a successful load
#[derive(Debug)]
pub struct LoadOutcome {
    /// The populated store
    pub store: MeasurementStore,
    /// Rows refused in lenient mode, in input order
    pub rejected: Vec<Rejection>,
}

/// Ordered, immutable collection of validated records
#[derive(Debug, Clone)]
pub struct MeasurementStore {
    records: Vec<MeasurementRecord>,
    /// Position of each record in the original input (rejected rows leave gaps)
    source_indices: Vec<usize>,
}

impl MeasurementStore {
    /// Validate and ingest raw rows
    ///
    /// In [`LoadMode::Strict`] the first invalid row aborts the load. In
    /// [`LoadMode::Lenient`] invalid rows are reported as [`Rejection`]s. Either
    /// way a load that yields no records fails with [`SchemaError::Empty`].
    pub fn load<I>(
        rows: I,
        mode: LoadMode,
        limits: &PhysicalLimits,
    ) -> Result<LoadOutcome, SchemaError>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut records = Vec::new();
        let mut source_indices = Vec::new();
        let mut rejected = Vec::new();

        for (index, raw) in rows.into_iter().enumerate() {
            match validate_row(index, raw, limits) {
                Ok(record) => {
                    records.push(record);
                    source_indices.push(index);
                }
                Err(err) if mode == LoadMode::Lenient => {
                    tracing::warn!(index, error = %err, "rejected record");
                    rejected.push(Rejection {
                        index,
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        if records.is_empty() {
            return Err(SchemaError::Empty);
        }

        tracing::debug!(
            loaded = records.len(),
            rejected = rejected.len(),
            "measurement store loaded"
        );

        Ok(LoadOutcome {
            store: Self {
                records,
                source_indices,
            },
            rejected,
        })
    }

    /// Build a store from already-typed records (strict validation)
    pub fn from_records(
        records: Vec<MeasurementRecord>,
        limits: &PhysicalLimits,
    ) -> Result<Self, SchemaError> {
        for (index, record) in records.iter().enumerate() {
            limits
                .check(record)
                .map_err(|error| SchemaError::Invalid { index, error })?;
        }
        if records.is_empty() {
            return Err(SchemaError::Empty);
        }
        let source_indices = (0..records.len()).collect();
        Ok(Self {
            records,
            source_indices,
        })
    }

    /// All records in input order
    pub fn records(&self) -> &[MeasurementRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at store position `i`
    pub fn get(&self, i: usize) -> Option<&MeasurementRecord> {
        self.records.get(i)
    }

    /// Input position of the record at store position `i`
    pub fn source_index(&self, i: usize) -> Option<usize> {
        self.source_indices.get(i).copied()
    }

    /// Group by the full configuration key `(model, cores, batch_size)`
    pub fn configuration_groups(&self) -> Vec<ConfigurationGroup<'_>> {
        self.group_by(&GroupField::CONFIGURATION)
    }

    /// Group records by the given fields
    ///
    /// Groups appear in order of first occurrence and records keep their
    /// input order within a group, so the result is fully deterministic.
    pub fn group_by(&self, fields: &[GroupField]) -> Vec<ConfigurationGroup<'_>> {
        let mut positions: FxHashMap<GroupKey, usize> = FxHashMap::default();
        let mut groups: Vec<ConfigurationGroup<'_>> = Vec::new();

        for (i, record) in self.records.iter().enumerate() {
            let key = record.key_for(fields);
            let slot = *positions.entry(key.clone()).or_insert_with(|| {
                groups.push(ConfigurationGroup {
                    key,
                    indices: Vec::new(),
                    records: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].indices.push(i);
            groups[slot].records.push(record);
        }

        groups
    }

    /// Find the configuration group with the given key
    pub fn group(&self, key: &GroupKey) -> Option<ConfigurationGroup<'_>> {
        let fields: Vec<GroupField> = [
            key.model.as_ref().map(|_| GroupField::Model),
            key.cores.map(|_| GroupField::Cores),
            key.batch_size.map(|_| GroupField::BatchSize),
        ]
        .into_iter()
        .flatten()
        .collect();

        self.group_by(&fields)
            .into_iter()
            .find(|group| &group.key == key)
    }
}

/// Read-only view of the records sharing a key
#[derive(Debug, Clone)]
pub struct ConfigurationGroup<'a> {
    /// Shared key
    pub key: GroupKey,
    /// Store positions of the member records, ascending
    pub indices: Vec<usize>,
    /// Member records in input order
    pub records: Vec<&'a MeasurementRecord>,
}

impl ConfigurationGroup<'_> {
    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the group is empty (never true for groups from a store)
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Single-record groups cannot support a variance-based interval
    pub fn is_single(&self) -> bool {
        self.records.len() == 1
    }

    /// Values of one metric in record order
    pub fn values(&self, metric: Metric) -> Vec<f64> {
        self.records.iter().map(|r| r.value(metric)).collect()
    }
}

fn validate_row(
    index: usize,
    raw: RawRecord,
    limits: &PhysicalLimits,
) -> Result<MeasurementRecord, SchemaError> {
    let invalid = |error| SchemaError::Invalid { index, error };
    let required = |field: &'static str| invalid(FieldError::Missing { field });

    if let Some(reason) = raw.parse_error {
        return Err(invalid(FieldError::Unparseable { reason }));
    }

    let record = MeasurementRecord {
        model: raw.model.ok_or_else(|| required("model"))?,
        cores: raw.cores.ok_or_else(|| required("cores"))?,
        batch_size: raw.batch_size.ok_or_else(|| required("batch_size"))?,
        latency_ms: raw.latency_ms.ok_or_else(|| required("latency_ms"))?,
        throughput_fps: raw.throughput_fps.ok_or_else(|| required("throughput_fps"))?,
        power_w: raw.power_w.ok_or_else(|| required("power_w"))?,
        efficiency_fps_per_w: raw
            .efficiency_fps_per_w
            .ok_or_else(|| required("efficiency_fps_per_w"))?,
        temperature_c: raw.temperature_c.ok_or_else(|| required("temperature_c"))?,
    };

    limits.check(&record).map_err(invalid)?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(model: &str, cores: u32, batch: u32, throughput: f64) -> RawRecord {
        RawRecord {
            model: Some(model.to_string()),
            cores: Some(cores),
            batch_size: Some(batch),
            latency_ms: Some(5.0),
            throughput_fps: Some(throughput),
            power_w: Some(10.0),
            efficiency_fps_per_w: Some(throughput / 10.0),
            temperature_c: Some(45.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_load_valid_rows() {
        let rows = vec![raw("a", 1, 1, 100.0), raw("a", 1, 1, 110.0)];
        let outcome = MeasurementStore::load(rows, LoadMode::Strict, &PhysicalLimits::default())
            .unwrap();
        assert_eq!(outcome.store.len(), 2);
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn test_missing_field_is_schema_error() {
        let mut bad = raw("a", 1, 1, 100.0);
        bad.power_w = None;
        let err = MeasurementStore::load(vec![bad], LoadMode::Strict, &PhysicalLimits::default())
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::Invalid {
                index: 0,
                error: FieldError::Missing { field: "power_w" }
            }
        );
    }

    #[test]
    fn test_physical_constraints() {
        let limits = PhysicalLimits::default();

        let mut negative_power = raw("a", 1, 1, 100.0);
        negative_power.power_w = Some(-1.0);
        assert!(matches!(
            MeasurementStore::load(vec![negative_power], LoadMode::Strict, &limits),
            Err(SchemaError::Invalid {
                error: FieldError::NonPositive { field: "power_w", .. },
                ..
            })
        ));

        let mut zero_latency = raw("a", 1, 1, 100.0);
        zero_latency.latency_ms = Some(0.0);
        assert!(matches!(
            MeasurementStore::load(vec![zero_latency], LoadMode::Strict, &limits),
            Err(SchemaError::Invalid {
                error: FieldError::NonPositive { field: "latency_ms", .. },
                ..
            })
        ));

        let mut hot = raw("a", 1, 1, 100.0);
        hot.temperature_c = Some(151.0);
        assert!(matches!(
            MeasurementStore::load(vec![hot], LoadMode::Strict, &limits),
            Err(SchemaError::Invalid {
                error: FieldError::OutOfRange { field: "temperature_c", .. },
                ..
            })
        ));

        let mut cold = raw("a", 1, 1, 100.0);
        cold.temperature_c = Some(-10.0);
        assert!(MeasurementStore::load(vec![cold], LoadMode::Strict, &limits).is_ok());

        let mut zero_cores = raw("a", 1, 1, 100.0);
        zero_cores.cores = Some(0);
        assert!(matches!(
            MeasurementStore::load(vec![zero_cores], LoadMode::Strict, &limits),
            Err(SchemaError::Invalid {
                error: FieldError::ZeroCount { field: "cores", .. },
                ..
            })
        ));
    }

    #[test]
    fn test_lenient_mode_collects_rejections() {
        let mut bad = raw("a", 1, 1, 100.0);
        bad.throughput_fps = Some(f64::NAN);
        let rows = vec![raw("a", 1, 1, 100.0), bad, raw("a", 1, 1, 120.0)];

        let outcome =
            MeasurementStore::load(rows, LoadMode::Lenient, &PhysicalLimits::default()).unwrap();
        assert_eq!(outcome.store.len(), 2);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].index, 1);
        assert_eq!(outcome.store.source_index(1), Some(2));
    }

    #[test]
    fn test_unparseable_row_keeps_its_index() {
        let rows = vec![
            raw("a", 1, 1, 100.0),
            raw("a", 1, 1, 110.0),
            RawRecord::unparseable("invalid digit found in string"),
        ];

        let outcome = MeasurementStore::load(
            rows.clone(),
            LoadMode::Lenient,
            &PhysicalLimits::default(),
        )
        .unwrap();
        assert_eq!(outcome.store.len(), 2);
        assert_eq!(outcome.rejected[0].index, 2);
        assert!(outcome.rejected[0].reason.contains("invalid digit"));

        let err = MeasurementStore::load(rows, LoadMode::Strict, &PhysicalLimits::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Invalid {
                index: 2,
                error: FieldError::Unparseable { .. }
            }
        ));
    }

    #[test]
    fn test_empty_load_fails() {
        let rows: Vec<RawRecord> = Vec::new();
        assert_eq!(
            MeasurementStore::load(rows, LoadMode::Lenient, &PhysicalLimits::default())
                .unwrap_err(),
            SchemaError::Empty
        );
    }

    #[test]
    fn test_group_by_is_deterministic() {
        let rows = vec![
            raw("b", 2, 1, 1.0),
            raw("a", 1, 1, 2.0),
            raw("b", 2, 1, 3.0),
            raw("a", 1, 4, 4.0),
            raw("a", 1, 1, 5.0),
        ];
        let store = MeasurementStore::load(rows, LoadMode::Strict, &PhysicalLimits::default())
            .unwrap()
            .store;

        let groups = store.configuration_groups();
        let ids: Vec<String> = groups.iter().map(|g| g.key.id()).collect();
        assert_eq!(ids, vec!["b_cores2_batch1", "a_cores1_batch1", "a_cores1_batch4"]);

        assert_eq!(groups[0].indices, vec![0, 2]);
        assert_eq!(groups[0].values(Metric::ThroughputFps), vec![1.0, 3.0]);
        assert_eq!(groups[1].values(Metric::ThroughputFps), vec![2.0, 5.0]);
        assert!(groups[2].is_single());
    }

    #[test]
    fn test_group_by_subset_of_fields() {
        let rows = vec![
            raw("a", 1, 1, 1.0),
            raw("a", 2, 1, 2.0),
            raw("a", 4, 8, 3.0),
        ];
        let store = MeasurementStore::load(rows, LoadMode::Strict, &PhysicalLimits::default())
            .unwrap()
            .store;

        let by_model_batch = store.group_by(&[GroupField::Model, GroupField::BatchSize]);
        assert_eq!(by_model_batch.len(), 2);
        assert_eq!(by_model_batch[0].key.to_string(), "a_batch1");
        assert_eq!(by_model_batch[0].len(), 2);

        let found = store.group(&GroupKey::configuration("a", 2, 1)).unwrap();
        assert_eq!(found.indices, vec![1]);
        assert!(store.group(&GroupKey::configuration("z", 1, 1)).is_none());
    }
}
