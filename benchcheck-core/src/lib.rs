#![warn(missing_docs)]
//! BenchCheck Core - Measurement Data
//!
//! This crate owns the measurement dataset for a validation run:
//! - `MeasurementRecord` and its un-validated `RawRecord` form
//! - `MeasurementStore` with schema/physical-range validation at ingestion
//! - Deterministic grouping by configuration `(model, cores, batch_size)`
//! - Per-record consistency checks and plausibility categories

mod consistency;
mod error;
mod record;
mod store;

pub use consistency::{
    CategoryResults, CheckResult, ConsistencyPolicy, PlausibilityRanges, PlausibleRange, check,
    check_all, check_all_serial,
};
pub use error::{FieldError, SchemaError};
pub use record::{GroupField, GroupKey, MeasurementRecord, Metric, RawRecord};
pub use store::{
    ConfigurationGroup, LoadMode, LoadOutcome, MeasurementStore, PhysicalLimits, Rejection,
};

/// Default relative tolerance for `efficiency == throughput / power`
pub const DEFAULT_EFFICIENCY_TOLERANCE: f64 = 1e-6;

/// Default relative tolerance for `throughput == batch / latency`
pub const DEFAULT_THROUGHPUT_LATENCY_TOLERANCE: f64 = 0.05;
