//! Ingestion Errors

use thiserror::Error;

/// What is wrong with a single field of a record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// Required column absent or null
    #[error("missing required field `{field}`")]
    Missing {
        /// Column name
        field: &'static str,
    },

    /// Model identifier is empty
    #[error("`model` must not be empty")]
    EmptyModel,

    /// Core count or batch size of zero
    #[error("`{field}` must be a positive integer")]
    ZeroCount {
        /// Column name
        field: &'static str,
    },

    /// NaN or infinite value
    #[error("`{field}` is not finite")]
    NonFinite {
        /// Column name
        field: &'static str,
    },

    /// Value must be strictly positive
    #[error("`{field}` must be greater than zero, got {value}")]
    NonPositive {
        /// Column name
        field: &'static str,
        /// Offending value
        value: f64,
    },

    /// Value must be non-negative
    #[error("`{field}` must not be negative, got {value}")]
    Negative {
        /// Column name
        field: &'static str,
        /// Offending value
        value: f64,
    },

    /// Value outside the instrument range
    #[error("`{field}` = {value} outside [{min}, {max}]")]
    OutOfRange {
        /// Column name
        field: &'static str,
        /// Offending value
        value: f64,
        /// Lower limit
        min: f64,
        /// Upper limit
        max: f64,
    },

    /// Row could not be decoded (e.g. text in a numeric column)
    #[error("row could not be parsed: {reason}")]
    Unparseable {
        /// Decoder message
        reason: String,
    },
}

/// A record could not be ingested into the store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// A row failed validation
    #[error("Record {index}: {error}")]
    Invalid {
        /// Input position
        index: usize,
        /// Field-level problem
        error: FieldError,
    },

    /// Nothing left to validate
    #[error("No valid records to validate")]
    Empty,
}

impl SchemaError {
    /// Input position of the offending record, if any
    pub fn index(&self) -> Option<usize> {
        match self {
            SchemaError::Invalid { index, .. } => Some(*index),
            SchemaError::Empty => None,
        }
    }
}
