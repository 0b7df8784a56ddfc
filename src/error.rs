//! Error types for corrgraph.
//!
//! Errors are only raised at the boundaries of a computation (parameter
//! validation, input shape checks). Numerically invalid pairs and cancelled
//! runs are not errors.

use crate::config::DataType;
use thiserror::Error;

/// Errors that can occur while preparing or running a correlation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CorrelationError {
    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A vector's length differs from the first vector's length.
    #[error("dimension mismatch: vector {index} has {actual} values, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// A vector was modified after its statistics were computed.
    #[error("vector {index} was modified without calling update()")]
    StaleStatistics { index: usize },

    /// The selected algorithm cannot operate on the supplied rows.
    #[error("{algorithm} expects {expected:?} data")]
    DataTypeMismatch {
        algorithm: &'static str,
        expected: DataType,
    },

    /// A raw table's cell count does not match its declared shape.
    #[error("table has {actual} cells, expected {expected} ({num_rows} rows x {num_columns} columns)")]
    TableShape {
        expected: usize,
        actual: usize,
        num_rows: usize,
        num_columns: usize,
    },

    /// Worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// Result type for corrgraph operations.
pub type Result<T> = std::result::Result<T, CorrelationError>;
