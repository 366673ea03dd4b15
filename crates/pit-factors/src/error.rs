//! Error types for factor computations.

use crate::columns::ColumnKind;
use thiserror::Error;

/// Result type for factor operations.
pub type Result<T> = std::result::Result<T, FactorError>;

/// Errors that can occur during factor computation.
///
/// Data insufficiency and numeric degeneracy are not errors: factors recover
/// from them locally by emitting their `missing_value`.
#[derive(Debug, Error)]
pub enum FactorError {
    /// Column name not known to the column registry
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Missing required column in an input frame
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Inputs handed to a factor do not match its declaration
    #[error("Input mismatch for {factor}: {reason}")]
    InputMismatch {
        /// Factor name
        factor: String,
        /// What did not match
        reason: String,
    },

    /// No input of the requested kind at this position
    #[error("No {kind} input at position {index}")]
    MissingInput {
        /// Input position
        index: usize,
        /// Requested kind
        kind: ColumnKind,
    },

    /// Window has the wrong dimensions
    #[error("Shape mismatch for {factor}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Factor name
        factor: String,
        /// Expected (rows, columns)
        expected: (usize, usize),
        /// Actual (rows, columns)
        actual: (usize, usize),
    },

    /// Contract symbol does not follow root + YY + MM
    #[error("Malformed contract symbol: {symbol} ({reason})")]
    MalformedSymbol {
        /// Offending symbol
        symbol: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid date string
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Polars DataFrame error
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Factor not found in registry
    #[error("Factor not found: {0}")]
    NotFound(String),
}
