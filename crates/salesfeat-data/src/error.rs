//! Error types for data operations.

use crate::tables::Table;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading input tables.
#[derive(Debug, Error)]
pub enum DataError {
    /// Input file does not exist
    #[error("Missing input for {table} table: {path}")]
    MissingInput {
        /// Table that was being loaded
        table: Table,
        /// Path that was looked up
        path: PathBuf,
    },

    /// Required column is absent from a table
    #[error("Missing column '{column}' in {table} table")]
    MissingColumn {
        /// Table that was validated
        table: Table,
        /// Name of the absent column
        column: String,
    },

    /// A column could not be coerced to its expected type
    #[error("Invalid values in column '{column}' of {table} table: {reason}")]
    InvalidColumn {
        /// Table that was coerced
        table: Table,
        /// Column that failed coercion
        column: String,
        /// Underlying reason
        reason: String,
    },

    /// A date string could not be parsed as a calendar date
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    ParseDate {
        /// The offending input
        value: String,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Whether this error belongs to the input class (missing table or column,
    /// unreadable values) rather than a date parse failure.
    pub const fn is_input_error(&self) -> bool {
        !matches!(self, Self::ParseDate { .. })
    }
}
