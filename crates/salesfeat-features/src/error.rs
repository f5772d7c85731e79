//! Error types for the feature pipeline.

use crate::aggregate::FeatureKind;
use crate::enrich::JoinStage;
use thiserror::Error;

/// Result type for feature operations.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Errors that can occur while computing features.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Input data error (date parsing, table validation)
    #[error(transparent)]
    Data(#[from] salesfeat_data::DataError),

    /// Sales rows without a reference match under a failing join policy
    #[error("{dropped} sales row(s) have no matching {stage} reference row")]
    JoinMismatch {
        /// Join stage that found the mismatch
        stage: JoinStage,
        /// Number of unmatched sales rows
        dropped: usize,
    },

    /// Grouped results could not be aligned back onto their source rows
    #[error("{kind} features misaligned: expected {expected} rows, got {actual}")]
    Misaligned {
        /// Feature granularity being attached
        kind: FeatureKind,
        /// Row count of the enriched frame
        expected: usize,
        /// Row count of the computed columns
        actual: usize,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
