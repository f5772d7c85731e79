//! Error types for end-to-end runs.

use thiserror::Error;

/// Result type for pipeline runs.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can abort a pipeline run. No output is written when one occurs.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading or validating input tables failed
    #[error("Input error: {0}")]
    Data(#[from] salesfeat_data::DataError),

    /// Filtering, joining or windowing failed
    #[error("Feature error: {0}")]
    Features(#[from] salesfeat_features::FeatureError),

    /// Writing the output failed
    #[error("Export error: {0}")]
    Export(#[from] salesfeat_output::ExportError),
}
