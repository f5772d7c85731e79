#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/salesfeat/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod project;

#[cfg(test)]
pub(crate) mod fixtures;

pub use aggregate::{FeatureKind, LAG, WINDOW, compute_features};
pub use enrich::{EnrichReport, JoinPolicy, JoinStage, JoinStageReport, SEQUENCE_COLUMN, enrich};
pub use error::{FeatureError, Result};
pub use filter::{DateRange, filter_by_date};
pub use project::{OUTPUT_COLUMNS, project};
