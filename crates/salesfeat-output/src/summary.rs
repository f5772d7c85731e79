//! Per-run summary: date range, row counts and join losses.

use crate::export::{ExportError, ExportFormat, Exporter};
use chrono::NaiveDate;
use salesfeat_features::{DateRange, EnrichReport, JoinStageReport};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// What a pipeline run consumed and produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    /// First date kept.
    pub min_date: NaiveDate,

    /// Last date kept.
    pub max_date: NaiveDate,

    /// Sales rows loaded.
    pub loaded_rows: usize,

    /// Sales rows inside the date range.
    pub filtered_rows: usize,

    /// Rows after the reference joins.
    pub enriched_rows: usize,

    /// Rows written.
    pub output_rows: usize,

    /// Per-stage join accounting.
    pub joins: Vec<JoinStageReport>,

    /// Output location, when written to disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
}

impl RunSummary {
    /// Assemble a summary from pipeline counts.
    pub fn new(
        range: &DateRange,
        loaded_rows: usize,
        filtered_rows: usize,
        report: &EnrichReport,
        output_rows: usize,
    ) -> Self {
        Self {
            min_date: range.min,
            max_date: range.max,
            loaded_rows,
            filtered_rows,
            enriched_rows: report
                .stages
                .last()
                .map_or(filtered_rows, |s| s.output_rows),
            output_rows,
            joins: report.stages.clone(),
            output_path: None,
        }
    }

    /// Record where the output was written.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Sales rows lost to unmatched joins.
    pub fn dropped_rows(&self) -> usize {
        self.joins.iter().map(|j| j.unmatched_rows).sum()
    }

    /// Render as a plain text block.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\nFeature Run: {} to {}\n",
            self.min_date, self.max_date
        ));
        output.push_str(&"=".repeat(48));
        output.push('\n');
        output.push_str(&format!("  Sales loaded:        {:>10}\n", self.loaded_rows));
        output.push_str(&format!("  In date range:       {:>10}\n", self.filtered_rows));
        output.push_str(&format!("  Enriched:            {:>10}\n", self.enriched_rows));
        output.push_str(&format!("  Written:             {:>10}\n", self.output_rows));

        if !self.joins.is_empty() {
            output.push_str("\nJoin Stages:\n");
            output.push_str(&"-".repeat(48));
            output.push('\n');
            output.push_str(&format!(
                "  {:<10} {:>10} {:>10} {:>10}\n",
                "Stage", "In", "Unmatched", "Out"
            ));
            for join in &self.joins {
                output.push_str(&format!(
                    "  {:<10} {:>10} {:>10} {:>10}\n",
                    join.stage.to_string(),
                    join.input_rows,
                    join.unmatched_rows,
                    join.output_rows
                ));
            }
        }

        if let Some(path) = &self.output_path {
            output.push_str(&format!("\nOutput: {}\n", path.display()));
        }

        output
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii_table())
    }
}

impl Exporter for RunSummary {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => Err(ExportError::InvalidFormat(
                "run summaries export as JSON only".to_string(),
            )),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
