//! End-to-end feature pipeline.
//!
//! Load → filter → enrich → aggregate → project → write, in one pass and in
//! memory. Nothing is written unless every stage succeeds.

use crate::config::PipelineConfig;
use crate::error::Result;
use polars::prelude::DataFrame;
use salesfeat_data::{InputPaths, SalesTables, load_tables};
use salesfeat_features::{compute_features, enrich, filter_by_date, project};
use salesfeat_output::{ExportFormat, Exporter, FeatureRecord, RunSummary};
use std::path::Path;
use tracing::info;

/// Result of a pipeline run held in memory.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Projected and sorted feature frame
    pub frame: DataFrame,
    /// The same rows as typed records
    pub records: Vec<FeatureRecord>,
    /// Row accounting for the run
    pub summary: RunSummary,
}

/// Runs the feature pipeline with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct FeaturePipeline {
    config: PipelineConfig,
}

impl FeaturePipeline {
    /// Create a pipeline.
    pub const fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The pipeline configuration.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Compute features for already loaded tables.
    pub fn run(&self, tables: &SalesTables) -> Result<PipelineOutput> {
        let range = &self.config.date_range;

        let filtered = filter_by_date(&tables.sales, range)?;
        let (enriched, report) = enrich(
            &filtered,
            &tables.products,
            &tables.stores,
            &tables.brands,
            self.config.join_policy,
        )?;
        let features = compute_features(&enriched)?;
        let frame = project(&features)?;
        let records = FeatureRecord::from_frame(&frame)?;

        let summary = RunSummary::new(
            range,
            tables.sales.height(),
            filtered.height(),
            &report,
            records.len(),
        );
        Ok(PipelineOutput {
            frame,
            records,
            summary,
        })
    }

    /// Load the input tables and compute features.
    pub fn run_from_paths(&self, inputs: &InputPaths) -> Result<PipelineOutput> {
        let tables = load_tables(inputs)?;
        self.run(&tables)
    }

    /// Load, compute and write the feature file.
    pub fn run_to_file(
        &self,
        inputs: &InputPaths,
        output: &Path,
        format: ExportFormat,
    ) -> Result<RunSummary> {
        let result = self.run_from_paths(inputs)?;
        result.records.export_to_file(output, format)?;

        info!(
            rows = result.records.len(),
            path = %output.display(),
            "wrote features"
        );
        Ok(result.summary.with_output_path(output))
    }
}
