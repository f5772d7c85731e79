//! Export of feature rows.
//!
//! The feature frame is converted into [`FeatureRecord`]s and serialized with
//! the `csv` crate or `serde_json`. Missing moving averages and lags are
//! `None` and become empty CSV fields (`null` in JSON), never zero.

use chrono::NaiveDate;
use polars::prelude::*;
use salesfeat_features::OUTPUT_COLUMNS;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error while reading the feature frame.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// A required output value is null.
    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue {
        /// Output column
        column: &'static str,
        /// Zero-based row
        row: usize,
    },

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    #[default]
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// One output row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureRecord {
    /// Product id.
    pub product: i64,

    /// Store id.
    pub store: i64,

    /// Resolved brand id.
    pub brand_id: i64,

    /// Sale date.
    pub date: NaiveDate,

    /// Quantity of the sales line.
    pub quantity: f64,

    /// Product moving average.
    #[serde(rename = "MA7_P")]
    pub ma7_product: Option<f64>,

    /// Product lag.
    #[serde(rename = "LAG7_P")]
    pub lag7_product: Option<f64>,

    /// Brand sales collapsed over (brand_id, store, date).
    pub sales_brand: f64,

    /// Brand moving average.
    #[serde(rename = "MA7_B")]
    pub ma7_brand: Option<f64>,

    /// Brand lag.
    #[serde(rename = "LAG7_B")]
    pub lag7_brand: Option<f64>,

    /// Store sales collapsed over (store, date).
    pub sales_store: f64,

    /// Store moving average.
    #[serde(rename = "MA7_S")]
    pub ma7_store: Option<f64>,

    /// Store lag.
    #[serde(rename = "LAG7_S")]
    pub lag7_store: Option<f64>,
}

impl FeatureRecord {
    /// Convert a projected feature frame into records, preserving row order.
    ///
    /// # Errors
    ///
    /// Returns an error if a column is absent or has an unexpected dtype, or if
    /// a key, date or sales value is null.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<Self>, ExportError> {
        let product = int_values(df, "product")?;
        let store = int_values(df, "store")?;
        let brand_id = int_values(df, "brand_id")?;
        let date: Vec<Option<NaiveDate>> = df
            .column("date")?
            .as_materialized_series()
            .date()?
            .as_date_iter()
            .collect();
        let quantity = float_values(df, "quantity")?;
        let ma7_product = float_values(df, "MA7_P")?;
        let lag7_product = float_values(df, "LAG7_P")?;
        let sales_brand = float_values(df, "sales_brand")?;
        let ma7_brand = float_values(df, "MA7_B")?;
        let lag7_brand = float_values(df, "LAG7_B")?;
        let sales_store = float_values(df, "sales_store")?;
        let ma7_store = float_values(df, "MA7_S")?;
        let lag7_store = float_values(df, "LAG7_S")?;

        (0..df.height())
            .map(|row| {
                Ok(Self {
                    product: required(&product, "product", row)?,
                    store: required(&store, "store", row)?,
                    brand_id: required(&brand_id, "brand_id", row)?,
                    date: required(&date, "date", row)?,
                    quantity: required(&quantity, "quantity", row)?,
                    ma7_product: ma7_product[row],
                    lag7_product: lag7_product[row],
                    sales_brand: required(&sales_brand, "sales_brand", row)?,
                    ma7_brand: ma7_brand[row],
                    lag7_brand: lag7_brand[row],
                    sales_store: required(&sales_store, "sales_store", row)?,
                    ma7_store: ma7_store[row],
                    lag7_store: lag7_store[row],
                })
            })
            .collect()
    }
}

fn int_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>, ExportError> {
    let series = df.column(name)?.as_materialized_series().cast(&DataType::Int64)?;
    Ok(series.i64()?.into_iter().collect())
}

fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ExportError> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

fn required<T: Copy>(
    values: &[Option<T>],
    column: &'static str,
    row: usize,
) -> Result<T, ExportError> {
    values[row].ok_or(ExportError::MissingValue { column, row })
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// The content is written to a temporary file next to `path` and renamed
    /// into place, so `path` either keeps its previous content or holds the
    /// complete export.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(content.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl Exporter for [FeatureRecord] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                // serde only emits the header alongside the first record
                if self.is_empty() {
                    wtr.write_record(OUTPUT_COLUMNS)?;
                }
                for record in self {
                    wtr.serialize(record)?;
                }
                let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
                String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Vec<FeatureRecord> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        self.as_slice().export_to_string(format)
    }
}
