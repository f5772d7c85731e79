//! Loading and coercion of the four input tables.
//!
//! Every table is read from CSV with a header row. Only the columns the
//! feature pipeline touches are validated and coerced; product and store
//! attribute columns pass through untouched.

use crate::dates::parse_calendar_date;
use crate::error::{DataError, Result};
use crate::paths::InputPaths;
use chrono::NaiveDate;
use derive_more::Display;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// The input tables of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    /// Brand reference table
    #[display("brand")]
    Brand,
    /// Product reference table
    #[display("product")]
    Product,
    /// Store reference table
    #[display("store")]
    Store,
    /// Sales fact table
    #[display("sales")]
    Sales,
}

impl Table {
    /// Columns that must be present in the table.
    pub const fn required_columns(self) -> &'static [&'static str] {
        match self {
            Self::Brand => &["id", "name"],
            Self::Product | Self::Store => &["id"],
            Self::Sales => &["product", "store", "brand", "date", "quantity"],
        }
    }

    /// Expected dtype of each coerced column. The sales `date` column is
    /// parsed separately.
    fn coercions(self) -> Vec<(&'static str, DataType)> {
        match self {
            Self::Brand => vec![("id", DataType::Int64), ("name", DataType::String)],
            Self::Product | Self::Store => vec![("id", DataType::Int64)],
            Self::Sales => vec![
                ("product", DataType::Int64),
                ("store", DataType::Int64),
                ("brand", DataType::String),
                ("quantity", DataType::Float64),
            ],
        }
    }
}

/// All four input tables, validated and coerced.
#[derive(Debug, Clone)]
pub struct SalesTables {
    /// Brand reference data: `id` (Int64), `name` (String)
    pub brands: DataFrame,
    /// Product reference data: `id` (Int64) plus attributes
    pub products: DataFrame,
    /// Store reference data: `id` (Int64) plus attributes
    pub stores: DataFrame,
    /// Sales facts: `product`, `store` (Int64), `brand` (String),
    /// `date` (Date), `quantity` (Float64)
    pub sales: DataFrame,
}

impl SalesTables {
    /// Validate and coerce already materialized frames.
    ///
    /// Used by [`load_tables`] and by callers that build tables in memory.
    pub fn from_frames(
        brands: DataFrame,
        products: DataFrame,
        stores: DataFrame,
        sales: DataFrame,
    ) -> Result<Self> {
        Ok(Self {
            brands: prepare(Table::Brand, brands)?,
            products: prepare(Table::Product, products)?,
            stores: prepare(Table::Store, stores)?,
            sales: prepare(Table::Sales, sales)?,
        })
    }
}

/// Read, validate and coerce the four input tables.
///
/// Fails before returning anything if a file is missing, a required column
/// is absent, or a value cannot be coerced.
pub fn load_tables(paths: &InputPaths) -> Result<SalesTables> {
    SalesTables::from_frames(
        read_table(Table::Brand, &paths.brand)?,
        read_table(Table::Product, &paths.product)?,
        read_table(Table::Store, &paths.store)?,
        read_table(Table::Sales, &paths.sales)?,
    )
}

fn read_table(table: Table, path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(DataError::MissingInput {
            table,
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    info!(%table, rows = df.height(), path = %path.display(), "loaded table");
    Ok(df)
}

fn prepare(table: Table, mut df: DataFrame) -> Result<DataFrame> {
    for column in table.required_columns() {
        if df.get_column_index(column).is_none() {
            return Err(DataError::MissingColumn {
                table,
                column: (*column).to_string(),
            });
        }
    }

    for (column, dtype) in table.coercions() {
        coerce(table, &mut df, column, &dtype)?;
    }

    if table == Table::Sales {
        coerce_dates(&mut df)?;
    }

    debug!(%table, columns = df.width(), "prepared table");
    Ok(df)
}

fn coerce(table: Table, df: &mut DataFrame, column: &str, dtype: &DataType) -> Result<()> {
    let current = df.column(column)?.as_materialized_series();
    if current.dtype() == dtype {
        return Ok(());
    }

    let cast = current
        .strict_cast(dtype)
        .map_err(|e| DataError::InvalidColumn {
            table,
            column: column.to_string(),
            reason: e.to_string(),
        })?;
    df.with_column(cast)?;
    Ok(())
}

fn coerce_dates(df: &mut DataFrame) -> Result<()> {
    let current = df.column("date")?.as_materialized_series();
    let parsed = match current.dtype() {
        DataType::Date => return Ok(()),
        DataType::String => parse_date_column(current.str()?)?,
        other => {
            return Err(DataError::InvalidColumn {
                table: Table::Sales,
                column: "date".to_string(),
                reason: format!("expected date strings, found {other}"),
            });
        }
    };
    df.with_column(parsed)?;
    Ok(())
}

fn parse_date_column(values: &StringChunked) -> Result<Series> {
    let dates = values
        .into_iter()
        .map(|value| match value {
            Some(s) => parse_calendar_date(s),
            None => Err(DataError::ParseDate {
                value: String::new(),
            }),
        })
        .collect::<Result<Vec<NaiveDate>>>()?;

    Ok(DateChunked::from_naive_date(values.name().clone(), dates).into_series())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales_frame(dates: &[&str]) -> DataFrame {
        let n = dates.len();
        DataFrame::new(vec![
            Column::new("product".into(), vec![10i64; n]),
            Column::new("store".into(), vec![100i64; n]),
            Column::new("brand".into(), vec!["Acme"; n]),
            Column::new("date".into(), dates.to_vec()),
            Column::new("quantity".into(), vec![1i64; n]),
        ])
        .unwrap()
    }

    #[test]
    fn test_required_columns() {
        assert_eq!(Table::Brand.required_columns(), &["id", "name"]);
        assert!(Table::Sales.required_columns().contains(&"quantity"));
        assert_eq!(Table::Store.to_string(), "store");
    }

    #[test]
    fn test_sales_coercion() {
        let df = prepare(Table::Sales, sales_frame(&["2021-01-08", "2021-01-09"])).unwrap();
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column("quantity").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("brand").unwrap().dtype(), &DataType::String);

        let dates: Vec<_> = df
            .column("date")
            .unwrap()
            .as_materialized_series()
            .date()
            .unwrap()
            .as_date_iter()
            .collect();
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2021, 1, 9));
    }

    #[test]
    fn test_malformed_sales_date() {
        let err = prepare(Table::Sales, sales_frame(&["2021-01-08", "not-a-date"])).unwrap_err();
        assert!(matches!(err, DataError::ParseDate { ref value } if value == "not-a-date"));
    }

    #[test]
    fn test_missing_column() {
        let brands = DataFrame::new(vec![Column::new("id".into(), vec![1i64])]).unwrap();
        let err = prepare(Table::Brand, brands).unwrap_err();
        assert!(matches!(
            err,
            DataError::MissingColumn { table: Table::Brand, ref column } if column == "name"
        ));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_numeric_brand_names_become_strings() {
        let brands = DataFrame::new(vec![
            Column::new("id".into(), vec![1i64, 2]),
            Column::new("name".into(), vec![2001i64, 2002]),
        ])
        .unwrap();
        let df = prepare(Table::Brand, brands).unwrap();
        assert_eq!(df.column("name").unwrap().dtype(), &DataType::String);
    }
}
