//! Output column selection and ordering.

use crate::enrich::SEQUENCE_COLUMN;
use crate::error::Result;
use polars::prelude::*;

/// Output columns, in file order.
pub const OUTPUT_COLUMNS: [&str; 13] = [
    "product",
    "store",
    "brand_id",
    "date",
    "quantity",
    "MA7_P",
    "LAG7_P",
    "sales_brand",
    "MA7_B",
    "LAG7_B",
    "sales_store",
    "MA7_S",
    "LAG7_S",
];

const SORT_KEYS: [&str; 4] = ["product", "brand_id", "store", "date"];

/// Select [`OUTPUT_COLUMNS`] and sort by `(product, brand_id, store, date)`.
///
/// Ties keep sales order when the frame carries [`SEQUENCE_COLUMN`]. Rows are
/// never deduplicated.
pub fn project(features: &DataFrame) -> Result<DataFrame> {
    let mut by = SORT_KEYS.to_vec();
    if features.get_column_index(SEQUENCE_COLUMN).is_some() {
        by.push(SEQUENCE_COLUMN);
    }

    let projected = features
        .clone()
        .lazy()
        .sort(by, SortMultipleOptions::default().with_maintain_order(true))
        .select(OUTPUT_COLUMNS.map(col))
        .collect()?;
    Ok(projected)
}
