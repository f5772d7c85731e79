//! Collapsed sales, moving averages and lags at three granularities.
//!
//! For each [`FeatureKind`] the enriched rows are collapsed to one point per
//! collapse key by summing `quantity`. The collapsed points are sorted
//! chronologically within their entity and windowed there:
//!
//! - `MA7_*`: trailing mean over [`WINDOW`] points, null until a full window
//!   has accumulated
//! - `LAG7_*`: the collapsed value [`LAG`] points earlier, null for the first
//!   [`LAG`] points
//!
//! Each collapsed point is then broadcast back to every row sharing its key,
//! and the three granularities are attached to the enriched rows by row index.
//! Windowing never depends on the incoming row order.

mod kind;

pub use kind::FeatureKind;

use crate::error::{FeatureError, Result};
use polars::prelude::*;
use tracing::debug;

/// Moving average window length, in collapsed points.
pub const WINDOW: usize = 7;

/// Lag distance, in collapsed points.
pub const LAG: i64 = 7;

const ROW_INDEX: &str = "row_nr";

/// Attach `sales_*`, `MA7_*` and `LAG7_*` for every granularity to the
/// enriched rows. Row count and row order are preserved.
pub fn compute_features(enriched: &DataFrame) -> Result<DataFrame> {
    let rows = enriched
        .clone()
        .lazy()
        .with_row_index(ROW_INDEX, None)
        .collect()?;

    let mut features = rows.clone();
    for kind in FeatureKind::ALL {
        let columns = kind_features(&rows, kind)?;
        attach(&mut features, &columns, kind)?;
    }

    Ok(features.drop(ROW_INDEX)?)
}

/// Collapse, window and scatter one granularity back onto `rows`.
///
/// The result has one row per input row, ordered by row index, holding the
/// row index and the three feature columns.
fn kind_features(rows: &DataFrame, kind: FeatureKind) -> Result<DataFrame> {
    let keys: Vec<Expr> = kind.collapse_keys().iter().map(|k| col(*k)).collect();
    let entity = col(kind.entity_column());
    let sales = kind.sales_column();

    let series = rows
        .clone()
        .lazy()
        .group_by(keys.clone())
        .agg([col("quantity").sum().alias(sales)])
        .sort(kind.window_order().to_vec(), SortMultipleOptions::default())
        .with_columns([
            col(sales)
                .rolling_mean(RollingOptionsFixedWindow {
                    window_size: WINDOW,
                    min_periods: WINDOW,
                    ..Default::default()
                })
                .over([entity.clone()])
                .alias(kind.moving_average_column()),
            col(sales)
                .shift(lit(LAG))
                .over([entity])
                .alias(kind.lag_column()),
        ]);

    let mut lookup = vec![col(ROW_INDEX)];
    lookup.extend(keys.iter().cloned());

    let columns = rows
        .clone()
        .lazy()
        .select(lookup)
        .join(
            series,
            keys.clone(),
            keys,
            JoinArgs::new(JoinType::Left),
        )
        .select([
            col(ROW_INDEX),
            col(sales),
            col(kind.moving_average_column()),
            col(kind.lag_column()),
        ])
        .sort([ROW_INDEX], SortMultipleOptions::default())
        .collect()?;

    debug!(%kind, rows = columns.height(), "computed features");
    Ok(columns)
}

/// Append a granularity's columns after checking they line up row for row.
fn attach(features: &mut DataFrame, columns: &DataFrame, kind: FeatureKind) -> Result<()> {
    let aligned = features.height() == columns.height()
        && features
            .column(ROW_INDEX)?
            .as_materialized_series()
            .equals_missing(columns.column(ROW_INDEX)?.as_materialized_series());
    if !aligned {
        return Err(FeatureError::Misaligned {
            kind,
            expected: features.height(),
            actual: columns.height(),
        });
    }

    let attached = kind
        .feature_columns()
        .iter()
        .map(|name| columns.column(name).cloned())
        .collect::<PolarsResult<Vec<Column>>>()?;
    features.hstack_mut(&attached)?;
    Ok(())
}
