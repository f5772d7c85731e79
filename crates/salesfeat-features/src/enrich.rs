//! Enrichment of filtered sales with product, store and brand reference data.
//!
//! Three inner joins run in sequence: `product = Product.id`,
//! `store = Store.id` and `brand = Brand.name`. The brand join is keyed on
//! the textual brand label, never on the brand table's `id`; the matched id is
//! kept as `brand_id`.
//!
//! Sales rows without a reference match are dropped. How the drop surfaces is
//! governed by [`JoinPolicy`], and every stage is recorded in an
//! [`EnrichReport`].

use crate::error::{FeatureError, Result};
use derive_more::Display;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Stable sequence number of each sales row, assigned before the joins.
pub const SEQUENCE_COLUMN: &str = "sale_seq";

const BRAND_ID: &str = "brand_id";
const BRAND_NAME: &str = "__brand_name";
const RESOLVED_BRAND_ID: &str = "__brand_id";

/// What to do with sales rows that have no matching reference row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JoinPolicy {
    /// Drop unmatched rows and log a warning with the count per stage
    #[default]
    DropAndLog,
    /// Drop unmatched rows without warning
    DropSilently,
    /// Abort with [`FeatureError::JoinMismatch`]
    FailOnMismatch,
}

/// One of the three enrichment joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinStage {
    /// `sales.product = product.id`
    #[display("product")]
    Product,
    /// `sales.store = store.id`
    #[display("store")]
    Store,
    /// `sales.brand = brand.name`
    #[display("brand")]
    Brand,
}

impl JoinStage {
    /// Join key column on the sales side.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Store => "store",
            Self::Brand => "brand",
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            Self::Product => "_product",
            Self::Store => "_store",
            Self::Brand => "_brand",
        }
    }
}

/// Row accounting for a single join stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStageReport {
    /// Join stage
    pub stage: JoinStage,
    /// Rows entering the join
    pub input_rows: usize,
    /// Rows whose key is null or absent from the reference table
    pub unmatched_rows: usize,
    /// Rows leaving the join
    pub output_rows: usize,
}

/// Row accounting for the whole enrichment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichReport {
    /// Per-stage reports in join order
    pub stages: Vec<JoinStageReport>,
}

impl EnrichReport {
    /// Report for a given stage, if it ran.
    pub fn stage(&self, stage: JoinStage) -> Option<&JoinStageReport> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    /// Total sales rows dropped across all stages.
    pub fn total_unmatched(&self) -> usize {
        self.stages.iter().map(|s| s.unmatched_rows).sum()
    }
}

/// Join filtered sales onto the reference tables.
///
/// The result holds every sales column, every product and store attribute
/// (suffixed `_product` / `_store` on a name clash) and `brand_id` (Int64)
/// resolved from the brand table.
/// Rows are ordered by [`SEQUENCE_COLUMN`].
pub fn enrich(
    sales: &DataFrame,
    products: &DataFrame,
    stores: &DataFrame,
    brands: &DataFrame,
    policy: JoinPolicy,
) -> Result<(DataFrame, EnrichReport)> {
    let mut report = EnrichReport::default();
    let mut rows = sales
        .clone()
        .lazy()
        .with_row_index(SEQUENCE_COLUMN, None)
        .collect()?;

    rows = join_stage(rows, products, "id", JoinStage::Product, policy, &mut report)?;
    rows = join_stage(rows, stores, "id", JoinStage::Store, policy, &mut report)?;

    // The resolved brand id replaces any `brand_id` attribute carried over
    // from the product or store tables.
    let brands = brands
        .clone()
        .lazy()
        .select([
            col("name").alias(BRAND_NAME),
            col("id").cast(DataType::Int64).alias(RESOLVED_BRAND_ID),
        ])
        .collect()?;
    if rows.get_column_index(BRAND_ID).is_some() {
        rows = rows.drop(BRAND_ID)?;
    }
    rows = join_stage(rows, &brands, BRAND_NAME, JoinStage::Brand, policy, &mut report)?;
    let rows = rows
        .lazy()
        .with_column(col(RESOLVED_BRAND_ID).alias(BRAND_ID))
        .collect()?
        .drop(RESOLVED_BRAND_ID)?;

    let enriched = rows
        .lazy()
        .sort(
            [SEQUENCE_COLUMN],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;

    info!(
        input = sales.height(),
        output = enriched.height(),
        dropped = report.total_unmatched(),
        "enriched sales"
    );
    Ok((enriched, report))
}

/// Inner join `rows.<stage key> = reference.<reference_key>`. The reference
/// key is coalesced away; clashing reference columns get the stage suffix.
fn join_stage(
    rows: DataFrame,
    reference: &DataFrame,
    reference_key: &str,
    stage: JoinStage,
    policy: JoinPolicy,
    report: &mut EnrichReport,
) -> Result<DataFrame> {
    let key = stage.key();
    let unmatched = count_unmatched(
        rows.column(key)?.as_materialized_series(),
        reference.column(reference_key)?.as_materialized_series(),
    )?;

    match policy {
        JoinPolicy::FailOnMismatch if unmatched > 0 => {
            return Err(FeatureError::JoinMismatch {
                stage,
                dropped: unmatched,
            });
        }
        JoinPolicy::DropAndLog if unmatched > 0 => {
            warn!(%stage, dropped = unmatched, "dropping sales rows without a reference match");
        }
        _ => debug!(%stage, dropped = unmatched, "join stage"),
    }

    let input_rows = rows.height();
    let joined = rows
        .lazy()
        .join(
            reference.clone().lazy(),
            [col(key)],
            [col(reference_key)],
            JoinArgs::new(JoinType::Inner).with_suffix(Some(stage.suffix().into())),
        )
        .collect()?;

    report.stages.push(JoinStageReport {
        stage,
        input_rows,
        unmatched_rows: unmatched,
        output_rows: joined.height(),
    });
    Ok(joined)
}

/// Count left keys that are null or have no equal right key.
fn count_unmatched(left: &Series, right: &Series) -> PolarsResult<usize> {
    if left.dtype() == &DataType::String {
        let known: HashSet<&str> = right.str()?.into_iter().flatten().collect();
        Ok(left
            .str()?
            .into_iter()
            .filter(|key| key.is_none_or(|k| !known.contains(k)))
            .count())
    } else {
        let right = right.cast(&DataType::Int64)?;
        let left = left.cast(&DataType::Int64)?;
        let known: HashSet<i64> = right.i64()?.into_iter().flatten().collect();
        Ok(left
            .i64()?
            .into_iter()
            .filter(|key| key.is_none_or(|k| !known.contains(&k)))
            .count())
    }
}
