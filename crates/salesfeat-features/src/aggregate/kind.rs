//! Feature granularities.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Granularity at which sales are collapsed and windowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// Per product, collapsed over (product, store, date)
    #[display("product")]
    Product,
    /// Per brand, collapsed over (brand_id, store, date)
    #[display("brand")]
    Brand,
    /// Per store, collapsed over (store, date)
    #[display("store")]
    Store,
}

impl FeatureKind {
    /// All granularities in output column order.
    pub const ALL: [Self; 3] = [Self::Product, Self::Brand, Self::Store];

    /// Column identifying the windowed series.
    pub const fn entity_column(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Brand => "brand_id",
            Self::Store => "store",
        }
    }

    /// Columns whose distinct values form one collapsed point.
    pub const fn collapse_keys(self) -> &'static [&'static str] {
        match self {
            Self::Product => &["product", "store", "date"],
            Self::Brand => &["brand_id", "store", "date"],
            Self::Store => &["store", "date"],
        }
    }

    /// Chronological order of collapsed points, entity first.
    pub const fn window_order(self) -> &'static [&'static str] {
        match self {
            Self::Product => &["product", "date", "store"],
            Self::Brand => &["brand_id", "date", "store"],
            Self::Store => &["store", "date"],
        }
    }

    /// Summed quantity column.
    pub const fn sales_column(self) -> &'static str {
        match self {
            Self::Product => "sales_product",
            Self::Brand => "sales_brand",
            Self::Store => "sales_store",
        }
    }

    /// Moving average column.
    pub const fn moving_average_column(self) -> &'static str {
        match self {
            Self::Product => "MA7_P",
            Self::Brand => "MA7_B",
            Self::Store => "MA7_S",
        }
    }

    /// Lag column.
    pub const fn lag_column(self) -> &'static str {
        match self {
            Self::Product => "LAG7_P",
            Self::Brand => "LAG7_B",
            Self::Store => "LAG7_S",
        }
    }

    /// The three columns this granularity contributes.
    pub const fn feature_columns(self) -> [&'static str; 3] {
        [
            self.sales_column(),
            self.moving_average_column(),
            self.lag_column(),
        ]
    }
}
