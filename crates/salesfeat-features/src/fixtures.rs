//! Shared in-memory tables for unit tests.

use chrono::NaiveDate;
use polars::prelude::*;
use salesfeat_data::SalesTables;

pub(crate) struct Sale {
    product: i64,
    store: i64,
    brand: &'static str,
    date: String,
    quantity: f64,
}

pub(crate) fn sale(
    product: i64,
    store: i64,
    brand: &'static str,
    date: impl Into<String>,
    quantity: f64,
) -> Sale {
    Sale {
        product,
        store,
        brand,
        date: date.into(),
        quantity,
    }
}

/// Consecutive January 2021 days starting at `first_day`.
pub(crate) fn january(first_day: u32, days: u32) -> Vec<String> {
    (first_day..first_day + days)
        .map(|d| format!("2021-01-{d:02}"))
        .collect()
}

/// Brands Acme (1), Globex (2) and a brand literally named "1" (3);
/// products 10..=12; stores 100 and 101.
pub(crate) fn tables(sales: &[Sale]) -> SalesTables {
    let brands = DataFrame::new(vec![
        Column::new("id".into(), vec![1i64, 2, 3]),
        Column::new("name".into(), vec!["Acme", "Globex", "1"]),
    ])
    .unwrap();
    let products = DataFrame::new(vec![
        Column::new("id".into(), vec![10i64, 11, 12]),
        Column::new("name".into(), vec!["Widget", "Gadget", "Gizmo"]),
    ])
    .unwrap();
    let stores = DataFrame::new(vec![
        Column::new("id".into(), vec![100i64, 101]),
        Column::new("city".into(), vec!["Lyon", "Porto"]),
    ])
    .unwrap();
    let sales = DataFrame::new(vec![
        Column::new(
            "product".into(),
            sales.iter().map(|s| s.product).collect::<Vec<_>>(),
        ),
        Column::new(
            "store".into(),
            sales.iter().map(|s| s.store).collect::<Vec<_>>(),
        ),
        Column::new(
            "brand".into(),
            sales.iter().map(|s| s.brand).collect::<Vec<_>>(),
        ),
        Column::new(
            "date".into(),
            sales.iter().map(|s| s.date.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "quantity".into(),
            sales.iter().map(|s| s.quantity).collect::<Vec<_>>(),
        ),
    ])
    .unwrap();

    SalesTables::from_frames(brands, products, stores, sales).unwrap()
}

pub(crate) fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

pub(crate) fn ints(df: &DataFrame, name: &str) -> Vec<i64> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .i64()
        .unwrap()
        .into_iter()
        .map(Option::unwrap)
        .collect()
}

pub(crate) fn date_values(df: &DataFrame) -> Vec<NaiveDate> {
    df.column("date")
        .unwrap()
        .as_materialized_series()
        .date()
        .unwrap()
        .as_date_iter()
        .map(Option::unwrap)
        .collect()
}
