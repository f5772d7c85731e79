//! Date range filtering of the sales fact table.

use crate::error::Result;
use chrono::NaiveDate;
use polars::prelude::*;
use salesfeat_data::parse_calendar_date;
use serde::{Deserialize, Serialize};
use tracing::info;

const DEFAULT_MIN: NaiveDate = match NaiveDate::from_ymd_opt(2021, 1, 8) {
    Some(date) => date,
    None => panic!("invalid default min date"),
};

const DEFAULT_MAX: NaiveDate = match NaiveDate::from_ymd_opt(2021, 5, 30) {
    Some(date) => date,
    None => panic!("invalid default max date"),
};

/// Closed calendar interval `[min, max]`.
///
/// A range with `min > max` is valid and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First date kept (inclusive)
    pub min: NaiveDate,
    /// Last date kept (inclusive)
    pub max: NaiveDate,
}

impl DateRange {
    /// Create a range from two dates.
    pub const fn new(min: NaiveDate, max: NaiveDate) -> Self {
        Self { min, max }
    }

    /// Parse a range from two ISO date strings.
    pub fn parse(min: &str, max: &str) -> Result<Self> {
        Ok(Self::new(parse_calendar_date(min)?, parse_calendar_date(max)?))
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min <= date && date <= self.max
    }

    /// Whether the range cannot match any date.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::new(DEFAULT_MIN, DEFAULT_MAX)
    }
}

/// Keep the sales rows whose `date` lies inside `range`.
pub fn filter_by_date(sales: &DataFrame, range: &DateRange) -> Result<DataFrame> {
    let filtered = sales
        .clone()
        .lazy()
        .filter(
            col("date")
                .gt_eq(lit(range.min))
                .and(col("date").lt_eq(lit(range.max))),
        )
        .collect()?;

    info!(
        min = %range.min,
        max = %range.max,
        kept = filtered.height(),
        total = sales.height(),
        "filtered sales by date"
    );
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{date_values, sale, tables};
    use rstest::rstest;

    #[test]
    fn test_default_range() {
        let range = DateRange::default();
        assert_eq!(range, DateRange::parse("2021-01-08", "2021-05-30").unwrap());
        assert!(!range.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(DateRange::parse("2021-01-08", "30/05/2021").is_err());
    }

    #[rstest]
    #[case("2021-01-07", false)]
    #[case("2021-01-08", true)]
    #[case("2021-01-20", true)]
    #[case("2021-01-21", false)]
    fn test_contains_boundaries(#[case] date: &str, #[case] expected: bool) {
        let range = DateRange::parse("2021-01-08", "2021-01-20").unwrap();
        let date = parse_calendar_date(date).unwrap();
        assert_eq!(range.contains(date), expected);
    }

    #[test]
    fn test_filter_is_inclusive() {
        let tables = tables(&[
            sale(10, 100, "Acme", "2021-01-07", 1.0),
            sale(10, 100, "Acme", "2021-01-08", 2.0),
            sale(10, 100, "Acme", "2021-01-20", 3.0),
            sale(10, 100, "Acme", "2021-01-21", 4.0),
        ]);
        let range = DateRange::parse("2021-01-08", "2021-01-20").unwrap();

        let filtered = filter_by_date(&tables.sales, &range).unwrap();

        assert_eq!(
            date_values(&filtered),
            vec![
                parse_calendar_date("2021-01-08").unwrap(),
                parse_calendar_date("2021-01-20").unwrap(),
            ]
        );
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let tables = tables(&[sale(10, 100, "Acme", "2021-02-01", 1.0)]);
        let range = DateRange::parse("2021-05-30", "2021-01-08").unwrap();

        assert!(range.is_empty());
        assert_eq!(filter_by_date(&tables.sales, &range).unwrap().height(), 0);
    }
}
