//! Integration tests for writing feature files.

use chrono::NaiveDate;
use salesfeat_output::{ExportFormat, Exporter, FeatureRecord};
use std::fs;

fn records() -> Vec<FeatureRecord> {
    (8..10)
        .map(|day| FeatureRecord {
            product: 10,
            store: 100,
            brand_id: 1,
            date: NaiveDate::from_ymd_opt(2021, 1, day).unwrap(),
            quantity: f64::from(day),
            ma7_product: None,
            lag7_product: None,
            sales_brand: f64::from(day),
            ma7_brand: None,
            lag7_brand: None,
            sales_store: f64::from(day),
            ma7_store: None,
            lag7_store: None,
        })
        .collect()
}

#[test]
fn test_export_to_file_replaces_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("features.csv");
    fs::write(&path, "stale").unwrap();

    records().export_to_file(&path, ExportFormat::Csv).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 3);
    assert!(content.starts_with("product,store,brand_id,date,quantity,MA7_P"));
    assert!(!content.contains("stale"));
    // Only the output file remains in the directory
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_csv_round_trip() {
    let csv = records().export_to_string(ExportFormat::Csv).unwrap();
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let parsed: Vec<FeatureRecord> = reader.deserialize().map(Result::unwrap).collect();
    assert_eq!(parsed, records());
}

#[test]
fn test_export_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("features.csv");

    assert!(records().export_to_file(&path, ExportFormat::Csv).is_err());
    assert!(!path.exists());
}
