//! Integration tests for the sales EDA routines.
//!
//! These tests run the public API end to end on CSV fixtures.

use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use pretty_assertions::assert_eq;
use sales_eda::insights;
use sales_eda::{
    AnalysisConfig, CategoricalAnalysis, CategoricalProfiler, ColumnConverter, DataProfiler,
    EdaError, NullAnalyzer, OutlierDetector, OutlierHandler, ReportGenerator, ReportSection,
};
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_csv(filename: &str) -> DataFrame {
    let path = fixtures_path().join(filename);
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path))
        .expect("Failed to create CSV reader")
        .finish()
        .expect("Failed to read CSV file")
}

fn load_converted_sales() -> DataFrame {
    let mut df = load_csv("sales_sample.csv");
    ColumnConverter::convert(&mut df, &AnalysisConfig::default()).expect("conversion");
    df
}

// ============================================================================
// Null Analysis
// ============================================================================

#[test]
fn test_null_summary_sales_sample() {
    let df = load_csv("sales_sample.csv");
    let summary = NullAnalyzer::summarize(&df).unwrap();

    assert_eq!(summary.row_count, 20);
    assert_eq!(summary.columns.len(), df.width());
    assert_eq!(summary.get("Segment"), Some((1, 5.0)));
    assert_eq!(summary.get("Order_Priority"), Some((3, 15.0)));
    assert_eq!(summary.get("Sales"), Some((0, 0.0)));
}

#[test]
fn test_null_classification_before_and_after_conversion() {
    let raw = load_csv("sales_sample.csv");
    let classes = NullAnalyzer::classify(&raw, 10.0).unwrap();
    assert_eq!(classes.high, vec!["Order_Priority"]);
    assert_eq!(classes.low, vec!["Segment"]);

    // "n/a" in Inflation(%) becomes null once the column is numeric
    let converted = load_converted_sales();
    let classes = NullAnalyzer::classify(&converted, 10.0).unwrap();
    assert_eq!(classes.high, vec!["Order_Priority"]);
    assert_eq!(classes.low, vec!["Segment", "Inflation(%)"]);
}

#[test]
fn test_null_classification_partitions_columns() {
    let df = load_converted_sales();
    let summary = NullAnalyzer::summarize(&df).unwrap();
    let classes = NullAnalyzer::classify(&df, 10.0).unwrap();

    for (column, count, _) in summary.iter() {
        let in_high = classes.high.iter().any(|c| c == column);
        let in_low = classes.low.iter().any(|c| c == column);
        assert!(!(in_high && in_low), "{} is in both lists", column);
        assert_eq!(in_high || in_low, count > 0, "{} misclassified", column);
    }
}

// ============================================================================
// Type Conversion
// ============================================================================

#[test]
fn test_conversion_on_sales_sample() {
    let mut df = load_csv("sales_sample.csv");
    assert_eq!(df.column("Order_Date").unwrap().dtype(), &DataType::String);

    let steps = ColumnConverter::convert(&mut df, &AnalysisConfig::default()).unwrap();

    assert_eq!(df.column("Order_Date").unwrap().dtype(), &DataType::Date);
    assert_eq!(df.column("Ship_Date").unwrap().dtype(), &DataType::Date);
    assert_eq!(df.column("Inflation(%)").unwrap().dtype(), &DataType::Float64);
    assert_eq!(df.column("Inflation(%)").unwrap().null_count(), 1);
    assert_eq!(steps.len(), 3);
}

// ============================================================================
// Outliers
// ============================================================================

#[test]
fn test_outlier_counts_sales_sample() {
    let df = load_converted_sales();
    let report = OutlierDetector::default().count(&df).unwrap();

    let sales = report.get("Sales").unwrap();
    assert_eq!(sales.count, 1);
    assert_eq!(sales.percentage, 5.0);
    let bounds = sales.bounds.unwrap();
    assert!((bounds.q1 - 137.5).abs() < 1e-9);
    assert!((bounds.q3 - 248.75).abs() < 1e-9);
    assert!((bounds.upper - 415.625).abs() < 1e-9);

    assert_eq!(report.get("Profit").unwrap().count, 3);
    assert_eq!(report.get("Profit").unwrap().percentage, 15.0);
    assert_eq!(report.get("Discount").unwrap().count, 0);
    assert!(report.get("Market").is_none());
    assert!(report.get("Order_Date").is_none());
}

#[test]
fn test_outlier_counts_numeric_only() {
    let df = load_csv("numeric_only.csv");
    let report = OutlierDetector::default().count(&df).unwrap();

    assert_eq!(report.columns.len(), 3);
    for column in ["Sales", "Profit", "Quantity"] {
        let entry = report.get(column).unwrap();
        assert_eq!(entry.count, 1, "{}", column);
        // share of all 5 rows, including Profit's null row
        assert_eq!(entry.percentage, 20.0, "{}", column);
    }
}

#[test]
fn test_clip_sales_sample() {
    let mut df = load_converted_sales();
    let width = df.width();

    let summaries = OutlierHandler::default()
        .clip(&mut df, &["Sales", "Shipping_Cost"])
        .unwrap();

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].clipped_high, 1);
    assert_eq!(summaries[1].clipped_high, 3);
    assert_eq!(df.width(), width);

    let sales = df.column("Sales").unwrap().as_materialized_series().f64().unwrap();
    let bounds = summaries[0].bounds.unwrap();
    assert!(sales.into_iter().flatten().all(|v| v >= bounds.lower && v <= bounds.upper));
    assert_eq!(sales.max(), Some(415.625));
    // values inside the fences are untouched
    assert_eq!(sales.get(0), Some(220.5));
}

#[test]
fn test_clip_missing_column_leaves_dataset_usable() {
    let mut df = load_converted_sales();
    let err = OutlierHandler::default()
        .clip(&mut df, &["Revenue"])
        .unwrap_err();

    assert!(matches!(err, EdaError::ColumnNotFound(ref c) if c == "Revenue"));
    assert_eq!(df.height(), 20);
}

// ============================================================================
// Categorical Distribution
// ============================================================================

#[test]
fn test_categorical_profile_sales_sample() {
    let df = load_converted_sales();
    let analysis = CategoricalProfiler::profile(&df).unwrap();
    let profiles = analysis.profiles();

    let names: Vec<&str> = profiles.iter().map(|p| p.column.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Order_ID",
            "Ship_Mode",
            "Segment",
            "Market",
            "Category",
            "Sub_Category",
            "Order_Priority"
        ]
    );

    let segment = &profiles[2];
    assert_eq!(segment.unique_count, 4);
    assert_eq!(segment.description.count, 19);
    assert_eq!(segment.description.top.as_deref(), Some("Consumer"));

    let market = &profiles[3];
    assert_eq!(market.proportions[0].value, "EU");
    assert_eq!(market.proportions[0].proportion, 0.35);
}

#[test]
fn test_categorical_profile_numeric_only() {
    let df = load_csv("numeric_only.csv");
    let analysis = CategoricalProfiler::profile(&df).unwrap();
    assert_eq!(analysis, CategoricalAnalysis::NoCategoricalColumns);
}

// ============================================================================
// Profiling and Insights
// ============================================================================

#[test]
fn test_overview_and_describe() {
    let df = load_converted_sales();
    let overview = DataProfiler::overview(&df, &AnalysisConfig::default()).unwrap();

    assert_eq!(overview.rows, 20);
    assert_eq!(overview.sample.len(), 4);
    assert_eq!(overview.duplicate_count, 0);

    let describe = DataProfiler::describe(&df).unwrap();
    let sales = describe.iter().find(|d| d.column == "Sales").unwrap();
    assert_eq!(sales.count, 20);
    assert_eq!(sales.max, 5000.0);
    assert!((sales.q1 - 137.5).abs() < 1e-9);
}

#[test]
fn test_sales_insights() {
    let df = load_converted_sales();

    let months = insights::monthly_sales(&df).unwrap();
    let labels: Vec<&str> = months.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(labels, vec!["2021-01", "2021-02", "2021-03", "2021-04", "2021-05"]);
    assert!((months[0].total - 805.8).abs() < 1e-9);
    assert!((months[2].total - 5655.0).abs() < 1e-9);

    let categories = insights::sales_by_group(&df, "Category").unwrap();
    assert_eq!(categories[0].group, "Technology");
    assert!((categories[0].value - 6740.5).abs() < 1e-9);

    let shipping = insights::shipping_efficiency(&df).unwrap();
    let same_day = shipping.iter().find(|s| s.ship_mode == "Same Day").unwrap();
    assert_eq!(same_day.avg_delivery_days, 0.0);
    assert!((same_day.avg_shipping_cost - 29.35).abs() < 1e-9);

    // chart helpers leave the dataset as it was
    assert!(df.column("Delivery_Days").is_err());
}

// ============================================================================
// Reports
// ============================================================================

#[test]
fn test_full_report_json() {
    let df = load_converted_sales();
    let report = ReportGenerator::build_report(
        "sales_sample.csv",
        &df,
        &AnalysisConfig::default(),
        &ReportSection::ALL,
    )
    .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["rows"], 20);
    assert_eq!(json["null_classification"]["high"][0], "Order_Priority");
    assert_eq!(json["categorical"]["status"], "profiled");
    assert!(json["insights"]["skipped"].as_array().unwrap().is_empty());
}

#[test]
fn test_numeric_only_report() {
    let df = load_csv("numeric_only.csv");
    let report = ReportGenerator::build_report(
        "numeric_only.csv",
        &df,
        &AnalysisConfig::default(),
        &[ReportSection::Categorical, ReportSection::Insights],
    )
    .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["categorical"]["status"], "no_categorical_columns");

    let insights = report.insights.unwrap();
    assert!(insights.monthly_sales.is_empty());
    assert!(!insights.skipped.is_empty());
    assert!(insights.correlations.is_some());
}
