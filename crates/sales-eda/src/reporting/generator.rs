use crate::config::AnalysisConfig;
use crate::error::{EdaError, Result, ResultExt};
use crate::insights::{
    self, CATEGORY, CorrelationMatrix, GroupTotal, LinearTrend, MarketSegmentStats, MonthlyTotal,
    SUB_CATEGORY, ShippingModeStats, TopCategories,
};
use crate::outliers::OutlierDetector;
use crate::profiler::{CategoricalProfiler, DataProfiler};
use crate::quality::NullAnalyzer;
use crate::types::{
    CategoricalAnalysis, ClipSummary, DatasetOverview, NullClassification, NullColumnInfo,
    NullSummary, NumericDescription, OutlierReport,
};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Scatter pairs that get a fitted trend line.
pub const TREND_PAIRS: [(&str, &str); 3] = [
    ("Discount", "Profit"),
    ("GDP_Growth(%)", "Sales"),
    ("Inflation(%)", "Profit"),
];

// ============================================================================
// Report Types
// ============================================================================

/// A part of the EDA report that can be requested on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    Overview,
    Nulls,
    NullClasses,
    Outliers,
    Categorical,
    Describe,
    Insights,
}

impl ReportSection {
    pub const ALL: [ReportSection; 7] = [
        ReportSection::Overview,
        ReportSection::Nulls,
        ReportSection::NullClasses,
        ReportSection::Outliers,
        ReportSection::Categorical,
        ReportSection::Describe,
        ReportSection::Insights,
    ];

    /// Human-readable heading.
    pub fn display_name(&self) -> &'static str {
        match self {
            ReportSection::Overview => "Dataset Overview",
            ReportSection::Nulls => "Null Summary",
            ReportSection::NullClasses => "Null Classification",
            ReportSection::Outliers => "Outliers (IQR)",
            ReportSection::Categorical => "Categorical Distribution",
            ReportSection::Describe => "Numeric Summary",
            ReportSection::Insights => "Sales Insights",
        }
    }
}

/// Everything the EDA run produced, for `--json` and `--emit-report`.
///
/// Sections that were not requested are `None` and omitted from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    pub input_file: String,
    /// Adjusted dataset, when outliers were clipped and written
    pub output_file: Option<String>,
    pub rows: usize,
    pub columns: usize,
    pub config: AnalysisConfig,
    pub conversion_steps: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<DatasetOverview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nulls: Option<NullSummary>,
    /// Null percentages of the numeric columns only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_nulls: Option<Vec<NullColumnInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_classification: Option<NullClassification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outliers: Option<OutlierReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorical: Option<CategoricalAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub describe: Option<Vec<NumericDescription>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<InsightsReport>,

    pub clipped: Vec<ClipSummary>,
}

/// Chart data for the sales dataset.
///
/// Aggregates whose columns are missing are left empty and listed in
/// `skipped` with the reason.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsightsReport {
    pub monthly_sales: Vec<MonthlyTotal>,
    pub sales_by_category: Vec<GroupTotal>,
    pub sales_by_sub_category: Vec<GroupTotal>,
    pub profit_by_market: Vec<GroupTotal>,
    pub market_segments: Vec<MarketSegmentStats>,
    pub shipping_efficiency: Vec<ShippingModeStats>,
    pub shipping_time_by_market: Vec<GroupTotal>,
    pub correlations: Option<CorrelationMatrix>,
    pub top_categories: Vec<TopCategories>,
    pub trends: Vec<LinearTrend>,
    pub skipped: Vec<String>,
}

impl InsightsReport {
    /// Compute every chart aggregate the dataset has columns for.
    pub fn collect(df: &DataFrame, config: &AnalysisConfig) -> Result<Self> {
        let mut report = InsightsReport::default();
        let skipped = &mut report.skipped;

        report.monthly_sales =
            skip_on_mismatch("monthly_sales", insights::monthly_sales(df), skipped)?
                .unwrap_or_default();
        report.sales_by_category = skip_on_mismatch(
            "sales_by_category",
            insights::sales_by_group(df, CATEGORY),
            skipped,
        )?
        .unwrap_or_default();
        report.sales_by_sub_category = skip_on_mismatch(
            "sales_by_sub_category",
            insights::sales_by_group(df, SUB_CATEGORY),
            skipped,
        )?
        .unwrap_or_default();
        report.profit_by_market =
            skip_on_mismatch("profit_by_market", insights::profit_by_market(df), skipped)?
                .unwrap_or_default();
        report.market_segments = skip_on_mismatch(
            "market_segments",
            insights::market_segment_comparison(df),
            skipped,
        )?
        .unwrap_or_default();
        report.shipping_efficiency = skip_on_mismatch(
            "shipping_efficiency",
            insights::shipping_efficiency(df),
            skipped,
        )?
        .unwrap_or_default();
        report.shipping_time_by_market = skip_on_mismatch(
            "shipping_time_by_market",
            insights::shipping_time_by_market(df),
            skipped,
        )?
        .unwrap_or_default();

        for (x, y) in TREND_PAIRS {
            let label = format!("trend {} vs {}", y, x);
            if let Some(Some(trend)) =
                skip_on_mismatch(&label, insights::linear_trend(df, x, y), skipped)?
            {
                report.trends.push(trend);
            }
        }

        let correlations = insights::correlation_matrix(df)?;
        if !correlations.columns.is_empty() {
            report.correlations = Some(correlations);
        }
        report.top_categories = insights::top_categories(df, config.top_n)?;

        debug!(
            "Insights collected, {} aggregates skipped",
            report.skipped.len()
        );
        Ok(report)
    }
}

/// Turn a missing/mistyped column into a skip note; other errors propagate.
fn skip_on_mismatch<T>(label: &str, result: Result<T>, skipped: &mut Vec<String>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_schema_mismatch() => {
            warn!("Skipping {}: {}", label, e);
            skipped.push(format!("{}: {}", label, e));
            Ok(None)
        }
        Err(e) => Err(e.with_context(format!("Failed to compute {}", label))),
    }
}

// ============================================================================
// Report Generator
// ============================================================================

/// Builds EDA reports and writes them, with adjusted datasets, to disk.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run the requested sections over `df`.
    ///
    /// `df` is not modified. Conversion steps and clip results are filled in
    /// by the caller, since both mutate the dataset.
    pub fn build_report(
        input_file: &str,
        df: &DataFrame,
        config: &AnalysisConfig,
        sections: &[ReportSection],
    ) -> Result<EdaReport> {
        if df.width() == 0 {
            return Err(EdaError::EmptyDataset);
        }

        let mut report = EdaReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_file: None,
            rows: df.height(),
            columns: df.width(),
            config: config.clone(),
            conversion_steps: Vec::new(),
            overview: None,
            nulls: None,
            numeric_nulls: None,
            null_classification: None,
            outliers: None,
            categorical: None,
            describe: None,
            insights: None,
            clipped: Vec::new(),
        };

        for section in sections {
            debug!("Building section: {}", section.display_name());
            match section {
                ReportSection::Overview => {
                    report.overview = Some(DataProfiler::overview(df, config)?);
                }
                ReportSection::Nulls => {
                    report.nulls = Some(NullAnalyzer::summarize(df)?);
                    report.numeric_nulls = Some(NullAnalyzer::numeric_null_percentages(df)?);
                }
                ReportSection::NullClasses => {
                    report.null_classification =
                        Some(NullAnalyzer::classify(df, config.null_threshold)?);
                }
                ReportSection::Outliers => {
                    report.outliers = Some(OutlierDetector::from_config(config).count(df)?);
                }
                ReportSection::Categorical => {
                    report.categorical = Some(CategoricalProfiler::profile(df)?);
                }
                ReportSection::Describe => {
                    report.describe = Some(DataProfiler::describe(df)?);
                }
                ReportSection::Insights => {
                    report.insights = Some(InsightsReport::collect(df, config)?);
                }
            }
        }

        Ok(report)
    }

    /// Write the report as pretty JSON to `<base_name>_eda_report.json`.
    pub fn write_report_to_file(&self, report: &EdaReport, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_eda_report.json", base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }

    /// Write a dataset as CSV to `<file_name>.csv`.
    pub fn write_csv(&self, df: &mut DataFrame, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let output_path = self.output_dir.join(format!("{}.csv", file_name));
        let mut file = File::create(&output_path)?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(df)
            .context(format!("Failed to write {}", output_path.display()))?;

        info!("Dataset saved: {}", output_path.display());

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> DataFrame {
        df![
            "Order_Date" => ["2021-01-05", "2021-01-20", "2021-02-03", "2021-02-10"],
            "Ship_Date" => ["2021-01-08", "2021-01-22", "2021-02-09", "2021-02-11"],
            "Market" => [Some("EU"), Some("US"), None, Some("EU")],
            "Segment" => ["Consumer", "Corporate", "Consumer", "Consumer"],
            "Category" => ["Technology", "Furniture", "Technology", "Furniture"],
            "Ship_Mode" => ["Standard Class", "First Class", "Standard Class", "Same Day"],
            "Sales" => [100.0, 50.0, 30.0, 1000.0],
            "Profit" => [10.0, -5.0, 6.0, 80.0],
            "Discount" => [0.1, 0.0, 0.2, 0.0],
            "Shipping_Cost" => [5.0, 9.0, 4.0, 30.0],
        ]
        .unwrap()
    }

    #[test]
    fn test_build_report_selected_sections() {
        let df = orders();
        let config = AnalysisConfig::default();
        let report = ReportGenerator::build_report(
            "orders.csv",
            &df,
            &config,
            &[ReportSection::Nulls, ReportSection::Outliers],
        )
        .unwrap();

        assert_eq!(report.rows, 4);
        assert_eq!(report.columns, 10);
        assert!(report.nulls.is_some());
        assert!(report.outliers.is_some());
        assert!(report.overview.is_none());
        assert!(report.insights.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("overview").is_none());
        assert_eq!(json["nulls"]["counts"][2], 1);
    }

    #[test]
    fn test_build_report_all_sections() {
        let df = orders();
        let report = ReportGenerator::build_report(
            "orders.csv",
            &df,
            &AnalysisConfig::default(),
            &ReportSection::ALL,
        )
        .unwrap();

        assert!(report.overview.is_some());
        assert!(report.null_classification.is_some());
        assert!(report.describe.is_some());
        assert_eq!(report.categorical.as_ref().unwrap().profiles().len(), 6);
    }

    #[test]
    fn test_report_json_reads_back_with_no_rows() {
        let df = orders().head(Some(0));
        let report = ReportGenerator::build_report(
            "orders.csv",
            &df,
            &AnalysisConfig::default(),
            &[
                ReportSection::Nulls,
                ReportSection::NullClasses,
                ReportSection::Outliers,
                ReportSection::Describe,
            ],
        )
        .unwrap();

        let json = serde_json::to_string(&report).unwrap();
        let restored: EdaReport = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.rows, 0);
        let nulls = restored.nulls.unwrap();
        assert!(nulls.percentages.iter().all(|p| p.is_nan()));
        let outliers = restored.outliers.unwrap();
        assert!(outliers.columns.iter().all(|c| c.percentage.is_nan()));
        let describe = restored.describe.unwrap();
        assert!(describe.iter().all(|d| d.mean.is_nan()));
    }

    #[test]
    fn test_build_report_rejects_empty_dataset() {
        let err = ReportGenerator::build_report(
            "empty.csv",
            &DataFrame::empty(),
            &AnalysisConfig::default(),
            &ReportSection::ALL,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_DATASET");
    }

    #[test]
    fn test_insights_skip_missing_columns() {
        let df = orders();
        let insights = InsightsReport::collect(&df, &AnalysisConfig::default()).unwrap();

        assert_eq!(insights.monthly_sales.len(), 2);
        assert_eq!(insights.sales_by_category[0].group, "Furniture");
        assert_eq!(insights.shipping_efficiency.len(), 3);
        assert!(insights.correlations.is_some());
        assert_eq!(insights.trends.len(), 1);

        // no Sub_Category and no economic indicators in this dataset
        assert!(insights.sales_by_sub_category.is_empty());
        assert!(insights.skipped.iter().any(|s| s.starts_with("sales_by_sub_category")));
        assert!(insights.skipped.iter().any(|s| s.contains("GDP_Growth(%)")));
    }

    #[test]
    fn test_write_report_and_csv() {
        let dir = std::env::temp_dir().join(format!("sales_eda_report_{}", std::process::id()));
        let generator = ReportGenerator::new(dir.clone());

        let mut df = orders();
        let report = ReportGenerator::build_report(
            "orders.csv",
            &df,
            &AnalysisConfig::default(),
            &[ReportSection::Describe],
        )
        .unwrap();

        let report_path = generator.write_report_to_file(&report, "orders").unwrap();
        assert!(report_path.ends_with("orders_eda_report.json"));
        let content = fs::read_to_string(&report_path).unwrap();
        assert!(content.contains("\"describe\""));

        let csv_path = generator.write_csv(&mut df, "orders_clipped").unwrap();
        let written = fs::read_to_string(&csv_path).unwrap();
        assert!(written.starts_with("Order_Date,Ship_Date,Market"));
        assert_eq!(written.lines().count(), 5);

        fs::remove_dir_all(&dir).ok();
    }
}
