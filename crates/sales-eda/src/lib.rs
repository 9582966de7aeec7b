//! Sales Dataset EDA Library
//!
//! Exploratory data analysis helpers for tabular sales data, built on Polars.
//!
//! # Overview
//!
//! This library provides:
//!
//! - **Null Analysis**: Per-column null counts and percentages, and a split of
//!   the columns with nulls by a percentage threshold
//! - **Outliers**: IQR-based outlier counting, and in-place clipping of
//!   selected columns to their IQR fences
//! - **Categorical Distribution**: Unique counts, normalized value counts and
//!   a describe block for every text column
//! - **Type Conversion**: Date and economic indicator columns parsed from text,
//!   with unparseable entries set to null
//! - **Profiling**: Dataset overview, duplicate count and numeric summaries
//! - **Insights**: Grouped aggregates, correlations and trend lines for charts
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sales_eda::{AnalysisConfig, ColumnConverter, NullAnalyzer, OutlierDetector, OutlierHandler};
//! use polars::prelude::*;
//!
//! let mut df = CsvReadOptions::default()
//!     .with_has_header(true)
//!     .try_into_reader_with_file_path(Some("sales.csv".into()))?
//!     .finish()?;
//!
//! let config = AnalysisConfig::default();
//! ColumnConverter::convert(&mut df, &config)?;
//!
//! let classes = NullAnalyzer::classify(&df, config.null_threshold)?;
//! println!("High null columns: {:?}", classes.high);
//!
//! let outliers = OutlierDetector::from_config(&config).count(&df)?;
//! println!("Sales outliers: {:?}", outliers.get("Sales"));
//!
//! // Destructive: rewrites the column in place
//! OutlierHandler::from_config(&config).clip(&mut df, &["Sales", "Profit"])?;
//! ```
//!
//! # Configuration
//!
//! Use [`AnalysisConfig`] to change thresholds and the columns to convert:
//!
//! ```rust,ignore
//! use sales_eda::AnalysisConfig;
//!
//! let config = AnalysisConfig::builder()
//!     .null_threshold(5.0)        // Columns with >5% nulls are "high"
//!     .iqr_multiplier(3.0)        // Wider fences
//!     .date_columns(["Order_Date"])
//!     .build()?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod insights;
pub mod outliers;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::ColumnConverter;
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError};
pub use error::{EdaError, Result as EdaResult, ResultExt};
pub use outliers::{IqrBounds, OutlierDetector, OutlierHandler};
pub use profiler::{CategoricalProfiler, DataProfiler};
pub use quality::NullAnalyzer;
pub use reporting::{EdaReport, InsightsReport, ReportGenerator, ReportSection};
pub use types::{
    CategoricalAnalysis, CategoricalDescription, CategoricalProfile, ClipSummary, ColumnOutliers,
    DatasetOverview, NullClassification, NullColumnInfo, NullSummary, NumericDescription,
    OutlierReport, ValueCount, ValueProportion,
};
pub use utils::{DtypeCategory, get_dtype_category, is_numeric_dtype, parse_numeric_string};
