use crate::outliers::IqrBounds;
use crate::utils::{nan_from_null, nan_from_null_vec};
use serde::{Deserialize, Serialize};

// ============================================================================
// Null Reporting
// ============================================================================

/// Per-column missing-value counts and percentages.
///
/// `columns`, `counts` and `percentages` are parallel and follow the
/// dataset's column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NullSummary {
    pub row_count: usize,
    pub columns: Vec<String>,
    pub counts: Vec<usize>,
    /// `count / row_count * 100`, NaN when the dataset has no rows.
    #[serde(deserialize_with = "nan_from_null_vec")]
    pub percentages: Vec<f64>,
}

impl NullSummary {
    /// Null count and percentage for one column.
    pub fn get(&self, column: &str) -> Option<(usize, f64)> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| (self.counts[idx], self.percentages[idx]))
    }

    /// Iterate `(column, count, percentage)` in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize, f64)> {
        self.columns
            .iter()
            .zip(&self.counts)
            .zip(&self.percentages)
            .map(|((name, count), pct)| (name.as_str(), *count, *pct))
    }
}

/// One row of the columns-with-nulls table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullColumnInfo {
    pub column: String,
    pub dtype: String,
    pub null_count: usize,
    #[serde(deserialize_with = "nan_from_null")]
    pub null_percentage: f64,
}

/// Columns with nulls split by a percentage threshold.
///
/// Columns without nulls appear in neither list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NullClassification {
    pub threshold: f64,
    /// Details for every column that has at least one null.
    pub columns: Vec<NullColumnInfo>,
    /// Null percentage strictly above the threshold.
    pub high: Vec<String>,
    /// Null percentage at or below the threshold.
    pub low: Vec<String>,
}

// ============================================================================
// Outliers
// ============================================================================

/// IQR outlier count for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOutliers {
    pub column: String,
    /// `None` when the column has no non-null values.
    pub bounds: Option<IqrBounds>,
    pub count: usize,
    /// Share of all dataset rows, rounded to 2 decimals.
    #[serde(deserialize_with = "nan_from_null")]
    pub percentage: f64,
}

/// Outlier counts for every numeric column, in column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierReport {
    pub row_count: usize,
    pub iqr_multiplier: f64,
    pub columns: Vec<ColumnOutliers>,
}

impl OutlierReport {
    /// Outlier entry for a column, if it was analyzed.
    pub fn get(&self, column: &str) -> Option<&ColumnOutliers> {
        self.columns.iter().find(|c| c.column == column)
    }

    /// Total outlier cells across all columns.
    pub fn total_outliers(&self) -> usize {
        self.columns.iter().map(|c| c.count).sum()
    }
}

/// What a clip pass did to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSummary {
    pub column: String,
    pub bounds: Option<IqrBounds>,
    /// Values raised to the lower bound.
    pub clipped_low: usize,
    /// Values lowered to the upper bound.
    pub clipped_high: usize,
}

impl ClipSummary {
    pub fn total_clipped(&self) -> usize {
        self.clipped_low + self.clipped_high
    }
}

// ============================================================================
// Categorical Distribution
// ============================================================================

/// A value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// A value and its share of the non-null entries (0.0 - 1.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueProportion {
    pub value: String,
    pub proportion: f64,
}

/// Describe block for a text column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalDescription {
    /// Non-null entries.
    pub count: usize,
    /// Distinct non-null values.
    pub unique: usize,
    /// Most frequent value.
    pub top: Option<String>,
    /// Occurrences of `top`.
    pub freq: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalProfile {
    pub column: String,
    /// Distinct values, counting null as one value when present.
    pub unique_count: usize,
    pub proportions: Vec<ValueProportion>,
    pub description: CategoricalDescription,
}

/// Result of the categorical distribution report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "profiles", rename_all = "snake_case")]
pub enum CategoricalAnalysis {
    /// The dataset has no text/categorical columns; nothing was analyzed.
    NoCategoricalColumns,
    Profiled(Vec<CategoricalProfile>),
}

impl CategoricalAnalysis {
    pub fn profiles(&self) -> &[CategoricalProfile] {
        match self {
            Self::NoCategoricalColumns => &[],
            Self::Profiled(profiles) => profiles,
        }
    }
}

// ============================================================================
// Dataset Overview
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub non_null_count: usize,
}

/// Value counts of one text column, most frequent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnValueCounts {
    pub column: String,
    pub counts: Vec<ValueCount>,
}

/// First look at a dataset: sample rows, column info, null rates,
/// duplicates and value counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
    /// Randomly sampled rows, cells formatted as text, in column order.
    pub sample: Vec<Vec<String>>,
    pub column_info: Vec<ColumnInfo>,
    /// Null percentage of every column, rounded to 2 decimals.
    pub null_percentages: Vec<NullColumnInfo>,
    pub duplicate_count: usize,
    pub value_counts: Vec<ColumnValueCounts>,
}

/// Summary statistics for a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericDescription {
    pub column: String,
    pub count: usize,
    #[serde(deserialize_with = "nan_from_null")]
    pub mean: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub std: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub min: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub q1: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub median: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub q3: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub max: f64,
}
