//! Descriptive profiling of a dataset.
//!
//! This module provides:
//! - A first-look overview (sample rows, column info, null rates, duplicates,
//!   value counts)
//! - Summary statistics for numeric columns
//! - The distribution report for categorical columns

mod categorical;
pub mod statistics;

pub use categorical::{CategoricalProfiler, value_counts};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::types::{ColumnInfo, ColumnValueCounts, DatasetOverview, NullColumnInfo, NumericDescription};
use crate::utils::{
    missing_count, numeric_column_names, numeric_values, percentage, round_to, text_column_names,
};
use polars::prelude::*;
use rand::prelude::*;
use statistics::{mean, quantile_sorted, sample_std, sorted};
use tracing::debug;

/// Dataset profiler for the descriptive reports.
pub struct DataProfiler;

impl DataProfiler {
    /// Build the first-look overview of a dataset.
    pub fn overview(df: &DataFrame, config: &AnalysisConfig) -> Result<DatasetOverview> {
        let row_count = df.height();
        let mut column_info = Vec::with_capacity(df.width());
        let mut null_percentages = Vec::with_capacity(df.width());

        for col in df.get_columns() {
            let series = col.as_materialized_series();
            let missing = missing_count(series)?;
            let dtype = series.dtype().to_string();

            column_info.push(ColumnInfo {
                name: col.name().to_string(),
                dtype: dtype.clone(),
                non_null_count: row_count - missing,
            });
            null_percentages.push(NullColumnInfo {
                column: col.name().to_string(),
                dtype,
                null_count: missing,
                null_percentage: round_to(percentage(missing, row_count), 2),
            });
        }

        let mut value_counts = Vec::new();
        for name in text_column_names(df) {
            let series = df.column(&name)?.as_materialized_series();
            value_counts.push(ColumnValueCounts {
                counts: categorical::value_counts(series)?,
                column: name,
            });
        }

        let overview = DatasetOverview {
            rows: row_count,
            columns: df.width(),
            sample: Self::sample_rows(df, config.sample_size, config.sample_seed)?,
            column_info,
            null_percentages,
            duplicate_count: Self::duplicate_count(df)?,
            value_counts,
        };

        debug!(
            "Overview built for {} rows x {} columns",
            overview.rows, overview.columns
        );
        Ok(overview)
    }

    /// Number of rows that repeat an earlier row exactly.
    pub fn duplicate_count(df: &DataFrame) -> Result<usize> {
        if df.width() == 0 || df.height() == 0 {
            return Ok(0);
        }
        let unique_rows = df
            .unique::<&str, &str>(None, UniqueKeepStrategy::First, None)?
            .height();
        Ok(df.height() - unique_rows)
    }

    /// Up to `size` randomly chosen rows, in dataset order, cells formatted as text.
    ///
    /// The same seed always picks the same rows.
    pub fn sample_rows(df: &DataFrame, size: usize, seed: u64) -> Result<Vec<Vec<String>>> {
        let sample_size = std::cmp::min(size, df.height());
        let mut rng = StdRng::seed_from_u64(seed);
        let indices: Vec<usize> = (0..df.height()).collect();
        let mut picked: Vec<usize> = indices
            .choose_multiple(&mut rng, sample_size)
            .copied()
            .collect();
        picked.sort_unstable();

        let mut rows = Vec::with_capacity(picked.len());
        for idx in picked {
            let mut row = Vec::with_capacity(df.width());
            for col in df.get_columns() {
                let val = col.as_materialized_series().get(idx)?;
                row.push(format!("{}", val));
            }
            rows.push(row);
        }

        Ok(rows)
    }

    /// Count, mean, sample std, min, quartiles and max of every numeric column.
    ///
    /// Missing values are ignored. A column without values yields NaN statistics.
    pub fn describe(df: &DataFrame) -> Result<Vec<NumericDescription>> {
        let mut descriptions = Vec::new();

        for name in numeric_column_names(df) {
            let series = df.column(&name)?.as_materialized_series();
            let values = sorted(numeric_values(series)?.into_iter().flatten());

            let quartile = |q: f64| quantile_sorted(&values, q).unwrap_or(f64::NAN);
            descriptions.push(NumericDescription {
                count: values.len(),
                mean: mean(&values).unwrap_or(f64::NAN),
                std: sample_std(&values),
                min: values.first().copied().unwrap_or(f64::NAN),
                q1: quartile(0.25),
                median: quartile(0.5),
                q3: quartile(0.75),
                max: values.last().copied().unwrap_or(f64::NAN),
                column: name,
            });
        }

        Ok(descriptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> DataFrame {
        df![
            "Order_ID" => ["A1", "A2", "A3", "A3", "A5"],
            "Market" => [Some("EU"), Some("US"), Some("EU"), Some("EU"), None],
            "Sales" => [Some(100.0), Some(250.0), Some(80.0), Some(80.0), None],
            "Quantity" => [1i64, 3, 2, 2, 5],
        ]
        .unwrap()
    }

    #[test]
    fn test_duplicate_count() {
        assert_eq!(DataProfiler::duplicate_count(&orders()).unwrap(), 1);
        assert_eq!(DataProfiler::duplicate_count(&DataFrame::empty()).unwrap(), 0);
    }

    #[test]
    fn test_overview() {
        let config = AnalysisConfig::default();
        let overview = DataProfiler::overview(&orders(), &config).unwrap();

        assert_eq!(overview.rows, 5);
        assert_eq!(overview.columns, 4);
        assert_eq!(overview.sample.len(), 4);
        assert!(overview.sample.iter().all(|row| row.len() == 4));
        assert_eq!(overview.duplicate_count, 1);

        let market = &overview.column_info[1];
        assert_eq!(market.name, "Market");
        assert_eq!(market.non_null_count, 4);
        assert_eq!(overview.null_percentages[2].null_percentage, 20.0);

        let text_columns: Vec<&str> = overview
            .value_counts
            .iter()
            .map(|vc| vc.column.as_str())
            .collect();
        assert_eq!(text_columns, vec!["Order_ID", "Market"]);
        assert_eq!(overview.value_counts[1].counts[0].value, "EU");
        assert_eq!(overview.value_counts[1].counts[0].count, 3);
    }

    #[test]
    fn test_sample_rows_seeded() {
        let df = orders();
        let first = DataProfiler::sample_rows(&df, 2, 7).unwrap();
        let second = DataProfiler::sample_rows(&df, 2, 7).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);

        let all = DataProfiler::sample_rows(&df, 10, 7).unwrap();
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn test_describe() {
        let descriptions = DataProfiler::describe(&orders()).unwrap();
        assert_eq!(descriptions.len(), 2);

        let sales = &descriptions[0];
        assert_eq!(sales.column, "Sales");
        assert_eq!(sales.count, 4);
        assert_eq!(sales.mean, 127.5);
        assert_eq!(sales.min, 80.0);
        assert_eq!(sales.q1, 80.0);
        assert_eq!(sales.median, 90.0);
        assert_eq!(sales.q3, 137.5);
        assert_eq!(sales.max, 250.0);

        let quantity = &descriptions[1];
        assert_eq!(quantity.count, 5);
        assert_eq!(quantity.median, 2.0);
    }

    #[test]
    fn test_describe_empty_column() {
        let df = df!["Profit" => [None::<f64>, None]].unwrap();
        let descriptions = DataProfiler::describe(&df).unwrap();
        assert_eq!(descriptions[0].count, 0);
        assert!(descriptions[0].mean.is_nan());
        assert!(descriptions[0].q3.is_nan());
    }
}
