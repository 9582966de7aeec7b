use crate::error::Result;
use crate::types::{NullClassification, NullColumnInfo, NullSummary};
use crate::utils::{is_numeric_dtype, missing_count, percentage};
use polars::prelude::*;
use tracing::{debug, info};

/// Missing-value summaries and threshold classification.
pub struct NullAnalyzer;

impl NullAnalyzer {
    /// Count and percentage of missing values for every column, in column order.
    ///
    /// A dataset with zero rows reports NaN percentages rather than failing.
    pub fn summarize(df: &DataFrame) -> Result<NullSummary> {
        let row_count = df.height();
        let mut columns = Vec::with_capacity(df.width());
        let mut counts = Vec::with_capacity(df.width());
        let mut percentages = Vec::with_capacity(df.width());

        for col in df.get_columns() {
            let missing = missing_count(col.as_materialized_series())?;
            columns.push(col.name().to_string());
            counts.push(missing);
            percentages.push(percentage(missing, row_count));
        }

        Ok(NullSummary {
            row_count,
            columns,
            counts,
            percentages,
        })
    }

    /// Per-column details for the columns that have at least one missing value.
    pub fn columns_with_nulls(df: &DataFrame) -> Result<Vec<NullColumnInfo>> {
        let row_count = df.height();
        let mut infos = Vec::new();

        for col in df.get_columns() {
            let series = col.as_materialized_series();
            let null_count = missing_count(series)?;
            if null_count == 0 {
                continue;
            }
            infos.push(NullColumnInfo {
                column: col.name().to_string(),
                dtype: series.dtype().to_string(),
                null_count,
                null_percentage: percentage(null_count, row_count),
            });
        }

        Ok(infos)
    }

    /// Split the columns with nulls by a percentage threshold (0 - 100).
    ///
    /// `high` gets columns whose null percentage is strictly above the
    /// threshold, `low` those at or below it. Columns without nulls are left
    /// out of both lists.
    pub fn classify(df: &DataFrame, threshold: f64) -> Result<NullClassification> {
        let columns = Self::columns_with_nulls(df)?;

        let (high, low): (Vec<&NullColumnInfo>, Vec<&NullColumnInfo>) = columns
            .iter()
            .partition(|info| info.null_percentage > threshold);

        let high: Vec<String> = high.into_iter().map(|i| i.column.clone()).collect();
        let low: Vec<String> = low.into_iter().map(|i| i.column.clone()).collect();

        info!(
            "{} columns with nulls: {} above {}%, {} at or below",
            columns.len(),
            high.len(),
            threshold,
            low.len()
        );
        debug!("High-null columns: {:?}; low-null columns: {:?}", high, low);

        Ok(NullClassification {
            threshold,
            columns,
            high,
            low,
        })
    }

    /// Null percentage of each numeric column.
    ///
    /// Returns an empty list, with an informational log, when there are no
    /// numeric columns.
    pub fn numeric_null_percentages(df: &DataFrame) -> Result<Vec<NullColumnInfo>> {
        let row_count = df.height();
        let mut infos = Vec::new();

        for col in df.get_columns() {
            let series = col.as_materialized_series();
            if !is_numeric_dtype(series.dtype()) {
                continue;
            }
            let null_count = missing_count(series)?;
            infos.push(NullColumnInfo {
                column: col.name().to_string(),
                dtype: series.dtype().to_string(),
                null_count,
                null_percentage: percentage(null_count, row_count),
            });
        }

        if infos.is_empty() {
            info!("No numeric columns in the dataset");
        }
        Ok(infos)
    }
}
