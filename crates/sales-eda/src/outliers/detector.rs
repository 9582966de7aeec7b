//! Outlier counting.

use super::IqrBounds;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::types::{ColumnOutliers, OutlierReport};
use crate::utils::{numeric_column_names, numeric_values, percentage, round_to};
use polars::prelude::*;
use tracing::{debug, info};

/// Counts IQR outliers in every numeric column. Never modifies the dataset.
#[derive(Debug, Clone, Copy)]
pub struct OutlierDetector {
    iqr_multiplier: f64,
}

impl Default for OutlierDetector {
    fn default() -> Self {
        Self {
            iqr_multiplier: 1.5,
        }
    }
}

impl OutlierDetector {
    pub fn new(iqr_multiplier: f64) -> Self {
        Self { iqr_multiplier }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.iqr_multiplier)
    }

    /// Count, for each numeric column, the rows whose value falls strictly
    /// outside `[q1 - k*iqr, q3 + k*iqr]`.
    ///
    /// Percentages are relative to the total row count (null rows included)
    /// and rounded to 2 decimals. Non-numeric columns are skipped.
    pub fn count(&self, df: &DataFrame) -> Result<OutlierReport> {
        let row_count = df.height();
        let mut columns = Vec::new();

        for name in numeric_column_names(df) {
            let series = df.column(&name)?.as_materialized_series();
            let entry = self.count_column(series, row_count)?;

            info!(
                "Column {} has {} outliers ({}% of rows)",
                name.to_uppercase(),
                entry.count,
                entry.percentage
            );
            columns.push(entry);
        }

        debug!(
            "Outlier scan finished over {} numeric columns",
            columns.len()
        );

        Ok(OutlierReport {
            row_count,
            iqr_multiplier: self.iqr_multiplier,
            columns,
        })
    }

    fn count_column(&self, series: &Series, row_count: usize) -> Result<ColumnOutliers> {
        let bounds = IqrBounds::from_series(series, self.iqr_multiplier)?;

        let count = match bounds {
            Some(bounds) => numeric_values(series)?
                .into_iter()
                .flatten()
                .filter(|v| bounds.is_outlier(*v))
                .count(),
            None => 0,
        };

        Ok(ColumnOutliers {
            column: series.name().to_string(),
            bounds,
            count,
            percentage: round_to(percentage(count, row_count), 2),
        })
    }
}
