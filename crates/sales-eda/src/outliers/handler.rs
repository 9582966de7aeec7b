//! Outlier clipping.

use super::IqrBounds;
use crate::config::AnalysisConfig;
use crate::error::{Result, ResultExt};
use crate::types::ClipSummary;
use crate::utils::{numeric_values, require_numeric_column};
use polars::prelude::*;
use tracing::{debug, info};

/// Clips numeric columns to their IQR fences.
#[derive(Debug, Clone, Copy)]
pub struct OutlierHandler {
    iqr_multiplier: f64,
}

impl Default for OutlierHandler {
    fn default() -> Self {
        Self {
            iqr_multiplier: 1.5,
        }
    }
}

impl OutlierHandler {
    pub fn new(iqr_multiplier: f64) -> Self {
        Self { iqr_multiplier }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.iqr_multiplier)
    }

    /// Clip every value of the listed columns into `[q1 - k*iqr, q3 + k*iqr]`.
    ///
    /// **Destructive**: the caller's dataset is modified in place and there is
    /// no undo. Clone the frame first if the original values are still needed.
    ///
    /// Bounds are computed per column from its current values. Nulls stay
    /// null, and clipped columns are stored as `Float64`. Fails with
    /// `ColumnNotFound` or `NotNumeric` before touching that column; columns
    /// listed earlier have already been clipped at that point.
    pub fn clip<S: AsRef<str>>(&self, df: &mut DataFrame, columns: &[S]) -> Result<Vec<ClipSummary>> {
        let mut summaries = Vec::with_capacity(columns.len());

        for name in columns {
            let name = name.as_ref();
            let (clipped, summary) = self.clip_column(require_numeric_column(df, name)?)?;

            df.replace(name, clipped)
                .context(format!("Failed to store clipped column '{}'", name))?;

            debug!(
                "Clipped {} values in {} ({} low, {} high)",
                summary.total_clipped(),
                name,
                summary.clipped_low,
                summary.clipped_high
            );
            summaries.push(summary);
        }

        info!(
            "Clipped outliers in {} columns ({} values adjusted)",
            summaries.len(),
            summaries.iter().map(ClipSummary::total_clipped).sum::<usize>()
        );

        Ok(summaries)
    }

    fn clip_column(&self, series: &Series) -> Result<(Series, ClipSummary)> {
        let bounds = IqrBounds::from_series(series, self.iqr_multiplier)?;
        let values = numeric_values(series)?;

        let mut clipped_low = 0;
        let mut clipped_high = 0;
        let clipped: Vec<Option<f64>> = match bounds {
            Some(bounds) => values
                .into_iter()
                .map(|v| {
                    v.map(|val| {
                        if val < bounds.lower {
                            clipped_low += 1;
                        } else if val > bounds.upper {
                            clipped_high += 1;
                        }
                        bounds.clip(val)
                    })
                })
                .collect(),
            None => values,
        };

        let summary = ClipSummary {
            column: series.name().to_string(),
            bounds,
            clipped_low,
            clipped_high,
        };

        Ok((Series::new(series.name().clone(), clipped), summary))
    }
}
