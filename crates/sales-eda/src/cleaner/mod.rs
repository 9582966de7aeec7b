//! Type conversion for raw sales datasets.
//!
//! This module provides:
//! - Parsing date-like text columns into `Date`, or a millisecond `Datetime`
//!   when entries carry a time of day
//! - Coercing economic indicator columns into `Float64`
//!
//! Entries that cannot be parsed become null; the conversion itself never
//! fails because of bad cell values.

pub mod converters;

use crate::config::AnalysisConfig;
use crate::error::{EdaError, Result, ResultExt};
use crate::utils::{get_dtype_category, DtypeCategory};
use polars::prelude::*;
use tracing::{debug, info};

/// Converts the configured date and numeric columns of a dataset in place.
pub struct ColumnConverter;

impl ColumnConverter {
    /// Convert the configured columns that exist in the dataset.
    ///
    /// Date columns become `Date` (or `Datetime` when times of day are
    /// present), numeric columns become `Float64`. Columns not present are
    /// skipped, and columns that already have the target kind of dtype are
    /// left untouched, as are boolean numeric columns. Returns one line per
    /// conversion.
    pub fn convert(df: &mut DataFrame, config: &AnalysisConfig) -> Result<Vec<String>> {
        let mut steps = Vec::new();

        for name in &config.date_columns {
            if let Some(step) = Self::convert_column(df, name, Target::Date)? {
                steps.push(step);
            }
        }

        for name in &config.numeric_columns {
            if let Some(step) = Self::convert_column(df, name, Target::Float)? {
                steps.push(step);
            }
        }

        info!("Type conversion finished: {} columns converted", steps.len());
        Ok(steps)
    }

    fn convert_column(df: &mut DataFrame, name: &str, target: Target) -> Result<Option<String>> {
        let Ok(col) = df.column(name) else {
            debug!("Column {} not present, skipping conversion", name);
            return Ok(None);
        };
        let series = col.as_materialized_series();
        let category = get_dtype_category(series.dtype());

        let converted = match (target, category) {
            (Target::Date, DtypeCategory::Datetime) | (Target::Float, DtypeCategory::Numeric) => {
                debug!("Column {} already has the target type", name);
                return Ok(None);
            }
            (Target::Float, DtypeCategory::Boolean) => {
                debug!("Column {} is boolean, leaving it as is", name);
                return Ok(None);
            }
            (Target::Date, DtypeCategory::String) => {
                converters::string_to_temporal(&series.cast(&DataType::String)?)?
            }
            (Target::Float, DtypeCategory::String) => {
                converters::string_to_float(&series.cast(&DataType::String)?)?
            }
            _ => {
                return Err(EdaError::TypeConversionFailed {
                    column: name.to_string(),
                    target_type: target.label().to_string(),
                    reason: format!("unsupported source dtype {}", series.dtype()),
                });
            }
        };

        let before = series.null_count();
        let coerced = converted.null_count().saturating_sub(before);

        df.replace(name, converted)
            .context(format!("Failed to store converted column '{}'", name))?;

        Ok(Some(format!(
            "Converted {} to {} ({} unparseable values set to null)",
            name,
            target.label(),
            coerced
        )))
    }
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Date,
    Float,
}

impl Target {
    fn label(self) -> &'static str {
        match self {
            Target::Date => "date",
            Target::Float => "float",
        }
    }
}
