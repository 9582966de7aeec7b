//! Shared utilities for the EDA routines.
//!
//! Column lookup, dtype classification, missing-value handling and the small
//! numeric helpers used across modules.

use crate::error::{EdaError, Result};
use polars::prelude::*;
use serde::{Deserialize, Deserializer};

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for analysis purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a floating point type (the only ones that can hold NaN).
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

/// Names of the numeric columns, in dataset order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    columns_of_category(df, DtypeCategory::Numeric)
}

/// Names of the text/categorical columns, in dataset order.
pub fn text_column_names(df: &DataFrame) -> Vec<String> {
    columns_of_category(df, DtypeCategory::String)
}

fn columns_of_category(df: &DataFrame, category: DtypeCategory) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| get_dtype_category(col.dtype()) == category)
        .map(|col| col.name().to_string())
        .collect()
}

// =============================================================================
// Column Access
// =============================================================================

/// Look up a column by name, failing with [`EdaError::ColumnNotFound`].
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| EdaError::ColumnNotFound(name.to_string()))
}

/// Look up a column and check that it is numeric.
pub fn require_numeric_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    let series = require_column(df, name)?.as_materialized_series();
    if !is_numeric_dtype(series.dtype()) {
        return Err(EdaError::NotNumeric {
            column: name.to_string(),
            dtype: series.dtype().to_string(),
        });
    }
    Ok(series)
}

// =============================================================================
// Missing Values
// =============================================================================

/// Count missing cells: nulls, plus NaN in float columns.
pub fn missing_count(series: &Series) -> Result<usize> {
    let mut missing = series.null_count();
    if is_float_dtype(series.dtype()) {
        let floats = series.cast(&DataType::Float64)?;
        missing += floats
            .f64()?
            .into_iter()
            .filter(|v| v.is_some_and(f64::is_nan))
            .count();
    }
    Ok(missing)
}

/// Values of a numeric series as `f64`, with nulls and NaN mapped to `None`.
///
/// The returned vector has one entry per row.
pub fn numeric_values(series: &Series) -> Result<Vec<Option<f64>>> {
    let floats = series.cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .map(|v| v.filter(|val| !val.is_nan()))
        .collect())
}

/// Values of a text/categorical series as owned strings, nulls as `None`.
pub fn text_values(series: &Series) -> Result<Vec<Option<String>>> {
    let strings = series.cast(&DataType::String)?;
    Ok(strings
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

// =============================================================================
// Numeric Helpers
// =============================================================================

/// `part / total * 100`, or NaN when `total` is zero.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return f64::NAN;
    }
    part as f64 / total as f64 * 100.0
}

/// Round to a number of decimal places. NaN stays NaN.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Parse a string as a number the way a strict numeric coercion does.
///
/// Surrounding whitespace is ignored. Empty strings, non-numeric text and
/// "NaN" all yield `None`.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

// =============================================================================
// Serialization Helpers
// =============================================================================

// serde_json writes NaN as `null`; these read it back as NaN.

/// Deserialize an `f64` that may have been written as `null`.
pub fn nan_from_null<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// [`nan_from_null`] for every element of a list.
pub fn nan_from_null_vec<'de, D>(deserializer: D) -> std::result::Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Option<f64>>::deserialize(deserializer)?;
    Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

/// [`nan_from_null`] for every cell of a row-major matrix.
pub fn nan_from_null_matrix<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Vec::<Vec<Option<f64>>>::deserialize(deserializer)?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        .collect())
}

// =============================================================================
// Tests
// =============================================================================
