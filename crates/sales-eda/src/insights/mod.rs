//! Chart data for the sales dataset.
//!
//! Grouped aggregates, correlations and trend lines that a plotting layer
//! renders. Nothing here draws anything, and nothing here writes derived
//! columns back into the caller's dataset.
//!
//! Group keys that are null are dropped, and missing aggregated values (null
//! or NaN) are skipped, matching a `groupby` on the raw data.

mod sales;
mod shipping;

pub use sales::{market_segment_comparison, monthly_sales, profit_by_market, sales_by_group};
pub use shipping::{shipping_efficiency, shipping_time_by_market};

use crate::error::Result;
use crate::profiler::statistics::{least_squares, pearson};
use crate::profiler::value_counts;
use crate::types::ValueCount;
use crate::utils::{
    is_float_dtype, nan_from_null, nan_from_null_matrix, numeric_column_names, numeric_values, require_numeric_column,
    text_column_names, text_values,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub const SALES: &str = "Sales";
pub const PROFIT: &str = "Profit";
pub const MARKET: &str = "Market";
pub const SEGMENT: &str = "Segment";
pub const CATEGORY: &str = "Category";
pub const SUB_CATEGORY: &str = "Sub_Category";
pub const SHIP_MODE: &str = "Ship_Mode";
pub const SHIPPING_COST: &str = "Shipping_Cost";
pub const ORDER_DATE: &str = "Order_Date";
pub const SHIP_DATE: &str = "Ship_Date";

/// Total sales of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// `YYYY-MM`
    pub month: String,
    #[serde(deserialize_with = "nan_from_null")]
    pub total: f64,
}

/// An aggregated value for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub group: String,
    #[serde(deserialize_with = "nan_from_null")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSegmentStats {
    pub market: String,
    pub segment: String,
    #[serde(deserialize_with = "nan_from_null")]
    pub mean_sales: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub mean_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingModeStats {
    pub ship_mode: String,
    #[serde(deserialize_with = "nan_from_null")]
    pub avg_delivery_days: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub avg_shipping_cost: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub avg_profit: f64,
}

/// Pairwise Pearson correlations of the numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `values[i][j]` correlates `columns[i]` with `columns[j]`.
    #[serde(deserialize_with = "nan_from_null_matrix")]
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Most frequent values of one categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCategories {
    pub column: String,
    pub values: Vec<ValueCount>,
}

/// Least-squares line through a scatter of two numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    pub x: String,
    pub y: String,
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation of the pairs used for the fit.
    #[serde(deserialize_with = "nan_from_null")]
    pub r: f64,
    /// Rows where both values are present.
    pub points: usize,
}

/// Pearson correlation between every pair of numeric columns.
///
/// Each pair uses only the rows where both values are present. Pairs with
/// fewer than two such rows, or with a constant side, are NaN.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    let columns = numeric_column_names(df);
    let mut data = Vec::with_capacity(columns.len());
    for name in &columns {
        data.push(numeric_values(df.column(name)?.as_materialized_series())?);
    }

    let values = data
        .iter()
        .map(|a| data.iter().map(|b| pearson(&complete_pairs(a, b))).collect())
        .collect();

    Ok(CorrelationMatrix { columns, values })
}

/// Least-squares trend of `y` against `x`, `None` when it cannot be fitted.
pub fn linear_trend(df: &DataFrame, x: &str, y: &str) -> Result<Option<LinearTrend>> {
    let xs = numeric_values(require_numeric_column(df, x)?)?;
    let ys = numeric_values(require_numeric_column(df, y)?)?;
    let pairs = complete_pairs(&xs, &ys);

    Ok(least_squares(&pairs).map(|(slope, intercept)| LinearTrend {
        x: x.to_string(),
        y: y.to_string(),
        slope,
        intercept,
        r: pearson(&pairs),
        points: pairs.len(),
    }))
}

/// The `top_n` most frequent values of each text column.
pub fn top_categories(df: &DataFrame, top_n: usize) -> Result<Vec<TopCategories>> {
    let mut result = Vec::new();
    for name in text_column_names(df) {
        let mut values = value_counts(df.column(&name)?.as_materialized_series())?;
        values.truncate(top_n);
        result.push(TopCategories {
            column: name,
            values,
        });
    }
    Ok(result)
}

fn complete_pairs(a: &[Option<f64>], b: &[Option<f64>]) -> Vec<(f64, f64)> {
    a.iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect()
}

/// Run a `group_by` over non-null keys and collect the result eagerly.
///
/// NaN in float columns is read as null so that `sum`/`mean` skip it.
fn grouped(df: &DataFrame, keys: &[&str], aggs: Vec<Expr>) -> Result<DataFrame> {
    let mut lazy = df.clone().lazy();
    let nan_as_null: Vec<Expr> = df
        .get_columns()
        .iter()
        .filter(|column| is_float_dtype(column.dtype()))
        .map(|column| col(column.name().as_str()).fill_nan(lit(NULL)))
        .collect();
    if !nan_as_null.is_empty() {
        lazy = lazy.with_columns(nan_as_null);
    }
    for key in keys {
        lazy = lazy.filter(col(*key).is_not_null());
    }
    let by: Vec<Expr> = keys.iter().map(|key| col(*key)).collect();

    Ok(lazy.group_by(by).agg(aggs).collect()?)
}

/// Read a two-column aggregate back as `(group, value)` pairs.
///
/// An aggregate over a group with no values comes back as NaN.
fn group_totals(frame: &DataFrame, key: &str, value: &str) -> Result<Vec<GroupTotal>> {
    let keys = text_values(frame.column(key)?.as_materialized_series())?;
    let values = numeric_values(frame.column(value)?.as_materialized_series())?;

    Ok(keys
        .into_iter()
        .zip(values)
        .filter_map(|(group, value)| {
            Some(GroupTotal {
                group: group?,
                value: value.unwrap_or(f64::NAN),
            })
        })
        .collect())
}
