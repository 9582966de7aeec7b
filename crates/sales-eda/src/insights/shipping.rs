//! Delivery time and shipping cost aggregates.
//!
//! Delivery days are whole days in `Ship_Date - Order_Date`, rounded down and
//! computed on a private copy of the relevant columns.

use super::{
    GroupTotal, MARKET, ORDER_DATE, PROFIT, SHIP_DATE, SHIP_MODE, SHIPPING_COST,
    ShippingModeStats, group_totals, grouped,
};
use crate::cleaner::converters::{MS_PER_DAY, timestamps_ms};
use crate::error::Result;
use crate::utils::{numeric_values, require_column, require_numeric_column, text_values};
use polars::prelude::*;

const DELIVERY_DAYS: &str = "Delivery_Days";

/// Mean delivery days, shipping cost and profit per `Ship_Mode`, ordered by mode.
pub fn shipping_efficiency(df: &DataFrame) -> Result<Vec<ShippingModeStats>> {
    require_column(df, SHIP_MODE)?;
    require_numeric_column(df, SHIPPING_COST)?;
    require_numeric_column(df, PROFIT)?;

    let frame = with_delivery_days(df, &[SHIP_MODE, SHIPPING_COST, PROFIT])?;
    let stats = grouped(
        &frame,
        &[SHIP_MODE],
        vec![
            col(DELIVERY_DAYS).mean(),
            col(SHIPPING_COST).mean(),
            col(PROFIT).mean(),
        ],
    )?;

    let modes = text_values(stats.column(SHIP_MODE)?.as_materialized_series())?;
    let days = numeric_values(stats.column(DELIVERY_DAYS)?.as_materialized_series())?;
    let cost = numeric_values(stats.column(SHIPPING_COST)?.as_materialized_series())?;
    let profit = numeric_values(stats.column(PROFIT)?.as_materialized_series())?;

    let mut result: Vec<ShippingModeStats> = modes
        .into_iter()
        .zip(days)
        .zip(cost.into_iter().zip(profit))
        .filter_map(|((mode, days), (cost, profit))| {
            Some(ShippingModeStats {
                ship_mode: mode?,
                avg_delivery_days: days.unwrap_or(f64::NAN),
                avg_shipping_cost: cost.unwrap_or(f64::NAN),
                avg_profit: profit.unwrap_or(f64::NAN),
            })
        })
        .collect();

    result.sort_by(|a, b| a.ship_mode.cmp(&b.ship_mode));
    Ok(result)
}

/// Mean delivery days per `Market`, ordered by market name.
pub fn shipping_time_by_market(df: &DataFrame) -> Result<Vec<GroupTotal>> {
    require_column(df, MARKET)?;

    let frame = with_delivery_days(df, &[MARKET])?;
    let stats = grouped(&frame, &[MARKET], vec![col(DELIVERY_DAYS).mean()])?;

    let mut totals = group_totals(&stats, MARKET, DELIVERY_DAYS)?;
    totals.sort_by(|a, b| a.group.cmp(&b.group));
    Ok(totals)
}

/// Whole days between order and shipment per row; missing when either date is.
///
/// Times of day count, so a shipment 2 hours after a late-evening order is
/// 0 days even though the calendar date changed.
pub fn delivery_days(df: &DataFrame) -> Result<Vec<Option<f64>>> {
    let ordered = timestamps_ms(require_column(df, ORDER_DATE)?.as_materialized_series())?;
    let shipped = timestamps_ms(require_column(df, SHIP_DATE)?.as_materialized_series())?;

    Ok(ordered
        .into_iter()
        .zip(shipped)
        .map(|(order, ship)| Some((ship? - order?).div_euclid(MS_PER_DAY) as f64))
        .collect())
}

/// Select `columns` from `df` and append a delivery days column.
fn with_delivery_days(df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let days = delivery_days(df)?;
    let mut frame = df.select(columns.iter().copied())?;
    frame.with_column(Series::new(DELIVERY_DAYS.into(), days))?;
    Ok(frame)
}
