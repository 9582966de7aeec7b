//! Sales and profit aggregates.

use super::{
    GroupTotal, MARKET, MarketSegmentStats, MonthlyTotal, ORDER_DATE, PROFIT, SALES, SEGMENT,
    group_totals, grouped,
};
use crate::cleaner::converters::{date_days, month_key};
use crate::error::Result;
use crate::utils::{numeric_values, require_column, require_numeric_column, text_values};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

/// Total `Sales` per calendar month of `Order_Date`, oldest month first.
///
/// Rows without a usable order date are left out. A month whose sales are
/// all missing totals 0.
pub fn monthly_sales(df: &DataFrame) -> Result<Vec<MonthlyTotal>> {
    let days = date_days(require_column(df, ORDER_DATE)?.as_materialized_series())?;
    let sales = numeric_values(require_numeric_column(df, SALES)?)?;

    let mut months: BTreeMap<String, f64> = BTreeMap::new();
    for (day, amount) in days.into_iter().zip(sales) {
        let Some(month) = day.and_then(month_key) else {
            continue;
        };
        *months.entry(month).or_insert(0.0) += amount.unwrap_or(0.0);
    }

    debug!("Monthly sales span {} months", months.len());
    Ok(months
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect())
}

/// Total `Sales` per value of `group`, largest first.
pub fn sales_by_group(df: &DataFrame, group: &str) -> Result<Vec<GroupTotal>> {
    require_column(df, group)?;
    require_numeric_column(df, SALES)?;

    let frame = grouped(df, &[group], vec![col(SALES).sum()])?;
    let mut totals = group_totals(&frame, group, SALES)?;
    totals.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.group.cmp(&b.group)));
    Ok(totals)
}

/// Total `Profit` per `Market`, ordered by market name.
pub fn profit_by_market(df: &DataFrame) -> Result<Vec<GroupTotal>> {
    require_column(df, MARKET)?;
    require_numeric_column(df, PROFIT)?;

    let frame = grouped(df, &[MARKET], vec![col(PROFIT).sum()])?;
    let mut totals = group_totals(&frame, MARKET, PROFIT)?;
    totals.sort_by(|a, b| a.group.cmp(&b.group));
    Ok(totals)
}

/// Mean `Sales` and mean `Profit` for every (`Market`, `Segment`) pair.
pub fn market_segment_comparison(df: &DataFrame) -> Result<Vec<MarketSegmentStats>> {
    require_column(df, MARKET)?;
    require_column(df, SEGMENT)?;
    require_numeric_column(df, SALES)?;
    require_numeric_column(df, PROFIT)?;

    let frame = grouped(
        df,
        &[MARKET, SEGMENT],
        vec![col(SALES).mean(), col(PROFIT).mean()],
    )?;

    let markets = text_values(frame.column(MARKET)?.as_materialized_series())?;
    let segments = text_values(frame.column(SEGMENT)?.as_materialized_series())?;
    let sales = numeric_values(frame.column(SALES)?.as_materialized_series())?;
    let profit = numeric_values(frame.column(PROFIT)?.as_materialized_series())?;

    let mut stats: Vec<MarketSegmentStats> = markets
        .into_iter()
        .zip(segments)
        .zip(sales.into_iter().zip(profit))
        .filter_map(|((market, segment), (sales, profit))| {
            Some(MarketSegmentStats {
                market: market?,
                segment: segment?,
                mean_sales: sales.unwrap_or(f64::NAN),
                mean_profit: profit.unwrap_or(f64::NAN),
            })
        })
        .collect();

    stats.sort_by(|a, b| a.market.cmp(&b.market).then_with(|| a.segment.cmp(&b.segment)));
    Ok(stats)
}
