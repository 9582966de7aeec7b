//! Type conversion functions for the conversion step.
//!
//! Unparseable entries become null instead of failing the conversion.

use crate::error::{EdaError, Result};
use crate::utils::parse_numeric_string;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

pub(crate) const MS_PER_DAY: i64 = 86_400_000;

/// Date-only formats tried in order.
///
/// Ambiguous dates such as `03/04/2023` are read month-first; the day-first
/// forms only match when the leading field cannot be a month.
pub const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%d/%m/%Y", "%d-%m-%Y",
];

/// Date-time formats tried in order, with the same month-first preference.
pub const DATETIME_FORMATS: [&str; 9] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m-%d-%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
];

/// Parse a timestamp in any of the accepted formats.
///
/// Date-only text is placed at midnight.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        })
}

/// Parse a date in any of the accepted formats, dropping any time of day.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    parse_datetime(s).map(|dt| dt.date())
}

fn unix_epoch() -> NaiveDate {
    NaiveDate::default()
}

/// Days since 1970-01-01, the physical representation of a polars `Date`.
pub fn days_since_epoch(date: NaiveDate) -> i32 {
    date.signed_duration_since(unix_epoch()).num_days() as i32
}

/// Milliseconds since 1970-01-01T00:00:00, the physical value of a
/// millisecond `Datetime`.
pub fn millis_since_epoch(dt: NaiveDateTime) -> i64 {
    dt.signed_duration_since(NaiveDateTime::default())
        .num_milliseconds()
}

fn is_midnight(dt: &NaiveDateTime) -> bool {
    dt.date().and_hms_opt(0, 0, 0).as_ref() == Some(dt)
}

/// Convert a string series to `Float64`, nulling anything unparseable.
pub(crate) fn string_to_float(series: &Series) -> Result<Series> {
    let str_series = series.str()?;
    let values: Vec<Option<f64>> = str_series
        .into_iter()
        .map(|opt| opt.and_then(parse_numeric_string))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

/// Convert a string series to a temporal series, nulling anything unparseable.
///
/// The result is a `Date` when every parsed entry falls on midnight, and a
/// millisecond `Datetime` otherwise so that times of day survive.
pub(crate) fn string_to_temporal(series: &Series) -> Result<Series> {
    let str_series = series.str()?;
    let parsed: Vec<Option<NaiveDateTime>> = str_series
        .into_iter()
        .map(|opt| opt.and_then(parse_datetime))
        .collect();

    if parsed.iter().flatten().all(is_midnight) {
        let days: Vec<Option<i32>> = parsed
            .iter()
            .map(|dt| dt.map(|dt| days_since_epoch(dt.date())))
            .collect();
        return Ok(Series::new(series.name().clone(), days).cast(&DataType::Date)?);
    }

    let millis: Vec<Option<i64>> = parsed.iter().map(|dt| dt.map(millis_since_epoch)).collect();
    Ok(Series::new(series.name().clone(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?)
}

/// Per-row timestamps in milliseconds since epoch of a date-like series.
///
/// Accepts `Date`, `Datetime` and text columns; text is parsed with
/// [`parse_datetime`], unparseable entries become `None`.
pub(crate) fn timestamps_ms(series: &Series) -> Result<Vec<Option<i64>>> {
    match series.dtype() {
        DataType::Date => {
            let physical = series.cast(&DataType::Int32)?;
            Ok(physical
                .i32()?
                .into_iter()
                .map(|days| days.map(|d| i64::from(d) * MS_PER_DAY))
                .collect())
        }
        DataType::Datetime(unit, _) => {
            let per_ms = match unit {
                TimeUnit::Nanoseconds => 1_000_000,
                TimeUnit::Microseconds => 1_000,
                TimeUnit::Milliseconds => 1,
            };
            let physical = series.cast(&DataType::Int64)?;
            Ok(physical
                .i64()?
                .into_iter()
                .map(|v| v.map(|v| v.div_euclid(per_ms)))
                .collect())
        }
        DataType::String => Ok(series
            .str()?
            .into_iter()
            .map(|opt| opt.and_then(parse_datetime).map(millis_since_epoch))
            .collect()),
        other => Err(EdaError::TypeConversionFailed {
            column: series.name().to_string(),
            target_type: "date".to_string(),
            reason: format!("unsupported dtype {}", other),
        }),
    }
}

/// Per-row day numbers (days since epoch) of a date-like series.
pub(crate) fn date_days(series: &Series) -> Result<Vec<Option<i32>>> {
    Ok(timestamps_ms(series)?
        .into_iter()
        .map(|ms| ms.map(|ms| ms.div_euclid(MS_PER_DAY) as i32))
        .collect())
}

/// Render a day number as `YYYY-MM`.
pub(crate) fn month_key(days: i32) -> Option<String> {
    unix_epoch()
        .checked_add_signed(chrono::Duration::days(days as i64))
        .map(|date| date.format("%Y-%m").to_string())
}
