use crate::error::Result;
use crate::profiler::statistics::{quantile_sorted, sorted};
use crate::utils::numeric_values;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Quartiles and the outlier fences derived from them.
///
/// `lower = q1 - k * iqr`, `upper = q3 + k * iqr` with `k` the IQR multiplier
/// (1.5 by default).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// Compute bounds from ascending-sorted, non-missing values.
    ///
    /// Returns `None` when there are no values.
    pub fn from_sorted(sorted: &[f64], multiplier: f64) -> Option<Self> {
        let q1 = quantile_sorted(sorted, 0.25)?;
        let q3 = quantile_sorted(sorted, 0.75)?;
        let iqr = q3 - q1;

        Some(Self {
            q1,
            q3,
            iqr,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    /// Compute bounds from a numeric series, ignoring nulls and NaN.
    pub fn from_series(series: &Series, multiplier: f64) -> Result<Option<Self>> {
        let values = sorted(numeric_values(series)?.into_iter().flatten());
        Ok(Self::from_sorted(&values, multiplier))
    }

    /// Whether a value lies strictly outside the fences.
    #[inline]
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }

    /// Move a value to the nearest fence if it lies outside them.
    #[inline]
    pub fn clip(&self, value: f64) -> f64 {
        if value < self.lower {
            self.lower
        } else if value > self.upper {
            self.upper
        } else {
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_for_sales_example() {
        let series = Series::new("Sales".into(), &[10.0, 12.0, 11.0, 13.0, 1000.0]);
        let bounds = IqrBounds::from_series(&series, 1.5).unwrap().unwrap();

        assert_eq!(bounds.q1, 11.0);
        assert_eq!(bounds.q3, 13.0);
        assert_eq!(bounds.iqr, 2.0);
        assert_eq!(bounds.lower, 8.0);
        assert_eq!(bounds.upper, 16.0);
        assert!(bounds.is_outlier(1000.0));
        assert!(!bounds.is_outlier(16.0));
    }

    #[test]
    fn test_bounds_ignore_nulls() {
        let series = Series::new(
            "v".into(),
            &[Some(10.0), None, Some(12.0), Some(11.0), Some(13.0), Some(1000.0)],
        );
        let bounds = IqrBounds::from_series(&series, 1.5).unwrap().unwrap();
        assert_eq!(bounds.q1, 11.0);
        assert_eq!(bounds.q3, 13.0);
    }

    #[test]
    fn test_bounds_all_null() {
        let series = Series::new("v".into(), &[None::<f64>, None]);
        assert!(IqrBounds::from_series(&series, 1.5).unwrap().is_none());
    }

    #[test]
    fn test_bounds_deterministic() {
        let series = Series::new("v".into(), &[3i64, 9, 1, 7, 5, 200, -40]);
        let first = IqrBounds::from_series(&series, 1.5).unwrap();
        let second = IqrBounds::from_series(&series, 1.5).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_clip() {
        let bounds = IqrBounds::from_sorted(&[10.0, 11.0, 12.0, 13.0, 1000.0], 1.5).unwrap();
        assert_eq!(bounds.clip(1000.0), 16.0);
        assert_eq!(bounds.clip(-5.0), 8.0);
        assert_eq!(bounds.clip(12.5), 12.5);
    }

    #[test]
    fn test_multiplier_widens_fences() {
        let bounds = IqrBounds::from_sorted(&[10.0, 11.0, 12.0, 13.0, 1000.0], 3.0).unwrap();
        assert_eq!(bounds.lower, 5.0);
        assert_eq!(bounds.upper, 19.0);
    }
}
