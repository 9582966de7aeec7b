//! Data quality module.
//!
//! Missing-value reporting: per-column null counts and percentages, and the
//! high/low classification of columns with nulls against a threshold.

mod nulls;

pub use nulls::NullAnalyzer;
