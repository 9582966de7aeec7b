//! Configuration for the EDA routines.
//!
//! Uses the builder pattern so callers only override what they need.

use serde::{Deserialize, Serialize};

/// Columns parsed as dates by the type conversion step.
pub const DEFAULT_DATE_COLUMNS: [&str; 2] = ["Order_Date", "Ship_Date"];

/// Economic indicator columns coerced to numbers by the type conversion step.
pub const DEFAULT_NUMERIC_COLUMNS: [&str; 4] = [
    "Inflation(%)",
    "Exports_GDP(%)",
    "Imports_GDP(%)",
    "GDP_Growth(%)",
];

/// Configuration shared by the reporting and adjustment routines.
///
/// Use [`AnalysisConfig::builder()`] to create a configuration with a fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use sales_eda::config::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .null_threshold(25.0)
///     .iqr_multiplier(3.0)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Null percentage (0 - 100) above which a column is classified "high-null".
    /// A column exactly at the threshold is "low-null".
    /// Default: 10.0
    pub null_threshold: f64,

    /// Multiplier applied to the IQR when computing outlier bounds.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Columns parsed into dates when present.
    /// Default: ["Order_Date", "Ship_Date"]
    pub date_columns: Vec<String>,

    /// Columns coerced to Float64 when present.
    /// Default: the four economic indicator columns
    pub numeric_columns: Vec<String>,

    /// Number of random rows shown in the dataset overview.
    /// Default: 4
    pub sample_size: usize,

    /// Seed for the overview row sample, so reports are reproducible.
    /// Default: 42
    pub sample_seed: u64,

    /// Number of most frequent values kept per categorical column in chart data.
    /// Default: 10
    pub top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            null_threshold: 10.0,
            iqr_multiplier: 1.5,
            date_columns: DEFAULT_DATE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            numeric_columns: DEFAULT_NUMERIC_COLUMNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            sample_size: 4,
            sample_seed: 42,
            top_n: 10,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=100.0).contains(&self.null_threshold) {
            return Err(ConfigValidationError::InvalidThreshold(self.null_threshold));
        }

        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        if self.top_n == 0 {
            return Err(ConfigValidationError::InvalidTopN(self.top_n));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid null threshold: {0} (must be between 0.0 and 100.0)")]
    InvalidThreshold(f64),

    #[error("Invalid IQR multiplier: {0} (must be a positive finite number)")]
    InvalidIqrMultiplier(f64),

    #[error("Invalid top_n: {0} (must be at least 1)")]
    InvalidTopN(usize),
}

impl From<ConfigValidationError> for crate::error::EdaError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::EdaError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    null_threshold: Option<f64>,
    iqr_multiplier: Option<f64>,
    date_columns: Option<Vec<String>>,
    numeric_columns: Option<Vec<String>>,
    sample_size: Option<usize>,
    sample_seed: Option<u64>,
    top_n: Option<usize>,
}

impl AnalysisConfigBuilder {
    /// Set the null percentage threshold (0 - 100) for the high/low split.
    pub fn null_threshold(mut self, threshold: f64) -> Self {
        self.null_threshold = Some(threshold);
        self
    }

    /// Set the IQR multiplier used for outlier bounds.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the columns parsed as dates.
    pub fn date_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the columns coerced to numbers.
    pub fn numeric_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set how many rows the overview samples.
    pub fn sample_size(mut self, size: usize) -> Self {
        self.sample_size = Some(size);
        self
    }

    /// Set the overview sampling seed.
    pub fn sample_seed(mut self, seed: u64) -> Self {
        self.sample_seed = Some(seed);
        self
    }

    /// Set how many top values are kept per categorical column.
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            null_threshold: self.null_threshold.unwrap_or(defaults.null_threshold),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            date_columns: self.date_columns.unwrap_or(defaults.date_columns),
            numeric_columns: self.numeric_columns.unwrap_or(defaults.numeric_columns),
            sample_size: self.sample_size.unwrap_or(defaults.sample_size),
            sample_seed: self.sample_seed.unwrap_or(defaults.sample_seed),
            top_n: self.top_n.unwrap_or(defaults.top_n),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.null_threshold, 10.0);
        assert_eq!(config.iqr_multiplier, 1.5);
        assert_eq!(config.date_columns, vec!["Order_Date", "Ship_Date"]);
        assert_eq!(config.numeric_columns.len(), 4);
        assert_eq!(config.sample_size, 4);
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn test_builder_defaults() {
        let config = AnalysisConfig::builder().build().unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AnalysisConfig::builder()
            .null_threshold(25.0)
            .iqr_multiplier(3.0)
            .date_columns(["Created"])
            .numeric_columns(vec!["Rate".to_string()])
            .sample_size(8)
            .top_n(5)
            .build()
            .unwrap();

        assert_eq!(config.null_threshold, 25.0);
        assert_eq!(config.iqr_multiplier, 3.0);
        assert_eq!(config.date_columns, vec!["Created"]);
        assert_eq!(config.numeric_columns, vec!["Rate"]);
        assert_eq!(config.sample_size, 8);
        assert_eq!(config.top_n, 5);
    }

    #[test]
    fn test_validation_invalid_threshold() {
        let result = AnalysisConfig::builder().null_threshold(150.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidThreshold(_)
        ));
    }

    #[test]
    fn test_validation_invalid_multiplier() {
        let result = AnalysisConfig::builder().iqr_multiplier(0.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidIqrMultiplier(_)
        ));

        let result = AnalysisConfig::builder().iqr_multiplier(f64::NAN).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_invalid_top_n() {
        let result = AnalysisConfig::builder().top_n(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidTopN(0)
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "null_threshold": 5.0,
            "iqr_multiplier": 2.0,
            "date_columns": ["Order_Date"],
            "numeric_columns": [],
            "sample_size": 2,
            "sample_seed": 7,
            "top_n": 3
        }"#;

        let config: AnalysisConfig = serde_json::from_str(json).expect("valid config json");
        assert_eq!(config.null_threshold, 5.0);
        assert_eq!(config.iqr_multiplier, 2.0);
        assert_eq!(config.date_columns, vec!["Order_Date"]);
        assert!(config.numeric_columns.is_empty());
        assert_eq!(config.sample_seed, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_from_json() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"null_threshold": 25.0}"#).expect("partial config json");
        assert_eq!(config.null_threshold, 25.0);
        assert_eq!(config.iqr_multiplier, 1.5);
        assert_eq!(config.top_n, 10);
    }
}
