//! Custom error types for the EDA routines.
//!
//! This module provides the error hierarchy using `thiserror`. Errors are
//! serializable so the CLI can embed them in its JSON output.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for analysis and adjustment routines.
#[derive(Error, Debug)]
pub enum EdaError {
    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A numeric operation was requested on a non-numeric column.
    #[error("Column '{column}' is not numeric (dtype: {dtype})")]
    NotNumeric { column: String, dtype: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Type conversion failed.
    #[error("Failed to convert column '{column}' to {target_type}: {reason}")]
    TypeConversionFailed {
        column: String,
        target_type: String,
        reason: String,
    },

    /// The dataset has no columns.
    #[error("Dataset has no columns")]
    EmptyDataset,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EdaError>,
    },
}

impl EdaError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EdaError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, preserved through [`EdaError::with_context`].
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NotNumeric { .. } => "NOT_NUMERIC",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::TypeConversionFailed { .. } => "TYPE_CONVERSION_FAILED",
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a missing-column lookup failure.
    pub fn is_column_not_found(&self) -> bool {
        match self {
            Self::ColumnNotFound(_) => true,
            Self::WithContext { source, .. } => source.is_column_not_found(),
            _ => false,
        }
    }

    /// Check if the dataset lacks a column, or has it with an unusable dtype.
    pub fn is_schema_mismatch(&self) -> bool {
        match self {
            Self::ColumnNotFound(_) | Self::NotNumeric { .. } | Self::TypeConversionFailed { .. } => {
                true
            }
            Self::WithContext { source, .. } => source.is_schema_mismatch(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for EdaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EdaError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for EDA operations.
pub type Result<T> = std::result::Result<T, EdaError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EdaError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            EdaError::ColumnNotFound("Sales".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            EdaError::NotNumeric {
                column: "Market".to_string(),
                dtype: "String".to_string()
            }
            .error_code(),
            "NOT_NUMERIC"
        );
        assert_eq!(EdaError::EmptyDataset.error_code(), "EMPTY_DATASET");
    }

    #[test]
    fn test_error_serialization() {
        let error = EdaError::ColumnNotFound("Profit".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("Profit"));
    }

    #[test]
    fn test_with_context() {
        let error =
            EdaError::ColumnNotFound("Sales".to_string()).with_context("While clipping outliers");
        assert!(error.to_string().contains("While clipping outliers"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
        assert!(error.is_column_not_found());
    }

    #[test]
    fn test_not_numeric_message() {
        let error = EdaError::NotNumeric {
            column: "Segment".to_string(),
            dtype: "String".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Column 'Segment' is not numeric (dtype: String)"
        );
        assert!(!error.is_column_not_found());
        assert!(error.is_schema_mismatch());
    }

    #[test]
    fn test_schema_mismatch() {
        assert!(EdaError::ColumnNotFound("Market".to_string())
            .with_context("Profit by market")
            .is_schema_mismatch());
        assert!(!EdaError::EmptyDataset.is_schema_mismatch());
        assert!(!EdaError::InvalidConfig("top_n".to_string()).is_schema_mismatch());
    }
}
