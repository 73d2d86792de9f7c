//! Error types for the cgm_forecast crate

use glucose_math::MathError;
use thiserror::Error;

/// Custom error types for the cgm_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Too few rows to build a dataset
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Chronological split left one side empty
    #[error("Insufficient split: {0}")]
    InsufficientSplit(String),

    /// Feature matrix width or length disagrees with the model
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A raw record could not be turned into a reading
    #[error("Malformed record at row {row}: {reason}")]
    MalformedRecord {
        /// 1-based data row (header excluded)
        row: usize,
        /// What was wrong with the row
        reason: String,
    },

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Training was cancelled by the caller
    #[error("Training cancelled after {completed_epochs} epochs")]
    Cancelled {
        /// Epochs fully completed before the abort
        completed_epochs: usize,
    },

    /// Training ran past its deadline
    #[error("Training timed out after {elapsed_ms} ms")]
    Timeout {
        /// Time spent before the abort
        elapsed_ms: u128,
    },

    /// Error from series math
    #[error("Math error: {0}")]
    MathError(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the CSV reader
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error decoding a configuration document
    #[error("Config error: {0}")]
    ConfigError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl ForecastError {
    /// Shorthand for a malformed-record error
    pub fn malformed(row: usize, reason: impl Into<String>) -> Self {
        ForecastError::MalformedRecord {
            row,
            reason: reason.into(),
        }
    }
}
