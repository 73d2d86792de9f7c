//! # Glucose Math
//!
//! Numeric building blocks for glucose time series feature engineering.
//! This crate provides the small, well-defined calculations the forecasting
//! pipeline composes into feature vectors:
//!
//! - Lag lookups with a first-value fallback at the start of a series
//! - Trailing (half-open) windows with rolling mean and standard deviation
//! - Cyclical time-of-day encodings

use thiserror::Error;

pub mod cyclical;
pub mod lags;
pub mod rolling;

pub use cyclical::{time_of_day_encoding, MINUTES_PER_DAY};
pub use lags::lag_or_first;
pub use rolling::{trailing_window, window_mean, window_std, RollingSummary};

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
