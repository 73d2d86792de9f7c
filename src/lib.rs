//! # CGM Forecast Workspace
//!
//! Umbrella crate over the workspace members:
//!
//! - [`glucose_math`]: lags, trailing windows and time-of-day encodings
//! - [`cgm_forecast`]: ingestion, features, the regression model and evaluation
//!
//! ## Example
//!
//! ```
//! use cgm_forecast_workspace::prelude::*;
//!
//! let (sin, cos) = time_of_day_encoding(360);
//! assert!((sin - 1.0).abs() < 1e-12);
//! assert!(cos.abs() < 1e-12);
//!
//! let config = PipelineConfig::default();
//! assert_eq!(config.min_rows, 20);
//! assert_eq!(FEATURE_NAMES.len(), FEATURE_COUNT);
//! ```

pub use cgm_forecast;
pub use glucose_math;

/// Commonly used items from both crates
pub mod prelude {
    pub use cgm_forecast::{
        forecast, CancellationToken, DataLoader, ForecastError, ForecastPipeline, ForecastReport,
        PipelineConfig, RawRecord, FEATURE_COUNT, FEATURE_NAMES,
    };
    pub use glucose_math::{lag_or_first, time_of_day_encoding, window_mean, window_std};
}
