//! # CGM Forecast
//!
//! Next-reading forecasting for continuous glucose monitor (CGM) series
//! paired with nutrition records.
//!
//! ## Features
//!
//! - Raw record ingestion from CSV with validation at the boundary
//! - Lag, rolling-window, time-of-day and nutrition features in a fixed,
//!   versioned layout
//! - Chronological train/test split (never shuffled)
//! - A feed-forward regressor (24-64-32-1, ReLU, Adam) trained per run
//! - MSE, RMSE, MAE, R², MAPE and accuracy, plus an actual-vs-predicted table
//! - Cancellable training with an optional timeout
//!
//! ## Quick Start
//!
//! ```no_run
//! use cgm_forecast::{DataLoader, ForecastPipeline, PipelineConfig};
//!
//! let records = DataLoader::from_csv("cgm.csv")?;
//! let pipeline = ForecastPipeline::new(PipelineConfig::default())?;
//! let outcome = pipeline.run(&records)?;
//!
//! println!("{}", outcome.evaluation.metrics);
//! println!("{}", outcome.report().to_json()?);
//! # Ok::<(), cgm_forecast::ForecastError>(())
//! ```

pub mod cancel;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod split;

// Re-export commonly used types
pub use crate::cancel::{CancellationToken, TrainingGuard};
pub use crate::config::{ModelConfig, PipelineConfig};
pub use crate::data::{DataLoader, FieldValue, GlucoseReading, RawRecord};
pub use crate::error::{ForecastError, Result};
pub use crate::features::{FeatureBuilder, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use crate::metrics::{Evaluation, ForecastMetrics, NumericWarning, WindowRow};
pub use crate::models::{FeedForwardRegressor, ForecastModel, TrainingReport};
pub use crate::pipeline::{forecast, ForecastPipeline, ForecastReport, PipelineOutcome};
pub use crate::split::{chronological_split, DatasetSplit};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
