//! Pipeline and model configuration
//!
//! Every field has a default, so a configuration document only needs to name
//! what it changes:
//!
//! ```
//! use cgm_forecast::config::PipelineConfig;
//!
//! let config = PipelineConfig::from_json_str(r#"{ "model": { "epochs": 10 } }"#).unwrap();
//! assert_eq!(config.model.epochs, 10);
//! assert_eq!(config.model.batch_size, 32);
//! assert_eq!(config.train_fraction, 0.8);
//! ```

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Feed-forward model and training settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Widths of the ReLU hidden layers, input side first
    pub hidden_layers: Vec<usize>,
    /// Adam learning rate
    pub learning_rate: f64,
    /// Full passes over the training rows
    pub epochs: usize,
    /// Rows per mini-batch
    pub batch_size: usize,
    /// Shuffle batch order each epoch
    pub shuffle: bool,
    /// Seed for weight initialisation and shuffling
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            hidden_layers: vec![64, 32],
            learning_rate: 0.01,
            epochs: 50,
            batch_size: 32,
            shuffle: true,
            seed: 42,
        }
    }
}

impl ModelConfig {
    /// Check the settings can drive a training run
    pub fn validate(&self) -> Result<()> {
        if self.hidden_layers.iter().any(|&width| width == 0) {
            return Err(ForecastError::InvalidParameter(
                "Hidden layer widths must be positive".to_string(),
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "Learning rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        if self.epochs == 0 {
            return Err(ForecastError::InvalidParameter(
                "Epochs must be greater than zero".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(ForecastError::InvalidParameter(
                "Batch size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// End-to-end pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum number of raw rows accepted
    pub min_rows: usize,
    /// Leading feature rows dropped after building
    pub warmup: usize,
    /// Share of feature rows used for training
    pub train_fraction: f64,
    /// Rows in the actual-vs-predicted table
    pub window_rows: usize,
    /// Abort training after this many seconds
    pub timeout_secs: Option<u64>,
    /// Model settings
    pub model: ModelConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_rows: 20,
            warmup: 12,
            train_fraction: 0.8,
            window_rows: 16,
            timeout_secs: None,
            model: ModelConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Training timeout as a duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Check the settings describe a runnable pipeline
    pub fn validate(&self) -> Result<()> {
        if self.min_rows == 0 {
            return Err(ForecastError::InvalidParameter(
                "Minimum row count must be greater than zero".to_string(),
            ));
        }
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Train fraction must be between 0 and 1, got {}",
                self.train_fraction
            )));
        }
        if self.window_rows == 0 {
            return Err(ForecastError::InvalidParameter(
                "Window table must hold at least one row".to_string(),
            ));
        }
        self.model.validate()
    }
}
