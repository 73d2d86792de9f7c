//! Forecasting models
//!
//! A [`ForecastModel`] is trained on a feature matrix and its targets, then
//! predicts one value per row. Models are plain values: build one per run,
//! train it, predict, drop it.

use crate::cancel::TrainingGuard;
use crate::error::Result;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod activation;
pub mod feed_forward;
pub mod layer;
pub mod optimizer;

pub use feed_forward::FeedForwardRegressor;

/// Summary of a training run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Mean training loss of each epoch
    pub epoch_losses: Vec<f64>,
    /// Optimizer steps taken
    pub steps: usize,
}

impl TrainingReport {
    /// Loss of the last epoch
    pub fn final_loss(&self) -> Option<f64> {
        self.epoch_losses.last().copied()
    }
}

/// Regression model with a train/predict contract
pub trait ForecastModel: Debug {
    /// Fit the model to `x` (one row per sample) and targets `y`
    fn train(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        guard: &TrainingGuard,
    ) -> Result<TrainingReport>;

    /// Predict one value per row of `x`
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Number of input columns the model expects
    fn input_dim(&self) -> usize;

    /// Name of the model
    fn name(&self) -> &str;
}
