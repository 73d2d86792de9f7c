//! Feed-forward regression network
//!
//! ReLU hidden layers (64 and 32 units by default) followed by a single
//! linear output, trained on mean squared error with Adam. Inputs are used
//! as given; no scaling is applied.

use super::activation::Activation;
use super::layer::{DenseLayer, LayerGradients};
use super::optimizer::Adam;
use super::{ForecastModel, TrainingReport};
use crate::cancel::TrainingGuard;
use crate::config::ModelConfig;
use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Dense ReLU network with one linear output
#[derive(Debug, Clone)]
pub struct FeedForwardRegressor {
    name: String,
    config: ModelConfig,
    input_dim: usize,
    layers: Vec<DenseLayer>,
    rng: StdRng,
    trained: bool,
}

impl FeedForwardRegressor {
    /// Build a network for `input_dim` inputs with the default settings
    pub fn new(input_dim: usize) -> Result<Self> {
        Self::configure(input_dim, &ModelConfig::default())
    }

    /// Build a network for `input_dim` inputs
    pub fn configure(input_dim: usize, config: &ModelConfig) -> Result<Self> {
        if input_dim == 0 {
            return Err(ForecastError::InvalidParameter(
                "Input dimension must be greater than zero".to_string(),
            ));
        }
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut layers = Vec::with_capacity(config.hidden_layers.len() + 1);
        let mut previous = input_dim;
        for &width in &config.hidden_layers {
            layers.push(DenseLayer::new(previous, width, Activation::ReLU, &mut rng));
            previous = width;
        }
        layers.push(DenseLayer::new(previous, 1, Activation::Linear, &mut rng));

        let shape: Vec<String> = std::iter::once(input_dim)
            .chain(layers.iter().map(DenseLayer::output_size))
            .map(|size| size.to_string())
            .collect();

        Ok(Self {
            name: format!("Feed-forward regressor ({})", shape.join("-")),
            config: config.clone(),
            input_dim,
            layers,
            rng,
            trained: false,
        })
    }

    /// Layers, input side first
    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    /// Training settings
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Whether `train` has completed
    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// Total trainable parameters
    pub fn num_parameters(&self) -> usize {
        self.layers.iter().map(DenseLayer::num_parameters).sum()
    }

    fn check_width(&self, x: &Array2<f64>) -> Result<()> {
        if x.ncols() != self.input_dim {
            return Err(ForecastError::ShapeMismatch(format!(
                "Model expects {} input columns, got {}",
                self.input_dim,
                x.ncols()
            )));
        }
        Ok(())
    }

    fn forward(&self, x: &Array2<f64>) -> Array2<f64> {
        self.layers
            .iter()
            .fold(x.to_owned(), |current, layer| layer.forward(&current).1)
    }

    /// One forward/backward pass and optimizer step; returns the batch MSE
    fn train_batch(&mut self, optimizer: &mut Adam, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let mut inputs = Vec::with_capacity(self.layers.len());
        let mut pre_activations = Vec::with_capacity(self.layers.len());
        let mut current = x.clone();
        for layer in &self.layers {
            let (z, output) = layer.forward(&current);
            inputs.push(current);
            pre_activations.push(z);
            current = output;
        }

        let n = y.len() as f64;
        let residual = &current.column(0) - y;
        let loss = residual.mapv(|r| r * r).sum() / n;

        let mut gradient = (residual * (2.0 / n)).insert_axis(Axis(1));
        let mut gradients: Vec<LayerGradients> = Vec::with_capacity(self.layers.len());
        for (index, layer) in self.layers.iter().enumerate().rev() {
            let (layer_gradients, input_gradient) =
                layer.backward(&inputs[index], &pre_activations[index], &gradient);
            gradients.push(layer_gradients);
            gradient = input_gradient;
        }
        gradients.reverse();

        optimizer.step(&mut self.layers, &gradients)?;
        Ok(loss)
    }
}

impl ForecastModel for FeedForwardRegressor {
    fn train(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        guard: &TrainingGuard,
    ) -> Result<TrainingReport> {
        self.check_width(x)?;
        if x.nrows() != y.len() {
            return Err(ForecastError::ShapeMismatch(format!(
                "Got {} input rows but {} targets",
                x.nrows(),
                y.len()
            )));
        }
        if y.is_empty() {
            return Err(ForecastError::InsufficientData(
                "Cannot train on an empty dataset".to_string(),
            ));
        }

        let mut optimizer = Adam::new(self.config.learning_rate);
        let mut order: Vec<usize> = (0..y.len()).collect();
        let mut epoch_losses = Vec::with_capacity(self.config.epochs);

        for epoch in 0..self.config.epochs {
            if self.config.shuffle {
                order.shuffle(&mut self.rng);
            }

            let mut loss_sum = 0.0;
            for batch in order.chunks(self.config.batch_size) {
                guard.check(epoch)?;
                let batch_x = x.select(Axis(0), batch);
                let batch_y = y.select(Axis(0), batch);
                loss_sum += self.train_batch(&mut optimizer, &batch_x, &batch_y)? * batch.len() as f64;
            }

            let epoch_loss = loss_sum / y.len() as f64;
            log::debug!(
                "Epoch {}/{}: loss {:.4}",
                epoch + 1,
                self.config.epochs,
                epoch_loss
            );
            epoch_losses.push(epoch_loss);
        }

        self.trained = true;
        let report = TrainingReport {
            epoch_losses,
            steps: optimizer.steps(),
        };
        log::info!(
            "Trained {} on {} rows: {} steps, final loss {:.4}",
            self.name,
            y.len(),
            report.steps,
            report.final_loss().unwrap_or(f64::NAN)
        );
        Ok(report)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.trained {
            return Err(ForecastError::ShapeMismatch(
                "Model has no trained weights; call train before predict".to_string(),
            ));
        }
        self.check_width(x)?;

        Ok(self.forward(x).column(0).to_owned())
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn name(&self) -> &str {
        &self.name
    }
}
