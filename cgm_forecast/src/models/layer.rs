//! Dense (fully connected) layer
//!
//! A dense layer computes `activation(input · weights + biases)` for a batch
//! of rows at once. Weights are `input_size x output_size`.

use super::activation::Activation;
use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::distributions::Uniform;
use rand::Rng;

/// Gradients of the loss with respect to a layer's parameters
#[derive(Debug, Clone)]
pub struct LayerGradients {
    /// Weight gradient, same shape as the weights
    pub weights: Array2<f64>,
    /// Bias gradient, same length as the biases
    pub biases: Array1<f64>,
}

/// Dense layer with weights, biases and an activation
#[derive(Debug, Clone)]
pub struct DenseLayer {
    weights: Array2<f64>,
    biases: Array1<f64>,
    activation: Activation,
}

impl DenseLayer {
    /// Create a layer with Glorot-uniform weights and zero biases
    pub fn new<R: Rng>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        let limit = (6.0 / (input_size + output_size) as f64).sqrt();
        let distribution = Uniform::new_inclusive(-limit, limit);
        let weights = Array2::from_shape_fn((input_size, output_size), |_| rng.sample(&distribution));

        Self {
            weights,
            biases: Array1::zeros(output_size),
            activation,
        }
    }

    /// Create a layer from explicit parameters
    pub fn from_parts(
        weights: Array2<f64>,
        biases: Array1<f64>,
        activation: Activation,
    ) -> Result<Self> {
        if weights.ncols() != biases.len() {
            return Err(ForecastError::ShapeMismatch(format!(
                "Weights have {} outputs but biases have {}",
                weights.ncols(),
                biases.len()
            )));
        }
        Ok(Self {
            weights,
            biases,
            activation,
        })
    }

    /// Number of inputs
    pub fn input_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of outputs
    pub fn output_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Activation function
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Weight matrix
    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Bias vector
    pub fn biases(&self) -> &Array1<f64> {
        &self.biases
    }

    pub(crate) fn parameters_mut(&mut self) -> (&mut Array2<f64>, &mut Array1<f64>) {
        (&mut self.weights, &mut self.biases)
    }

    /// Number of trainable parameters
    pub fn num_parameters(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    /// Forward pass, returning `(pre_activation, output)`
    pub fn forward(&self, input: &Array2<f64>) -> (Array2<f64>, Array2<f64>) {
        let mut z = input.dot(&self.weights);
        z += &self.biases;
        let output = self.activation.apply_batch(&z);
        (z, output)
    }

    /// Backward pass for the batch that produced `z` from `input`.
    ///
    /// Returns the parameter gradients and the gradient with respect to the
    /// layer input.
    pub fn backward(
        &self,
        input: &Array2<f64>,
        z: &Array2<f64>,
        output_gradient: &Array2<f64>,
    ) -> (LayerGradients, Array2<f64>) {
        let delta = output_gradient * &self.activation.derivative_batch(z);

        let gradients = LayerGradients {
            weights: input.t().dot(&delta),
            biases: delta.sum_axis(Axis(0)),
        };
        let input_gradient = delta.dot(&self.weights.t());

        (gradients, input_gradient)
    }
}
