//! Activation functions

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Activation applied after a dense layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    ReLU,
    Linear,
}

impl Activation {
    /// Apply the activation function
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::ReLU => x.max(0.0),
            Activation::Linear => x,
        }
    }

    /// Derivative with respect to the pre-activation value
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            Activation::ReLU => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Linear => 1.0,
        }
    }

    /// Apply element-wise to a batch
    pub fn apply_batch(&self, z: &Array2<f64>) -> Array2<f64> {
        z.mapv(|x| self.apply(x))
    }

    /// Derivative element-wise over a batch
    pub fn derivative_batch(&self, z: &Array2<f64>) -> Array2<f64> {
        z.mapv(|x| self.derivative(x))
    }
}
