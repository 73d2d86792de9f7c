//! Adam optimizer (Adaptive Moment Estimation)

use super::layer::{DenseLayer, LayerGradients};
use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2, Zip};

#[derive(Debug, Clone)]
struct Moments {
    m_w: Array2<f64>,
    v_w: Array2<f64>,
    m_b: Array1<f64>,
    v_b: Array1<f64>,
}

impl Moments {
    fn zeros_like(layer: &DenseLayer) -> Self {
        let dim = layer.weights().dim();
        let len = layer.biases().len();
        Self {
            m_w: Array2::zeros(dim),
            v_w: Array2::zeros(dim),
            m_b: Array1::zeros(len),
            v_b: Array1::zeros(len),
        }
    }
}

/// Adam with bias-corrected first and second moment estimates.
///
/// One step counter is shared by all layers; moment buffers are kept per
/// layer and created on the first step.
#[derive(Debug, Clone)]
pub struct Adam {
    /// Step size
    pub learning_rate: f64,
    /// Decay of the first moment estimate
    pub beta1: f64,
    /// Decay of the second moment estimate
    pub beta2: f64,
    /// Added to the denominator to avoid division by zero
    pub epsilon: f64,
    t: i32,
    moments: Vec<Moments>,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            t: 0,
            moments: Vec::new(),
        }
    }

    /// Number of steps taken so far
    pub fn steps(&self) -> usize {
        self.t as usize
    }

    /// Apply one update to every layer
    pub fn step(&mut self, layers: &mut [DenseLayer], gradients: &[LayerGradients]) -> Result<()> {
        if layers.len() != gradients.len() {
            return Err(ForecastError::ShapeMismatch(format!(
                "Got gradients for {} layers, network has {}",
                gradients.len(),
                layers.len()
            )));
        }
        if self.moments.len() != layers.len() {
            self.moments = layers.iter().map(Moments::zeros_like).collect();
        }

        self.t += 1;
        let (lr, beta1, beta2, eps) = (self.learning_rate, self.beta1, self.beta2, self.epsilon);
        let correction1 = 1.0 - beta1.powi(self.t);
        let correction2 = 1.0 - beta2.powi(self.t);

        for ((layer, gradient), moments) in layers
            .iter_mut()
            .zip(gradients)
            .zip(self.moments.iter_mut())
        {
            if gradient.weights.dim() != moments.m_w.dim() || gradient.biases.len() != moments.m_b.len() {
                return Err(ForecastError::ShapeMismatch(
                    "Gradient shape does not match layer parameters".to_string(),
                ));
            }

            moments
                .m_w
                .zip_mut_with(&gradient.weights, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
            moments
                .v_w
                .zip_mut_with(&gradient.weights, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);
            moments
                .m_b
                .zip_mut_with(&gradient.biases, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
            moments
                .v_b
                .zip_mut_with(&gradient.biases, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

            let (weights, biases) = layer.parameters_mut();
            Zip::from(weights)
                .and(&moments.m_w)
                .and(&moments.v_w)
                .for_each(|w, &m, &v| {
                    *w -= lr * (m / correction1) / ((v / correction2).sqrt() + eps);
                });
            Zip::from(biases)
                .and(&moments.m_b)
                .and(&moments.v_b)
                .for_each(|b, &m, &v| {
                    *b -= lr * (m / correction1) / ((v / correction2).sqrt() + eps);
                });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activation::Activation;
    use ndarray::array;

    #[test]
    fn test_first_step_moves_by_learning_rate() {
        // With bias correction the first Adam step is lr * sign(g)
        let mut layers = vec![DenseLayer::from_parts(
            array![[1.0, 1.0]],
            array![0.0, 0.0],
            Activation::Linear,
        )
        .unwrap()];
        let gradients = vec![LayerGradients {
            weights: array![[0.5, -2.0]],
            biases: array![1.0, 0.0],
        }];

        let mut adam = Adam::new(0.01);
        adam.step(&mut layers, &gradients).unwrap();

        let weights = layers[0].weights();
        assert!((weights[[0, 0]] - 0.99).abs() < 1e-6);
        assert!((weights[[0, 1]] - 1.01).abs() < 1e-6);
        assert!((layers[0].biases()[0] + 0.01).abs() < 1e-6);
        assert_eq!(layers[0].biases()[1], 0.0);
        assert_eq!(adam.steps(), 1);
    }

    #[test]
    fn test_layer_count_mismatch() {
        let mut layers = vec![DenseLayer::from_parts(array![[1.0]], array![0.0], Activation::Linear).unwrap()];
        let mut adam = Adam::new(0.01);
        assert!(adam.step(&mut layers, &[]).is_err());
    }
}
