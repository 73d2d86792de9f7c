//! Chronological train/test splitting

use crate::error::{ForecastError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT};
use chrono::NaiveDateTime;
use ndarray::{Array1, Array2};

/// Train and test partitions in their original order
#[derive(Debug, Clone)]
pub struct DatasetSplit {
    /// Training inputs, one row per feature vector
    pub train_x: Array2<f64>,
    /// Training targets
    pub train_y: Array1<f64>,
    /// Test inputs
    pub test_x: Array2<f64>,
    /// Test targets
    pub test_y: Array1<f64>,
    /// Timestamps of the training rows
    pub train_times: Vec<NaiveDateTime>,
    /// Timestamps of the test rows
    pub test_times: Vec<NaiveDateTime>,
}

impl DatasetSplit {
    /// Number of training rows
    pub fn train_len(&self) -> usize {
        self.train_y.len()
    }

    /// Number of test rows
    pub fn test_len(&self) -> usize {
        self.test_y.len()
    }
}

/// Stack feature vectors into an `n x FEATURE_COUNT` matrix
pub fn feature_matrix(features: &[FeatureVector]) -> Result<Array2<f64>> {
    let flat: Vec<f64> = features
        .iter()
        .flat_map(|feature| feature.values.iter().copied())
        .collect();

    Array2::from_shape_vec((features.len(), FEATURE_COUNT), flat)
        .map_err(|err| ForecastError::ShapeMismatch(err.to_string()))
}

/// Targets of the given feature vectors
pub fn target_vector(features: &[FeatureVector]) -> Array1<f64> {
    features.iter().map(|feature| feature.target).collect()
}

/// Split features chronologically: the first `floor(train_fraction * n)` rows
/// train, the rest test. Nothing is shuffled.
pub fn chronological_split(features: &[FeatureVector], train_fraction: f64) -> Result<DatasetSplit> {
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "Train fraction must be between 0 and 1, got {}",
            train_fraction
        )));
    }

    let split = (train_fraction * features.len() as f64).floor() as usize;
    if split == 0 || split >= features.len() {
        return Err(ForecastError::InsufficientSplit(format!(
            "Splitting {} rows at {} leaves an empty partition",
            features.len(),
            split
        )));
    }

    let (train, test) = features.split_at(split);
    let result = DatasetSplit {
        train_x: feature_matrix(train)?,
        train_y: target_vector(train),
        test_x: feature_matrix(test)?,
        test_y: target_vector(test),
        train_times: train.iter().map(|feature| feature.timestamp).collect(),
        test_times: test.iter().map(|feature| feature.timestamp).collect(),
    };

    if result.train_x.ncols() != result.test_x.ncols() {
        return Err(ForecastError::ShapeMismatch(format!(
            "Train width {} differs from test width {}",
            result.train_x.ncols(),
            result.test_x.ncols()
        )));
    }

    log::debug!(
        "Split {} rows into {} train and {} test",
        features.len(),
        result.train_len(),
        result.test_len()
    );
    Ok(result)
}
