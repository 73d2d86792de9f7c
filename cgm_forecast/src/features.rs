//! Feature engineering for next-reading regression
//!
//! Every reading becomes a fixed-width vector of [`FEATURE_COUNT`] values laid
//! out exactly as [`FEATURE_NAMES`]:
//!
//! - CGM lags at [`LAGS`] steps, falling back to the first reading
//! - Trailing rolling means over 4, 8 and 12 readings, and sample standard
//!   deviations over 4 and 8
//! - `sin`/`cos` of the time of day
//! - The ten nutrition columns
//!
//! The target is the next CGM reading (the current one for the last row).
//! The first `warmup` vectors are dropped, since their longest lag still
//! points before the start of the series.

use crate::data::{validate_records, GlucoseReading, RawRecord};
use crate::error::{ForecastError, Result};
use chrono::NaiveDateTime;
use glucose_math::{lag_or_first, time_of_day_encoding, RollingSummary};
use serde::{Deserialize, Serialize};

/// Bumped whenever [`FEATURE_NAMES`] changes
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// Number of model inputs
pub const FEATURE_COUNT: usize = 24;

/// Lag offsets, in feature order
pub const LAGS: [usize; 7] = [1, 2, 3, 4, 6, 8, 12];

/// Windows for the rolling means, in feature order
pub const MEAN_WINDOWS: [usize; 3] = [4, 8, 12];

/// Windows for the rolling standard deviations, in feature order
pub const STD_WINDOWS: [usize; 2] = [4, 8];

/// Model input layout shared by the builder and the model
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "cgm_lag_1",
    "cgm_lag_2",
    "cgm_lag_3",
    "cgm_lag_4",
    "cgm_lag_6",
    "cgm_lag_8",
    "cgm_lag_12",
    "cgm_rolling_mean_4",
    "cgm_rolling_mean_8",
    "cgm_rolling_mean_12",
    "cgm_rolling_std_4",
    "cgm_rolling_std_8",
    "time_of_day_sin",
    "time_of_day_cos",
    "calories",
    "total_fat",
    "saturated_fat",
    "trans_fat",
    "cholesterol",
    "sodium",
    "total_carbohydrates",
    "dietary_fiber",
    "sugars",
    "protein",
];

/// Position of a named feature in the input vector
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|&candidate| candidate == name)
}

/// One training/evaluation row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Model inputs in [`FEATURE_NAMES`] order
    pub values: [f64; FEATURE_COUNT],
    /// Next CGM reading
    pub target: f64,
    /// Current CGM reading (not a model input)
    pub cgm: f64,
    /// Time of the current reading (not a model input)
    pub timestamp: NaiveDateTime,
}

impl FeatureVector {
    /// Value of a named feature
    pub fn get(&self, name: &str) -> Option<f64> {
        feature_index(name).map(|index| self.values[index])
    }
}

/// Builds feature vectors from readings
#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    min_rows: usize,
    warmup: usize,
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self {
            min_rows: 20,
            warmup: 12,
        }
    }
}

impl FeatureBuilder {
    /// Create a builder with a custom minimum row count and warm-up length
    pub fn new(min_rows: usize, warmup: usize) -> Result<Self> {
        if min_rows == 0 {
            return Err(ForecastError::InvalidParameter(
                "Minimum row count must be greater than zero".to_string(),
            ));
        }
        Ok(Self { min_rows, warmup })
    }

    /// Minimum number of readings accepted
    pub fn min_rows(&self) -> usize {
        self.min_rows
    }

    /// Leading vectors dropped after building
    pub fn warmup(&self) -> usize {
        self.warmup
    }

    /// Fail with `InsufficientData` if there are fewer than `min_rows` rows
    pub fn check_row_count(&self, rows: usize) -> Result<()> {
        if rows < self.min_rows {
            return Err(ForecastError::InsufficientData(format!(
                "Need at least {} rows, got {}",
                self.min_rows, rows
            )));
        }
        Ok(())
    }

    /// Validate raw records and build their feature vectors
    pub fn build_from_records(&self, records: &[RawRecord]) -> Result<Vec<FeatureVector>> {
        self.check_row_count(records.len())?;
        let readings = validate_records(records)?;
        self.build(&readings)
    }

    /// Build feature vectors for every reading past the warm-up prefix
    pub fn build(&self, readings: &[GlucoseReading]) -> Result<Vec<FeatureVector>> {
        self.check_row_count(readings.len())?;

        let cgm: Vec<f64> = readings.iter().map(|reading| reading.cgm).collect();
        let last = readings.len() - 1;

        let features = readings
            .iter()
            .enumerate()
            .skip(self.warmup)
            .map(|(i, reading)| -> Result<FeatureVector> {
                let target = if i < last { cgm[i + 1] } else { cgm[i] };
                Ok(FeatureVector {
                    values: feature_values(&cgm, i, reading)?,
                    target,
                    cgm: cgm[i],
                    timestamp: reading.timestamp,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if features.is_empty() {
            return Err(ForecastError::InsufficientData(format!(
                "No rows left after dropping a warm-up of {} from {}",
                self.warmup,
                readings.len()
            )));
        }

        log::debug!(
            "Built {} feature vectors from {} readings (schema v{})",
            features.len(),
            readings.len(),
            FEATURE_SCHEMA_VERSION
        );
        Ok(features)
    }
}

fn feature_values(
    cgm: &[f64],
    index: usize,
    reading: &GlucoseReading,
) -> Result<[f64; FEATURE_COUNT]> {
    let mut values = Vec::with_capacity(FEATURE_COUNT);

    for lag in LAGS {
        values.push(lag_or_first(cgm, index, lag)?);
    }
    for window in MEAN_WINDOWS {
        values.push(RollingSummary::at(cgm, index, window)?.mean);
    }
    for window in STD_WINDOWS {
        values.push(RollingSummary::at(cgm, index, window)?.std_dev);
    }

    let (sin, cos) = time_of_day_encoding(reading.minutes_since_midnight());
    values.push(sin);
    values.push(cos);
    values.extend_from_slice(&reading.nutrition);

    values.try_into().map_err(|values: Vec<f64>| {
        ForecastError::ShapeMismatch(format!(
            "Built {} features, schema expects {}",
            values.len(),
            FEATURE_COUNT
        ))
    })
}
