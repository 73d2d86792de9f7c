//! Metrics for evaluating forecast performance
//!
//! Degenerate inputs are reported, not thrown: a constant target makes R²
//! non-finite and a zero target makes MAPE non-finite. Both cases come back
//! as values plus a [`NumericWarning`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Mean Squared Error over paired values
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    paired_mean(actual, predicted, |a, p| (a - p).powi(2))
}

/// Root Mean Squared Error over paired values
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    mean_squared_error(actual, predicted).sqrt()
}

/// Mean Absolute Error over paired values
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    paired_mean(actual, predicted, |a, p| (a - p).abs())
}

/// Mean of `|y - ŷ| / y` as a percentage.
///
/// A true value of exactly zero makes the result infinite (or NaN when the
/// residual is zero too).
pub fn mean_absolute_percentage_error(actual: &[f64], predicted: &[f64]) -> f64 {
    paired_mean(actual, predicted, |a, p| (a - p).abs() / a) * 100.0
}

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// Non-finite when every true value is the same.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return f64::NAN;
    }

    let actual = &actual[..n];
    let mean = actual.iter().mean();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    1.0 - ss_res / ss_tot
}

fn paired_mean(actual: &[f64], predicted: &[f64], f: impl Fn(f64, f64) -> f64) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| f(a, p))
        .sum::<f64>()
        / n as f64
}

/// Non-fatal numeric degeneracy found while scoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericWarning {
    /// No paired values to score
    EmptySample,
    /// All true values are equal; R² divides by zero
    ConstantTarget,
    /// Some true values are zero; MAPE divides by zero
    ZeroTarget {
        /// How many true values are zero
        count: usize,
    },
}

impl std::fmt::Display for NumericWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericWarning::EmptySample => write!(f, "no paired values to score"),
            NumericWarning::ConstantTarget => {
                write!(f, "true values are constant, R2 is undefined")
            }
            NumericWarning::ZeroTarget { count } => {
                write!(f, "{} true values are zero, MAPE is undefined", count)
            }
        }
    }
}

/// Forecast performance metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Coefficient of determination
    pub r2: f64,
    /// Mean Absolute Percentage Error
    pub mape: f64,
    /// `100 - MAPE`
    pub accuracy: f64,
    /// Degenerate cases hit while scoring
    pub warnings: Vec<NumericWarning>,
}

impl ForecastMetrics {
    /// Score predictions against true values
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Self {
        let n = actual.len().min(predicted.len());
        let actual = &actual[..n];
        let predicted = &predicted[..n];

        let mut warnings = Vec::new();
        if n == 0 {
            warnings.push(NumericWarning::EmptySample);
        } else {
            if actual.iter().all(|&a| a == actual[0]) {
                warnings.push(NumericWarning::ConstantTarget);
            }
            let zeros = actual.iter().filter(|&&a| a == 0.0).count();
            if zeros > 0 {
                warnings.push(NumericWarning::ZeroTarget { count: zeros });
            }
        }
        for warning in &warnings {
            log::warn!("Numeric degeneracy while scoring: {}", warning);
        }

        let mse = mean_squared_error(actual, predicted);
        let mape = mean_absolute_percentage_error(actual, predicted);
        Self {
            mse,
            rmse: mse.sqrt(),
            mae: mean_absolute_error(actual, predicted),
            r2: r2_score(actual, predicted),
            mape,
            accuracy: 100.0 - mape,
            warnings,
        }
    }

    /// Whether any metric hit a degenerate case
    pub fn is_degenerate(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl std::fmt::Display for ForecastMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Performance Metrics:")?;
        writeln!(f, "  MSE:      {:.4}", self.mse)?;
        writeln!(f, "  RMSE:     {:.4}", self.rmse)?;
        writeln!(f, "  MAE:      {:.4}", self.mae)?;
        writeln!(f, "  R2:       {:.4}", self.r2)?;
        writeln!(f, "  MAPE:     {:.4}%", self.mape)?;
        writeln!(f, "  Accuracy: {:.2}%", self.accuracy)?;
        Ok(())
    }
}

/// One row of the actual-vs-predicted table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRow {
    /// Time of day, `HH:MM`
    #[serde(rename = "Time")]
    pub time: String,
    /// Prediction rounded to 2 decimals
    #[serde(rename = "Predicted")]
    pub predicted: String,
    /// True value rounded to 2 decimals, empty if unavailable
    #[serde(rename = "Actual")]
    pub actual: String,
}

/// First `limit` test points as display rows.
///
/// Tolerates `actual` being shorter than `predicted`.
pub fn window_table(
    actual: &[f64],
    predicted: &[f64],
    times: &[NaiveDateTime],
    limit: usize,
) -> Vec<WindowRow> {
    predicted
        .iter()
        .zip(times)
        .take(limit)
        .enumerate()
        .map(|(i, (prediction, time))| WindowRow {
            time: time.format("%H:%M").to_string(),
            predicted: format!("{:.2}", prediction),
            actual: actual
                .get(i)
                .map(|value| format!("{:.2}", value))
                .unwrap_or_default(),
        })
        .collect()
}

/// Metrics plus display window for one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Accuracy metrics
    pub metrics: ForecastMetrics,
    /// Actual-vs-predicted rows from the start of the test segment
    pub table: Vec<WindowRow>,
}

/// Score test predictions and build the display window
pub fn evaluate(
    actual: &[f64],
    predicted: &[f64],
    times: &[NaiveDateTime],
    window_rows: usize,
) -> Evaluation {
    Evaluation {
        metrics: ForecastMetrics::compute(actual, predicted),
        table: window_table(actual, predicted, times, window_rows),
    }
}
