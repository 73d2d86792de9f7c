//! Rolling window statistics
//!
//! Windows are trailing and half-open: the window of size `n` at index `i`
//! covers `[max(0, i - n), i)`, so the current value is never included.
//! Near the start of a series the window is simply shorter.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Trailing half-open window of at most `size` values ending before `end`
pub fn trailing_window(series: &[f64], end: usize, size: usize) -> Result<&[f64]> {
    if end > series.len() {
        return Err(MathError::InvalidInput(format!(
            "Window end {} is past the series length {}",
            end,
            series.len()
        )));
    }

    Ok(&series[end.saturating_sub(size)..end])
}

/// Arithmetic mean of a window; an empty window has mean 0
pub fn window_mean(window: &[f64]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    window.iter().mean()
}

/// Sample standard deviation of a window; 0 unless it holds at least two values
pub fn window_std(window: &[f64]) -> f64 {
    if window.len() < 2 {
        return 0.0;
    }
    window.iter().std_dev()
}

/// Mean and standard deviation of one trailing window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingSummary {
    /// Number of values actually in the window
    pub count: usize,
    /// Window mean
    pub mean: f64,
    /// Window sample standard deviation
    pub std_dev: f64,
}

impl RollingSummary {
    /// Summarise the trailing window of `size` values ending before `end`
    pub fn at(series: &[f64], end: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(MathError::InvalidInput(
                "Window size must be greater than zero".to_string(),
            ));
        }

        let window = trailing_window(series, end, size)?;
        Ok(Self {
            count: window.len(),
            mean: window_mean(window),
            std_dev: window_std(window),
        })
    }
}
