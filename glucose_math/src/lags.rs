//! Lag lookups over a series

use crate::{MathError, Result};

/// Value of `series` `lag` steps before `index`.
///
/// When the lag reaches before the start of the series the first value is
/// used instead, so early indices still produce a complete feature.
pub fn lag_or_first(series: &[f64], index: usize, lag: usize) -> Result<f64> {
    let first = *series.first().ok_or_else(|| {
        MathError::InsufficientData("Cannot take a lag of an empty series".to_string())
    })?;

    if index >= series.len() {
        return Err(MathError::InvalidInput(format!(
            "Index {} is out of range for a series of length {}",
            index,
            series.len()
        )));
    }

    Ok(index.checked_sub(lag).map_or(first, |i| series[i]))
}
