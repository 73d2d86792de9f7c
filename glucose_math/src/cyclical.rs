//! Cyclical encodings for periodic quantities

use std::f64::consts::PI;

/// Minutes in one day
pub const MINUTES_PER_DAY: u32 = 1440;

/// Encode a minute-of-day as `(sin, cos)` of its angle on the daily cycle.
///
/// Minutes wrap modulo one day, so 23:59 and 00:00 land next to each other.
pub fn time_of_day_encoding(minutes_since_midnight: u32) -> (f64, f64) {
    let minutes = minutes_since_midnight % MINUTES_PER_DAY;
    let angle = 2.0 * PI * f64::from(minutes) / f64::from(MINUTES_PER_DAY);
    (angle.sin(), angle.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quarter_points() {
        let (sin, cos) = time_of_day_encoding(0);
        assert_abs_diff_eq!(sin, 0.0);
        assert_abs_diff_eq!(cos, 1.0);

        let (sin, cos) = time_of_day_encoding(360);
        assert_abs_diff_eq!(sin, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cos, 0.0, epsilon = 1e-12);

        let (sin, cos) = time_of_day_encoding(720);
        assert_abs_diff_eq!(sin, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cos, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_wraps_after_one_day() {
        assert_eq!(time_of_day_encoding(MINUTES_PER_DAY + 90), time_of_day_encoding(90));
    }
}
