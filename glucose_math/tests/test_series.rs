use glucose_math::{lag_or_first, trailing_window, window_mean, window_std, RollingSummary};
use rstest::rstest;

fn ramp(len: usize) -> Vec<f64> {
    (0..len).map(|i| 100.0 + 2.0 * i as f64).collect()
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(4)]
#[case(6)]
#[case(8)]
#[case(12)]
fn test_lag_matches_series_or_first(#[case] lag: usize) {
    let series = ramp(30);

    for i in 0..series.len() {
        let value = lag_or_first(&series, i, lag).unwrap();
        if i >= lag {
            assert_eq!(value, series[i - lag]);
        } else {
            assert_eq!(value, series[0]);
        }
    }
}

#[rstest]
#[case(4)]
#[case(8)]
#[case(12)]
fn test_window_never_includes_current_value(#[case] size: usize) {
    let series = ramp(30);

    for i in 0..series.len() {
        let window = trailing_window(&series, i, size).unwrap();
        assert_eq!(window.len(), i.min(size));
        assert!(window.iter().all(|&v| v < series[i]));
    }
}

#[test]
fn test_start_of_series_degenerates_to_zero() {
    let series = ramp(30);

    let at_start = RollingSummary::at(&series, 0, 4).unwrap();
    assert_eq!(at_start.count, 0);
    assert_eq!(at_start.mean, 0.0);
    assert_eq!(at_start.std_dev, 0.0);

    let one_value = trailing_window(&series, 1, 4).unwrap();
    assert_eq!(window_mean(one_value), 100.0);
    assert_eq!(window_std(one_value), 0.0);
}
