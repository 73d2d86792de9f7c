use approx::assert_relative_eq;
use cgm_forecast::data::{CGM_COLUMN, DATE_COLUMN};
use cgm_forecast::features::{feature_index, FeatureBuilder, FEATURE_COUNT, FEATURE_NAMES, LAGS};
use cgm_forecast::{ForecastError, RawRecord};
use chrono::{Duration, NaiveDate};
use glucose_math::RollingSummary;

fn records_from(cgm: &[f64]) -> Vec<RawRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(6, 0, 0)
        .unwrap();

    cgm.iter()
        .enumerate()
        .map(|(i, value)| {
            let time = start + Duration::minutes(5 * i as i64);
            RawRecord::new()
                .with(DATE_COLUMN, time.format("%Y-%m-%d %H:%M:%S").to_string())
                .with(CGM_COLUMN, value.to_string())
        })
        .collect()
}

fn wiggly_series(len: usize) -> Vec<f64> {
    (0..len).map(|i| 90.0 + ((i * i) % 17) as f64 * 3.0).collect()
}

#[test]
fn test_builds_len_minus_warmup_rows_of_fixed_width() {
    for len in [20, 30, 57] {
        let features = FeatureBuilder::default()
            .build_from_records(&records_from(&wiggly_series(len)))
            .unwrap();

        assert_eq!(features.len(), len - 12);
        assert!(features.iter().all(|f| f.values.len() == FEATURE_COUNT));
    }
    assert_eq!(FEATURE_NAMES.len(), 24);
}

#[test]
fn test_lags_read_the_raw_series() {
    let cgm = wiggly_series(40);
    let features = FeatureBuilder::default()
        .build_from_records(&records_from(&cgm))
        .unwrap();

    for (offset, feature) in features.iter().enumerate() {
        let i = offset + 12;
        for (slot, lag) in LAGS.iter().enumerate() {
            assert_eq!(feature.values[slot], cgm[i - lag], "lag {} at {}", lag, i);
        }
        assert_eq!(feature.cgm, cgm[i]);
    }
}

#[test]
fn test_series_start_uses_first_value_and_empty_windows() {
    let cgm = wiggly_series(20);
    let builder = FeatureBuilder::new(20, 0).unwrap();
    let features = builder.build_from_records(&records_from(&cgm)).unwrap();
    assert_eq!(features.len(), 20);

    let first = &features[0];
    for slot in 0..LAGS.len() {
        assert_eq!(first.values[slot], cgm[0]);
    }
    assert_eq!(first.get("cgm_rolling_mean_4"), Some(0.0));
    assert_eq!(first.get("cgm_rolling_mean_12"), Some(0.0));
    assert_eq!(first.get("cgm_rolling_std_4"), Some(0.0));

    let second = &features[1];
    assert_eq!(second.get("cgm_rolling_mean_8"), Some(cgm[0]));
    assert_eq!(second.get("cgm_rolling_std_8"), Some(0.0));
    assert_eq!(second.get("cgm_lag_2"), Some(cgm[0]));
}

#[test]
fn test_rolling_statistics() {
    let cgm: Vec<f64> = (0..30).map(|i| 100.0 + 2.0 * i as f64).collect();
    let features = FeatureBuilder::default()
        .build_from_records(&records_from(&cgm))
        .unwrap();

    // i = 12: previous four readings are 116, 118, 120, 122
    let feature = &features[0];
    assert_relative_eq!(feature.get("cgm_rolling_mean_4").unwrap(), 119.0, epsilon = 1e-9);
    assert_relative_eq!(feature.get("cgm_rolling_mean_8").unwrap(), 115.0, epsilon = 1e-9);
    assert_relative_eq!(feature.get("cgm_rolling_mean_12").unwrap(), 111.0, epsilon = 1e-9);
    assert_relative_eq!(
        feature.get("cgm_rolling_std_4").unwrap(),
        (20.0_f64 / 3.0).sqrt(),
        epsilon = 1e-9
    );
    assert_relative_eq!(
        feature.get("cgm_rolling_std_8").unwrap(),
        (168.0_f64 / 7.0).sqrt(),
        epsilon = 1e-9
    );
}

#[test]
fn test_rolling_columns_match_window_summaries() {
    let cgm = wiggly_series(40);
    let features = FeatureBuilder::default()
        .build_from_records(&records_from(&cgm))
        .unwrap();

    for (offset, feature) in features.iter().enumerate() {
        let index = offset + 12;
        for window in [4, 8, 12] {
            let summary = RollingSummary::at(&cgm, index, window).unwrap();
            let name = format!("cgm_rolling_mean_{}", window);
            assert_eq!(feature.get(&name), Some(summary.mean));
        }
        for window in [4, 8] {
            let summary = RollingSummary::at(&cgm, index, window).unwrap();
            let name = format!("cgm_rolling_std_{}", window);
            assert_eq!(feature.get(&name), Some(summary.std_dev));
        }
    }
}

#[test]
fn test_targets_are_next_reading_except_last() {
    let cgm = wiggly_series(25);
    let features = FeatureBuilder::default()
        .build_from_records(&records_from(&cgm))
        .unwrap();

    for (offset, feature) in features.iter().enumerate().take(features.len() - 1) {
        assert_eq!(feature.target, cgm[offset + 13]);
    }
    let last = features.last().unwrap();
    assert_eq!(last.target, cgm[24]);
    assert_eq!(last.target, last.cgm);
}

#[test]
fn test_time_of_day_encoding() {
    let features = FeatureBuilder::default()
        .build_from_records(&records_from(&wiggly_series(20)))
        .unwrap();

    // First kept row is 06:00 + 12 * 5 minutes = 07:00
    let angle = 2.0 * std::f64::consts::PI * 420.0 / 1440.0;
    assert_relative_eq!(features[0].get("time_of_day_sin").unwrap(), angle.sin(), epsilon = 1e-12);
    assert_relative_eq!(features[0].get("time_of_day_cos").unwrap(), angle.cos(), epsilon = 1e-12);
}

#[test]
fn test_nutrition_fields_parse_or_default_to_zero() {
    let mut records = records_from(&wiggly_series(20));
    records[15].insert("Calories", "250");
    records[15].insert("Sugars", "lots");
    records[15].insert("Protein", 12.5);

    let features = FeatureBuilder::default().build_from_records(&records).unwrap();
    let feature = &features[3];

    assert_eq!(feature.get("calories"), Some(250.0));
    assert_eq!(feature.get("sugars"), Some(0.0));
    assert_eq!(feature.get("protein"), Some(12.5));
    assert_eq!(feature.get("sodium"), Some(0.0));
    assert_eq!(feature.values[feature_index("total_fat").unwrap()], 0.0);
}

#[test]
fn test_non_numeric_cgm_reads_as_zero() {
    let mut records = records_from(&wiggly_series(20));
    records[0].insert(CGM_COLUMN, "HIGH");

    let features = FeatureBuilder::default().build_from_records(&records).unwrap();
    assert_eq!(features[0].get("cgm_lag_12"), Some(0.0));
}

#[test]
fn test_too_few_rows() {
    let result = FeatureBuilder::default().build_from_records(&records_from(&wiggly_series(19)));
    assert!(matches!(result, Err(ForecastError::InsufficientData(_))));
}

#[test]
fn test_warmup_consuming_everything() {
    let builder = FeatureBuilder::new(20, 20).unwrap();
    let result = builder.build_from_records(&records_from(&wiggly_series(20)));
    assert!(matches!(result, Err(ForecastError::InsufficientData(_))));
}
