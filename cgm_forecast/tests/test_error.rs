use cgm_forecast::{ForecastError, PipelineConfig};
use glucose_math::MathError;

#[test]
fn test_error_messages() {
    let error = ForecastError::InsufficientData("Need at least 20 rows, got 5".to_string());
    assert_eq!(
        error.to_string(),
        "Insufficient data: Need at least 20 rows, got 5"
    );

    let error = ForecastError::malformed(4, "unparseable timestamp 'x'");
    assert_eq!(
        error.to_string(),
        "Malformed record at row 4: unparseable timestamp 'x'"
    );

    let error = ForecastError::Cancelled { completed_epochs: 7 };
    assert_eq!(error.to_string(), "Training cancelled after 7 epochs");
}

#[test]
fn test_conversions() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    assert!(matches!(ForecastError::from(io), ForecastError::IoError(_)));

    let math = MathError::InvalidInput("window of zero".to_string());
    let error = ForecastError::from(math);
    assert_eq!(error.to_string(), "Math error: Invalid input: window of zero");

    let config = PipelineConfig::from_json_str("{ not json");
    assert!(matches!(config, Err(ForecastError::ConfigError(_))));
}
