//! End-to-end forecast pipeline
//!
//! raw records → validation → features → chronological split → train →
//! predict → evaluate → report.
//!
//! Every run builds its own model and drops it when done, so concurrent runs
//! share nothing. Callers that multiplex runs onto one shared compute
//! resource must serialise access to it themselves.

use crate::cancel::{CancellationToken, TrainingGuard};
use crate::config::{ModelConfig, PipelineConfig};
use crate::data::{validate_records, RawRecord};
use crate::error::Result;
use crate::features::{FeatureBuilder, FEATURE_COUNT};
use crate::metrics::{evaluate, Evaluation, ForecastMetrics, WindowRow};
use crate::models::{FeedForwardRegressor, ForecastModel, TrainingReport};
use crate::split::chronological_split;
use serde::{Deserialize, Serialize};

/// Full outcome of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Name of the model that was trained
    pub model_name: String,
    /// Feature vectors after the warm-up was dropped
    pub feature_rows: usize,
    /// Rows used for training
    pub train_rows: usize,
    /// Rows used for testing
    pub test_rows: usize,
    /// Training diagnostics
    pub training: TrainingReport,
    /// Test predictions in chronological order
    pub predictions: Vec<f64>,
    /// Test targets in chronological order
    pub actuals: Vec<f64>,
    /// Metrics and display window
    pub evaluation: Evaluation,
}

impl PipelineOutcome {
    /// Boundary-facing report
    pub fn report(&self) -> ForecastReport {
        ForecastReport::assemble(&self.evaluation)
    }
}

/// Metrics formatted for the boundary response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedMetrics {
    #[serde(rename = "MSE")]
    /// Mean squared error, 2 decimals
    pub mse: String,
    #[serde(rename = "RMSE")]
    /// Root mean squared error, 2 decimals
    pub rmse: String,
    #[serde(rename = "MAE")]
    /// Mean absolute error, 2 decimals
    pub mae: String,
    #[serde(rename = "R2")]
    /// Coefficient of determination, 3 decimals
    pub r2: String,
    #[serde(rename = "Accuracy")]
    /// `100 - MAPE`, 2 decimals with a `%` suffix
    pub accuracy: String,
}

impl From<&ForecastMetrics> for FormattedMetrics {
    fn from(metrics: &ForecastMetrics) -> Self {
        Self {
            mse: format!("{:.2}", metrics.mse),
            rmse: format!("{:.2}", metrics.rmse),
            mae: format!("{:.2}", metrics.mae),
            r2: format!("{:.3}", metrics.r2),
            accuracy: format!("{:.2}%", metrics.accuracy),
        }
    }
}

/// `{ metrics, table }` response handed back to the boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    /// Formatted accuracy metrics
    pub metrics: FormattedMetrics,
    /// Actual-vs-predicted rows from the start of the test segment
    pub table: Vec<WindowRow>,
}

impl ForecastReport {
    /// Package an evaluation for the response
    pub fn assemble(evaluation: &Evaluation) -> Self {
        Self {
            metrics: FormattedMetrics::from(&evaluation.metrics),
            table: evaluation.table.clone(),
        }
    }

    /// Pretty JSON rendering
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs the forecast pipeline with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct ForecastPipeline {
    config: PipelineConfig,
}

impl ForecastPipeline {
    /// Create a pipeline, validating the configuration
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run with the feed-forward model and no external cancellation
    pub fn run(&self, records: &[RawRecord]) -> Result<PipelineOutcome> {
        self.run_with_cancel(records, &CancellationToken::new())
    }

    /// Run with the feed-forward model, aborting when `token` is cancelled
    pub fn run_with_cancel(
        &self,
        records: &[RawRecord],
        token: &CancellationToken,
    ) -> Result<PipelineOutcome> {
        self.run_with_model(records, token, FeedForwardRegressor::configure)
    }

    /// Run with a model built by `make_model(input_dim, model_config)`.
    ///
    /// The model is only built once the data has produced a valid split.
    pub fn run_with_model<M, F>(
        &self,
        records: &[RawRecord],
        token: &CancellationToken,
        make_model: F,
    ) -> Result<PipelineOutcome>
    where
        M: ForecastModel,
        F: FnOnce(usize, &ModelConfig) -> Result<M>,
    {
        let builder = FeatureBuilder::new(self.config.min_rows, self.config.warmup)?;
        builder.check_row_count(records.len())?;

        let readings = validate_records(records)?;
        let features = builder.build(&readings)?;
        let split = chronological_split(&features, self.config.train_fraction)?;
        log::info!(
            "Prepared {} feature rows: {} train, {} test",
            features.len(),
            split.train_len(),
            split.test_len()
        );

        let mut model = make_model(FEATURE_COUNT, &self.config.model)?;
        let guard = TrainingGuard::new(token.clone()).with_timeout(self.config.timeout());
        let training = model.train(&split.train_x, &split.train_y, &guard)?;

        let predictions = model.predict(&split.test_x)?.to_vec();
        let actuals = split.test_y.to_vec();
        let evaluation = evaluate(
            &actuals,
            &predictions,
            &split.test_times,
            self.config.window_rows,
        );
        log::info!(
            "Evaluated {} on {} test rows: RMSE {:.3}, R2 {:.3}",
            model.name(),
            predictions.len(),
            evaluation.metrics.rmse,
            evaluation.metrics.r2
        );

        Ok(PipelineOutcome {
            model_name: model.name().to_string(),
            feature_rows: features.len(),
            train_rows: split.train_len(),
            test_rows: split.test_len(),
            training,
            predictions,
            actuals,
            evaluation,
        })
    }
}

/// Run the default pipeline and return the boundary report
pub fn forecast(records: &[RawRecord]) -> Result<ForecastReport> {
    Ok(ForecastPipeline::default().run(records)?.report())
}
