use cgm_forecast::{DataLoader, ForecastError, ForecastPipeline, PipelineConfig};
use std::env;
use std::process::ExitCode;

fn usage() -> String {
    format!(
        "{} {}\n\nUsage: cgm_forecast <data.csv> [config.json]",
        cgm_forecast::NAME,
        cgm_forecast::VERSION
    )
}

fn run(data_path: &str, config_path: Option<&str>) -> Result<String, ForecastError> {
    let config = match config_path {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };

    let records = DataLoader::from_csv(data_path)?;
    log::info!("Loaded {} records from {}", records.len(), data_path);

    let outcome = ForecastPipeline::new(config)?.run(&records)?;
    log::info!("{}", outcome.evaluation.metrics);

    outcome.report().to_json()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(data_path) = args.first() else {
        eprintln!("{}", usage());
        return ExitCode::from(2);
    };

    match run(data_path, args.get(1).map(String::as_str)) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Forecast failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
