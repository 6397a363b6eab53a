//! Shared "forecast pipeline" logic used by the CLI commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> augment -> fit -> forecast -> summarize
//!
//! The HTTP handlers run the same steps against a snapshot loaded once.

use crate::config::ServiceConfig;
use crate::data::Dataset;
use crate::domain::{Forecast, ForecastOptions, Insight};
use crate::error::AppError;
use crate::fit::forecast_source;
use crate::report::summarize;

/// All computed outputs of a single forecast run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub forecast: Forecast,
    pub insight: Insight,
}

/// Load and augment the dataset named by `config`.
pub fn load_dataset(config: &ServiceConfig) -> Result<Dataset, AppError> {
    Dataset::load(&config.data_path, config.seed)
}

/// Forecast one source and summarize it.
pub fn run_forecast(dataset: &Dataset, source: &str, opts: &ForecastOptions) -> Result<RunOutput, AppError> {
    let forecast = forecast_source(&dataset.augmented, source, opts)?;
    let insight = summarize(&forecast)?;
    Ok(RunOutput { forecast, insight })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HistoricalRecord;

    #[test]
    fn run_forecast_produces_forecast_and_insight() {
        let dataset = Dataset::from_records(
            vec![HistoricalRecord {
                source: "Angin".to_string(),
                year: 2019,
                potential: 60.0,
            }],
            42,
        );
        let run = run_forecast(&dataset, "angin", &ForecastOptions::default()).unwrap();
        assert_eq!(run.forecast.points.len(), 6);
        assert_eq!(run.insight.source, "Angin");
        assert_eq!(run.insight.final_year, 2030);
    }

    #[test]
    fn run_forecast_maps_unknown_source_to_exit_code() {
        let dataset = Dataset::from_records(
            vec![HistoricalRecord {
                source: "Angin".to_string(),
                year: 2019,
                potential: 60.0,
            }],
            42,
        );
        let err = run_forecast(&dataset, "Surya", &ForecastOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
