//! Error types.
//!
//! Domain failures are typed (`ForecastError`, `InsightError`) so the HTTP layer
//! can map them to status codes. The binary collapses everything into
//! `AppError`, which carries the process exit code.

use thiserror::Error;

/// Failures of the forecast engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    /// The requested source is not present in the augmented series.
    #[error("Sumber tidak ditemukan dalam data: {0}")]
    UnknownSource(String),

    /// The source has too few distinct years to fit a trend.
    #[error("Series for '{name}' has {distinct_years} distinct year(s); at least 2 are required")]
    DegenerateSeries { name: String, distinct_years: usize },

    #[error("Forecast horizon must be between 1 and 100 years (got {0})")]
    InvalidHorizon(usize),

    /// The solver failed or produced non-finite values.
    #[error("Numerical failure while fitting '{name}': {message}")]
    Numerical { name: String, message: String },
}

/// Failures of the insight summarizer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InsightError {
    #[error("Insight needs at least 2 forecast points (got {0})")]
    TooFewPoints(usize),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        let exit_code = match err {
            ForecastError::UnknownSource(_) => 2,
            ForecastError::DegenerateSeries { .. } => 3,
            ForecastError::InvalidHorizon(_) | ForecastError::Numerical { .. } => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl From<InsightError> for AppError {
    fn from(err: InsightError) -> Self {
        AppError::new(3, err.to_string())
    }
}

impl From<crate::report::ReportError> for AppError {
    fn from(err: crate::report::ReportError) -> Self {
        AppError::new(4, err.to_string())
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(err: crate::config::ConfigError) -> Self {
        AppError::new(2, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_errors_map_to_exit_codes() {
        let unknown: AppError = ForecastError::UnknownSource("Angin".to_string()).into();
        assert_eq!(unknown.exit_code(), 2);
        assert!(unknown.to_string().contains("Angin"));

        let degenerate: AppError = ForecastError::DegenerateSeries {
            name: "Surya".to_string(),
            distinct_years: 1,
        }
        .into();
        assert_eq!(degenerate.exit_code(), 3);
        assert!(degenerate.to_string().contains("'Surya' has 1 distinct year"));

        let numerical = ForecastError::Numerical {
            name: "Air".to_string(),
            message: "trend solve failed".to_string(),
        };
        assert!(std::error::Error::source(&numerical).is_none());
        assert_eq!(AppError::from(numerical).exit_code(), 4);
    }
}
