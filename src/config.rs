//! Service configuration.
//!
//! Settings come from an optional TOML file, then environment variables
//! (`HOST`, `PORT`, `POTENSI_DATA`, `POTENSI_SEED`; a `.env` file is honoured),
//! then CLI flags.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::data::DEFAULT_SEED;
use crate::domain::ForecastOptions;
use crate::fit::MAX_HORIZON;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// An environment variable could not be parsed
    #[error("Invalid value for {name}: '{value}'")]
    InvalidEnv { name: &'static str, value: String },

    /// A setting is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub bind_address: String,
    pub bind_port: u16,
    /// Historical dataset (CSV with `Sumber`, `Tahun`, `Potensi`).
    pub data_path: PathBuf,
    /// Seed of the augmentation RNG.
    pub seed: u64,
    pub forecast: ForecastOptions,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 5000,
            data_path: PathBuf::from("data/potensi.csv"),
            seed: DEFAULT_SEED,
            forecast: ForecastOptions::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServiceConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, or the given file, then environment overrides.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in production).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.bind_address = host;
        }
        if let Some(port) = lookup("PORT") {
            self.bind_port = port
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { name: "PORT", value: port })?;
        }
        if let Some(path) = lookup("POTENSI_DATA") {
            self.data_path = PathBuf::from(path);
        }
        if let Some(seed) = lookup("POTENSI_SEED") {
            self.seed = seed
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { name: "POTENSI_SEED", value: seed })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.forecast;
        if f.horizon == 0 || f.horizon > MAX_HORIZON {
            return Err(ConfigError::Invalid(format!(
                "forecast.horizon must be in 1..={MAX_HORIZON}"
            )));
        }
        if !(f.changepoint_range > 0.0 && f.changepoint_range <= 1.0) {
            return Err(ConfigError::Invalid(
                "forecast.changepoint_range must be in (0, 1]".to_string(),
            ));
        }
        if !(f.changepoint_prior_scale.is_finite() && f.changepoint_prior_scale > 0.0) {
            return Err(ConfigError::Invalid(
                "forecast.changepoint_prior_scale must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
        assert_eq!(config.seed, 42);
        assert_eq!(config.forecast.horizon, 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml_with_defaults() {
        let toml = r#"
            bind_port = 9000
            data_path = "/srv/potensi.csv"

            [forecast]
            changepoint_prior_scale = 0.5
        "#;

        let config: ServiceConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.data_path, PathBuf::from("/srv/potensi.csv"));
        assert_eq!(config.forecast.horizon, 6);
        assert_eq!(config.forecast.changepoint_prior_scale, 0.5);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [("HOST", "0.0.0.0"), ("PORT", "8080"), ("POTENSI_SEED", "7")].into();
        let mut config = ServiceConfig::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn test_invalid_env_port() {
        let mut config = ServiceConfig::default();
        let err = config
            .apply_env(|k| (k == "PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: "PORT", .. }));
    }

    #[test]
    fn test_validation_rejects_zero_horizon() {
        let mut config = ServiceConfig::default();
        config.forecast.horizon = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validation_bounds_horizon() {
        let mut config = ServiceConfig::default();
        config.forecast.horizon = MAX_HORIZON;
        assert!(config.validate().is_ok());

        config.forecast.horizon = usize::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
