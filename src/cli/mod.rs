//! Command-line parsing.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! forecasting code. Every command shares the dataset flags in `DataArgs`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ServiceConfig;
use crate::error::AppError;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "potensi", version, about = "Renewable-energy potential forecast service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve forecasts over HTTP (the default when no subcommand is given).
    Serve(ServeArgs),
    /// List the sources available in the dataset.
    Sources(DataArgs),
    /// Print the forecast table for one source.
    Forecast(ForecastArgs),
    /// Print the trend summary for one source.
    Insight(ForecastArgs),
    /// Write the one-page PDF report for one source.
    Report(ReportArgs),
    /// Write the augmented training series as CSV.
    Export(ExportArgs),
}

/// Dataset and configuration flags shared by every command.
#[derive(Debug, Args, Clone, Default)]
pub struct DataArgs {
    /// TOML configuration file.
    #[arg(long, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Historical dataset CSV (overrides config and `POTENSI_DATA`).
    #[arg(long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Augmentation seed (overrides config and `POTENSI_SEED`).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Forecast horizon in years.
    #[arg(long)]
    pub horizon: Option<usize>,
}

impl DataArgs {
    /// Config file + environment, with these flags applied last.
    pub fn resolve(&self) -> Result<ServiceConfig, AppError> {
        let mut config = ServiceConfig::resolve(self.config.as_deref())?;
        if let Some(path) = &self.data {
            config.data_path = path.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(horizon) = self.horizon {
            config.forecast.horizon = horizon;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Args, Clone, Default)]
pub struct ServeArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Bind address (overrides config and `HOST`).
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides config and `PORT`).
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Debug, Args, Clone)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Energy source name (case-insensitive), e.g. `Surya`.
    #[arg(short, long)]
    pub source: String,

    /// Emit JSON in the HTTP response shape instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Energy source name (case-insensitive).
    #[arg(short, long)]
    pub source: String,

    /// Output PDF path.
    #[arg(short, long, value_name = "PDF")]
    pub out: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Output CSV path.
    #[arg(short, long, value_name = "CSV")]
    pub out: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_forecast_command() {
        let cli = Cli::parse_from(["potensi", "forecast", "-s", "surya", "--seed", "7", "--json"]);
        match cli.command {
            Command::Forecast(args) => {
                assert_eq!(args.source, "surya");
                assert_eq!(args.data.seed, Some(7));
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::parse_from(["potensi", "serve", "--port", "8081", "--data", "x.csv"]);
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, Some(8081));
                assert_eq!(args.data.data, Some(PathBuf::from("x.csv")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
