//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - parses CLI arguments
//! - resolves configuration
//! - dispatches to the server or a one-shot command

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, DataArgs, ExportArgs, ForecastArgs, ReportArgs, ServeArgs};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `potensi` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    // `potensi` and `potensi --port 8080` behave like `potensi serve ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Serve(args) => handle_serve(args),
        Command::Sources(args) => handle_sources(args),
        Command::Forecast(args) => handle_forecast(args, OutputMode::Forecast),
        Command::Insight(args) => handle_forecast(args, OutputMode::Insight),
        Command::Report(args) => handle_report(args),
        Command::Export(args) => handle_export(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Forecast,
    Insight,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "potensi=info,tower_http=info".into());
    // Logs go to stderr so command output on stdout stays pipeable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_serve(args: ServeArgs) -> Result<(), AppError> {
    let mut config = args.data.resolve()?;
    if let Some(host) = args.host {
        config.bind_address = host;
    }
    if let Some(port) = args.port {
        config.bind_port = port;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::new(1, format!("Failed to start runtime: {e}")))?;
    runtime.block_on(crate::server::start_server(config))
}

fn handle_sources(args: DataArgs) -> Result<(), AppError> {
    let config = args.resolve()?;
    let dataset = pipeline::load_dataset(&config)?;
    print!("{}", crate::report::format_sources(&dataset));
    Ok(())
}

fn handle_forecast(args: ForecastArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = args.data.resolve()?;
    let dataset = pipeline::load_dataset(&config)?;
    let run = pipeline::run_forecast(&dataset, &args.source, &config.forecast)?;

    if args.json {
        let json = match mode {
            OutputMode::Forecast => serde_json::to_string_pretty(&run.forecast),
            OutputMode::Insight => serde_json::to_string_pretty(&run.insight),
        }
        .map_err(|e| AppError::new(4, format!("Failed to encode JSON: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    match mode {
        OutputMode::Forecast => {
            print!("{}", crate::report::format_forecast(&run.forecast));
            println!();
            print!("{}", crate::report::format_insight(&run.insight));
        }
        OutputMode::Insight => print!("{}", crate::report::format_insight(&run.insight)),
    }
    Ok(())
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = args.data.resolve()?;
    let dataset = pipeline::load_dataset(&config)?;
    let run = pipeline::run_forecast(&dataset, &args.source, &config.forecast)?;

    let bytes = crate::report::render_pdf(&run.forecast, &run.insight)?;
    std::fs::write(&args.out, bytes)
        .map_err(|e| AppError::new(2, format!("Failed to write report '{}': {e}", args.out.display())))?;
    println!("Wrote {}", args.out.display());
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = args.data.resolve()?;
    let dataset = pipeline::load_dataset(&config)?;
    crate::io::export::write_series_csv(&args.out, &dataset.augmented)?;
    println!("Wrote {} points to {}", dataset.augmented.len(), args.out.display());
    Ok(())
}

/// Rewrite argv so `potensi` defaults to `potensi serve`.
///
/// Rules:
/// - `potensi`                      -> `potensi serve`
/// - `potensi --port 8080 ...`      -> `potensi serve --port 8080 ...`
/// - `potensi --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("serve".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "serve".to_string());
    }

    argv
}
