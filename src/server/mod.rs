//! HTTP service.
//!
//! Loads the dataset snapshot once, then serves forecasts over axum.

pub mod handlers;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServiceConfig;
use crate::data::Dataset;
use crate::error::AppError;
use handlers::{AppState, create_router};

/// Load the dataset, bind, and serve until the process is stopped.
pub async fn start_server(config: ServiceConfig) -> Result<(), AppError> {
    let dataset = Dataset::load(&config.data_path, config.seed)?;
    info!(
        sources = dataset.sources().len(),
        points = dataset.augmented.len(),
        seed = config.seed,
        "dataset snapshot ready"
    );

    let app = create_router(AppState::new(dataset, config.forecast.clone()));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::new(2, format!("Failed to bind {addr}: {e}")))?;
    info!("potensi v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::new(1, format!("Server error: {e}")))?;

    Ok(())
}
