//! HTTP request handlers.
//!
//! Fitting is CPU-bound, so every handler that forecasts hops onto the
//! blocking pool. Each request fits its own model from the shared snapshot.

use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Path, State, rejection::FormRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::data::Dataset;
use crate::domain::{Forecast, ForecastOptions, ForecastPoint, TrendLabel, YearValue};
use crate::error::{ForecastError, InsightError};
use crate::fit::{forecast_all, forecast_source};
use crate::report::{ReportError, render_pdf, summarize};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Read-only dataset snapshot built at start-up
    pub dataset: Arc<Dataset>,
    pub options: Arc<ForecastOptions>,
}

impl AppState {
    pub fn new(dataset: Dataset, options: ForecastOptions) -> Self {
        Self {
            dataset: Arc::new(dataset),
            options: Arc::new(options),
        }
    }
}

/// Form body of `POST /predict`.
#[derive(Debug, Deserialize)]
pub struct PredictForm {
    pub sumber: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub sources: usize,
    pub records: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SourcesResponse {
    pub sumber: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InsightResponse {
    pub sumber: String,
    pub tren: TrendLabel,
    pub tahun_akhir: i32,
    pub nilai_akhir: f64,
    pub ringkasan: String,
}

/// One source in the combined history + forecast view.
#[derive(Debug, Serialize, Deserialize)]
pub struct SeriesResponse {
    pub sumber: String,
    pub historis: Vec<YearValue>,
    pub prediksi: Vec<ForecastPoint>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request-level failure.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Forecast(ForecastError),
    Insight(InsightError),
    Report(ReportError),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Forecast(ForecastError::UnknownSource(_)) => {
                (StatusCode::BAD_REQUEST, "Sumber tidak ditemukan dalam data.".to_string())
            }
            ApiError::Forecast(e @ (ForecastError::DegenerateSeries { .. } | ForecastError::InvalidHorizon(_))) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            ApiError::Forecast(e @ ForecastError::Numerical { .. }) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Insight(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            ApiError::Report(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            warn!(%status, "request failed: {message}");
        }
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<ForecastError> for ApiError {
    fn from(e: ForecastError) -> Self {
        ApiError::Forecast(e)
    }
}

impl From<InsightError> for ApiError {
    fn from(e: InsightError) -> Self {
        ApiError::Insight(e)
    }
}

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        ApiError::Report(e)
    }
}

/// Run a fitting closure on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("forecast task failed: {e}")))?
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        sources: state.dataset.sources().len(),
        records: state.dataset.historical.len(),
    })
}

/// GET /sources - sorted list of forecastable sources
async fn list_sources(State(state): State<AppState>) -> Json<SourcesResponse> {
    Json(SourcesResponse {
        sumber: state.dataset.sources(),
    })
}

/// POST /predict - forecast for the submitted source
async fn predict(
    State(state): State<AppState>,
    form: Result<Form<PredictForm>, FormRejection>,
) -> Result<Json<Forecast>, ApiError> {
    let Form(form) = form?;
    let forecast = run_blocking(move || {
        forecast_source(&state.dataset.augmented, &form.sumber, &state.options).map_err(ApiError::from)
    })
    .await?;
    Ok(Json(forecast))
}

/// GET /insight/:sumber
async fn insight(State(state): State<AppState>, Path(sumber): Path<String>) -> Result<Json<InsightResponse>, ApiError> {
    let insight = run_blocking(move || {
        let forecast = forecast_source(&state.dataset.augmented, &sumber, &state.options)?;
        Ok(summarize(&forecast)?)
    })
    .await?;

    Ok(Json(InsightResponse {
        ringkasan: insight.sentence(),
        sumber: insight.source,
        tren: insight.trend,
        tahun_akhir: insight.final_year,
        nilai_akhir: insight.final_value,
    }))
}

/// GET /report/:sumber - one-page PDF
async fn report(State(state): State<AppState>, Path(sumber): Path<String>) -> Result<Response, ApiError> {
    let (source, bytes) = run_blocking(move || {
        let forecast = forecast_source(&state.dataset.augmented, &sumber, &state.options)?;
        let insight = summarize(&forecast)?;
        let bytes = render_pdf(&forecast, &insight)?;
        Ok((forecast.source, bytes))
    })
    .await?;

    let disposition = format!("attachment; filename=\"laporan_{}.pdf\"", report_file_stem(&source));
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Lowercase `[a-z0-9_]` form of a source name, safe inside a quoted header value.
fn report_file_stem(source: &str) -> String {
    source
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// GET /series - history and forecast for every source
async fn series(State(state): State<AppState>) -> Result<Json<Vec<SeriesResponse>>, ApiError> {
    let out = run_blocking(move || {
        let augmented = &state.dataset.augmented;
        let forecasts = forecast_all(augmented, &state.options)?;
        Ok(forecasts
            .into_iter()
            .map(|f| SeriesResponse {
                historis: augmented.yearly_means(&f.source),
                sumber: f.source,
                prediksi: f.points,
            })
            .collect::<Vec<_>>())
    })
    .await?;
    Ok(Json(out))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sources", get(list_sources))
        .route("/predict", post(predict))
        .route("/insight/:sumber", get(insight))
        .route("/report/:sumber", get(report))
        .route("/series", get(series))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HistoricalRecord;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> AppState {
        let dataset = Dataset::from_records(
            vec![HistoricalRecord {
                source: "Surya".to_string(),
                year: 2019,
                potential: 100.0,
            }],
            42,
        );
        AppState::new(dataset, ForecastOptions::default())
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_router(create_test_state());
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn report_file_stem_is_header_safe() {
        assert_eq!(report_file_stem("Panas Bumi"), "panas_bumi");
        assert_eq!(report_file_stem("Air\"; x=1"), "air___x_1");
        assert_eq!(report_file_stem("Énergie"), "_nergie");
    }

    #[tokio::test]
    async fn test_missing_form_field_is_json_bad_request() {
        let app = create_router(create_test_state());
        let request = Request::builder()
            .method("POST")
            .uri("/predict")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("nama=Surya"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(!error.error.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_source_is_bad_request() {
        let app = create_router(create_test_state());
        let request = Request::builder()
            .method("POST")
            .uri("/predict")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("sumber=Angin"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
