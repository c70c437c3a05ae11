//! Helpers shared by the dashboard handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{error, warn};

use crate::models::common::{ErrorResponse, HealthResponse};
use crate::services::resampler::{Bucket, TimeScale};
use crate::AppState;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn bad_request(message: String, code: &str) -> ApiError {
    warn!(code, error = %message, "Rejected request");
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message, code)))
}

pub fn internal_error(message: String) -> ApiError {
    error!(error = %message, "Request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(message, "INTERNAL_ERROR")),
    )
}

/// Run CPU-bound work off the async executor.
pub async fn run_blocking<F, T>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| internal_error(format!("Worker task failed: {}", e)))
}

/// Full-history buckets at `scale` from the shared cache.
pub async fn cached_buckets(
    state: &AppState,
    scale: TimeScale,
) -> Result<Arc<Vec<Bucket>>, ApiError> {
    state.buckets.buckets(scale).await.map_err(internal_error)
}

/// GET /
pub async fn root() -> &'static str {
    "Bitcoin OHLCV dashboard backend"
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        rows: state.dataset.len(),
    })
}
