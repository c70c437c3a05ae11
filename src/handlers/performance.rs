//! Long-horizon performance handlers
//!
//! All three views work on daily buckets. Drawdown is measured against the
//! all-time peak of the full history, so a year filter never resets it.

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use crate::handlers::common::{bad_request, cached_buckets, ApiError};
use crate::models::common::YearsQuery;
use crate::models::performance::{
    AnnualPerformanceResponse, AnnualVolatilityResponse, DrawdownResponse,
};
use crate::services::metrics::{
    annual_performance, annual_volatility, max_drawdown, DrawdownPoint,
};
use crate::services::resampler::{filter_years, Bucket, TimeScale};
use crate::AppState;

async fn daily_buckets(state: &AppState, query: &YearsQuery) -> Result<Vec<Bucket>, ApiError> {
    let years = query
        .validate()
        .map_err(|message| bad_request(message, "INVALID_YEARS"))?;
    Ok(filter_years(&cached_buckets(state, TimeScale::Day).await?, &years))
}

/// GET /api/performance/annual
///
/// Return from the first to the last daily close of each selected year.
pub async fn get_annual_performance(
    State(state): State<AppState>,
    Query(query): Query<YearsQuery>,
) -> Result<Json<AnnualPerformanceResponse>, ApiError> {
    let buckets = daily_buckets(&state, &query).await?;
    let data = annual_performance(&buckets);

    info!(years = data.len(), "Annual performance computed");
    Ok(Json(AnnualPerformanceResponse { data }))
}

/// GET /api/performance/volatility
pub async fn get_annual_volatility(
    State(state): State<AppState>,
    Query(query): Query<YearsQuery>,
) -> Result<Json<AnnualVolatilityResponse>, ApiError> {
    let buckets = daily_buckets(&state, &query).await?;
    Ok(Json(AnnualVolatilityResponse {
        data: annual_volatility(&buckets),
    }))
}

/// GET /api/performance/drawdown
pub async fn get_drawdown(
    State(state): State<AppState>,
    Query(query): Query<YearsQuery>,
) -> Result<Json<DrawdownResponse>, ApiError> {
    let buckets = daily_buckets(&state, &query).await?;
    let data: Vec<DrawdownPoint> = buckets.iter().map(DrawdownPoint::from).collect();
    let deepest = max_drawdown(&data);

    Ok(Json(DrawdownResponse {
        data,
        max_drawdown: deepest,
    }))
}
