//! Resampled series handlers
//!
//! GET /api/series, /api/series/relation and /api/series/distribution.

use axum::{
    extract::{Query, State},
    Json,
};
use std::collections::BTreeSet;
use tracing::info;

use crate::handlers::common::{bad_request, cached_buckets, ApiError};
use crate::models::series::{
    BucketView, DistributionQuery, DistributionResponse, RelationPoint, RelationQuery,
    RelationResponse, SeriesQuery, SeriesResponse,
};
use crate::services::distribution::box_summary;
use crate::services::resampler::filter_years;
use crate::AppState;

/// GET /api/series
///
/// # Query Parameters
/// - `scale`: hour, day, week, month (default: day)
/// - `years`: comma-separated years (default: all)
pub async fn get_series(
    State(state): State<AppState>,
    Query(query): Query<SeriesQuery>,
) -> Result<Json<SeriesResponse>, ApiError> {
    let (scale, years) = query
        .validate()
        .map_err(|(message, code)| bad_request(message, code))?;

    let buckets = filter_years(&cached_buckets(&state, scale).await?, &years);
    let present: BTreeSet<i32> = buckets.iter().map(|b| b.year).collect();

    info!(scale = scale.as_str(), count = buckets.len(), "Series selected");

    Ok(Json(SeriesResponse {
        scale: scale.as_str().to_string(),
        years: present.into_iter().collect(),
        data: buckets.iter().map(BucketView::from).collect(),
    }))
}

/// GET /api/series/relation
///
/// Scatter of a bucket column against the bucket range. Buckets where
/// either coordinate is undefined (the first return) are skipped.
pub async fn get_relation(
    State(state): State<AppState>,
    Query(query): Query<RelationQuery>,
) -> Result<Json<RelationResponse>, ApiError> {
    let (scale, years, relation) = query
        .validate()
        .map_err(|(message, code)| bad_request(message, code))?;
    let (x_field, y_field) = relation.fields();

    let buckets = filter_years(&cached_buckets(&state, scale).await?, &years);
    let points: Vec<RelationPoint> = buckets
        .iter()
        .filter_map(|b| {
            Some(RelationPoint {
                timestamp: b.start,
                x: x_field.value(b)?,
                y: y_field.value(b)?,
            })
        })
        .collect();

    Ok(Json(RelationResponse {
        scale: scale.as_str().to_string(),
        relation: relation.as_str().to_string(),
        x_field: x_field.as_str().to_string(),
        y_field: y_field.as_str().to_string(),
        points,
    }))
}

/// GET /api/series/distribution
///
/// Box-plot summary of return, volatility or USD volume per bucket.
pub async fn get_distribution(
    State(state): State<AppState>,
    Query(query): Query<DistributionQuery>,
) -> Result<Json<DistributionResponse>, ApiError> {
    let (scale, years, field) = query
        .validate()
        .map_err(|(message, code)| bad_request(message, code))?;

    let buckets = filter_years(&cached_buckets(&state, scale).await?, &years);
    let values: Vec<f64> = buckets.iter().filter_map(|b| field.value(b)).collect();

    Ok(Json(DistributionResponse {
        scale: scale.as_str().to_string(),
        field: field.as_str().to_string(),
        count: values.len(),
        summary: box_summary(&values),
    }))
}
