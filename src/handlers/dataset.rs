//! Dataset exploration handlers
//!
//! GET /api/dataset/overview, /api/dataset/preview and /api/dataset/download.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::common::{internal_error, run_blocking, ApiError};
use crate::models::dataset::{
    ColumnInfo, ColumnSummary, DatasetOverview, DerivedVariable, FeatureRowView, PreviewQuery,
    PreviewResponse,
};
use crate::services::export::{csv_chunks, EXPORT_FILENAME};
use crate::services::features::{Dataset, FeatureRow};
use crate::services::metrics::describe;
use crate::AppState;

const RAW_COLUMNS: usize = 6;

const DERIVED_VARIABLES: [(&str, &str); 8] = [
    ("Return", "Relative change of the close versus the previous row"),
    ("Volatility", "Range of the period (High - Low)"),
    ("RollingVol", "Sample standard deviation of Close over the trailing window"),
    ("Year", "Calendar year of the timestamp (UTC)"),
    ("Month", "Calendar month, 1-12"),
    ("Day", "Day of the month"),
    ("Hour", "Hour of the day (UTC), for intraday cycles"),
    ("Weekday", "Day of the week (0 = Monday, 6 = Sunday)"),
];

/// GET /api/dataset/overview
///
/// Structure of the loaded table: size, column types, missing values,
/// duplicates, per-column statistics and the derived-variable glossary.
pub async fn get_dataset_overview(
    State(state): State<AppState>,
) -> Result<Json<DatasetOverview>, ApiError> {
    let dataset = Arc::clone(&state.dataset);
    let overview = run_blocking(move || build_overview(&dataset)).await?;

    info!(rows = overview.rows, "Dataset overview computed");
    Ok(Json(overview))
}

fn build_overview(dataset: &Dataset) -> DatasetOverview {
    let rows = dataset.rows();
    let missing_returns = rows.iter().filter(|r| r.ret.is_none()).count();
    let missing_rolling = rows.iter().filter(|r| r.rolling_volatility.is_none()).count();

    let column = |name, dtype, missing, derived| ColumnInfo {
        name,
        dtype,
        missing,
        derived,
    };
    let column_info = vec![
        column("Timestamp", "datetime", 0, false),
        column("Open", "float64", 0, false),
        column("High", "float64", 0, false),
        column("Low", "float64", 0, false),
        column("Close", "float64", 0, false),
        column("Volume", "float64", 0, false),
        column("Return", "float64", missing_returns, true),
        column("Volatility", "float64", 0, true),
        column("RollingVol", "float64", missing_rolling, true),
        column("Year", "int32", 0, true),
        column("Month", "int32", 0, true),
        column("Day", "int32", 0, true),
        column("Hour", "int32", 0, true),
        column("Weekday", "int32", 0, true),
    ];

    let extractors: [(&'static str, fn(&FeatureRow) -> f64); 5] = [
        ("Open", |r| r.open),
        ("High", |r| r.high),
        ("Low", |r| r.low),
        ("Close", |r| r.close),
        ("Volume", |r| r.volume),
    ];
    let summary = extractors
        .iter()
        .map(|&(column, extract)| {
            let values: Vec<f64> = rows.iter().map(extract).collect();
            ColumnSummary {
                column,
                stats: describe(&values),
            }
        })
        .collect();

    DatasetOverview {
        rows: dataset.len(),
        columns: RAW_COLUMNS,
        column_info,
        duplicate_rows: dataset.duplicate_rows(),
        summary,
        derived_variables: DERIVED_VARIABLES
            .iter()
            .map(|&(name, description)| DerivedVariable { name, description })
            .collect(),
        years: dataset.years().to_vec(),
        rolling_window: dataset.rolling_window(),
        first_timestamp: rows.first().map(|r| r.timestamp),
        last_timestamp: rows.last().map(|r| r.timestamp),
        gaps: dataset.gaps().clone(),
    }
}

/// GET /api/dataset/preview
///
/// # Query Parameters
/// - `rows`: number of leading rows, clamped to 5..=50 (default: 10)
pub async fn get_dataset_preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Json<PreviewResponse> {
    let count = query.row_count();
    let data: Vec<FeatureRowView> = state
        .dataset
        .rows()
        .iter()
        .take(count)
        .map(FeatureRowView::from)
        .collect();

    Json(PreviewResponse {
        data,
        total_rows: state.dataset.len(),
    })
}

/// GET /api/dataset/download
///
/// Streams the feature-augmented table as `DATASET_BTC.csv`.
pub async fn download_dataset(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", EXPORT_FILENAME))
            .map_err(|e| internal_error(format!("Invalid header: {}", e)))?,
    );

    info!(rows = state.dataset.len(), "Streaming dataset download");
    let body = Body::from_stream(csv_chunks(Arc::clone(&state.dataset)));

    Ok((headers, body))
}
