use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{common, cycles, dataset, performance, series, stats, text};
use crate::AppState;

/// Every dashboard endpoint, with request tracing and permissive CORS.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(common::root))
        .route("/health", get(common::health))
        .route("/api/dataset/overview", get(dataset::get_dataset_overview))
        .route("/api/dataset/preview", get(dataset::get_dataset_preview))
        .route("/api/dataset/download", get(dataset::download_dataset))
        .route("/api/stats", get(stats::get_stats))
        .route("/api/series", get(series::get_series))
        .route("/api/series/relation", get(series::get_relation))
        .route("/api/series/distribution", get(series::get_distribution))
        .route("/api/cycles", get(cycles::get_cycles))
        .route(
            "/api/heatmaps/weekday-hour",
            get(cycles::get_weekday_hour_heatmap),
        )
        .route(
            "/api/heatmaps/year-month",
            get(cycles::get_year_month_heatmap),
        )
        .route(
            "/api/performance/annual",
            get(performance::get_annual_performance),
        )
        .route(
            "/api/performance/volatility",
            get(performance::get_annual_volatility),
        )
        .route("/api/performance/drawdown", get(performance::get_drawdown))
        .route("/api/text/keywords", post(text::analyze_keywords))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
