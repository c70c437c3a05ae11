//! Descriptive statistics handler
//!
//! GET /api/stats for the distribution of one variable over selected years.

use axum::{
    extract::{Query, State},
    Json,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

use crate::handlers::common::{bad_request, cached_buckets, run_blocking, ApiError};
use crate::models::stats::{
    ChartKind, ChartPayload, StatsQuery, StatsResponse, DENSITY_POINTS, HISTOGRAM_BINS,
};
use crate::services::distribution::{box_summary, density, histogram};
use crate::services::metrics::{describe, log_transform, winsorize};
use crate::services::resampler::filter_years;
use crate::services::variables::{Variable, VariableSource};
use crate::AppState;

/// GET /api/stats
///
/// # Query Parameters
/// - `variable`: open, high, low, close, volume, volatility, rolling_vol,
///   return_daily_pct, return_weekly_pct, return_monthly_pct (default: close)
/// - `years`: comma-separated years (default: all)
/// - `chart`: histogram, density, box (default: histogram)
///
/// # Response
/// - 200: statistics of the filtered series and the chart of the prepared one
/// - 400: invalid parameter
pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, ApiError> {
    let request = query
        .validate()
        .map_err(|(message, code)| bad_request(message, code))?;
    let variable = request.variable;

    let (values, years) = match variable.source() {
        VariableSource::Rows => {
            let dataset = Arc::clone(&state.dataset);
            let selection = request.years.clone();
            run_blocking(move || {
                let values: Vec<f64> = dataset
                    .rows()
                    .iter()
                    .filter(|r| selection.contains(r.year))
                    .filter_map(|r| variable.row_value(r))
                    .collect();
                (values, selection.resolve(dataset.years()))
            })
            .await?
        }
        VariableSource::Buckets(scale) => {
            let buckets = filter_years(&cached_buckets(&state, scale).await?, &request.years);
            let years: BTreeSet<i32> = buckets.iter().map(|b| b.year).collect();
            let values: Vec<f64> = buckets
                .iter()
                .filter_map(|b| variable.bucket_value(b))
                .collect();
            (values, years.into_iter().collect())
        }
    };

    let chart_kind = request.chart;
    let response = run_blocking(move || summarize(variable, chart_kind, &values, years)).await?;

    info!(
        variable = variable.as_str(),
        chart = chart_kind.as_str(),
        count = response.describe.count,
        "Statistics computed"
    );
    Ok(Json(response))
}

fn summarize(variable: Variable, chart: ChartKind, values: &[f64], years: Vec<i32>) -> StatsResponse {
    let stats = describe(values);

    let winsorized = variable.is_heavy_tailed() && !values.is_empty();
    let trimmed = winsorize(values, variable);
    let (prepared, log_scaled) = log_transform(&trimmed, variable);

    let chart = match chart {
        ChartKind::Histogram => ChartPayload::Histogram {
            bins: histogram(&prepared, HISTOGRAM_BINS),
        },
        ChartKind::Density => ChartPayload::Density {
            points: density(&prepared, DENSITY_POINTS),
        },
        ChartKind::Box => ChartPayload::BoxPlot {
            summary: box_summary(&prepared),
        },
    };

    StatsResponse {
        variable: variable.as_str().to_string(),
        years,
        describe: stats,
        winsorized,
        log_scaled,
        plotted_count: prepared.len(),
        chart,
    }
}
