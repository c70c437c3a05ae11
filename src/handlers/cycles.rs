//! Activity cycle and heatmap handlers

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::common::{bad_request, cached_buckets, run_blocking, ApiError};
use crate::models::common::YearsQuery;
use crate::models::cycles::{
    cycle_label, CyclePoint, CycleQuery, CycleResponse, HeatmapMetric, HeatmapResponse,
    YearMonthQuery, MONTH_LABELS, WEEKDAY_LABELS,
};
use crate::services::profiler::{profile, profile_by, Reducer};
use crate::services::resampler::{filter_years, Bucket, TimeScale};
use crate::AppState;

/// GET /api/cycles
///
/// Mean volume and mean range of the period's buckets, keyed by hour of
/// day (hourly buckets), weekday (daily buckets) or month (monthly buckets).
///
/// # Query Parameters
/// - `period`: hourly, weekday, monthly (default: hourly)
/// - `years`: comma-separated years (default: all)
/// - `usd`: report volume in quote currency (default: false)
pub async fn get_cycles(
    State(state): State<AppState>,
    Query(query): Query<CycleQuery>,
) -> Result<Json<CycleResponse>, ApiError> {
    let (period, years) = query
        .validate()
        .map_err(|(message, code)| bad_request(message, code))?;
    let usd = query.usd;

    let buckets = filter_years(&cached_buckets(&state, period.scale()).await?, &years);

    let key = |b: &Bucket| period.key(b);
    let volume = profile_by(
        &buckets,
        key,
        |b| Some(if usd { b.traded_quote_volume } else { b.volume }),
        Reducer::Mean,
    );
    let volatility = profile_by(&buckets, key, |b| Some(b.range), Reducer::Mean);
    let samples = profile_by(&buckets, key, |_| Some(1.0), Reducer::Sum);

    let data: Vec<CyclePoint> = period
        .keys()
        .into_iter()
        .filter_map(|k| {
            let count = samples.get(&k).copied()?;
            Some(CyclePoint {
                key: k,
                label: cycle_label(period, k),
                mean_volume: volume.get(&k).copied(),
                mean_volatility: volatility.get(&k).copied(),
                samples: count as usize,
            })
        })
        .collect();

    info!(
        period = period.as_str(),
        usd,
        buckets = buckets.len(),
        "Cycle profile computed"
    );

    Ok(Json(CycleResponse {
        period: period.as_str().to_string(),
        usd,
        years: years.resolve(state.dataset.years()),
        data,
    }))
}

/// GET /api/heatmaps/weekday-hour
///
/// Mean minute volume for every weekday × hour-of-day cell.
pub async fn get_weekday_hour_heatmap(
    State(state): State<AppState>,
    Query(query): Query<YearsQuery>,
) -> Result<Json<HeatmapResponse>, ApiError> {
    let years = query
        .validate()
        .map_err(|message| bad_request(message, "INVALID_YEARS"))?;

    let dataset = Arc::clone(&state.dataset);
    let values = run_blocking(move || {
        let matrix = profile(
            dataset.rows(),
            |r| r.weekday,
            |r| r.hour,
            |r| years.contains(r.year).then_some(r.volume),
            Reducer::Mean,
        );
        let weekdays: Vec<u32> = (0..7).collect();
        let hours: Vec<u32> = (0..24).collect();
        matrix.grid(&weekdays, &hours)
    })
    .await?;

    Ok(Json(HeatmapResponse {
        metric: "volume".to_string(),
        rows: WEEKDAY_LABELS.iter().map(|s| s.to_string()).collect(),
        columns: (0..24).map(|h| format!("{:02}", h)).collect(),
        values,
    }))
}

/// GET /api/heatmaps/year-month
///
/// Monthly total volume or monthly range laid out as year × month.
///
/// # Query Parameters
/// - `metric`: volume, volatility (default: volume)
/// - `usd`: volume in quote currency (default: false)
pub async fn get_year_month_heatmap(
    State(state): State<AppState>,
    Query(query): Query<YearMonthQuery>,
) -> Result<Json<HeatmapResponse>, ApiError> {
    let (metric, years) = query
        .validate()
        .map_err(|(message, code)| bad_request(message, code))?;
    let usd = query.usd;

    let buckets = filter_years(&cached_buckets(&state, TimeScale::Month).await?, &years);
    let matrix = profile(
        &buckets,
        |b| b.year,
        |b| b.month,
        |b| Some(metric.value(b, usd)),
        Reducer::Mean,
    );

    let year_keys = matrix.row_keys();
    let months: Vec<u32> = (1..=12).collect();
    let metric_name = if usd && metric == HeatmapMetric::Volume {
        "volume_usd"
    } else {
        metric.as_str()
    };

    Ok(Json(HeatmapResponse {
        metric: metric_name.to_string(),
        rows: year_keys.iter().map(|y| y.to_string()).collect(),
        columns: MONTH_LABELS.iter().map(|s| s.to_string()).collect(),
        values: matrix.grid(&year_keys, &months),
    }))
}
