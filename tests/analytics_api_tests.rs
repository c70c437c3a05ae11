mod common;

use axum::http::StatusCode;
use serde_json::Value;

use crate::common::{approx, get_json};

fn f(value: &Value) -> f64 {
    value.as_f64().unwrap()
}

// Daily closes 110 / 90 / 95: returns -18.18% then +5.56%
const DAY2_RETURN: f64 = (90.0 / 110.0 - 1.0) * 100.0;
const DAY3_RETURN: f64 = (95.0 / 90.0 - 1.0) * 100.0;

#[tokio::test]
async fn test_stats_close_all_years() {
    let (status, json) = get_json("/api/stats?variable=close").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["variable"], "close");
    assert_eq!(json["years"], serde_json::json!([2023, 2024]));
    assert_eq!(json["describe"]["count"], 5);
    assert_eq!(f(&json["describe"]["max"]), 120.0);
    assert_eq!(json["winsorized"], false);
    assert_eq!(json["chart"]["kind"], "histogram");
    assert_eq!(json["chart"]["bins"].as_array().unwrap().len(), 40);
}

#[tokio::test]
async fn test_stats_year_filter_and_empty_selection() {
    let (_, json) = get_json("/api/stats?variable=close&years=2024").await;
    assert_eq!(json["describe"]["count"], 3);
    assert_eq!(json["years"], serde_json::json!([2024]));

    let (status, json) = get_json("/api/stats?variable=volume&years=&chart=density").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["describe"]["count"], 0);
    assert!(json["describe"]["mean"].is_null());
    assert!(json["chart"]["points"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_stats_daily_return_box() {
    let (status, json) = get_json("/api/stats?variable=return_daily_pct&chart=box").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["describe"]["count"], 2);
    assert_eq!(json["chart"]["kind"], "box");
    assert!(approx(f(&json["chart"]["summary"]["min"]), DAY2_RETURN));
    assert!(approx(f(&json["chart"]["summary"]["max"]), DAY3_RETURN));
    // Too few values for skewness
    assert!(json["describe"]["skewness"].is_null());
}

#[tokio::test]
async fn test_stats_rejects_unknown_values() {
    let (status, json) = get_json("/api/stats?variable=price").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_VARIABLE");

    let (status, json) = get_json("/api/stats?chart=pie").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_CHART");

    let (status, json) = get_json("/api/stats?years=twenty").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_YEARS");
}

#[tokio::test]
async fn test_daily_series() {
    let (status, json) = get_json("/api/series?scale=day").await;
    assert_eq!(status, StatusCode::OK);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);

    assert!(data[0]["returnPct"].is_null());
    assert_eq!(f(&data[0]["close"]), 110.0);
    assert_eq!(f(&data[0]["volume"]), 3.0);

    assert!(approx(f(&data[1]["returnPct"]), DAY2_RETURN));
    assert_eq!(f(&data[1]["volatility"]), 32.0);
    assert_eq!(f(&data[1]["volumeUsd"]), 630.0);
    assert_eq!(f(&data[1]["peak"]), 110.0);
    assert!(approx(f(&data[1]["drawdownPct"]), DAY2_RETURN));
    assert_eq!(data[1]["tickCount"], 2);
}

#[tokio::test]
async fn test_series_year_filter_keeps_all_time_peak() {
    let (_, json) = get_json("/api/series?scale=daily&years=2024").await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(f(&data[0]["peak"]), 110.0);
    assert!(f(&data[0]["drawdownPct"]) < 0.0);
}

#[tokio::test]
async fn test_series_empty_selection_and_bad_scale() {
    let (status, json) = get_json("/api/series?scale=week&years=").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"].as_array().unwrap().is_empty());

    let (status, json) = get_json("/api/series?scale=year").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_SCALE");
}

#[tokio::test]
async fn test_weekly_and_monthly_series() {
    // 2023-12-31 is a Sunday: its week starts 2023-12-25
    let (_, json) = get_json("/api/series?scale=week").await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["timestamp"], "2023-12-25T00:00:00Z");
    assert_eq!(data[1]["timestamp"], "2024-01-01T00:00:00Z");

    let (_, json) = get_json("/api/series?scale=month").await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(f(&data[1]["volume"]), 12.0);
}

#[tokio::test]
async fn test_relation_skips_undefined_returns() {
    let (status, json) =
        get_json("/api/series/relation?scale=day&relation=return_volatility").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["xField"], "return");
    assert_eq!(json["yField"], "volatility");
    let points = json["points"].as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert!(approx(f(&points[0]["x"]), DAY2_RETURN));
    assert_eq!(f(&points[0]["y"]), 32.0);

    let (status, json) = get_json("/api/series/relation?relation=open_close").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_RELATION");
}

#[tokio::test]
async fn test_distribution_of_daily_range() {
    let (status, json) = get_json("/api/series/distribution?field=volatility").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 3);
    assert_eq!(f(&json["summary"]["median"]), 12.0);
    assert_eq!(f(&json["summary"]["max"]), 32.0);

    let (_, json) = get_json("/api/series/distribution?field=volatility&years=").await;
    assert_eq!(json["count"], 0);
    assert!(json["summary"].is_null());
}

#[tokio::test]
async fn test_hourly_cycle() {
    let (status, json) = get_json("/api/cycles?period=hourly").await;
    assert_eq!(status, StatusCode::OK);
    let data = json["data"].as_array().unwrap();
    let keys: Vec<u64> = data.iter().map(|p| p["key"].as_u64().unwrap()).collect();
    assert_eq!(keys, vec![0, 12, 23]);
    assert_eq!(f(&data[0]["meanVolume"]), 7.0);
    assert_eq!(f(&data[0]["meanVolatility"]), 32.0);
    assert_eq!(data[0]["label"], "00:00");
    assert_eq!(f(&data[2]["meanVolume"]), 3.0);

    // Quote volume sums volume × close per minute: 1×100 + 2×110
    let (_, json) = get_json("/api/cycles?period=hourly&usd=true").await;
    assert_eq!(json["usd"], true);
    assert_eq!(f(&json["data"][2]["meanVolume"]), 320.0);
}

#[tokio::test]
async fn test_weekday_cycle_and_filters() {
    let (_, json) = get_json("/api/cycles?period=weekday").await;
    let data = json["data"].as_array().unwrap();
    let labels: Vec<&str> = data.iter().map(|p| p["label"].as_str().unwrap()).collect();
    assert_eq!(labels, vec!["Monday", "Tuesday", "Sunday"]);
    assert_eq!(data[0]["samples"], 1);

    let (_, json) = get_json("/api/cycles?period=monthly&years=2023").await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["label"], "Dec");
    assert_eq!(json["years"], serde_json::json!([2023]));

    let (status, json) = get_json("/api/cycles?period=yearly").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_PERIOD");
}

#[tokio::test]
async fn test_weekday_hour_heatmap() {
    let (status, json) = get_json("/api/heatmaps/weekday-hour").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["rows"].as_array().unwrap().len(), 7);
    assert_eq!(json["columns"].as_array().unwrap().len(), 24);

    let values = &json["values"];
    assert_eq!(f(&values[6][23]), 1.5);
    assert_eq!(f(&values[0][0]), 3.5);
    assert_eq!(f(&values[1][12]), 5.0);
    assert!(values[2][0].is_null());

    let (_, json) = get_json("/api/heatmaps/weekday-hour?years=2024").await;
    assert!(json["values"][6][23].is_null());
    assert_eq!(f(&json["values"][0][0]), 3.5);
}

#[tokio::test]
async fn test_year_month_heatmap() {
    let (status, json) = get_json("/api/heatmaps/year-month").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["metric"], "volume");
    assert_eq!(json["rows"], serde_json::json!(["2023", "2024"]));
    assert_eq!(json["columns"].as_array().unwrap().len(), 12);
    assert_eq!(f(&json["values"][0][11]), 3.0);
    assert_eq!(f(&json["values"][1][0]), 12.0);
    assert!(json["values"][0][0].is_null());

    let (_, json) = get_json("/api/heatmaps/year-month?metric=volatility&years=2024").await;
    assert_eq!(json["rows"], serde_json::json!(["2024"]));
    assert_eq!(f(&json["values"][0][0]), 33.0);

    let (_, json) = get_json("/api/heatmaps/year-month?usd=true").await;
    assert_eq!(json["metric"], "volume_usd");
    assert_eq!(f(&json["values"][0][11]), 320.0);

    let (status, json) = get_json("/api/heatmaps/year-month?metric=price").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_METRIC");
}

#[tokio::test]
async fn test_annual_performance_and_volatility() {
    let (status, json) = get_json("/api/performance/annual").await;
    assert_eq!(status, StatusCode::OK);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["year"], 2023);
    assert_eq!(f(&data[0]["returnPct"]), 0.0);
    assert!(approx(f(&data[1]["returnPct"]), DAY3_RETURN));

    let (_, json) = get_json("/api/performance/volatility").await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(f(&data[0]["meanRange"]), 12.0);
    assert_eq!(f(&data[1]["meanRange"]), 20.0);
    assert_eq!(data[1]["observations"], 2);
}

#[tokio::test]
async fn test_drawdown_curve() {
    let (status, json) = get_json("/api/performance/drawdown").await;
    assert_eq!(status, StatusCode::OK);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    for point in data {
        assert!(f(&point["drawdownPct"]) <= 0.0);
    }
    assert_eq!(f(&data[0]["drawdownPct"]), 0.0);
    assert!(approx(f(&json["maxDrawdown"]["drawdownPct"]), DAY2_RETURN));
    assert_eq!(json["maxDrawdown"]["timestamp"], "2024-01-01T00:00:00Z");

    let (_, json) = get_json("/api/performance/drawdown?years=").await;
    assert!(json["data"].as_array().unwrap().is_empty());
    assert!(json["maxDrawdown"].is_null());

    let (status, json) = get_json("/api/performance/annual?years=20x3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_YEARS");
}
