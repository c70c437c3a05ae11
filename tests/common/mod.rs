#![allow(dead_code)]

use axum::{body::Body, http::Request, response::Response, Router};
use serde_json::Value;
use tower::ServiceExt;

use btc_dashboard_backend::config::Config;
use btc_dashboard_backend::routes::build_router;
use btc_dashboard_backend::services::features::Dataset;
use btc_dashboard_backend::services::loader::load_ticks_from_reader;
use btc_dashboard_backend::services::stopwords::StopwordSet;
use btc_dashboard_backend::AppState;

/// Five minutes straddling the 2023/2024 new year, plus one on Jan 2.
///
/// Daily closes: 2023-12-31 → 110, 2024-01-01 → 90, 2024-01-02 → 95.
pub const FIXTURE_CSV: &str = "Timestamp,Open,High,Low,Close,Volume
1704067080,100,101,99,100,1.0
1704067140,100,111,99,110,2.0
1704067200,110,121,109,120,3.0
1704067260,120,121,89,90,4.0
1704196800,90,96,88,95,5.0
";

pub fn test_state_from(csv: &str) -> AppState {
    let ticks = load_ticks_from_reader(csv.as_bytes()).expect("fixture should load");
    let config = Config::default();
    let dataset = Dataset::from_ticks(&ticks, config.rolling_window);
    AppState::new(dataset, StopwordSet::french(), &config)
}

pub fn test_router() -> Router {
    build_router(test_state_from(FIXTURE_CSV))
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("router should respond")
}

pub async fn get(uri: &str) -> Response {
    send(
        test_router(),
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub async fn get_json(uri: &str) -> (axum::http::StatusCode, Value) {
    let response = get(uri).await;
    let status = response.status();
    (status, json_body(response).await)
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
