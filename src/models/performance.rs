//! Long-horizon performance models

use serde::Serialize;

use crate::services::metrics::{AnnualPerformance, AnnualVolatility, DrawdownPoint};

/// Response for GET /api/performance/annual
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualPerformanceResponse {
    pub data: Vec<AnnualPerformance>,
}

/// Response for GET /api/performance/volatility
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualVolatilityResponse {
    pub data: Vec<AnnualVolatility>,
}

/// Response for GET /api/performance/drawdown
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownResponse {
    pub data: Vec<DrawdownPoint>,
    /// Deepest point of the returned curve
    pub max_drawdown: Option<DrawdownPoint>,
}
