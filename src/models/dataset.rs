//! Dataset exploration models
//!
//! Models for the GET /api/dataset/* endpoints: structure overview,
//! row preview and the CSV download.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::features::FeatureRow;
use crate::services::loader::GapReport;
use crate::services::metrics::Describe;

pub const PREVIEW_MIN_ROWS: usize = 5;
pub const PREVIEW_MAX_ROWS: usize = 50;
pub const PREVIEW_DEFAULT_ROWS: usize = 10;

/// Query parameters for the preview endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewQuery {
    /// Number of rows, clamped to 5..=50 (defaults to 10)
    pub rows: Option<usize>,
}

impl PreviewQuery {
    pub fn row_count(&self) -> usize {
        self.rows
            .unwrap_or(PREVIEW_DEFAULT_ROWS)
            .clamp(PREVIEW_MIN_ROWS, PREVIEW_MAX_ROWS)
    }
}

/// Name, type and missing-value count of one column
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub name: &'static str,
    pub dtype: &'static str,
    pub missing: usize,
    /// Derived columns are computed at load time, not read from the file
    pub derived: bool,
}

/// Descriptive statistics of one raw column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub column: &'static str,
    pub stats: Describe,
}

#[derive(Debug, Clone, Serialize)]
pub struct DerivedVariable {
    pub name: &'static str,
    pub description: &'static str,
}

/// Response for GET /api/dataset/overview
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetOverview {
    pub rows: usize,
    /// Columns present in the source file
    pub columns: usize,
    pub column_info: Vec<ColumnInfo>,
    pub duplicate_rows: usize,
    pub summary: Vec<ColumnSummary>,
    pub derived_variables: Vec<DerivedVariable>,
    pub years: Vec<i32>,
    pub rolling_window: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_timestamp: Option<DateTime<Utc>>,
    pub gaps: GapReport,
}

/// One feature row as exposed to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRowView {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(rename = "return")]
    pub ret: Option<f64>,
    pub volatility: f64,
    pub rolling_vol: Option<f64>,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub weekday: u32,
}

impl From<&FeatureRow> for FeatureRowView {
    fn from(row: &FeatureRow) -> Self {
        Self {
            timestamp: row.timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
            ret: row.ret,
            volatility: row.range,
            rolling_vol: row.rolling_volatility,
            year: row.year,
            month: row.month,
            day: row.day,
            hour: row.hour,
            weekday: row.weekday,
        }
    }
}

/// Response for GET /api/dataset/preview
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub data: Vec<FeatureRowView>,
    pub total_rows: usize,
}
