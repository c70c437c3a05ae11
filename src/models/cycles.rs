//! Activity cycle and heatmap models

use serde::{Deserialize, Serialize};

use crate::services::resampler::{Bucket, TimeScale};
use crate::services::selection::YearSelection;

/// Calendar cycle a profile is keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePeriod {
    Hourly,
    Weekday,
    Monthly,
}

impl CyclePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CyclePeriod::Hourly => "hourly",
            CyclePeriod::Weekday => "weekday",
            CyclePeriod::Monthly => "monthly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hourly" | "hour" => Some(CyclePeriod::Hourly),
            "weekday" | "weekly" => Some(CyclePeriod::Weekday),
            "monthly" | "month" => Some(CyclePeriod::Monthly),
            _ => None,
        }
    }

    /// Buckets the profile is averaged over: hours for the intraday cycle,
    /// days for the weekly one, months for the yearly one.
    pub fn scale(&self) -> TimeScale {
        match self {
            CyclePeriod::Hourly => TimeScale::Hour,
            CyclePeriod::Weekday => TimeScale::Day,
            CyclePeriod::Monthly => TimeScale::Month,
        }
    }

    /// Hour 0-23, weekday 0-6 (Monday first) or month 1-12
    pub fn key(&self, bucket: &Bucket) -> u32 {
        match self {
            CyclePeriod::Hourly => bucket.hour,
            CyclePeriod::Weekday => bucket.weekday,
            CyclePeriod::Monthly => bucket.month,
        }
    }

    pub fn keys(&self) -> Vec<u32> {
        match self {
            CyclePeriod::Hourly => (0..24).collect(),
            CyclePeriod::Weekday => (0..7).collect(),
            CyclePeriod::Monthly => (1..=12).collect(),
        }
    }
}

/// Value shown by the year × month heatmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatmapMetric {
    Volume,
    Volatility,
}

impl HeatmapMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeatmapMetric::Volume => "volume",
            HeatmapMetric::Volatility => "volatility",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "volume" => Some(HeatmapMetric::Volume),
            "volatility" => Some(HeatmapMetric::Volatility),
            _ => None,
        }
    }

    /// Monthly value; volume is the base-asset sum or its quote (USD) sum.
    pub fn value(&self, bucket: &Bucket, usd: bool) -> f64 {
        match self {
            HeatmapMetric::Volume if usd => bucket.traded_quote_volume,
            HeatmapMetric::Volume => bucket.volume,
            HeatmapMetric::Volatility => bucket.range,
        }
    }
}

/// Query parameters for GET /api/cycles
#[derive(Debug, Clone, Deserialize)]
pub struct CycleQuery {
    /// hourly, weekday or monthly (defaults to hourly)
    #[serde(default = "default_period")]
    pub period: String,
    pub years: Option<String>,
    /// Volume in USD rather than BTC
    #[serde(default)]
    pub usd: bool,
}

fn default_period() -> String {
    "hourly".to_string()
}

impl CycleQuery {
    pub fn validate(&self) -> Result<(CyclePeriod, YearSelection), (String, &'static str)> {
        let period = CyclePeriod::from_str(&self.period).ok_or_else(|| {
            (
                format!(
                    "Invalid period: '{}'. Must be one of: hourly, weekday, monthly",
                    self.period
                ),
                "INVALID_PERIOD",
            )
        })?;
        let years =
            YearSelection::parse(self.years.as_deref()).map_err(|e| (e, "INVALID_YEARS"))?;
        Ok((period, years))
    }
}

/// Query parameters for GET /api/heatmaps/year-month
#[derive(Debug, Clone, Deserialize)]
pub struct YearMonthQuery {
    pub years: Option<String>,
    #[serde(default = "default_metric")]
    pub metric: String,
    #[serde(default)]
    pub usd: bool,
}

fn default_metric() -> String {
    "volume".to_string()
}

impl YearMonthQuery {
    pub fn validate(&self) -> Result<(HeatmapMetric, YearSelection), (String, &'static str)> {
        let metric = HeatmapMetric::from_str(&self.metric).ok_or_else(|| {
            (
                format!(
                    "Invalid metric: '{}'. Must be one of: volume, volatility",
                    self.metric
                ),
                "INVALID_METRIC",
            )
        })?;
        let years =
            YearSelection::parse(self.years.as_deref()).map_err(|e| (e, "INVALID_YEARS"))?;
        Ok((metric, years))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CyclePoint {
    pub key: u32,
    pub label: String,
    pub mean_volume: Option<f64>,
    pub mean_volatility: Option<f64>,
    /// Buckets averaged into this key
    pub samples: usize,
}

/// Response for GET /api/cycles
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleResponse {
    pub period: String,
    pub usd: bool,
    pub years: Vec<i32>,
    pub data: Vec<CyclePoint>,
}

/// Matrix payload; `values[i][j]` belongs to `rows[i]` × `columns[j]`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapResponse {
    pub metric: String,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

pub const WEEKDAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Display label for a cycle key
pub fn cycle_label(period: CyclePeriod, key: u32) -> String {
    match period {
        CyclePeriod::Hourly => format!("{:02}:00", key),
        CyclePeriod::Weekday => WEEKDAY_LABELS
            .get(key as usize)
            .map(|s| s.to_string())
            .unwrap_or_else(|| key.to_string()),
        CyclePeriod::Monthly => key
            .checked_sub(1)
            .and_then(|i| MONTH_LABELS.get(i as usize))
            .map(|s| s.to_string())
            .unwrap_or_else(|| key.to_string()),
    }
}
