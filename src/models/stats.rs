//! Descriptive statistics models
//!
//! Models for GET /api/stats: summary of one variable over the selected
//! years plus the data for the chosen chart.

use serde::{Deserialize, Serialize};

use crate::services::distribution::{BoxSummary, DensityPoint, HistogramBin};
use crate::services::metrics::Describe;
use crate::services::selection::YearSelection;
use crate::services::variables::Variable;

pub const HISTOGRAM_BINS: usize = 40;
pub const DENSITY_POINTS: usize = 200;

/// Chart drawn from the prepared series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Histogram,
    Density,
    Box,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Histogram => "histogram",
            ChartKind::Density => "density",
            ChartKind::Box => "box",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "histogram" | "hist" => Some(ChartKind::Histogram),
            "density" | "kde" => Some(ChartKind::Density),
            "box" | "boxplot" => Some(ChartKind::Box),
            _ => None,
        }
    }
}

/// Query parameters for the statistics endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct StatsQuery {
    /// Variable name (defaults to close)
    #[serde(default = "default_variable")]
    pub variable: String,
    pub years: Option<String>,
    /// histogram, density or box (defaults to histogram)
    #[serde(default = "default_chart")]
    pub chart: String,
}

fn default_variable() -> String {
    "close".to_string()
}

fn default_chart() -> String {
    "histogram".to_string()
}

/// Validated statistics request
#[derive(Debug, Clone, PartialEq)]
pub struct StatsRequest {
    pub variable: Variable,
    pub years: YearSelection,
    pub chart: ChartKind,
}

impl StatsQuery {
    /// Returns the error code alongside the message on failure
    pub fn validate(&self) -> Result<StatsRequest, (String, &'static str)> {
        let variable = Variable::from_str(&self.variable).ok_or_else(|| {
            let names: Vec<&str> = Variable::ALL.iter().map(|v| v.as_str()).collect();
            (
                format!(
                    "Invalid variable: '{}'. Must be one of: {}",
                    self.variable,
                    names.join(", ")
                ),
                "INVALID_VARIABLE",
            )
        })?;

        let chart = ChartKind::from_str(&self.chart).ok_or_else(|| {
            (
                format!(
                    "Invalid chart: '{}'. Must be one of: histogram, density, box",
                    self.chart
                ),
                "INVALID_CHART",
            )
        })?;

        let years =
            YearSelection::parse(self.years.as_deref()).map_err(|e| (e, "INVALID_YEARS"))?;

        Ok(StatsRequest {
            variable,
            years,
            chart,
        })
    }
}

/// Chart data computed from the prepared series
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChartPayload {
    Histogram { bins: Vec<HistogramBin> },
    Density { points: Vec<DensityPoint> },
    #[serde(rename = "box")]
    BoxPlot { summary: Option<BoxSummary> },
}

/// Response for GET /api/stats
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub variable: String,
    /// Years actually present in the selection
    pub years: Vec<i32>,
    /// Statistics of the filtered (untransformed) series
    pub describe: Describe,
    /// Values dropped above the 99th percentile before charting
    pub winsorized: bool,
    pub log_scaled: bool,
    /// Values plotted after preparation
    pub plotted_count: usize,
    pub chart: ChartPayload,
}
