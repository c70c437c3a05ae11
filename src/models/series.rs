//! Resampled series models
//!
//! Models for GET /api/series, /api/series/relation and
//! /api/series/distribution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::distribution::BoxSummary;
use crate::services::resampler::{Bucket, TimeScale};
use crate::services::selection::YearSelection;
use crate::services::variables::BucketField;

/// Scatter pairs offered by the relations view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    PriceVolatility,
    VolumeUsdVolatility,
    ReturnVolatility,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::PriceVolatility => "price_volatility",
            Relation::VolumeUsdVolatility => "volume_usd_volatility",
            Relation::ReturnVolatility => "return_volatility",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "price_volatility" => Some(Relation::PriceVolatility),
            "volume_usd_volatility" => Some(Relation::VolumeUsdVolatility),
            "return_volatility" => Some(Relation::ReturnVolatility),
            _ => None,
        }
    }

    /// `(x, y)` columns of the scatter
    pub fn fields(&self) -> (BucketField, BucketField) {
        match self {
            Relation::PriceVolatility => (BucketField::Close, BucketField::Volatility),
            Relation::VolumeUsdVolatility => (BucketField::VolumeUsd, BucketField::Volatility),
            Relation::ReturnVolatility => (BucketField::Return, BucketField::Volatility),
        }
    }
}

fn default_scale() -> String {
    "day".to_string()
}

fn parse_scale(raw: &str) -> Result<TimeScale, (String, &'static str)> {
    TimeScale::from_str(raw).ok_or_else(|| {
        (
            format!(
                "Invalid scale: '{}'. Must be one of: hour, day, week, month",
                raw
            ),
            "INVALID_SCALE",
        )
    })
}

fn parse_years(raw: Option<&str>) -> Result<YearSelection, (String, &'static str)> {
    YearSelection::parse(raw).map_err(|e| (e, "INVALID_YEARS"))
}

/// Query parameters for GET /api/series
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesQuery {
    /// hour, day, week or month (defaults to day)
    #[serde(default = "default_scale")]
    pub scale: String,
    pub years: Option<String>,
}

impl SeriesQuery {
    pub fn validate(&self) -> Result<(TimeScale, YearSelection), (String, &'static str)> {
        Ok((parse_scale(&self.scale)?, parse_years(self.years.as_deref())?))
    }
}

/// Query parameters for GET /api/series/relation
#[derive(Debug, Clone, Deserialize)]
pub struct RelationQuery {
    #[serde(default = "default_scale")]
    pub scale: String,
    pub years: Option<String>,
    #[serde(default = "default_relation")]
    pub relation: String,
}

fn default_relation() -> String {
    "price_volatility".to_string()
}

impl RelationQuery {
    pub fn validate(&self) -> Result<(TimeScale, YearSelection, Relation), (String, &'static str)> {
        let relation = Relation::from_str(&self.relation).ok_or_else(|| {
            (
                format!(
                    "Invalid relation: '{}'. Must be one of: price_volatility, volume_usd_volatility, return_volatility",
                    self.relation
                ),
                "INVALID_RELATION",
            )
        })?;
        Ok((
            parse_scale(&self.scale)?,
            parse_years(self.years.as_deref())?,
            relation,
        ))
    }
}

/// Query parameters for GET /api/series/distribution
#[derive(Debug, Clone, Deserialize)]
pub struct DistributionQuery {
    #[serde(default = "default_scale")]
    pub scale: String,
    pub years: Option<String>,
    /// return, volatility or volume_usd (defaults to return)
    #[serde(default = "default_field")]
    pub field: String,
}

fn default_field() -> String {
    "return".to_string()
}

impl DistributionQuery {
    pub fn validate(
        &self,
    ) -> Result<(TimeScale, YearSelection, BucketField), (String, &'static str)> {
        let field = BucketField::from_str(&self.field)
            .filter(|f| {
                matches!(
                    f,
                    BucketField::Return | BucketField::Volatility | BucketField::VolumeUsd
                )
            })
            .ok_or_else(|| {
                (
                    format!(
                        "Invalid field: '{}'. Must be one of: return, volatility, volume_usd",
                        self.field
                    ),
                    "INVALID_FIELD",
                )
            })?;
        Ok((
            parse_scale(&self.scale)?,
            parse_years(self.years.as_deref())?,
            field,
        ))
    }
}

/// One resampled period
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketView {
    pub timestamp: DateTime<Utc>,
    pub year: i32,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Volume × closing price of the period
    pub volume_usd: f64,
    /// Percent change of close versus the previous period
    pub return_pct: Option<f64>,
    /// High − low of the period
    pub volatility: f64,
    pub peak: f64,
    pub drawdown_pct: f64,
    pub tick_count: usize,
}

impl From<&Bucket> for BucketView {
    fn from(bucket: &Bucket) -> Self {
        Self {
            timestamp: bucket.start,
            year: bucket.year,
            open: bucket.open,
            high: bucket.high,
            low: bucket.low,
            close: bucket.close,
            volume: bucket.volume,
            volume_usd: bucket.volume_quote,
            return_pct: BucketField::Return.value(bucket),
            volatility: bucket.range,
            peak: bucket.peak,
            drawdown_pct: bucket.drawdown_pct,
            tick_count: bucket.tick_count,
        }
    }
}

/// Response for GET /api/series
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesResponse {
    pub scale: String,
    pub years: Vec<i32>,
    pub data: Vec<BucketView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationPoint {
    pub timestamp: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
}

/// Response for GET /api/series/relation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationResponse {
    pub scale: String,
    pub relation: String,
    pub x_field: String,
    pub y_field: String,
    pub points: Vec<RelationPoint>,
}

/// Response for GET /api/series/distribution
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionResponse {
    pub scale: String,
    pub field: String,
    pub count: usize,
    pub summary: Option<BoxSummary>,
}
