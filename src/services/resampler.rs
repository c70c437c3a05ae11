//! Calendar-aligned OHLCV resampling.
//!
//! Bucket boundaries are fixed here rather than inherited from a library
//! default:
//! - hour: top of the UTC hour
//! - day: UTC midnight
//! - week: ISO week, Monday 00:00 UTC
//! - month: first day of the calendar month, 00:00 UTC
//!
//! Buckets are labelled by their start instant and only non-empty buckets are
//! emitted, so gaps in the input shrink the output.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use tracing::debug;

use crate::services::features::{FeatureRow, simple_return};
use crate::services::metrics::drawdown_series;
use crate::services::selection::YearSelection;

/// Bucket granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeScale {
    Hour,
    Day,
    Week,
    Month,
}

impl TimeScale {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeScale::Hour => "hour",
            TimeScale::Day => "day",
            TimeScale::Week => "week",
            TimeScale::Month => "month",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hour" | "hourly" | "h" => Some(TimeScale::Hour),
            "day" | "daily" | "d" => Some(TimeScale::Day),
            "week" | "weekly" | "w" => Some(TimeScale::Week),
            "month" | "monthly" | "m" => Some(TimeScale::Month),
            _ => None,
        }
    }

    /// Start of the bucket containing `ts`.
    pub fn bucket_start(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        // Truncate to hour boundary (e.g., 10:03:45 -> 10:00:00)
        let hour_start = ts
            .with_minute(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(ts);
        if *self == TimeScale::Hour {
            return hour_start;
        }

        let day_start = hour_start.with_hour(0).unwrap_or(hour_start);
        match self {
            TimeScale::Week => {
                day_start - Duration::days(i64::from(day_start.weekday().num_days_from_monday()))
            }
            TimeScale::Month => day_start.with_day(1).unwrap_or(day_start),
            _ => day_start,
        }
    }
}

/// How one output column is reduced over the rows of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    First,
    Last,
    Max,
    Min,
    Sum,
    Mean,
}

impl Aggregation {
    /// Reduce a bucket's values. Empty input yields NaN, except `Sum` (0).
    pub fn reduce<I: IntoIterator<Item = f64>>(self, values: I) -> f64 {
        let mut iter = values.into_iter();
        match self {
            Aggregation::First => iter.next().unwrap_or(f64::NAN),
            Aggregation::Last => iter.last().unwrap_or(f64::NAN),
            Aggregation::Max => iter.fold(f64::NAN, f64::max),
            Aggregation::Min => iter.fold(f64::NAN, f64::min),
            Aggregation::Sum => iter.sum(),
            Aggregation::Mean => {
                let (sum, n) = iter.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
                if n == 0 { f64::NAN } else { sum / n as f64 }
            }
        }
    }
}

/// Per-column aggregation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationSpec {
    pub open: Aggregation,
    pub high: Aggregation,
    pub low: Aggregation,
    pub close: Aggregation,
    pub volume: Aggregation,
}

impl Default for AggregationSpec {
    fn default() -> Self {
        Self {
            open: Aggregation::First,
            high: Aggregation::Max,
            low: Aggregation::Min,
            close: Aggregation::Last,
            volume: Aggregation::Sum,
        }
    }
}

/// One non-empty calendar bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub start: DateTime<Utc>,
    pub year: i32,
    pub month: u32,
    /// 0 = Monday .. 6 = Sunday
    pub weekday: u32,
    pub hour: u32,
    pub tick_count: usize,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Sum of per-row `volume * close`
    pub traded_quote_volume: f64,
    /// Return from the previous bucket's close; `None` for the first bucket
    pub ret: Option<f64>,
    pub range: f64,
    /// `volume * close` at bucket level
    pub volume_quote: f64,
    /// Running maximum of close up to and including this bucket
    pub peak: f64,
    /// `(close - peak) / peak * 100`, always <= 0
    pub drawdown_pct: f64,
}

fn aggregate(start: DateTime<Utc>, rows: &[FeatureRow], spec: &AggregationSpec) -> Bucket {
    let open = spec.open.reduce(rows.iter().map(|r| r.open));
    let high = spec.high.reduce(rows.iter().map(|r| r.high));
    let low = spec.low.reduce(rows.iter().map(|r| r.low));
    let close = spec.close.reduce(rows.iter().map(|r| r.close));
    let volume = spec.volume.reduce(rows.iter().map(|r| r.volume));
    let traded_quote_volume = rows.iter().map(|r| r.volume * r.close).sum();

    Bucket {
        start,
        year: start.year(),
        month: start.month(),
        weekday: start.weekday().num_days_from_monday(),
        hour: start.hour(),
        tick_count: rows.len(),
        open,
        high,
        low,
        close,
        volume,
        traded_quote_volume,
        ret: None,
        range: high - low,
        volume_quote: volume * close,
        peak: close,
        drawdown_pct: 0.0,
    }
}

/// Resample chronologically ordered rows into calendar buckets.
///
/// Rows must be sorted by timestamp. Return, peak and drawdown are derived
/// from the bucket close series, not from the underlying rows.
pub fn resample(rows: &[FeatureRow], scale: TimeScale, spec: &AggregationSpec) -> Vec<Bucket> {
    let mut buckets = Vec::new();

    let mut start = 0;
    while start < rows.len() {
        let key = scale.bucket_start(rows[start].timestamp);
        let mut end = start + 1;
        while end < rows.len() && scale.bucket_start(rows[end].timestamp) == key {
            end += 1;
        }
        buckets.push(aggregate(key, &rows[start..end], spec));
        start = end;
    }

    let drawdowns = drawdown_series(buckets.iter().map(|b| b.close));
    let mut previous_close: Option<f64> = None;
    for (bucket, (peak, drawdown_pct)) in buckets.iter_mut().zip(drawdowns) {
        bucket.ret = previous_close.and_then(|prev| simple_return(prev, bucket.close));
        bucket.peak = peak;
        bucket.drawdown_pct = drawdown_pct;
        previous_close = Some(bucket.close);
    }

    debug!(
        scale = scale.as_str(),
        rows = rows.len(),
        buckets = buckets.len(),
        "Resampled rows"
    );

    buckets
}

/// Buckets whose start year passes the selection, in order.
pub fn filter_years(buckets: &[Bucket], selection: &YearSelection) -> Vec<Bucket> {
    buckets
        .iter()
        .filter(|b| selection.contains(b.year))
        .copied()
        .collect()
}
