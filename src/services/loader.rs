//! CSV loader for the minute-resolution OHLCV dataset.
//!
//! Expected header: `Timestamp,Open,High,Low,Close,Volume` (case-insensitive,
//! extra columns ignored). `Timestamp` is epoch seconds.

use chrono::{DateTime, Utc};
use csv::StringRecord;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::error::DataError;

/// One raw OHLCV observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Sampling gaps found in a loaded series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapReport {
    /// Most common spacing between consecutive timestamps, in seconds
    pub expected_interval_secs: i64,
    pub gap_count: usize,
    pub missing_points: i64,
    pub largest_gap_secs: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest_gap_start: Option<DateTime<Utc>>,
}

struct ColumnIndex {
    timestamp: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, DataError> {
        let lower: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |name: &'static str| {
            lower
                .iter()
                .position(|h| h == &name.to_lowercase())
                .ok_or(DataError::MissingColumn(name))
        };

        Ok(Self {
            timestamp: find("Timestamp")?,
            open: find("Open")?,
            high: find("High")?,
            low: find("Low")?,
            close: find("Close")?,
            volume: find("Volume")?,
        })
    }

    fn parse(&self, record: &StringRecord, line: u64) -> Result<Tick, DataError> {
        let raw_ts = record.get(self.timestamp).unwrap_or("");
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| DataError::InvalidTimestamp {
            line,
            value: raw_ts.to_string(),
        })?;

        Ok(Tick {
            timestamp,
            open: parse_number(record.get(self.open), "Open", line)?,
            high: parse_number(record.get(self.high), "High", line)?,
            low: parse_number(record.get(self.low), "Low", line)?,
            close: parse_number(record.get(self.close), "Close", line)?,
            volume: parse_number(record.get(self.volume), "Volume", line)?,
        })
    }
}

/// Parse epoch seconds. Integral decimal forms like `1325412060.0` are accepted.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }

    let value = raw.parse::<f64>().ok()?;
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(value as i64, 0)
}

fn parse_number(raw: Option<&str>, column: &'static str, line: u64) -> Result<f64, DataError> {
    let raw = raw.unwrap_or("").trim();
    let value = raw
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DataError::InvalidNumber {
            line,
            column,
            value: raw.to_string(),
        })?;

    if value < 0.0 {
        return Err(DataError::NegativeValue {
            line,
            column,
            value,
        });
    }
    Ok(value)
}

/// Load ticks from a CSV file on disk.
pub fn load_ticks_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Tick>, DataError> {
    let path = path.as_ref();
    info!(path = %path.display(), "Loading price dataset");
    let file = File::open(path)?;
    load_ticks_from_reader(BufReader::new(file))
}

/// Load ticks from any CSV source, sorted ascending by timestamp.
///
/// The sort is stable, so records sharing a timestamp keep their file order.
/// Duplicates and gaps are left in place.
pub fn load_ticks_from_reader<R: Read>(source: R) -> Result<Vec<Tick>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut ticks = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        ticks.push(columns.parse(&record, line)?);
    }

    ticks.sort_by_key(|t| t.timestamp);

    let gaps = analyze_gaps(&ticks);
    info!(
        rows = ticks.len(),
        expected_interval_secs = gaps.expected_interval_secs,
        gap_count = gaps.gap_count,
        missing_points = gaps.missing_points,
        "Price dataset loaded"
    );
    if let Some(start) = gaps.largest_gap_start {
        debug!(
            largest_gap_secs = gaps.largest_gap_secs,
            start = %start,
            "Largest sampling gap"
        );
    }

    Ok(ticks)
}

/// Detect the dominant sampling interval and count the gaps exceeding it.
pub fn analyze_gaps(ticks: &[Tick]) -> GapReport {
    if ticks.len() < 2 {
        return GapReport::default();
    }

    let mut intervals: HashMap<i64, usize> = HashMap::new();
    for pair in ticks.windows(2) {
        let diff = (pair[1].timestamp - pair[0].timestamp).num_seconds();
        *intervals.entry(diff).or_insert(0) += 1;
    }

    // Ties resolve to the smaller interval so the result is deterministic.
    let expected = intervals
        .iter()
        .filter(|(interval, _)| **interval > 0)
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(interval, _)| *interval)
        .unwrap_or(60);

    let mut report = GapReport {
        expected_interval_secs: expected,
        ..Default::default()
    };

    for pair in ticks.windows(2) {
        let diff = (pair[1].timestamp - pair[0].timestamp).num_seconds();
        if diff > expected {
            report.gap_count += 1;
            report.missing_points += diff / expected - 1;
            if diff > report.largest_gap_secs {
                report.largest_gap_secs = diff;
                report.largest_gap_start = Some(pair[0].timestamp);
            }
        }
    }

    report
}
