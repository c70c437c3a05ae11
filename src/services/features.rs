//! Per-row derived fields and the immutable in-memory dataset.

use chrono::{DateTime, Datelike, Timelike, Utc};
use std::collections::BTreeSet;
use tracing::info;

use crate::services::loader::{GapReport, Tick, analyze_gaps};

/// Default trailing window (rows) for the rolling close volatility.
pub const DEFAULT_ROLLING_WINDOW: usize = 60;

/// A tick plus its derived scalars. Read-only once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// `close[i] / close[i-1] - 1`; `None` on the first row or after a zero close
    pub ret: Option<f64>,
    /// `high - low`
    pub range: f64,
    /// Sample std of the trailing window of closes; `None` until the window fills
    pub rolling_volatility: Option<f64>,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    /// 0 = Monday .. 6 = Sunday
    pub weekday: u32,
}

/// Simple return between two closes, undefined when the base is zero.
pub fn simple_return(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some(current / previous - 1.0)
    }
}

/// Sample standard deviation (ddof = 1). `None` for fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    Some((ss / (n - 1) as f64).sqrt())
}

/// Derive feature rows, keeping the input order and length.
pub fn derive_features(ticks: &[Tick], window: usize) -> Vec<FeatureRow> {
    let closes: Vec<f64> = ticks.iter().map(|t| t.close).collect();

    ticks
        .iter()
        .enumerate()
        .map(|(i, tick)| {
            let ret = if i == 0 {
                None
            } else {
                simple_return(closes[i - 1], tick.close)
            };

            // No partial-window fallback.
            let rolling_volatility = if window > 0 && i + 1 >= window {
                sample_std(&closes[i + 1 - window..=i])
            } else {
                None
            };

            let ts = tick.timestamp;
            FeatureRow {
                timestamp: ts,
                open: tick.open,
                high: tick.high,
                low: tick.low,
                close: tick.close,
                volume: tick.volume,
                ret,
                range: tick.high - tick.low,
                rolling_volatility,
                year: ts.year(),
                month: ts.month(),
                day: ts.day(),
                hour: ts.hour(),
                weekday: ts.weekday().num_days_from_monday(),
            }
        })
        .collect()
}

/// The loaded, feature-augmented dataset shared by every request.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<FeatureRow>,
    rolling_window: usize,
    years: Vec<i32>,
    gaps: GapReport,
    duplicate_rows: usize,
}

/// Rows identical to an earlier row. Ticks arrive sorted by timestamp, so
/// duplicates can only sit inside a run of equal timestamps.
fn count_duplicates(ticks: &[Tick]) -> usize {
    let mut duplicates = 0;
    let mut run_start = 0;
    for i in 0..ticks.len() {
        if ticks[i].timestamp != ticks[run_start].timestamp {
            run_start = i;
        }
        if ticks[run_start..i].contains(&ticks[i]) {
            duplicates += 1;
        }
    }
    duplicates
}

impl Dataset {
    pub fn from_ticks(ticks: &[Tick], rolling_window: usize) -> Self {
        let rows = derive_features(ticks, rolling_window);
        let years: Vec<i32> = rows
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let gaps = analyze_gaps(ticks);
        let duplicate_rows = count_duplicates(ticks);

        info!(
            rows = rows.len(),
            duplicate_rows,
            rolling_window,
            first_year = years.first().copied(),
            last_year = years.last().copied(),
            "Feature rows derived"
        );

        Self {
            rows,
            rolling_window,
            years,
            gaps,
            duplicate_rows,
        }
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn rolling_window(&self) -> usize {
        self.rolling_window
    }

    /// Distinct calendar years present, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn gaps(&self) -> &GapReport {
        &self.gaps
    }

    pub fn duplicate_rows(&self) -> usize {
        self.duplicate_rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(secs: i64, close: f64) -> Tick {
        Tick {
            timestamp: DateTime::from_timestamp(secs, 0).unwrap(),
            open: close,
            high: close + 2.0,
            low: close - 1.0,
            close,
            volume: 1.0,
        }
    }

    #[test]
    fn test_returns_and_range() {
        let ticks = vec![tick(0, 100.0), tick(60, 110.0), tick(120, 90.0)];
        let rows = derive_features(&ticks, 60);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].ret, None);
        assert!((rows[1].ret.unwrap() - 0.10).abs() < 1e-12);
        assert!((rows[2].ret.unwrap() - (90.0 / 110.0 - 1.0)).abs() < 1e-12);
        assert_eq!(rows[1].range, 3.0);
    }

    #[test]
    fn test_zero_close_yields_undefined_return() {
        let ticks = vec![tick(0, 0.0), tick(60, 5.0)];
        let rows = derive_features(&ticks, 2);
        assert_eq!(rows[1].ret, None);
    }

    #[test]
    fn test_rolling_volatility_window() {
        let ticks: Vec<Tick> = [1.0, 2.0, 3.0, 4.0]
            .iter()
            .enumerate()
            .map(|(i, c)| tick(i as i64 * 60, *c))
            .collect();
        let rows = derive_features(&ticks, 3);

        assert_eq!(rows[0].rolling_volatility, None);
        assert_eq!(rows[1].rolling_volatility, None);
        assert!((rows[2].rolling_volatility.unwrap() - 1.0).abs() < 1e-12);
        assert!((rows[3].rolling_volatility.unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_of_one_is_undefined() {
        let rows = derive_features(&[tick(0, 1.0), tick(60, 2.0)], 1);
        assert!(rows.iter().all(|r| r.rolling_volatility.is_none()));
    }

    #[test]
    fn test_calendar_fields_utc() {
        // 2024-01-07 23:30:00 UTC is a Sunday
        let rows = derive_features(&[tick(1_704_670_200, 1.0)], 60);
        let row = rows[0];
        assert_eq!((row.year, row.month, row.day, row.hour), (2024, 1, 7, 23));
        assert_eq!(row.weekday, 6);
    }

    #[test]
    fn test_dataset_years() {
        let ticks = vec![tick(1_704_670_200, 1.0), tick(1_735_689_600, 2.0)];
        let dataset = Dataset::from_ticks(&ticks, 60);
        assert_eq!(dataset.years(), &[2024, 2025]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rolling_window(), 60);
    }

    #[test]
    fn test_duplicate_rows_counted_within_timestamp() {
        let ticks = vec![tick(0, 1.0), tick(0, 1.0), tick(0, 2.0), tick(60, 1.0), tick(60, 1.0)];
        let dataset = Dataset::from_ticks(&ticks, 60);
        assert_eq!(dataset.duplicate_rows(), 2);
        assert_eq!(dataset.len(), 5);
    }
}
