//! Summary statistics, display transforms, and performance metrics.
//!
//! Undefined results (too few observations, zero denominators) are NaN and
//! never errors; they serialise as JSON `null`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::features::simple_return;
use crate::services::resampler::Bucket;
use crate::services::variables::Variable;

/// Percentile above which heavy-tailed columns are trimmed.
pub const WINSORIZE_QUANTILE: f64 = 0.99;

/// Volume-like columns are log-scaled only past this maximum.
pub const LOG_THRESHOLD: f64 = 100.0;

/// Summary statistics in the shape of a dataframe `describe()` plus moments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub q25: f64,
    #[serde(rename = "50%")]
    pub q50: f64,
    #[serde(rename = "75%")]
    pub q75: f64,
    pub max: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

/// Copy of the finite values, sorted ascending.
pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Linear-interpolated quantile of pre-sorted values.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

pub fn quantile(values: &[f64], q: f64) -> f64 {
    quantile_sorted(&sorted_finite(values), q)
}

/// Adjusted Fisher-Pearson skewness; NaN below three observations.
pub fn skewness(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 {
        return f64::NAN;
    }
    let nf = n as f64;
    let mean = values.iter().sum::<f64>() / nf;
    let m2 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / nf;
    let m3 = values.iter().map(|v| (v - mean).powi(3)).sum::<f64>() / nf;
    if m2 == 0.0 {
        return 0.0;
    }
    (nf * (nf - 1.0)).sqrt() / (nf - 2.0) * m3 / m2.powf(1.5)
}

/// Bias-corrected excess kurtosis; NaN below four observations.
pub fn kurtosis(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 4 {
        return f64::NAN;
    }
    let nf = n as f64;
    let mean = values.iter().sum::<f64>() / nf;
    let s2 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    let s4 = values.iter().map(|v| (v - mean).powi(4)).sum::<f64>();
    if s2 == 0.0 {
        return 0.0;
    }
    let denom = (nf - 2.0) * (nf - 3.0);
    nf * (nf + 1.0) * (nf - 1.0) * s4 / (denom * s2 * s2) - 3.0 * (nf - 1.0).powi(2) / denom
}

/// Describe the finite values of a series.
pub fn describe(values: &[f64]) -> Describe {
    let sorted = sorted_finite(values);
    let n = sorted.len();

    let mean = if n == 0 {
        f64::NAN
    } else {
        sorted.iter().sum::<f64>() / n as f64
    };
    let std = crate::services::features::sample_std(&sorted).unwrap_or(f64::NAN);

    Describe {
        count: n,
        mean,
        std,
        min: sorted.first().copied().unwrap_or(f64::NAN),
        q25: quantile_sorted(&sorted, 0.25),
        q50: quantile_sorted(&sorted, 0.50),
        q75: quantile_sorted(&sorted, 0.75),
        max: sorted.last().copied().unwrap_or(f64::NAN),
        skewness: skewness(&sorted),
        kurtosis: kurtosis(&sorted),
    }
}

/// Drop values above the 99th percentile for heavy-tailed variables.
///
/// The percentile is taken over `values` as given, so callers pass the
/// year-filtered series. Order is preserved.
pub fn winsorize(values: &[f64], variable: Variable) -> Vec<f64> {
    if !variable.is_heavy_tailed() || values.is_empty() {
        return values.to_vec();
    }
    let threshold = quantile(values, WINSORIZE_QUANTILE);
    values.iter().copied().filter(|v| *v <= threshold).collect()
}

/// `ln(1 + x)` for volume-like variables whose maximum exceeds the threshold.
///
/// Returns the (possibly transformed) values and whether the log was applied.
pub fn log_transform(values: &[f64], variable: Variable) -> (Vec<f64>, bool) {
    let max = values.iter().copied().fold(f64::NAN, f64::max);
    if variable.is_volume_like() && max > LOG_THRESHOLD {
        (values.iter().map(|v| v.ln_1p()).collect(), true)
    } else {
        (values.to_vec(), false)
    }
}

/// Running peak and drawdown percentage for each close in order.
///
/// A zero peak gives a zero drawdown.
pub fn drawdown_series<I: IntoIterator<Item = f64>>(closes: I) -> Vec<(f64, f64)> {
    let mut peak = f64::NEG_INFINITY;
    closes
        .into_iter()
        .map(|close| {
            peak = peak.max(close);
            let drawdown_pct = if peak > 0.0 {
                (close - peak) / peak * 100.0
            } else {
                0.0
            };
            (peak, drawdown_pct)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownPoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub peak: f64,
    pub drawdown_pct: f64,
}

/// Drawdown as carried by the bucket, relative to the all-time peak of the
/// sequence it was resampled from.
impl From<&Bucket> for DrawdownPoint {
    fn from(bucket: &Bucket) -> Self {
        Self {
            timestamp: bucket.start,
            close: bucket.close,
            peak: bucket.peak,
            drawdown_pct: bucket.drawdown_pct,
        }
    }
}

/// Peak and drawdown recomputed over exactly the given buckets.
pub fn drawdown(buckets: &[Bucket]) -> Vec<DrawdownPoint> {
    buckets
        .iter()
        .zip(drawdown_series(buckets.iter().map(|b| b.close)))
        .map(|(b, (peak, drawdown_pct))| DrawdownPoint {
            timestamp: b.start,
            close: b.close,
            peak,
            drawdown_pct,
        })
        .collect()
}

/// Deepest drawdown point, earliest on ties.
pub fn max_drawdown(points: &[DrawdownPoint]) -> Option<DrawdownPoint> {
    points.iter().copied().fold(None, |deepest, p| match deepest {
        Some(d) if d.drawdown_pct <= p.drawdown_pct => Some(d),
        _ => Some(p),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualPerformance {
    pub year: i32,
    pub first_close: f64,
    pub last_close: f64,
    pub return_pct: f64,
}

/// Per calendar year, `(last_close / first_close - 1) * 100`.
///
/// Buckets must be in chronological order.
pub fn annual_performance(buckets: &[Bucket]) -> Vec<AnnualPerformance> {
    let mut out: Vec<AnnualPerformance> = Vec::new();
    for bucket in buckets {
        match out.last_mut() {
            Some(current) if current.year == bucket.year => current.last_close = bucket.close,
            _ => out.push(AnnualPerformance {
                year: bucket.year,
                first_close: bucket.close,
                last_close: bucket.close,
                return_pct: 0.0,
            }),
        }
    }
    for year in &mut out {
        year.return_pct = simple_return(year.first_close, year.last_close)
            .map(|r| r * 100.0)
            .unwrap_or(f64::NAN);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualVolatility {
    pub year: i32,
    pub mean_range: f64,
    pub observations: usize,
}

/// Mean bucket range (high - low) per calendar year.
pub fn annual_volatility(buckets: &[Bucket]) -> Vec<AnnualVolatility> {
    let mut out: Vec<(i32, f64, usize)> = Vec::new();
    for bucket in buckets {
        match out.last_mut() {
            Some((year, sum, n)) if *year == bucket.year => {
                *sum += bucket.range;
                *n += 1;
            }
            _ => out.push((bucket.year, bucket.range, 1)),
        }
    }
    out.into_iter()
        .map(|(year, sum, n)| AnnualVolatility {
            year,
            mean_range: sum / n as f64,
            observations: n,
        })
        .collect()
}
