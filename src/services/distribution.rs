//! Chart-ready distribution summaries: histogram, box plot, density.

use serde::Serialize;

use crate::services::features::sample_std;
use crate::services::metrics::{quantile_sorted, sorted_finite};

/// Bins used to pre-aggregate values before the density estimate.
const DENSITY_GRID_BINS: usize = 1024;

/// Density curves extend this many bandwidths past the data range.
const DENSITY_CUT: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width histogram over the finite values.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: lo + width * (i + 1) as f64,
            count,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Most extreme values within 1.5 IQR of the quartiles
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: usize,
}

/// Box-plot statistics; `None` for an empty series.
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let sorted = sorted_finite(values);
    let (&min, &max) = (sorted.first()?, sorted.last()?);

    let q1 = quantile_sorted(&sorted, 0.25);
    let median = quantile_sorted(&sorted, 0.5);
    let q3 = quantile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;
    let (low_fence, high_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let inside: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v >= low_fence && *v <= high_fence)
        .collect();

    Some(BoxSummary {
        min,
        q1,
        median,
        q3,
        max,
        lower_whisker: inside.first().copied().unwrap_or(q1),
        upper_whisker: inside.last().copied().unwrap_or(q3),
        outliers: sorted.len() - inside.len(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DensityPoint {
    pub x: f64,
    pub density: f64,
}

/// Gaussian kernel density estimate with Scott's bandwidth.
///
/// Values are first binned onto a fixed grid, which keeps the cost
/// independent of the series length. Empty when the series has fewer than
/// two values or zero spread.
pub fn density(values: &[f64], points: usize) -> Vec<DensityPoint> {
    let sorted = sorted_finite(values);
    let n = sorted.len();
    let Some(std) = sample_std(&sorted) else {
        return Vec::new();
    };
    if std == 0.0 || points < 2 {
        return Vec::new();
    }

    let bandwidth = std * (n as f64).powf(-0.2);
    let (lo, hi) = (sorted[0], sorted[n - 1]);

    let bin_width = (hi - lo) / DENSITY_GRID_BINS as f64;
    let mut weights = vec![0usize; DENSITY_GRID_BINS];
    for v in &sorted {
        let idx = (((v - lo) / bin_width) as usize).min(DENSITY_GRID_BINS - 1);
        weights[idx] += 1;
    }
    let centers: Vec<(f64, f64)> = weights
        .into_iter()
        .enumerate()
        .filter(|(_, w)| *w > 0)
        .map(|(i, w)| (lo + bin_width * (i as f64 + 0.5), w as f64))
        .collect();

    let start = lo - DENSITY_CUT * bandwidth;
    let end = hi + DENSITY_CUT * bandwidth;
    let step = (end - start) / (points - 1) as f64;
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    (0..points)
        .map(|i| {
            let x = start + step * i as f64;
            let sum: f64 = centers
                .iter()
                .map(|(c, w)| {
                    let z = (x - c) / bandwidth;
                    w * (-0.5 * z * z).exp()
                })
                .sum();
            DensityPoint {
                x,
                density: sum * norm,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 10.0];
        let bins = histogram(&values, 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[4].end, 10.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 6);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[4].count, 1);
    }

    #[test]
    fn test_histogram_constant_series() {
        let bins = histogram(&[3.0, 3.0], 4);
        assert_eq!(bins[0].start, 2.5);
        assert_eq!(bins[3].end, 3.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn test_histogram_empty() {
        assert!(histogram(&[], 40).is_empty());
    }

    #[test]
    fn test_box_summary() {
        let summary = box_summary(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.q3, 4.0);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 4.0);
        assert_eq!(summary.outliers, 1);
        assert_eq!(summary.max, 100.0);
    }

    #[test]
    fn test_box_summary_empty() {
        assert!(box_summary(&[]).is_none());
    }

    #[test]
    fn test_density_integrates_to_one() {
        let values: Vec<f64> = (0..500).map(|i| ((i * 37) % 101) as f64).collect();
        let curve = density(&values, 400);
        assert_eq!(curve.len(), 400);

        let area: f64 = curve
            .windows(2)
            .map(|w| (w[1].x - w[0].x) * (w[0].density + w[1].density) / 2.0)
            .sum();
        assert!((area - 1.0).abs() < 0.01, "area = {area}");
        assert!(curve.iter().all(|p| p.density >= 0.0));
    }

    #[test]
    fn test_density_degenerate() {
        assert!(density(&[1.0], 100).is_empty());
        assert!(density(&[2.0, 2.0, 2.0], 100).is_empty());
    }
}
