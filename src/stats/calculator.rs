//! Statistics Calculator Module
//! Descriptive statistics, imputation statistics, correlation and density
//! estimation used by the cleaner, the reporter and the charts.

use rayon::prelude::*;
use serde::Serialize;
use statrs::distribution::{Continuous, Normal};
use std::collections::BTreeMap;

/// Descriptive statistics for a single numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl Default for ColumnSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// One histogram bin, `[lower, upper)` except the last which is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> ColumnSummary {
        let n = values.len();
        if n == 0 {
            return ColumnSummary::default();
        }

        let sorted = Self::sorted(values);
        let mean = values.iter().sum::<f64>() / n as f64;

        let variance = if n > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            f64::NAN
        };

        ColumnSummary {
            count: n,
            mean,
            std: variance.sqrt(),
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Median of the values, `None` when there are none.
    pub fn median(values: &[f64]) -> Option<f64> {
        let n = values.len();
        if n == 0 {
            return None;
        }
        let sorted = Self::sorted(values);
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };
        Some(median)
    }

    /// Most frequent value. Ties go to the lexically smallest value.
    pub fn mode<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for value in values {
            *counts.entry(value).or_default() += 1;
        }

        let mut best: Option<(&str, usize)> = None;
        for (value, count) in counts {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((value, count));
            }
        }
        best.map(|(value, _)| value.to_string())
    }

    /// Pearson correlation coefficient; NaN for fewer than two points or a
    /// constant side.
    pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
        let n = xs.len().min(ys.len());
        if n < 2 {
            return f64::NAN;
        }
        let (xs, ys) = (&xs[..n], &ys[..n]);

        let mean_x = xs.iter().sum::<f64>() / n as f64;
        let mean_y = ys.iter().sum::<f64>() / n as f64;

        let mut cov = 0.0;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        for (x, y) in xs.iter().zip(ys) {
            let dx = x - mean_x;
            let dy = y - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }

        if var_x == 0.0 || var_y == 0.0 {
            return f64::NAN;
        }
        (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
    }

    /// Pairwise correlation matrix, ignoring rows where either value is null.
    pub fn correlation_matrix(columns: &[Vec<Option<f64>>]) -> Vec<Vec<f64>> {
        let k = columns.len();

        // Use rayon for parallel computation
        (0..k)
            .into_par_iter()
            .map(|i| {
                (0..k)
                    .map(|j| {
                        let (xs, ys): (Vec<f64>, Vec<f64>) = columns[i]
                            .iter()
                            .zip(&columns[j])
                            .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                            .unzip();
                        let r = Self::pearson(&xs, &ys);
                        if i == j && !r.is_nan() {
                            1.0
                        } else {
                            r
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Equal-width histogram over `[min, max]`.
    pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        if values.is_empty() || bins == 0 {
            return Vec::new();
        }

        let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            min -= 0.5;
            max += 0.5;
        }

        let width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - min) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: min + i as f64 * width,
                upper: min + (i + 1) as f64 * width,
                count,
            })
            .collect()
    }

    /// Gaussian kernel density estimate over the data range, Scott's
    /// bandwidth, multiplied by `scale` (use `n * bin_width` to overlay
    /// on a count histogram).
    pub fn kernel_density(values: &[f64], points: usize, scale: f64) -> Vec<(f64, f64)> {
        let n = values.len();
        if n < 2 || points < 2 {
            return Vec::new();
        }

        let summary = Self::compute_descriptive_stats(values);
        if !(summary.std > 0.0) {
            return Vec::new();
        }
        let bandwidth = summary.std * (n as f64).powf(-0.2);
        let Ok(kernel) = Normal::new(0.0, bandwidth) else {
            return Vec::new();
        };

        let step = (summary.max - summary.min) / (points - 1) as f64;
        (0..points)
            .map(|i| {
                let x = summary.min + i as f64 * step;
                let density = values.iter().map(|v| kernel.pdf(x - v)).sum::<f64>() / n as f64;
                (x, density * scale)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_of_even_count() {
        assert_eq!(StatsCalculator::median(&[22.0, 38.0, 26.0, 35.0]), Some(30.5));
        assert_eq!(StatsCalculator::median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(StatsCalculator::median(&[]), None);
    }

    #[test]
    fn mode_picks_most_frequent() {
        let values = ["S", "C", "S", "S", "Q"];
        assert_eq!(StatsCalculator::mode(values), Some("S".to_string()));
    }

    #[test]
    fn mode_tie_goes_to_smallest() {
        assert_eq!(
            StatsCalculator::mode(["Q", "S", "Q", "S"]),
            Some("Q".to_string())
        );
        assert_eq!(StatsCalculator::mode(Vec::<&str>::new()), None);
    }

    #[test]
    fn descriptive_stats_match_numpy() {
        let s = StatsCalculator::compute_descriptive_stats(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert!((s.p25 - 1.75).abs() < 1e-12);
        assert!((s.median - 2.5).abs() < 1e-12);
        assert!((s.p75 - 3.25).abs() < 1e-12);
        assert!((s.std - 1.2909944487358056).abs() < 1e-12);
    }

    #[test]
    fn pearson_extremes() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert!((StatsCalculator::pearson(&xs, &[2.0, 4.0, 6.0, 8.0]) - 1.0).abs() < 1e-12);
        assert!((StatsCalculator::pearson(&xs, &[8.0, 6.0, 4.0, 2.0]) + 1.0).abs() < 1e-12);
        assert!(StatsCalculator::pearson(&xs, &[1.0, 1.0, 1.0, 1.0]).is_nan());
        assert!(StatsCalculator::pearson(&[1.0], &[2.0]).is_nan());
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let columns = vec![
            vec![Some(1.0), Some(2.0), Some(3.0), None],
            vec![Some(3.0), Some(1.0), Some(2.0), Some(9.0)],
            vec![Some(5.0), Some(5.0), Some(5.0), Some(5.0)],
        ];
        let m = StatsCalculator::correlation_matrix(&columns);
        assert_eq!(m.len(), 3);
        assert_eq!(m[0][0], 1.0);
        assert_eq!(m[1][1], 1.0);
        assert!(m[2][2].is_nan());
        assert_eq!(m[0][1], m[1][0]);
        // The null in the first column drops the 9.0 from the pair.
        assert!((m[0][1] + 0.5).abs() < 1e-12);
    }

    #[test]
    fn histogram_counts_every_value() {
        let values = [0.0, 1.0, 2.0, 3.0, 10.0];
        let bins = StatsCalculator::histogram(&values, 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[4].upper, 10.0);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 2);
        assert_eq!(bins[4].count, 1);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
    }

    #[test]
    fn histogram_of_constant_values() {
        let bins = StatsCalculator::histogram(&[4.0, 4.0], 2);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].lower, 3.5);
        assert_eq!(bins[1].upper, 4.5);
        assert!(StatsCalculator::histogram(&[], 30).is_empty());
    }

    #[test]
    fn density_integrates_near_one() {
        let values: Vec<f64> = (0..200).map(|i| (i % 20) as f64).collect();
        let curve = StatsCalculator::kernel_density(&values, 400, 1.0);
        assert_eq!(curve.len(), 400);
        let step = curve[1].0 - curve[0].0;
        let area: f64 = curve.iter().map(|(_, y)| y * step).sum();
        assert!(area > 0.8 && area < 1.05, "area {}", area);
        assert!(StatsCalculator::kernel_density(&[1.0, 1.0], 10, 1.0).is_empty());
    }
}
