use crate::model::{Series, TrendLine, TrendResult};

/// Standard deviation of the smoothing kernel, in units of sequence
/// index (not time).
const SIGMA: f64 = 1.0;
/// Kernel half-width: 4 sigma, the reference truncation.
const RADIUS: i64 = 4;

/// Computes a smoothed curve and a linear trend projection for a series.
pub struct TrendAnalyzer;

impl TrendAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyzes a non-empty series. Smoothing runs for any length >= 1
    /// (reflection folds the kernel window into range for short input);
    /// the trend line needs at least 2 points and is `None` below that.
    /// Returns `None` for an empty series so the caller skips the chart.
    pub fn analyze(&self, series: &Series) -> Option<TrendResult> {
        if series.is_empty() {
            return None;
        }
        Some(TrendResult {
            smoothed: gaussian_smooth(&series.values),
            trend: fit_trend_line(series),
        })
    }
}

/// Gaussian filter over the value sequence, sigma = 1 index, kernel
/// truncated at 4 sigma. Out-of-range taps are reflected about the edge
/// (`d c b a | a b c d | d c b a`), so boundary values are less
/// effectively smoothed than interior ones.
fn gaussian_smooth(values: &[f64]) -> Vec<f64> {
    let kernel = gaussian_kernel();
    let n = values.len() as i64;

    (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, w)| {
                    let tap = i + k as i64 - RADIUS;
                    w * values[reflect(tap, n)]
                })
                .sum()
        })
        .collect()
}

fn gaussian_kernel() -> Vec<f64> {
    let weights: Vec<f64> = (-RADIUS..=RADIUS)
        .map(|i| (-(i as f64).powi(2) / (2.0 * SIGMA * SIGMA)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

/// Folds an out-of-range index back into `0..n` by reflecting about the
/// sequence edges as often as needed. `n` must be >= 1.
fn reflect(mut i: i64, n: i64) -> usize {
    loop {
        if i < 0 {
            i = -i - 1;
        } else if i >= n {
            i = 2 * n - 1 - i;
        } else {
            return i as usize;
        }
    }
}

/// Closed-form least-squares fit of value against timestamp seconds,
/// evaluated at the first and last timestamps only. The centered normal
/// equations are exact; no iteration is involved.
fn fit_trend_line(series: &Series) -> Option<TrendLine> {
    if series.len() < 2 {
        return None;
    }

    let xs: Vec<f64> = series
        .timestamps
        .iter()
        .map(|t| t.timestamp() as f64)
        .collect();
    let ys = &series.values;
    let n = xs.len() as f64;

    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let sxx: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
    let sxy: f64 = xs
        .iter()
        .zip(ys.iter())
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();

    // Degenerate time axis (all timestamps equal): flat line at the mean.
    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    let intercept = mean_y - slope * mean_x;

    let first = *series.timestamps.first()?;
    let last = *series.timestamps.last()?;
    Some(TrendLine {
        start: (first, slope * xs[0] + intercept),
        end: (last, slope * xs[xs.len() - 1] + intercept),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn series_from(values: &[f64]) -> Series {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps = (0..values.len())
            .map(|i| t0 + Duration::days(i as i64))
            .collect();
        Series::new(timestamps, values.to_vec())
    }

    #[test]
    fn smoothing_preserves_length() {
        for len in [1, 2, 3, 7, 50] {
            let values: Vec<f64> = (0..len).map(|i| (i as f64).sin()).collect();
            let smoothed = gaussian_smooth(&values);
            assert_eq!(smoothed.len(), len);
        }
    }

    #[test]
    fn constant_series_smooths_to_itself() {
        let smoothed = gaussian_smooth(&[4.2; 9]);
        for v in smoothed {
            assert!((v - 4.2).abs() < 1e-12);
        }
    }

    #[test]
    fn kernel_is_normalized() {
        let total: f64 = gaussian_kernel().iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_series_gives_flat_trend() {
        let result = TrendAnalyzer::new().analyze(&series_from(&[3.0; 5])).unwrap();
        let line = result.trend.unwrap();
        assert!((line.start.1 - 3.0).abs() < 1e-9);
        assert!((line.end.1 - 3.0).abs() < 1e-9);
        for v in result.smoothed {
            assert!((v - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn trend_endpoints_match_independent_refit() {
        let series = series_from(&[70.0, 71.5, 69.8, 72.2, 73.0, 72.4]);
        let line = fit_trend_line(&series).unwrap();

        // Refit via raw (uncentered) normal equations.
        let xs: Vec<f64> = series.timestamps.iter().map(|t| t.timestamp() as f64).collect();
        let n = xs.len() as f64;
        let sx: f64 = xs.iter().sum();
        let sy: f64 = series.values.iter().sum();
        let sxx: f64 = xs.iter().map(|x| x * x).sum();
        let sxy: f64 = xs.iter().zip(&series.values).map(|(x, y)| x * y).sum();
        let slope = (n * sxy - sx * sy) / (n * sxx - sx * sx);
        let intercept = (sy - slope * sx) / n;

        assert!((line.start.1 - (slope * xs[0] + intercept)).abs() < 1e-6);
        assert!((line.end.1 - (slope * xs[5] + intercept)).abs() < 1e-6);
    }

    #[test]
    fn exact_line_is_recovered() {
        // values = 2*day + 1, so endpoints must land on the data.
        let values: Vec<f64> = (0..6).map(|i| 2.0 * i as f64 + 1.0).collect();
        let series = series_from(&values);
        let line = fit_trend_line(&series).unwrap();
        assert!((line.start.1 - 1.0).abs() < 1e-6);
        assert!((line.end.1 - 11.0).abs() < 1e-6);
    }

    #[test]
    fn single_point_smooths_but_has_no_trend() {
        let result = TrendAnalyzer::new().analyze(&series_from(&[9.0])).unwrap();
        // The normalized kernel sums to 1 only within rounding, so the
        // single sample comes back within tolerance, not bit-exact.
        assert_eq!(result.smoothed.len(), 1);
        assert!((result.smoothed[0] - 9.0).abs() < 1e-12);
        assert!(result.trend.is_none());
    }

    #[test]
    fn empty_series_yields_nothing() {
        assert!(TrendAnalyzer::new().analyze(&series_from(&[])).is_none());
    }

    #[test]
    fn identical_timestamps_fall_back_to_flat_line() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let series = Series::new(vec![t, t], vec![1.0, 3.0]);
        let line = fit_trend_line(&series).unwrap();
        assert!((line.start.1 - 2.0).abs() < 1e-12);
        assert!((line.end.1 - 2.0).abs() < 1e-12);
    }
}
