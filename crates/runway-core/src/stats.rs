//! Order-statistic helpers and currency rounding

use std::cmp::Ordering;

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Linearly-interpolated percentile ("closest ranks" method).
///
/// Sorts ascending, takes `pos = (pct / 100) * (n - 1)` and blends the values
/// at `floor(pos)` and `ceil(pos)` by the fractional part. An empty sample
/// yields 0.
pub fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted_copy(values);
    let pos = (pct / 100.0) * (sorted.len() - 1) as f64;
    let idx = pos.floor() as usize;
    let idx2 = (idx + 1).min(sorted.len() - 1);
    let frac = pos - idx as f64;
    sorted[idx] * (1.0 - frac) + sorted[idx2] * frac
}

/// Median: middle sorted element, or the average of the two middle elements
/// for an even count. An empty sample yields 0.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted_copy(values);
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Round to two decimal places, half away from zero (money rounding).
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
