//! Descriptive statistics over plain slices

use statrs::statistics::Statistics;

use crate::types::Extent;

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().mean())
}

/// Population standard deviation (divides by n); `None` for an empty slice
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().population_std_dev())
}

/// Observed minimum and maximum
pub fn extent(values: &[f64]) -> Option<Extent> {
    let first = *values.first()?;
    let (min, max) = values
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    Some(Extent { min, max })
}

/// Quantile of an ascending-sorted slice
///
/// Uses the rank rule `idx = n·p`: a fractional rank takes the element at
/// `ceil(idx)`; an integral rank on an even-length slice averages the two
/// neighbouring elements; otherwise the element at `idx` (0-based) is used.
/// For `[1, 2, 3, 100]` this gives Q1 = 1.5 and Q3 = 51.5.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if p <= 0.0 {
        return Some(sorted[0]);
    }
    if p >= 1.0 {
        return Some(sorted[n - 1]);
    }

    let idx = n as f64 * p;
    let value = if idx.fract() != 0.0 {
        sorted[idx.ceil() as usize - 1]
    } else if n % 2 == 0 {
        let i = idx as usize;
        (sorted[i - 1] + sorted[i]) / 2.0
    } else {
        sorted[idx as usize]
    };
    Some(value)
}

/// Median of an unsorted slice
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, 0.5)
}

/// True when every element equals the first (vacuously true when empty)
pub fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Pearson correlation coefficient
///
/// Returns `None` when the slices differ in length, hold fewer than 2 values,
/// or either side has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 || is_constant(x) || is_constant(y) {
        return None;
    }

    let mean_x = x.iter().mean();
    let mean_y = y.iter().mean();

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = (sxx * syy).sqrt();
    if denom <= 0.0 || !denom.is_finite() {
        return None;
    }
    Some((sxy / denom).clamp(-1.0, 1.0))
}
