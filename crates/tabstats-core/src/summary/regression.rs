//! Simple linear regression (one predictor, with intercept)

use super::descriptive::is_constant;
use crate::types::{LinearFit, NumericPair};

/// Fit y = m·x + b by ordinary least squares
///
/// Returns `None` with fewer than 2 pairs or when every x is equal, since
/// the slope is undefined there.
pub fn fit_linear(pairs: &[NumericPair]) -> Option<LinearFit> {
    let n = pairs.len();
    if n < 2 {
        return None;
    }
    let xs: Vec<f64> = pairs.iter().map(|p| p.x).collect();
    if is_constant(&xs) {
        return None;
    }

    let n_f = n as f64;
    let mean_x = xs.iter().sum::<f64>() / n_f;
    let mean_y = pairs.iter().map(|p| p.y).sum::<f64>() / n_f;

    // Centered sums for numerical stability
    let (sxy, sxx) = pairs.iter().fold((0.0, 0.0), |(sxy, sxx), p| {
        let dx = p.x - mean_x;
        (sxy + dx * (p.y - mean_y), sxx + dx * dx)
    });

    if sxx <= 0.0 || !sxx.is_finite() {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    if !slope.is_finite() || !intercept.is_finite() {
        return None;
    }

    Some(LinearFit { slope, intercept })
}

/// Coefficient of determination of `fit` over `pairs`
///
/// Returns `None` when the total sum of squares is zero (constant Y).
/// For a least-squares line the value lies in [0, 1]; it is clamped there to
/// absorb rounding.
pub fn r_squared(pairs: &[NumericPair], fit: &LinearFit) -> Option<f64> {
    if pairs.is_empty() {
        return None;
    }
    let ys: Vec<f64> = pairs.iter().map(|p| p.y).collect();
    if is_constant(&ys) {
        return None;
    }

    let mean_y = ys.iter().sum::<f64>() / ys.len() as f64;
    let total_ss: f64 = ys.iter().map(|y| (y - mean_y).powi(2)).sum();
    let residual_ss: f64 = pairs
        .iter()
        .map(|p| (p.y - fit.predict(p.x)).powi(2))
        .sum();

    if total_ss <= 0.0 || !total_ss.is_finite() {
        return None;
    }
    Some((1.0 - residual_ss / total_ss).clamp(0.0, 1.0))
}
