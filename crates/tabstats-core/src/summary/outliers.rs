//! Quartile-based (Tukey fence) outlier detection

use super::descriptive::quantile_sorted;
use crate::types::{NumericPair, Quartiles};

/// Q1, Q3 and IQR of the Y values; `None` for an empty series
pub fn quartiles(pairs: &[NumericPair]) -> Option<Quartiles> {
    let mut ys: Vec<f64> = pairs.iter().map(|p| p.y).collect();
    ys.sort_by(f64::total_cmp);

    let q1 = quantile_sorted(&ys, 0.25)?;
    let q3 = quantile_sorted(&ys, 0.75)?;
    Some(Quartiles {
        q1,
        q3,
        iqr: q3 - q1,
    })
}

/// Lower and upper fence for a given IQR multiplier
pub fn fences(quartiles: &Quartiles, multiplier: f64) -> (f64, f64) {
    (
        quartiles.q1 - multiplier * quartiles.iqr,
        quartiles.q3 + multiplier * quartiles.iqr,
    )
}

/// Points whose y lies strictly outside the fences, in input order
///
/// With IQR = 0 every point not equal to the quartile value is flagged.
pub fn tukey_outliers(
    pairs: &[NumericPair],
    quartiles: &Quartiles,
    multiplier: f64,
) -> Vec<NumericPair> {
    let (low, high) = fences(quartiles, multiplier);
    pairs
        .iter()
        .filter(|p| p.y < low || p.y > high)
        .copied()
        .collect()
}
