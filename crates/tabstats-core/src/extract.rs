//! Column extraction
//!
//! Turns raw records into aligned numeric pairs for a chosen X/Y selection.

use crate::types::{NumericPair, NumericSeries, Row};

/// Extract aligned (x, y) pairs from two columns
///
/// Rows where either cell is missing or not numeric are dropped, never
/// imputed. Source row order is preserved.
pub fn extract_pairs(rows: &[Row], x_col: &str, y_col: &str) -> NumericSeries {
    rows.iter()
        .filter_map(|row| {
            let x = row.get(x_col)?.as_number()?;
            let y = row.get(y_col)?.as_number()?;
            Some(NumericPair::new(x, y))
        })
        .collect()
}

/// Parse every numeric cell of one column, skipping the rest
pub fn extract_column(rows: &[Row], col: &str) -> Vec<f64> {
    rows.iter()
        .filter_map(|row| row.get(col).and_then(|cell| cell.as_number()))
        .collect()
}
