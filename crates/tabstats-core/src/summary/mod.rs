//! Statistical summary of an X/Y column selection
//!
//! Descriptive statistics on both axes, quartiles and Tukey outliers on Y,
//! Pearson correlation and a least-squares line with its R².

mod descriptive;
mod outliers;
mod regression;

pub use descriptive::{extent, is_constant, mean, median, pearson, population_std_dev, quantile_sorted};
pub use outliers::{fences, quartiles, tukey_outliers};
pub use regression::{fit_linear, r_squared};

use crate::extract::extract_pairs;
use crate::types::{AxisStat, Dataset, NumericPair, Ranges, StatisticalSummary, SummaryOptions};

/// Summarize the selected columns of a dataset
///
/// Returns `None` when the dataset is empty, either column is not selected
/// (`None` or blank), or no row yields a numeric pair. With exactly one pair
/// the scalar statistics are present but correlation, regression and R² are
/// absent.
pub fn analyze(
    dataset: &Dataset,
    x_col: Option<&str>,
    y_col: Option<&str>,
    options: &SummaryOptions,
) -> Option<StatisticalSummary> {
    let x_col = x_col.filter(|c| !c.is_empty())?;
    let y_col = y_col.filter(|c| !c.is_empty())?;
    if dataset.is_empty() {
        return None;
    }

    let pairs = extract_pairs(dataset.rows(), x_col, y_col);
    summarize_pairs(&pairs, options)
}

/// Summarize an already-extracted pair series
pub fn summarize_pairs(
    pairs: &[NumericPair],
    options: &SummaryOptions,
) -> Option<StatisticalSummary> {
    if pairs.is_empty() {
        return None;
    }

    let xs: Vec<f64> = pairs.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = pairs.iter().map(|p| p.y).collect();

    let quartiles = quartiles(pairs)?;
    let outliers = tukey_outliers(pairs, &quartiles, options.outlier_fence);

    let linear_regression = fit_linear(pairs);
    let r_squared = linear_regression
        .as_ref()
        .and_then(|fit| r_squared(pairs, fit));

    Some(StatisticalSummary {
        mean: AxisStat {
            x: mean(&xs)?,
            y: mean(&ys)?,
        },
        median: AxisStat {
            x: median(&xs)?,
            y: median(&ys)?,
        },
        quartiles,
        range: Ranges {
            x: extent(&xs)?,
            y: extent(&ys)?,
        },
        standard_deviation: AxisStat {
            x: population_std_dev(&xs)?,
            y: population_std_dev(&ys)?,
        },
        correlation: pearson(&xs, &ys),
        outliers,
        linear_regression,
        r_squared,
        data_points: pairs.len(),
    })
}
