//! Out-of-sample extrapolation of the regression line
//!
//! Used for non-time-series charts: a handful of X points past the observed
//! maximum, with Y read off the fitted line.

use crate::extract::extract_column;
use crate::summary::extent;
use crate::types::{Dataset, PredictedPoint, PredictionOptions, StatisticalSummary};

/// Project points beyond the observed X range
///
/// Step size is `step_fraction` of the observed X range (every numeric X
/// cell, whether or not its Y parses). Returns `None` without a regression
/// line or without any numeric X value.
pub fn predict_future(
    dataset: &Dataset,
    x_col: Option<&str>,
    y_col: Option<&str>,
    summary: &StatisticalSummary,
    options: &PredictionOptions,
) -> Option<Vec<PredictedPoint>> {
    let fit = summary.linear_regression?;
    let x_col = x_col.filter(|c| !c.is_empty())?;
    y_col.filter(|c| !c.is_empty())?;

    let observed = extent(&extract_column(dataset.rows(), x_col))?;
    let step = observed.width() * options.step_fraction;

    let points = (1..=options.steps)
        .map(|i| {
            let x = observed.max + step * i as f64;
            PredictedPoint {
                x,
                y: fit.predict(x),
                is_prediction: true,
            }
        })
        .collect();

    Some(points)
}
