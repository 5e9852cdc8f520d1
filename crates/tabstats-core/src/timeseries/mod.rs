//! Time series analysis over a date-like X column
//!
//! Rows are sorted by date, smoothed with a trailing moving average, scanned
//! for a repeating lag and projected a few steps ahead.

mod dates;
mod forecast;
mod seasonality;

pub use dates::{format_iso_date, is_date_column, parse_date};
pub use forecast::drift_forecast;
pub use seasonality::autocorrelation_scan;

use chrono::NaiveDateTime;

use crate::summary::mean;
use crate::types::{Dataset, Row, TimeSeriesOptions, TimeSeriesTrend, TimeSpan, TrendPoint};

/// Build a date-sorted trend for the selected Y column
///
/// The date column is the first entry of `columns` that parses as a date in
/// every row, falling back to `x_col`. Returns `None` when the dataset is
/// empty, either column is unselected, or the resolved column holds any
/// value that is not a date.
pub fn analyze_time_series(
    dataset: &Dataset,
    columns: &[String],
    x_col: Option<&str>,
    y_col: Option<&str>,
    options: &TimeSeriesOptions,
) -> Option<TimeSeriesTrend> {
    let x_col = x_col.filter(|c| !c.is_empty())?;
    let y_col = y_col.filter(|c| !c.is_empty())?;
    let rows = dataset.rows();
    if rows.is_empty() {
        return None;
    }

    let mode = options.date_parsing;
    let date_col = columns
        .iter()
        .map(String::as_str)
        .find(|col| is_date_column(rows, col, mode))
        .unwrap_or(x_col);

    let mut dated: Vec<(NaiveDateTime, &Row)> = rows
        .iter()
        .map(|row| {
            let date = row.get(date_col).and_then(|cell| parse_date(cell, mode))?;
            Some((date, row))
        })
        .collect::<Option<Vec<_>>>()?;

    // Stable: rows sharing a date keep their source order
    dated.sort_by_key(|(date, _)| *date);

    let dates: Vec<NaiveDateTime> = dated.iter().map(|(date, _)| *date).collect();
    let values: Vec<Option<f64>> = dated
        .iter()
        .map(|(_, row)| row.get(y_col).and_then(|cell| cell.as_number()))
        .collect();
    let labels: Vec<String> = dated
        .iter()
        .map(|(_, row)| row.get(date_col).map(ToString::to_string).unwrap_or_default())
        .collect();

    let row_count = dated.len();
    let window = (row_count / options.moving_average_divisor.max(1))
        .max(options.min_moving_average_window);

    let trend = values
        .iter()
        .enumerate()
        .map(|(i, value)| TrendPoint {
            date: labels[i].clone(),
            value: *value,
            moving_average: trailing_mean(&values, i, window),
        })
        .collect();

    let seasonality = (row_count > options.seasonality_min_rows).then(|| {
        let observed: Vec<f64> = values.iter().flatten().copied().collect();
        autocorrelation_scan(&observed, options.min_seasonality_lag, options.max_lag_divisor)
    });

    let forecast = if row_count > options.forecast_min_rows {
        drift_forecast(&values, &dates, options.forecast_lookback, options.forecast_horizon)
    } else {
        None
    };

    Some(TimeSeriesTrend {
        date_column: date_col.to_string(),
        trend,
        time_span: TimeSpan {
            start: labels.first().cloned().unwrap_or_default(),
            end: labels.last().cloned().unwrap_or_default(),
        },
        seasonality,
        forecast,
    })
}

/// Mean of the present values in `values[index - window ..= index]`
fn trailing_mean(values: &[Option<f64>], index: usize, window: usize) -> Option<f64> {
    let start = index.saturating_sub(window);
    let present: Vec<f64> = values[start..=index].iter().flatten().copied().collect();
    mean(&present)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellValue, DateParsing};
    use approx::assert_relative_eq;

    fn daily(values: &[f64]) -> Dataset {
        let rows = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let mut row = Row::new();
                row.insert("date".to_string(), format!("2024-01-{:02}", i + 1).into());
                row.insert("sales".to_string(), v.into());
                row
            })
            .collect();
        Dataset::new(rows)
    }

    fn analyze(ds: &Dataset) -> Option<TimeSeriesTrend> {
        analyze_time_series(
            ds,
            &ds.columns(),
            Some("date"),
            Some("sales"),
            &TimeSeriesOptions::default(),
        )
    }

    #[test]
    fn test_flat_series() {
        let ds = daily(&[10.0; 15]);
        let ts = analyze(&ds).unwrap();

        assert_eq!(ts.date_column, "date");
        assert_eq!(ts.trend.len(), 15);
        for point in &ts.trend {
            assert_relative_eq!(point.moving_average.unwrap(), 10.0);
        }
        let seasonality = ts.seasonality.unwrap();
        assert!(seasonality.score < 0.4);

        let forecast = ts.forecast.unwrap();
        assert_eq!(forecast.len(), 3);
        assert_eq!(forecast[0].date, "2024-01-16");
        assert_relative_eq!(forecast[2].forecast_value, 10.0);
        assert_eq!(ts.time_span.start, "2024-01-01");
        assert_eq!(ts.time_span.end, "2024-01-15");
    }

    #[test]
    fn test_non_date_column_is_absent() {
        let rows = (0..6)
            .map(|i| {
                let mut row = Row::new();
                row.insert("x".to_string(), CellValue::from("abc"));
                row.insert("y".to_string(), (i as f64).into());
                row
            })
            .collect();
        let ds = Dataset::new(rows);
        let ts = analyze_time_series(
            &ds,
            &ds.columns(),
            Some("x"),
            Some("y"),
            &TimeSeriesOptions::default(),
        );
        assert!(ts.is_none());
    }

    #[test]
    fn test_rows_sorted_by_date() {
        let ds = Dataset::from_json(
            r#"[
                {"when": "2024-01-03", "v": 3},
                {"when": "2024-01-01", "v": 1},
                {"when": "2024-01-02", "v": 2}
            ]"#,
        )
        .unwrap();
        let ts = analyze_time_series(
            &ds,
            &ds.columns(),
            Some("when"),
            Some("v"),
            &TimeSeriesOptions::default(),
        )
        .unwrap();

        let order: Vec<&str> = ts.trend.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(order, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
        // Too short for seasonality or forecast
        assert!(ts.seasonality.is_none());
        assert!(ts.forecast.is_none());
    }

    #[test]
    fn test_date_column_found_before_selected_x() {
        let ds = Dataset::from_json(
            r#"[
                {"day": "2024-02-01", "units": 5, "revenue": 50},
                {"day": "2024-02-02", "units": 6, "revenue": 61}
            ]"#,
        )
        .unwrap();
        let ts = analyze_time_series(
            &ds,
            &ds.columns(),
            Some("units"),
            Some("revenue"),
            &TimeSeriesOptions::default(),
        )
        .unwrap();
        assert_eq!(ts.date_column, "day");
    }

    #[test]
    fn test_trailing_moving_average() {
        // 20 rows -> window = 2, so each average covers up to 3 points
        let values: Vec<f64> = (1..=20).map(|v| v as f64).collect();
        let ts = analyze(&daily(&values)).unwrap();

        assert_relative_eq!(ts.trend[0].moving_average.unwrap(), 1.0);
        assert_relative_eq!(ts.trend[1].moving_average.unwrap(), 1.5);
        assert_relative_eq!(ts.trend[2].moving_average.unwrap(), 2.0);
        assert_relative_eq!(ts.trend[10].moving_average.unwrap(), 10.0);
    }

    #[test]
    fn test_missing_values_skipped_in_average() {
        let ds = Dataset::from_json(
            r#"[
                {"d": "2024-01-01", "v": 4},
                {"d": "2024-01-02", "v": "n/a"},
                {"d": "2024-01-03", "v": 8}
            ]"#,
        )
        .unwrap();
        let ts = analyze_time_series(
            &ds,
            &ds.columns(),
            Some("d"),
            Some("v"),
            &TimeSeriesOptions::default(),
        )
        .unwrap();
        assert_eq!(ts.trend[1].value, None);
        assert_relative_eq!(ts.trend[1].moving_average.unwrap(), 4.0);
        assert_relative_eq!(ts.trend[2].moving_average.unwrap(), 6.0);
    }

    #[test]
    fn test_bare_years_need_lenient_parsing() {
        let ds = Dataset::from_json(
            r#"[{"year": 2019, "v": 1}, {"year": 2020, "v": 2}, {"year": 2021, "v": 4}]"#,
        )
        .unwrap();
        let strict = TimeSeriesOptions::default();
        assert!(analyze_time_series(&ds, &ds.columns(), Some("year"), Some("v"), &strict).is_none());

        let lenient = TimeSeriesOptions {
            date_parsing: DateParsing::Lenient,
            ..Default::default()
        };
        let ts = analyze_time_series(&ds, &ds.columns(), Some("year"), Some("v"), &lenient).unwrap();
        assert_eq!(ts.time_span.start, "2019");
    }

    #[test]
    fn test_month_year_forecast_dates() {
        let months = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul"];
        let rows = months
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let mut row = Row::new();
                row.insert("month".to_string(), format!("{} 2024", m).into());
                row.insert("sales".to_string(), (100.0 + i as f64).into());
                row
            })
            .collect();
        let ds = Dataset::new(rows);
        let ts = analyze_time_series(
            &ds,
            &ds.columns(),
            Some("month"),
            Some("sales"),
            &TimeSeriesOptions::default(),
        )
        .unwrap();

        assert_eq!(ts.time_span.start, "Jan 2024");
        // Jun 1 -> Jul 1 is 30 days
        let dates: Vec<&str> = ts.forecast.as_ref().unwrap().iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-07-31", "2024-08-30", "2024-09-29"]);
    }

    #[test]
    fn test_combined_points_appends_forecast() {
        let ts = analyze(&daily(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0])).unwrap();
        let combined = serde_json::to_value(ts.combined_points()).unwrap();
        let items = combined.as_array().unwrap();
        assert_eq!(items.len(), 10);
        assert_eq!(items[9]["isForecast"], true);
        assert_eq!(items[0]["movingAverage"], 1.0);
    }
}
