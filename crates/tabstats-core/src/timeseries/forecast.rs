use chrono::{Duration, NaiveDateTime};

use super::dates::format_iso_date;
use crate::types::ForecastPoint;

/// Naive drift forecast
///
/// The mean successive difference over the last `lookback` values is used as
/// a constant per-step change from the last observed value. This is a plain
/// linear extrapolation; it models neither seasonality nor noise.
///
/// Returns `None` when fewer than 2 values are available or any of the
/// trailing values is missing.
pub fn drift_forecast(
    values: &[Option<f64>],
    dates: &[NaiveDateTime],
    lookback: usize,
    horizon: usize,
) -> Option<Vec<ForecastPoint>> {
    let window = lookback.max(2).min(values.len());
    if window < 2 {
        return None;
    }
    let tail: Vec<f64> = values[values.len() - window..]
        .iter()
        .copied()
        .collect::<Option<Vec<f64>>>()?;

    let avg_change = tail.windows(2).map(|w| w[1] - w[0]).sum::<f64>() / (window - 1) as f64;
    let last_value = *tail.last()?;
    let last_date = *dates.last()?;
    let step_days = step_days(dates);

    (1..=horizon)
        .map(|i| {
            let offset = Duration::days(step_days * i as i64);
            let date = last_date.date().checked_add_signed(offset)?;
            Some(ForecastPoint {
                date: format_iso_date(date),
                forecast_value: last_value + avg_change * i as f64,
                is_forecast: true,
            })
        })
        .collect()
}

/// Whole days between the last two observations, or 1 with fewer than two
///
/// Assumes a uniform sampling interval: irregular series get unreliable
/// future dates.
fn step_days(dates: &[NaiveDateTime]) -> i64 {
    match dates {
        [.., prev, last] => {
            let millis = (*last - *prev).num_milliseconds() as f64;
            (millis / 86_400_000.0).round() as i64
        }
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn days(start: (i32, u32, u32), step: i64, n: usize) -> Vec<NaiveDateTime> {
        let base = NaiveDate::from_ymd_opt(start.0, start.1, start.2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..n).map(|i| base + Duration::days(step * i as i64)).collect()
    }

    #[test]
    fn test_linear_drift() {
        let values: Vec<Option<f64>> = (0..8).map(|i| Some(10.0 + 2.0 * i as f64)).collect();
        let dates = days((2024, 1, 1), 1, 8);
        let forecast = drift_forecast(&values, &dates, 5, 3).unwrap();

        assert_eq!(forecast.len(), 3);
        assert_eq!(forecast[0].date, "2024-01-09");
        assert_eq!(forecast[2].date, "2024-01-11");
        assert_relative_eq!(forecast[0].forecast_value, 26.0);
        assert_relative_eq!(forecast[2].forecast_value, 30.0);
        assert!(forecast.iter().all(|p| p.is_forecast));
    }

    #[test]
    fn test_uses_last_interval() {
        let values = vec![Some(1.0); 6];
        let dates = days((2024, 1, 1), 7, 6);
        let forecast = drift_forecast(&values, &dates, 5, 3).unwrap();
        assert_eq!(forecast[0].date, "2024-02-12");
        assert_eq!(forecast[1].date, "2024-02-19");
        assert_relative_eq!(forecast[1].forecast_value, 1.0);
    }

    #[test]
    fn test_single_date_steps_one_day() {
        let dates = days((2024, 5, 1), 1, 1);
        assert_eq!(step_days(&dates), 1);
    }

    #[test]
    fn test_missing_tail_value() {
        let mut values: Vec<Option<f64>> = (0..6).map(|i| Some(i as f64)).collect();
        values[4] = None;
        let dates = days((2024, 1, 1), 1, 6);
        assert!(drift_forecast(&values, &dates, 5, 3).is_none());
    }
}
