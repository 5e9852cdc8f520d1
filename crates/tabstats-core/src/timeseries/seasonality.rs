use crate::summary::pearson;
use crate::types::Seasonality;

/// Scan candidate lags for the strongest self-similarity
///
/// For each lag from `min_lag` to `values.len() / max_lag_divisor`, the
/// absolute Pearson correlation between the series and itself shifted by the
/// lag is computed; the lag with the highest value wins (first lag on ties).
/// Lags whose correlation is undefined (a constant window) are skipped, so a
/// flat series scores 0 with period 0.
///
/// This is an approximate heuristic, not a spectral estimate.
pub fn autocorrelation_scan(values: &[f64], min_lag: usize, max_lag_divisor: usize) -> Seasonality {
    let max_lag = values.len() / max_lag_divisor.max(1);

    let mut best = Seasonality {
        score: 0.0,
        period: 0,
    };

    for lag in min_lag.max(1)..=max_lag {
        let leading = &values[..values.len() - lag];
        let lagged = &values[lag..];

        if let Some(r) = pearson(leading, lagged) {
            let score = r.abs();
            if score > best.score {
                best = Seasonality { score, period: lag };
            }
        }
    }

    best
}
