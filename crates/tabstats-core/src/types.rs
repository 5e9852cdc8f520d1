use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::errors::{StatsError, StatsResult};

// ============================================================================
// Input Types
// ============================================================================

/// A raw cell value as delivered by ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Parse the cell as a finite decimal number
    ///
    /// Text is trimmed and must be a complete decimal literal; partial
    /// prefixes such as `"12abc"` and locale forms such as `"1,5"` are rejected.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) if v.is_finite() => Some(*v),
            CellValue::Text(s) => parse_decimal(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            CellValue::Number(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

fn parse_decimal(s: &str) -> Option<f64> {
    // "inf" and "NaN" parse but are not finite
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// One record: column name to raw value, in source column order
pub type Row = IndexMap<String, CellValue>;

/// An ordered sequence of records produced by ingestion
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Parse a JSON array of flat objects
    pub fn from_json(input: &str) -> StatsResult<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    /// Build a dataset from an already-decoded JSON value
    pub fn from_value(value: Value) -> StatsResult<Self> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(StatsError::InvalidInput(format!(
                    "records must be an array of objects, got {}",
                    json_kind(&other)
                )))
            }
        };

        let rows = items
            .into_iter()
            .enumerate()
            .map(|(row, item)| match item {
                Value::Object(map) => map
                    .into_iter()
                    .map(|(column, value)| match cell_from_json(value) {
                        Ok(cell) => Ok((column, cell)),
                        Err(kind) => Err(StatsError::MalformedRow {
                            row,
                            reason: format!("column '{}' holds a nested {}", column, kind),
                        }),
                    })
                    .collect::<StatsResult<Row>>(),
                other => Err(StatsError::MalformedRow {
                    row,
                    reason: format!("expected an object, got {}", json_kind(&other)),
                }),
            })
            .collect::<StatsResult<Vec<Row>>>()?;

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Canonical column list: the keys of the first row
    pub fn columns(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl From<Vec<Row>> for Dataset {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

impl TryFrom<Value> for Dataset {
    type Error = StatsError;

    fn try_from(value: Value) -> StatsResult<Self> {
        Self::from_value(value)
    }
}

impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rows.serialize(serializer)
    }
}

fn cell_from_json(value: Value) -> Result<CellValue, &'static str> {
    match value {
        Value::Null => Ok(CellValue::Null),
        Value::Bool(b) => Ok(CellValue::Bool(b)),
        Value::Number(n) => Ok(n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Null)),
        Value::String(s) => Ok(CellValue::Text(s)),
        Value::Array(_) => Err("array"),
        Value::Object(_) => Err("object"),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Statistical Summary Types
// ============================================================================

/// An aligned (x, y) observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericPair {
    pub x: f64,
    pub y: f64,
}

impl NumericPair {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Aligned numeric pairs in source row order
pub type NumericSeries = Vec<NumericPair>;

/// A statistic computed separately on each axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisStat {
    pub x: f64,
    pub y: f64,
}

/// Quartiles of the Y values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
}

/// Observed [min, max] of one axis, serialized as a two-element array
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "(f64, f64)")]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

impl From<Extent> for (f64, f64) {
    fn from(extent: Extent) -> Self {
        (extent.min, extent.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ranges {
    pub x: Extent,
    pub y: Extent,
}

/// Simple linear regression line y = m·x + b
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    #[serde(rename = "m")]
    pub slope: f64,
    #[serde(rename = "b")]
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Descriptive statistics for one (dataset, X, Y) selection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticalSummary {
    pub mean: AxisStat,
    pub median: AxisStat,
    /// Computed on Y
    pub quartiles: Quartiles,
    pub range: Ranges,
    /// Population standard deviation
    pub standard_deviation: AxisStat,
    /// Pearson correlation; absent with fewer than 2 points or zero variance
    pub correlation: Option<f64>,
    /// Points whose y lies outside the Tukey fences
    pub outliers: NumericSeries,
    /// Absent with fewer than 2 points or when every x is equal
    pub linear_regression: Option<LinearFit>,
    /// Absent without a regression or when every y is equal
    pub r_squared: Option<f64>,
    pub data_points: usize,
}

// ============================================================================
// Time Series Types
// ============================================================================

/// One observation of the date-sorted series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Raw date value as it appeared in the source
    pub date: String,
    /// Absent when the Y cell is not numeric
    pub value: Option<f64>,
    pub moving_average: Option<f64>,
}

/// Best autocorrelation found while scanning candidate lags
///
/// This is a heuristic cyclicality signal, not a periodogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Seasonality {
    /// Absolute autocorrelation in [0, 1]
    pub score: f64,
    /// Lag, in observations, that produced the score (0 when no lag qualified)
    pub period: usize,
}

/// A projected future observation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// ISO calendar date (YYYY-MM-DD)
    pub date: String,
    pub forecast_value: f64,
    pub is_forecast: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSpan {
    pub start: String,
    pub end: String,
}

/// Date-sorted trend with optional seasonality and forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesTrend {
    pub date_column: String,
    pub trend: Vec<TrendPoint>,
    pub time_span: TimeSpan,
    pub seasonality: Option<Seasonality>,
    pub forecast: Option<Vec<ForecastPoint>>,
}

/// Either an observed or a forecast point, for charts that overlay both
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesPoint<'a> {
    Observed(&'a TrendPoint),
    Forecast(&'a ForecastPoint),
}

impl TimeSeriesTrend {
    /// Observed trend followed by the forecast, if any
    pub fn combined_points(&self) -> Vec<SeriesPoint<'_>> {
        self.trend
            .iter()
            .map(SeriesPoint::Observed)
            .chain(self.forecast.iter().flatten().map(SeriesPoint::Forecast))
            .collect()
    }
}

/// An extrapolated point beyond the observed X range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictedPoint {
    pub x: f64,
    pub y: f64,
    pub is_prediction: bool,
}

// ============================================================================
// Options
// ============================================================================

/// Options for the statistical summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SummaryOptions {
    /// IQR multiplier for the Tukey fences
    pub outlier_fence: f64,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self { outlier_fence: 1.5 }
    }
}

/// Which strings count as calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateParsing {
    /// Only strings with a recognizable calendar layout (separators, month names)
    #[default]
    Strict,
    /// Strict, plus bare four-digit years ("2021" or 2021) read as January 1st
    Lenient,
}

/// Options for time series analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeSeriesOptions {
    /// Moving average window is row_count / divisor, floored
    pub moving_average_divisor: usize,
    pub min_moving_average_window: usize,
    /// Seasonality is scanned only above this many rows
    pub seasonality_min_rows: usize,
    pub min_seasonality_lag: usize,
    /// Largest lag scanned is value_count / divisor, floored
    pub max_lag_divisor: usize,
    /// Forecast is produced only above this many rows
    pub forecast_min_rows: usize,
    /// Trailing observations used to estimate drift
    pub forecast_lookback: usize,
    pub forecast_horizon: usize,
    pub date_parsing: DateParsing,
}

impl Default for TimeSeriesOptions {
    fn default() -> Self {
        Self {
            moving_average_divisor: 10,
            min_moving_average_window: 2,
            seasonality_min_rows: 12,
            min_seasonality_lag: 2,
            max_lag_divisor: 4,
            forecast_min_rows: 5,
            forecast_lookback: 5,
            forecast_horizon: 3,
            date_parsing: DateParsing::Strict,
        }
    }
}

/// Options for extrapolating the regression line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PredictionOptions {
    pub steps: usize,
    /// Step size as a fraction of the observed X range
    pub step_fraction: f64,
}

impl Default for PredictionOptions {
    fn default() -> Self {
        Self {
            steps: 5,
            step_fraction: 0.1,
        }
    }
}

/// Thresholds for the insight rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsightThresholds {
    pub strong_correlation: f64,
    pub moderate_correlation: f64,
    /// Outlier share of data points above which outliers are high severity
    pub high_outlier_share: f64,
    /// |mean - median| / stddev above which the distribution is skewed
    pub skew_ratio: f64,
    pub high_r_squared: f64,
    pub moderate_r_squared: f64,
    /// Percent change of Y over the X range that counts as a trend
    pub trend_percent: f64,
    pub seasonality_score: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            strong_correlation: 0.7,
            moderate_correlation: 0.4,
            high_outlier_share: 0.1,
            skew_ratio: 0.5,
            high_r_squared: 0.7,
            moderate_r_squared: 0.4,
            trend_percent: 10.0,
            seasonality_score: 0.4,
        }
    }
}

/// All engine options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisOptions {
    pub summary: SummaryOptions,
    pub time_series: TimeSeriesOptions,
    pub prediction: PredictionOptions,
    pub insights: InsightThresholds,
}
