//! End-to-end analysis of one request into a persistable report
//!
//! The report groups its output the way storage expects it: `charts`,
//! `insights`, `statistics` (label to display string) and `raw_data` (the
//! structured results).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{StatsError, StatsResult};
use crate::insights::{generate_insights, Insight};
use crate::predict::predict_future;
use crate::summary::analyze;
use crate::timeseries::analyze_time_series;
use crate::types::{
    AnalysisOptions, CellValue, Dataset, ForecastPoint, PredictedPoint, Row, StatisticalSummary,
    TimeSeriesTrend, TrendPoint,
};

/// Chart layouts a presentation layer knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Scatter,
    Pie,
    Area,
}

/// One analysis request, as received from a host
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub records: Dataset,
    #[serde(default)]
    pub x_column: Option<String>,
    #[serde(default)]
    pub y_column: Option<String>,
    #[serde(default)]
    pub chart_type: ChartKind,
    #[serde(default)]
    pub include_predictions: bool,
    /// Free-form label of where the records came from (file name, table)
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub options: AnalysisOptions,
}

impl AnalysisRequest {
    pub fn new(records: Dataset, x_column: &str, y_column: &str) -> Self {
        Self {
            records,
            x_column: Some(x_column.to_string()),
            y_column: Some(y_column.to_string()),
            chart_type: ChartKind::default(),
            include_predictions: false,
            source: None,
            options: AnalysisOptions::default(),
        }
    }

    pub fn from_json(input: &str) -> StatsResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    fn x_col(&self) -> Option<&str> {
        self.x_column.as_deref().filter(|c| !c.is_empty())
    }

    fn y_col(&self) -> Option<&str> {
        self.y_column.as_deref().filter(|c| !c.is_empty())
    }
}

/// A single entry of a chart's data array
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartDatum {
    Record(Row),
    Observed(TrendPoint),
    Forecast(ForecastPoint),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub title: String,
    pub x_key: String,
    pub y_key: String,
    pub data: Vec<ChartDatum>,
}

/// Structured results kept alongside the display strings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawData {
    pub source: Option<String>,
    /// Rows in the input, numeric or not
    pub data_points: usize,
    pub columns: Vec<String>,
    pub x_column: Option<String>,
    pub y_column: Option<String>,
    pub summary: Option<StatisticalSummary>,
    pub time_series: Option<TimeSeriesTrend>,
    pub predictions: Option<Vec<PredictedPoint>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub charts: Vec<ChartSpec>,
    pub insights: Vec<Insight>,
    pub statistics: IndexMap<String, String>,
    pub raw_data: RawData,
}

impl AnalysisReport {
    pub fn to_json(&self) -> StatsResult<String> {
        serde_json::to_string(self).map_err(|e| StatsError::SerializationError(e.to_string()))
    }
}

/// Run every analysis stage over a request
///
/// Stages that cannot run on the selection (no numeric pairs, no date
/// column) are simply absent from the report.
pub fn run_analysis(request: &AnalysisRequest) -> AnalysisReport {
    let dataset = &request.records;
    let options = &request.options;
    let columns = dataset.columns();
    let x_col = request.x_col();
    let y_col = request.y_col();

    let summary = analyze(dataset, x_col, y_col, &options.summary);
    let time_series = analyze_time_series(dataset, &columns, x_col, y_col, &options.time_series);

    let predictions = if request.include_predictions && request.chart_type != ChartKind::Pie {
        summary
            .as_ref()
            .and_then(|s| predict_future(dataset, x_col, y_col, s, &options.prediction))
    } else {
        None
    };

    let insights = generate_insights(
        summary.as_ref(),
        time_series.as_ref(),
        x_col.unwrap_or_default(),
        y_col.unwrap_or_default(),
        &options.insights,
    );

    let charts = match (x_col, y_col) {
        (Some(x), Some(y)) => vec![build_chart(
            request,
            x,
            y,
            time_series.as_ref(),
            predictions.as_deref(),
        )],
        _ => Vec::new(),
    };

    AnalysisReport {
        charts,
        insights,
        statistics: summary.as_ref().map(statistics_labels).unwrap_or_default(),
        raw_data: RawData {
            source: request.source.clone(),
            data_points: dataset.len(),
            columns,
            x_column: x_col.map(str::to_string),
            y_column: y_col.map(str::to_string),
            summary,
            time_series,
            predictions,
        },
    }
}

fn build_chart(
    request: &AnalysisRequest,
    x_col: &str,
    y_col: &str,
    time_series: Option<&TimeSeriesTrend>,
    predictions: Option<&[PredictedPoint]>,
) -> ChartSpec {
    if let (ChartKind::Line, Some(ts)) = (request.chart_type, time_series) {
        let mut data: Vec<ChartDatum> =
            ts.trend.iter().cloned().map(ChartDatum::Observed).collect();
        if request.include_predictions {
            data.extend(ts.forecast.iter().flatten().cloned().map(ChartDatum::Forecast));
        }
        return ChartSpec {
            kind: ChartKind::Line,
            title: format!("{} over time", y_col),
            x_key: "date".to_string(),
            y_key: "value".to_string(),
            data,
        };
    }

    let mut data: Vec<ChartDatum> = request
        .records
        .rows()
        .iter()
        .cloned()
        .map(ChartDatum::Record)
        .collect();
    data.extend(
        predictions
            .unwrap_or_default()
            .iter()
            .map(|p| ChartDatum::Record(prediction_row(x_col, y_col, p))),
    );

    ChartSpec {
        kind: request.chart_type,
        title: format!("{} vs {}", y_col, x_col),
        x_key: x_col.to_string(),
        y_key: y_col.to_string(),
        data,
    }
}

fn prediction_row(x_col: &str, y_col: &str, point: &PredictedPoint) -> Row {
    let mut row = Row::new();
    row.insert(x_col.to_string(), CellValue::Number(point.x));
    row.insert(y_col.to_string(), CellValue::Number(point.y));
    row.insert("isPrediction".to_string(), CellValue::Bool(point.is_prediction));
    row
}

/// Human-readable statistics, in display order
///
/// Axis statistics are reported for Y. Undefined values are left out rather
/// than rendered as placeholders.
pub fn statistics_labels(summary: &StatisticalSummary) -> IndexMap<String, String> {
    let mut stats = IndexMap::new();
    let mut put = |label: &str, value: String| {
        stats.insert(label.to_string(), value);
    };

    put("Data Points", summary.data_points.to_string());
    put("Mean", fixed2(summary.mean.y));
    put("Median", fixed2(summary.median.y));
    put("Standard Deviation", fixed2(summary.standard_deviation.y));
    put("Q1", fixed2(summary.quartiles.q1));
    put("Q3", fixed2(summary.quartiles.q3));
    put("IQR", fixed2(summary.quartiles.iqr));
    put("Min", fixed2(summary.range.y.min));
    put("Max", fixed2(summary.range.y.max));
    put("Outliers", summary.outliers.len().to_string());
    if let Some(r) = summary.correlation {
        put("Correlation", fixed2(r));
    }
    if let Some(fit) = summary.linear_regression {
        put("Slope", fixed2(fit.slope));
        put("Intercept", fixed2(fit.intercept));
    }
    if let Some(r2) = summary.r_squared {
        put("R-squared", fixed2(r2));
    }

    stats
}

fn fixed2(value: f64) -> String {
    format!("{:.2}", value)
}
