//! Rule-based insight generation
//!
//! Each rule is an independent predicate over the same optional statistical
//! summary and optional time series trend. All matching rules fire, in the
//! order of [`RULES`].

mod rules;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::types::{InsightThresholds, StatisticalSummary, TimeSeriesTrend};

/// What an insight is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Correlation,
    Outliers,
    Distribution,
    Prediction,
    Trend,
    Seasonality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Presentation style class for this severity
    pub fn color_class(&self) -> &'static str {
        match self {
            Severity::High => "bg-blue-100 border-blue-500 text-blue-700",
            Severity::Medium => "bg-green-100 border-green-500 text-green-700",
            Severity::Low => "bg-yellow-100 border-yellow-500 text-yellow-700",
        }
    }
}

/// A human-readable finding
#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub kind: InsightKind,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub recommendation: String,
}

impl Serialize for Insight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Insight", 6)?;
        state.serialize_field("type", &self.kind)?;
        state.serialize_field("severity", &self.severity)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("recommendation", &self.recommendation)?;
        state.serialize_field("colorClass", self.severity.color_class())?;
        state.end()
    }
}

/// Everything a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Absent when the selection has no numeric pairs, e.g. a date X column
    pub summary: Option<&'a StatisticalSummary>,
    pub time_series: Option<&'a TimeSeriesTrend>,
    pub x_col: &'a str,
    pub y_col: &'a str,
    pub thresholds: &'a InsightThresholds,
}

/// A predicate/constructor pair producing at most one insight
#[derive(Clone, Copy)]
pub struct InsightRule {
    pub kind: InsightKind,
    pub evaluate: fn(&RuleContext<'_>) -> Option<Insight>,
}

/// Rule set in emission order
pub const RULES: &[InsightRule] = &[
    InsightRule {
        kind: InsightKind::Correlation,
        evaluate: rules::correlation,
    },
    InsightRule {
        kind: InsightKind::Outliers,
        evaluate: rules::outliers,
    },
    InsightRule {
        kind: InsightKind::Distribution,
        evaluate: rules::distribution,
    },
    InsightRule {
        kind: InsightKind::Prediction,
        evaluate: rules::prediction,
    },
    InsightRule {
        kind: InsightKind::Trend,
        evaluate: rules::trend,
    },
    InsightRule {
        kind: InsightKind::Seasonality,
        evaluate: rules::seasonality,
    },
];

/// Apply every rule to an optional summary and optional trend
///
/// Rules that need the summary are skipped without one; the seasonality rule
/// only looks at the trend.
pub fn generate_insights(
    summary: Option<&StatisticalSummary>,
    time_series: Option<&TimeSeriesTrend>,
    x_col: &str,
    y_col: &str,
    thresholds: &InsightThresholds,
) -> Vec<Insight> {
    let ctx = RuleContext {
        summary,
        time_series,
        x_col,
        y_col,
        thresholds,
    };

    RULES.iter().filter_map(|rule| (rule.evaluate)(&ctx)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AxisStat, Extent, LinearFit, NumericPair, Quartiles, Ranges, Seasonality, TimeSpan,
    };

    pub(super) fn base_summary() -> StatisticalSummary {
        StatisticalSummary {
            mean: AxisStat { x: 5.0, y: 50.0 },
            median: AxisStat { x: 5.0, y: 50.0 },
            quartiles: Quartiles {
                q1: 40.0,
                q3: 60.0,
                iqr: 20.0,
            },
            range: Ranges {
                x: Extent {
                    min: 0.0,
                    max: 10.0,
                },
                y: Extent {
                    min: 20.0,
                    max: 80.0,
                },
            },
            standard_deviation: AxisStat { x: 3.0, y: 15.0 },
            correlation: Some(0.1),
            outliers: Vec::new(),
            linear_regression: None,
            r_squared: None,
            data_points: 20,
        }
    }

    fn kinds(insights: &[Insight]) -> Vec<InsightKind> {
        insights.iter().map(|i| i.kind).collect()
    }

    fn run(summary: &StatisticalSummary, ts: Option<&TimeSeriesTrend>) -> Vec<Insight> {
        generate_insights(Some(summary), ts, "spend", "revenue", &InsightThresholds::default())
    }

    #[test]
    fn test_nothing_to_look_at() {
        let insights =
            generate_insights(None, None, "x", "y", &InsightThresholds::default());
        assert!(insights.is_empty());
    }

    #[test]
    fn test_quiet_summary_yields_nothing() {
        assert!(run(&base_summary(), None).is_empty());
    }

    #[test]
    fn test_trend_from_regression() {
        // slope 5 over an X range of 10 against a mean of 50: 100% change
        let mut summary = base_summary();
        summary.linear_regression = Some(LinearFit {
            slope: 5.0,
            intercept: 25.0,
        });
        summary.r_squared = Some(0.2);

        let insights = run(&summary, None);
        assert_eq!(kinds(&insights), vec![InsightKind::Prediction, InsightKind::Trend]);

        let trend = &insights[1];
        assert_eq!(trend.severity, Severity::High);
        assert_eq!(trend.title, "Significant upward trend detected");
        assert!(trend.message.contains("100% increase"));
        assert_eq!(insights[0].severity, Severity::Low);
    }

    #[test]
    fn test_all_rules_fire_in_order() {
        let mut summary = base_summary();
        summary.correlation = Some(-0.85);
        summary.mean.y = 62.0;
        summary.outliers = vec![
            NumericPair::new(1.0, 200.0),
            NumericPair::new(2.0, 210.0),
            NumericPair::new(3.0, 190.0),
        ];
        summary.linear_regression = Some(LinearFit {
            slope: -4.0,
            intercept: 80.0,
        });
        summary.r_squared = Some(0.75);

        let ts = TimeSeriesTrend {
            date_column: "date".into(),
            trend: Vec::new(),
            time_span: TimeSpan {
                start: "2024-01-01".into(),
                end: "2024-01-20".into(),
            },
            seasonality: Some(Seasonality {
                score: 0.8,
                period: 7,
            }),
            forecast: None,
        };

        let insights = run(&summary, Some(&ts));
        assert_eq!(
            kinds(&insights),
            vec![
                InsightKind::Correlation,
                InsightKind::Outliers,
                InsightKind::Distribution,
                InsightKind::Prediction,
                InsightKind::Trend,
                InsightKind::Seasonality,
            ]
        );
        assert!(insights[4].title.contains("downward"));
        assert!(insights[5].message.contains("every 7 data points"));
    }

    #[test]
    fn test_rules_table_matches_kinds() {
        let declared: Vec<InsightKind> = RULES.iter().map(|r| r.kind).collect();
        assert_eq!(
            declared,
            vec![
                InsightKind::Correlation,
                InsightKind::Outliers,
                InsightKind::Distribution,
                InsightKind::Prediction,
                InsightKind::Trend,
                InsightKind::Seasonality,
            ]
        );
    }

    #[test]
    fn test_serialized_shape() {
        let mut summary = base_summary();
        summary.correlation = Some(0.9);
        let insights = run(&summary, None);
        let json = serde_json::to_value(&insights[0]).unwrap();
        assert_eq!(json["type"], "correlation");
        assert_eq!(json["severity"], "high");
        assert_eq!(json["colorClass"], Severity::High.color_class());
    }

    #[test]
    fn test_deterministic() {
        let mut summary = base_summary();
        summary.correlation = Some(0.55);
        assert_eq!(run(&summary, None), run(&summary, None));
    }
}
