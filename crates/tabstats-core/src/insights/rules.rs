use super::{Insight, InsightKind, RuleContext, Severity};

fn insight(
    kind: InsightKind,
    severity: Severity,
    title: String,
    message: String,
    recommendation: &str,
) -> Insight {
    Insight {
        kind,
        severity,
        title,
        message,
        recommendation: recommendation.to_string(),
    }
}

pub(super) fn correlation(ctx: &RuleContext<'_>) -> Option<Insight> {
    let r = ctx.summary?.correlation?;
    let t = ctx.thresholds;
    let direction = if r > 0.0 { "positive" } else { "negative" };

    if r.abs() > t.strong_correlation {
        let (message, recommendation) = if r > 0.0 {
            (
                format!("As {} increases, {} tends to increase as well.", ctx.x_col, ctx.y_col),
                "Consider strategies that leverage this positive relationship.",
            )
        } else {
            (
                format!("As {} increases, {} tends to decrease.", ctx.x_col, ctx.y_col),
                "Be aware of this inverse relationship in your planning.",
            )
        };
        Some(insight(
            InsightKind::Correlation,
            Severity::High,
            format!("Strong {} correlation detected ({:.2})", direction, r),
            message,
            recommendation,
        ))
    } else if r.abs() > t.moderate_correlation {
        Some(insight(
            InsightKind::Correlation,
            Severity::Medium,
            format!("Moderate {} correlation ({:.2})", direction, r),
            format!(
                "There is a moderate relationship between {} and {}.",
                ctx.x_col, ctx.y_col
            ),
            "Further investigation may reveal stronger patterns in specific segments.",
        ))
    } else {
        None
    }
}

pub(super) fn outliers(ctx: &RuleContext<'_>) -> Option<Insight> {
    let summary = ctx.summary?;
    let count = summary.outliers.len();
    let total = summary.data_points;
    if count == 0 || total == 0 {
        return None;
    }

    let share = count as f64 / total as f64;
    let severity = if share > ctx.thresholds.high_outlier_share {
        Severity::High
    } else {
        Severity::Medium
    };

    Some(insight(
        InsightKind::Outliers,
        severity,
        format!("{} outliers detected ({:.1}% of data)", count, share * 100.0),
        "These outliers may represent special cases or errors in data collection.".to_string(),
        "Review these points individually to determine if they should be excluded or represent important events.",
    ))
}

pub(super) fn distribution(ctx: &RuleContext<'_>) -> Option<Insight> {
    let s = ctx.summary?;
    let std_dev = s.standard_deviation.y;
    if std_dev <= 0.0 || !std_dev.is_finite() {
        return None;
    }
    if ((s.mean.y - s.median.y) / std_dev).abs() <= ctx.thresholds.skew_ratio {
        return None;
    }

    let right = s.mean.y > s.median.y;
    Some(insight(
        InsightKind::Distribution,
        Severity::Medium,
        "Skewed distribution detected".to_string(),
        format!(
            "The data is {}-skewed, meaning {} values have more influence.",
            if right { "right" } else { "left" },
            if right { "higher" } else { "lower" },
        ),
        if right {
            "Consider segmenting the data or using median for more representative analysis."
        } else {
            "Consider segmenting the data or using weighted average for more representative analysis."
        },
    ))
}

pub(super) fn prediction(ctx: &RuleContext<'_>) -> Option<Insight> {
    let summary = ctx.summary?;
    summary.linear_regression?;
    let r2 = summary.r_squared?;
    let t = ctx.thresholds;

    let (quality, severity, recommendation) = if r2 > t.high_r_squared {
        (
            "High",
            Severity::High,
            "This relationship is reliable for forecasting future values.",
        )
    } else if r2 > t.moderate_r_squared {
        (
            "Moderate",
            Severity::Medium,
            "Consider adding more variables for more accurate predictions.",
        )
    } else {
        (
            "Low",
            Severity::Low,
            "More data or different variables are needed for reliable predictions.",
        )
    };

    Some(insight(
        InsightKind::Prediction,
        severity,
        format!("{} prediction confidence (R² = {:.2})", quality, r2),
        format!(
            "The current model explains {:.0}% of the variation in {}.",
            r2 * 100.0,
            ctx.y_col
        ),
        recommendation,
    ))
}

pub(super) fn trend(ctx: &RuleContext<'_>) -> Option<Insight> {
    let s = ctx.summary?;
    let fit = s.linear_regression?;
    s.r_squared?;
    if s.mean.y == 0.0 {
        return None;
    }

    let predicted_change = fit.slope * s.range.x.width();
    let percent_change = predicted_change / s.mean.y * 100.0;
    if !percent_change.is_finite() || percent_change.abs() <= ctx.thresholds.trend_percent {
        return None;
    }

    let upward = fit.slope > 0.0;
    Some(insight(
        InsightKind::Trend,
        Severity::High,
        format!(
            "Significant {} trend detected",
            if upward { "upward" } else { "downward" }
        ),
        format!(
            "Based on current data, expect a {:.0}% {} over similar time periods.",
            percent_change.abs(),
            if upward { "increase" } else { "decrease" }
        ),
        if upward {
            "Prepare for growth by scaling resources accordingly."
        } else {
            "Develop strategies to address this declining trend."
        },
    ))
}

pub(super) fn seasonality(ctx: &RuleContext<'_>) -> Option<Insight> {
    let seasonality = ctx.time_series?.seasonality?;
    if seasonality.score <= ctx.thresholds.seasonality_score {
        return None;
    }

    Some(insight(
        InsightKind::Seasonality,
        Severity::Medium,
        "Cyclical pattern detected".to_string(),
        format!(
            "Your data shows repetitive patterns approximately every {} data points.",
            seasonality.period
        ),
        "Account for these cycles in your planning and forecasting.",
    ))
}
