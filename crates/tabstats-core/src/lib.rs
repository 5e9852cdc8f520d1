//! tabstats-core: statistics and insight engine for tabular uploads
//!
//! Takes an ordered set of records plus an X/Y column selection and derives
//! a statistical summary, a date-sorted trend with seasonality and forecast,
//! and a list of rule-based insights. Everything is pure and deterministic;
//! the FFI crate exposes it to non-Rust hosts.

pub mod errors;
pub mod extract;
pub mod insights;
pub mod predict;
pub mod report;
pub mod summary;
pub mod timeseries;
pub mod types;

pub use errors::{StatsError, StatsResult};
pub use insights::{generate_insights, Insight, InsightKind, Severity};
pub use predict::predict_future;
pub use report::{run_analysis, AnalysisReport, AnalysisRequest, ChartKind, ChartSpec};
pub use summary::analyze;
pub use timeseries::analyze_time_series;
pub use types::*;
