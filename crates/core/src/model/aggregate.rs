use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::point::ChartPoint;

/// Trailing-window rollup: `None` when no sample falls inside the window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct WindowSummary {
    pub average: Option<f64>,
    pub total: Option<f64>,
}

/// One calendar-aligned bucket. `start` is authoritative; `label` is a
/// default rendering any presentation layer may replace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateBucket {
    pub label: String,
    pub start: DateTime<Utc>,
    pub average: Option<f64>,
    pub total: Option<f64>,
    pub count: usize,
}

/// Whole-series statistics plus the three trailing windows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MetricSummary {
    pub latest_value: Option<f64>,
    pub latest_ts: Option<DateTime<Utc>>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub average: Option<f64>,
    pub sum: Option<f64>,
    pub sample_count: usize,
    pub last_hour: WindowSummary,
    pub last_day: WindowSummary,
    pub last_month: WindowSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MetricAggregates {
    pub summary: MetricSummary,
    pub hourly: Vec<AggregateBucket>,
    pub daily: Vec<AggregateBucket>,
    pub monthly: Vec<AggregateBucket>,
}

/// Full aggregation output for one metric: the aggregates plus the series
/// a chart should plot (differenced when the metric is cumulative).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MetricReport {
    pub aggregates: MetricAggregates,
    pub chart_series: Vec<ChartPoint>,
}
