use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Nullable point as produced by the field adapter and consumed by charting.
/// `None` means "no reading" and must stay `None` through every transform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChartPoint {
    pub ts: Option<String>,
    pub value: Option<f64>,
}

impl ChartPoint {
    pub fn new(ts: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            ts: Some(ts.into()),
            value,
        }
    }
}

/// Validated sample: parsed timestamp, finite value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricPoint {
    pub ts: DateTime<Utc>,
    pub epoch_ms: i64,
    pub value: f64,
}
