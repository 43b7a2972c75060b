use std::collections::HashMap;

use telemeter_core::error::{Result, TelemeterError};
use telemeter_core::model::point::ChartPoint;
use telemeter_core::registry::MetricKind;
use tracing::debug;

use crate::record::RawRecord;

/// Resolves the metric-kind → provider-field mapping once, at construction,
/// so extraction is a plain table lookup rather than per-call string
/// dispatch. Field indices follow the provider convention `field1`..`field8`.
#[derive(Debug, Clone)]
pub struct ChannelAdapter {
    map: HashMap<MetricKind, u8>,
}

impl ChannelAdapter {
    pub fn new(field_map: &[(MetricKind, u8)]) -> Result<Self> {
        let mut map = HashMap::new();
        for &(kind, index) in field_map {
            if !(1..=8).contains(&index) {
                return Err(TelemeterError::Config(format!(
                    "field index for {kind} must be 1..=8, got {index}"
                )));
            }
            if map.insert(kind, index).is_some() {
                return Err(TelemeterError::Config(format!(
                    "duplicate field mapping for {kind}"
                )));
            }
        }
        Ok(Self { map })
    }

    /// Maps each record to `(timestamp, value-or-null)` for one metric.
    /// Record order is preserved; a missing or non-numeric field value
    /// becomes a null-valued point, never a dropped record.
    pub fn extract(&self, records: &[RawRecord], kind: MetricKind) -> Result<Vec<ChartPoint>> {
        let index = *self.map.get(&kind).ok_or_else(|| {
            TelemeterError::InvalidArgument(format!("no field mapped for metric {kind}"))
        })?;

        let points: Vec<ChartPoint> = records
            .iter()
            .map(|record| ChartPoint {
                ts: Some(record.created_at.clone()),
                value: record
                    .field(index)
                    .and_then(|raw| raw.trim().parse::<f64>().ok())
                    .filter(|v| v.is_finite()),
            })
            .collect();

        debug!(metric = %kind, field = index, points = points.len(), "extracted series");
        Ok(points)
    }
}
