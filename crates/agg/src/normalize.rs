use telemeter_core::model::point::{ChartPoint, MetricPoint};
use telemeter_core::time::{epoch_ms, parse_timestamp};
use tracing::debug;

/// Converts nullable chart points into validated samples, sorted ascending
/// by epoch. Points with a missing/unparseable timestamp or a null or
/// non-finite value are dropped, never errored. The sort is stable, so
/// equal-epoch points keep their input order.
pub fn normalize(points: &[ChartPoint]) -> Vec<MetricPoint> {
    let mut out: Vec<MetricPoint> = points
        .iter()
        .filter_map(|p| {
            let raw_ts = p.ts.as_deref().filter(|t| !t.is_empty())?;
            let value = p.value.filter(|v| v.is_finite())?;
            let ts = parse_timestamp(raw_ts).ok()?;
            Some(MetricPoint {
                ts,
                epoch_ms: epoch_ms(ts),
                value,
            })
        })
        .collect();

    if out.len() < points.len() {
        debug!(
            dropped = points.len() - out.len(),
            kept = out.len(),
            "normalize dropped invalid points"
        );
    }

    out.sort_by_key(|p| p.epoch_ms);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_nulls_and_unparseable() {
        let points = vec![
            ChartPoint::new("2024-01-01T01:00:00Z", Some(2.0)),
            ChartPoint::new("2024-01-01T00:00:00Z", Some(1.0)),
            ChartPoint::new("2024-01-01T02:00:00Z", None),
            ChartPoint::new("garbage", Some(3.0)),
            ChartPoint::new("2024-01-01T03:00:00Z", Some(f64::NAN)),
            ChartPoint { ts: None, value: Some(4.0) },
            ChartPoint::new("", Some(5.0)),
        ];

        let normalized = normalize(&points);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].value, 1.0);
        assert_eq!(normalized[1].value, 2.0);
    }

    #[test]
    fn sorts_ascending_by_epoch() {
        let points = vec![
            ChartPoint::new("2024-01-02T00:00:00Z", Some(2.0)),
            ChartPoint::new("2024-01-01T00:00:00Z", Some(1.0)),
            ChartPoint::new("2024-01-03T00:00:00Z", Some(3.0)),
        ];

        let normalized = normalize(&points);
        let epochs: Vec<i64> = normalized.iter().map(|p| p.epoch_ms).collect();
        assert!(epochs.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn equal_epochs_keep_input_order() {
        let points = vec![
            ChartPoint::new("2024-01-01T00:00:00Z", Some(10.0)),
            ChartPoint::new("2024-01-01T00:00:00Z", Some(20.0)),
            ChartPoint::new("2024-01-01T00:00:00Z", Some(30.0)),
        ];

        let normalized = normalize(&points);
        let values: Vec<f64> = normalized.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn idempotent_on_sorted_output() {
        let points = vec![
            ChartPoint::new("2024-01-02T00:00:00Z", Some(2.0)),
            ChartPoint::new("2024-01-01T00:00:00Z", Some(1.0)),
        ];

        let once = normalize(&points);
        let back: Vec<ChartPoint> = once
            .iter()
            .map(|p| ChartPoint::new(p.ts.to_rfc3339(), Some(p.value)))
            .collect();
        let twice = normalize(&back);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(normalize(&[]).is_empty());
    }
}
