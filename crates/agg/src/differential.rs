use telemeter_core::config::ResetPolicy;
use telemeter_core::model::point::ChartPoint;

/// Turns a monotonically increasing counter series into per-step deltas.
///
/// Input order is respected, never re-sorted; the caller passes points in
/// chronological order. Output has the same length and timestamps; only the
/// values change. A null or non-finite reading emits null and poisons the
/// next step too, since no delta is computable across a gap. A negative
/// delta means the counter reset; `ResetPolicy` decides what to emit.
pub fn differentiate(points: &[ChartPoint], policy: ResetPolicy) -> Vec<ChartPoint> {
    let mut previous: Option<f64> = None;
    points
        .iter()
        .map(|point| {
            let current = point.value.filter(|v| v.is_finite());
            let emitted = match (previous, current) {
                (_, None) => None,
                (None, Some(_)) => None,
                (Some(prev), Some(curr)) => {
                    let delta = curr - prev;
                    if delta < 0.0 {
                        match policy {
                            ResetPolicy::Clamp => Some(curr.max(0.0)),
                            ResetPolicy::Passthrough => Some(delta),
                        }
                    } else {
                        Some(delta)
                    }
                }
            };
            previous = current;
            ChartPoint {
                ts: point.ts.clone(),
                value: emitted,
            }
        })
        .collect()
}
