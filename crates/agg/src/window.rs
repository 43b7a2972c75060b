use telemeter_core::model::aggregate::{MetricSummary, WindowSummary};
use telemeter_core::model::point::MetricPoint;

pub const HOUR_MS: i64 = 3_600_000;
pub const DAY_MS: i64 = 86_400_000;
/// Fixed 30-day month, not calendar-month.
pub const MONTH_MS: i64 = 2_592_000_000;

/// Whole-series and trailing-window statistics over normalized points.
///
/// The reference instant is the epoch of the last point, not wall clock, so
/// results are reproducible against historical series. Empty input yields
/// the all-null summary with `sample_count` 0.
pub fn summarize(points: &[MetricPoint]) -> MetricSummary {
    let Some(latest) = points.last() else {
        return MetricSummary::default();
    };

    let sum: f64 = points.iter().map(|p| p.value).sum();
    let min = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let max = points
        .iter()
        .map(|p| p.value)
        .fold(f64::NEG_INFINITY, f64::max);
    let count = points.len();

    let reference = latest.epoch_ms;
    MetricSummary {
        latest_value: Some(latest.value),
        latest_ts: Some(latest.ts),
        min: Some(min),
        max: Some(max),
        average: Some(sum / count as f64),
        sum: Some(sum),
        sample_count: count,
        last_hour: window(points, reference - HOUR_MS),
        last_day: window(points, reference - DAY_MS),
        last_month: window(points, reference - MONTH_MS),
    }
}

fn window(points: &[MetricPoint], cutoff: i64) -> WindowSummary {
    let mut sum = 0.0;
    let mut count = 0usize;
    for point in points.iter().filter(|p| p.epoch_ms >= cutoff) {
        sum += point.value;
        count += 1;
    }

    if count == 0 {
        return WindowSummary::default();
    }
    WindowSummary {
        average: Some(sum / count as f64),
        total: Some(sum),
    }
}
