use telemeter_agg::pipeline::{aggregate, AggregateOptions};
use telemeter_core::config::{Config, ResetPolicy};
use telemeter_core::registry::{MetricKind, Registry};
use telemeter_ingest::adapter::ChannelAdapter;

#[test]
fn temperature_feed_end_to_end() {
    let cfg = Config::default();
    let adapter = ChannelAdapter::new(&cfg.field_map).unwrap();
    let registry = Registry::builtin();
    let feed = testkit::sample_feed();

    let raw = adapter.extract(&feed, MetricKind::Temperature).unwrap();
    assert_eq!(raw.len(), feed.len());

    let descriptor = registry.get(MetricKind::Temperature).unwrap();
    let report = aggregate(descriptor, &raw, &AggregateOptions::from_config(&cfg));
    let summary = &report.aggregates.summary;

    // 288 records, 5 of them outage rows with no readings.
    assert_eq!(summary.sample_count, 283);
    assert!(summary.min.unwrap() >= 18.0);
    assert!(summary.max.unwrap() <= 22.0);
    assert!(summary.latest_ts.is_some());

    // sum == average * count within float tolerance.
    let sum = summary.sum.unwrap();
    assert!((sum - summary.average.unwrap() * summary.sample_count as f64).abs() < 1e-6);

    // Windowed totals never exceed the whole-series total for a positive series.
    for w in [summary.last_hour, summary.last_day, summary.last_month] {
        assert!(w.total.unwrap() <= sum);
    }

    let hourly = &report.aggregates.hourly;
    assert_eq!(hourly.len(), 12);
    assert!(hourly.windows(2).all(|w| w[0].start > w[1].start));
    // A full hour holds twelve 5-minute samples.
    assert_eq!(hourly[0].count, 12);

    assert_eq!(report.aggregates.daily.len(), 1);
    assert_eq!(report.aggregates.monthly.len(), 1);
    assert_eq!(report.aggregates.monthly[0].count, 283);
}

#[test]
fn motion_counter_clamps_reboot_and_passthrough_does_not() {
    let cfg = Config::default();
    let adapter = ChannelAdapter::new(&cfg.field_map).unwrap();
    let registry = Registry::builtin();
    let descriptor = registry.get(MetricKind::Motion).unwrap();
    let feed = testkit::sample_feed();
    let raw = adapter.extract(&feed, MetricKind::Motion).unwrap();

    let clamped = aggregate(descriptor, &raw, &AggregateOptions::default());
    assert!(clamped
        .chart_series
        .iter()
        .filter_map(|p| p.value)
        .all(|v| v >= 0.0));

    let opts = AggregateOptions {
        reset_policy: ResetPolicy::Passthrough,
        ..AggregateOptions::default()
    };
    let passthrough = aggregate(descriptor, &raw, &opts);
    assert!(passthrough
        .chart_series
        .iter()
        .filter_map(|p| p.value)
        .any(|v| v < 0.0));
}

#[test]
fn outage_rows_null_their_neighbors_in_differenced_series() {
    let cfg = Config::default();
    let adapter = ChannelAdapter::new(&cfg.field_map).unwrap();
    let registry = Registry::builtin();
    let descriptor = registry.get(MetricKind::Motion).unwrap();
    let feed = testkit::sample_feed();
    let raw = adapter.extract(&feed, MetricKind::Motion).unwrap();

    let report = aggregate(descriptor, &raw, &AggregateOptions::default());
    // Outage spans records 40..44; the first reading after it (44) has no
    // previous value, so its delta is null too.
    for i in 40..=44 {
        assert_eq!(report.chart_series[i].value, None, "index {i}");
    }
    assert!(report.chart_series[45].value.is_some());
}
