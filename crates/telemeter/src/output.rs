use chrono::SecondsFormat;
use owo_colors::OwoColorize;
use telemeter_core::config::Config;
use telemeter_core::model::aggregate::{AggregateBucket, MetricReport, WindowSummary};
use telemeter_core::model::point::ChartPoint;
use telemeter_core::registry::{MetricDescriptor, Registry};

pub fn print_report_human(descriptor: &MetricDescriptor, report: &MetricReport) {
    let summary = &report.aggregates.summary;
    let unit = descriptor.unit;
    println!(
        "{} [{unit}] samples={}",
        descriptor.kind.to_string().cyan(),
        summary.sample_count
    );

    let latest_ts = summary
        .latest_ts
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  latest={} at {latest_ts}",
        value(summary.latest_value, descriptor)
    );
    println!(
        "  min={} max={} avg={} sum={}",
        value(summary.min, descriptor),
        value(summary.max, descriptor),
        value(summary.average, descriptor),
        value(summary.sum, descriptor)
    );
    print_window("hour", &summary.last_hour, descriptor);
    print_window("day", &summary.last_day, descriptor);
    print_window("month", &summary.last_month, descriptor);

    print_buckets("hourly", &report.aggregates.hourly, descriptor);
    print_buckets("daily", &report.aggregates.daily, descriptor);
    print_buckets("monthly", &report.aggregates.monthly, descriptor);
    println!();
}

pub fn print_chart_human(descriptor: &MetricDescriptor, series: &[ChartPoint]) {
    for point in series {
        let ts = point.ts.as_deref().unwrap_or("-");
        match point.value {
            Some(v) => println!("{ts} {}", format_value(v, descriptor)),
            None => println!("{ts} {}", "-".bright_black()),
        }
    }
    println!("-- {} chart points --", series.len());
}

pub fn print_metrics_human(registry: &Registry, cfg: &Config) {
    for descriptor in registry.iter() {
        let field = cfg
            .field_map
            .iter()
            .find(|(kind, _)| *kind == descriptor.kind)
            .map(|(_, index)| format!("field{index}"))
            .unwrap_or_else(|| "unmapped".to_string());
        let flavor = if descriptor.cumulative {
            "cumulative"
        } else {
            "instant"
        };
        println!(
            "{} unit={} precision={} {} source={}",
            descriptor.kind.to_string().cyan(),
            descriptor.unit,
            descriptor.precision,
            flavor,
            field
        );
    }
}

fn print_window(name: &str, window: &WindowSummary, descriptor: &MetricDescriptor) {
    println!(
        "  last {name}: avg={} total={}",
        value(window.average, descriptor),
        value(window.total, descriptor)
    );
}

fn print_buckets(name: &str, buckets: &[AggregateBucket], descriptor: &MetricDescriptor) {
    if buckets.is_empty() {
        return;
    }
    println!("  {name} buckets:");
    for bucket in buckets {
        println!(
            "    {} avg={} total={} count={}",
            bucket.label,
            value(bucket.average, descriptor),
            value(bucket.total, descriptor),
            bucket.count
        );
    }
}

fn value(v: Option<f64>, descriptor: &MetricDescriptor) -> String {
    match v {
        Some(v) => format_value(v, descriptor),
        None => "-".to_string(),
    }
}

fn format_value(v: f64, descriptor: &MetricDescriptor) -> String {
    format!("{v:.prec$}", prec = descriptor.precision as usize)
}
