use telemeter_core::config::{Config, ResetPolicy};
use telemeter_core::model::aggregate::{MetricAggregates, MetricReport};
use telemeter_core::model::point::ChartPoint;
use telemeter_core::registry::MetricDescriptor;
use tracing::debug;

use crate::bucket::{bucketize, Granularity};
use crate::differential::differentiate;
use crate::normalize::normalize;
use crate::window::summarize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    pub reset_policy: ResetPolicy,
    pub hourly_limit: usize,
    pub daily_limit: usize,
    pub monthly_limit: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            reset_policy: ResetPolicy::Clamp,
            hourly_limit: 12,
            daily_limit: 10,
            monthly_limit: 6,
        }
    }
}

impl AggregateOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            reset_policy: cfg.reset_policy,
            hourly_limit: cfg.hourly_limit,
            daily_limit: cfg.daily_limit,
            monthly_limit: cfg.monthly_limit,
        }
    }
}

/// Runs the full aggregation for one metric: counter differencing when the
/// descriptor says the raw signal is cumulative, then normalization, then
/// windows and buckets over the same normalized series.
///
/// `raw` must be in chronological order (the provider feed order); the
/// differential transform depends on it. The cumulative flag is consulted
/// exactly once, here.
pub fn aggregate(
    descriptor: &MetricDescriptor,
    raw: &[ChartPoint],
    opts: &AggregateOptions,
) -> MetricReport {
    let chart_series = if descriptor.cumulative {
        differentiate(raw, opts.reset_policy)
    } else {
        raw.to_vec()
    };

    let points = normalize(&chart_series);
    debug!(
        metric = %descriptor.kind,
        raw = raw.len(),
        normalized = points.len(),
        "aggregating series"
    );

    let aggregates = MetricAggregates {
        summary: summarize(&points),
        hourly: bucketize(&points, Granularity::Hour, opts.hourly_limit),
        daily: bucketize(&points, Granularity::Day, opts.daily_limit),
        monthly: bucketize(&points, Granularity::Month, opts.monthly_limit),
    };

    MetricReport {
        aggregates,
        chart_series,
    }
}
