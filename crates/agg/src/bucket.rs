use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use telemeter_core::error::{Result, TelemeterError};
use telemeter_core::model::aggregate::AggregateBucket;
use telemeter_core::model::point::MetricPoint;
use telemeter_core::time::{start_of_day, start_of_hour, start_of_month};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    Day,
    Month,
}

impl Granularity {
    /// Calendar-aligned UTC start of the bucket containing `ts`. A point
    /// sitting exactly on a boundary belongs to the bucket starting there.
    pub fn bucket_start(self, ts: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Hour => start_of_hour(ts),
            Self::Day => start_of_day(ts),
            Self::Month => start_of_month(ts),
        }
    }

    fn label(self, start: DateTime<Utc>) -> String {
        match self {
            Self::Hour => start.format("%Y-%m-%d %H:00").to_string(),
            Self::Day => start.format("%Y-%m-%d").to_string(),
            Self::Month => start.format("%Y-%m").to_string(),
        }
    }
}

impl FromStr for Granularity {
    type Err = TelemeterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hour" | "hourly" => Ok(Self::Hour),
            "day" | "daily" => Ok(Self::Day),
            "month" | "monthly" => Ok(Self::Month),
            _ => Err(TelemeterError::Parse(format!("unknown granularity: {s}"))),
        }
    }
}

/// Groups points into calendar buckets and returns the most recent `limit`
/// of them, newest first. The grouping key is the bucket's start instant in
/// epoch ms, which stays unique across year boundaries where a bare
/// hour-of-day or day-of-month label would collide.
pub fn bucketize(
    points: &[MetricPoint],
    granularity: Granularity,
    limit: usize,
) -> Vec<AggregateBucket> {
    let mut groups: BTreeMap<i64, (DateTime<Utc>, f64, usize)> = BTreeMap::new();
    for point in points {
        let start = granularity.bucket_start(point.ts);
        let entry = groups
            .entry(start.timestamp_millis())
            .or_insert((start, 0.0, 0));
        entry.1 += point.value;
        entry.2 += 1;
    }

    groups
        .into_values()
        .rev()
        .take(limit)
        .map(|(start, sum, count)| AggregateBucket {
            label: granularity.label(start),
            start,
            average: Some(sum / count as f64),
            total: Some(sum),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use telemeter_core::time::parse_timestamp;

    use super::*;

    fn point(ts: &str, value: f64) -> MetricPoint {
        let ts = parse_timestamp(ts).unwrap();
        MetricPoint {
            ts,
            epoch_ms: ts.timestamp_millis(),
            value,
        }
    }

    #[test]
    fn empty_input_is_empty_list() {
        assert!(bucketize(&[], Granularity::Hour, 12).is_empty());
    }

    #[test]
    fn hourly_buckets_over_a_day_respect_limit_and_order() {
        // 25 hourly-spaced points spanning just over a day.
        let points: Vec<MetricPoint> = (0..25)
            .map(|i| {
                let ts = parse_timestamp("2024-01-01T00:30:00Z").unwrap()
                    + chrono::Duration::hours(i);
                MetricPoint {
                    ts,
                    epoch_ms: ts.timestamp_millis(),
                    value: 1.0,
                }
            })
            .collect();

        let buckets = bucketize(&points, Granularity::Hour, 12);
        assert_eq!(buckets.len(), 12);
        assert!(buckets.windows(2).all(|w| w[0].start > w[1].start));
        for bucket in &buckets {
            assert_eq!(bucket.count, 1);
            assert_eq!(bucket.total, Some(1.0));
        }
        assert_eq!(
            buckets[0].start,
            parse_timestamp("2024-01-02T00:00:00Z").unwrap()
        );
    }

    #[test]
    fn boundary_point_lands_in_the_bucket_starting_there() {
        let points = vec![
            point("2024-01-01T23:59:59.999Z", 1.0),
            point("2024-01-02T00:00:00Z", 2.0),
        ];

        let buckets = bucketize(&points, Granularity::Day, 10);
        assert_eq!(buckets.len(), 2);
        assert_eq!(
            buckets[0].start,
            parse_timestamp("2024-01-02T00:00:00Z").unwrap()
        );
        assert_eq!(buckets[0].total, Some(2.0));
        assert_eq!(buckets[1].total, Some(1.0));
    }

    #[test]
    fn per_bucket_average_is_sum_over_count() {
        let points = vec![
            point("2024-01-01T10:05:00Z", 10.0),
            point("2024-01-01T10:25:00Z", 20.0),
            point("2024-01-01T10:45:00Z", 30.0),
        ];

        let buckets = bucketize(&points, Granularity::Hour, 12);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].count, 3);
        assert_eq!(buckets[0].total, Some(60.0));
        assert_eq!(buckets[0].average, Some(20.0));
        assert_eq!(buckets[0].label, "2024-01-01 10:00");
    }

    #[test]
    fn same_month_across_years_stays_distinct() {
        let points = vec![
            point("2023-06-10T00:00:00Z", 1.0),
            point("2024-06-10T00:00:00Z", 2.0),
        ];

        let buckets = bucketize(&points, Granularity::Month, 6);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "2024-06");
        assert_eq!(buckets[1].label, "2023-06");
    }

    #[test]
    fn monthly_buckets_align_to_first_of_month() {
        let points = vec![point("2024-02-29T13:00:00Z", 4.0)];
        let buckets = bucketize(&points, Granularity::Month, 6);
        assert_eq!(
            buckets[0].start,
            parse_timestamp("2024-02-01T00:00:00Z").unwrap()
        );
    }
}
