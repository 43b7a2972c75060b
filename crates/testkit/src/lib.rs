use chrono::{Duration, SecondsFormat, TimeZone, Utc};
use telemeter_core::model::point::ChartPoint;
use telemeter_ingest::record::RawRecord;

/// A day of 5-minute records: temperature on field1, humidity on field2,
/// motion counter on field3, battery on field4. Motion is a running total
/// that resets partway through; a few records carry no readings at all.
pub fn sample_feed() -> Vec<RawRecord> {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let mut motion_total = 0u32;
    (0..288)
        .map(|i| {
            let ts = base + Duration::minutes(5 * i);
            let mut record = RawRecord {
                created_at: ts.to_rfc3339_opts(SecondsFormat::Secs, true),
                ..RawRecord::default()
            };

            // Two short sensor outages.
            if (40..44).contains(&i) || i == 200 {
                for n in 1..=4 {
                    record.fields.insert(format!("field{n}"), None);
                }
                return record;
            }

            if i == 144 {
                // Device reboot: counter starts over.
                motion_total = 0;
            }
            motion_total += (i % 3) as u32;

            let temperature = 18.0 + 4.0 * ((i % 144) as f64 / 144.0);
            let humidity = 55.0 - (i % 24) as f64 * 0.5;
            let battery = 4.1 - i as f64 * 0.001;

            record
                .fields
                .insert("field1".to_string(), Some(format!("{temperature:.1}")));
            record
                .fields
                .insert("field2".to_string(), Some(format!("{humidity:.0}")));
            record
                .fields
                .insert("field3".to_string(), Some(motion_total.to_string()));
            record
                .fields
                .insert("field4".to_string(), Some(format!("{battery:.2}")));
            record
        })
        .collect()
}

/// Hourly chart points starting at the given value, stepping by `step`.
pub fn chart_points(start_value: f64, step: f64, count: usize) -> Vec<ChartPoint> {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            ChartPoint::new(
                (base + Duration::hours(i as i64)).to_rfc3339_opts(SecondsFormat::Secs, true),
                Some(start_value + step * i as f64),
            )
        })
        .collect()
}
