//! Time-bucketed emotion counts for the dashboard's timeline chart.

use std::fmt::Display;

use chrono::{DateTime, Duration, TimeZone};
use serde::{Deserialize, Serialize};

use crate::analytics::distribution::Distribution;
use crate::models::Observation;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimelineRange {
    /// Since local midnight, bucketed per minute.
    Day,
    /// Trailing 7 days, bucketed per calendar day.
    Week,
    /// Trailing 30 days, bucketed per calendar day.
    Month,
}

impl TimelineRange {
    pub fn start<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        match self {
            TimelineRange::Day => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .and_then(|midnight| now.timezone().from_local_datetime(&midnight).earliest())
                .unwrap_or_else(|| now.clone()),
            TimelineRange::Week => now.clone() - Duration::days(7),
            TimelineRange::Month => now.clone() - Duration::days(30),
        }
    }

    fn label<Tz>(&self, at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        match self {
            TimelineRange::Day => at.format("%I:%M %p").to_string(),
            TimelineRange::Week | TimelineRange::Month => at.format("%b %-d").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimelineBucket {
    pub label: String,
    pub counts: Distribution,
}

/// Group the observations captured inside `range` (relative to `now`) into
/// labelled buckets. Buckets appear in order of their first observation.
pub fn timeline<Tz>(
    observations: &[Observation],
    range: TimelineRange,
    now: &DateTime<Tz>,
) -> Vec<TimelineBucket>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let start_millis = range.start(now).timestamp_millis();
    let tz = now.timezone();
    let mut buckets: Vec<TimelineBucket> = Vec::new();

    for record in observations
        .iter()
        .filter(|record| record.timestamp >= start_millis)
    {
        let Some(at) = record.captured_at() else {
            continue;
        };
        let label = range.label(&at.with_timezone(&tz));
        match buckets.iter_mut().find(|bucket| bucket.label == label) {
            Some(bucket) => bucket.counts.add(record.emotion),
            None => {
                let mut counts = Distribution::default();
                counts.add(record.emotion);
                buckets.push(TimelineBucket { label, counts });
            }
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Emotion;
    use chrono::Utc;

    #[test]
    fn day_range_buckets_by_minute_since_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 4, 10, 15, 0, 0).unwrap();
        let records = vec![
            Observation::new(1, Emotion::Sad, 0.9, now - Duration::days(1)),
            Observation::new(2, Emotion::Happy, 0.9, Utc.with_ymd_and_hms(2024, 4, 10, 9, 15, 2).unwrap()),
            Observation::new(3, Emotion::Happy, 0.9, Utc.with_ymd_and_hms(2024, 4, 10, 9, 15, 40).unwrap()),
            Observation::new(4, Emotion::Angry, 0.9, Utc.with_ymd_and_hms(2024, 4, 10, 14, 1, 0).unwrap()),
        ];

        let buckets = timeline(&records, TimelineRange::Day, &now);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "09:15 AM");
        assert_eq!(buckets[0].counts.get(Emotion::Happy), 2);
        assert_eq!(buckets[1].label, "02:01 PM");
        assert_eq!(buckets[1].counts.get(Emotion::Angry), 1);
    }

    #[test]
    fn week_range_buckets_by_day() {
        let now = Utc.with_ymd_and_hms(2024, 4, 10, 15, 0, 0).unwrap();
        let records = vec![
            Observation::new(1, Emotion::Sad, 0.9, now - Duration::days(8)),
            Observation::new(2, Emotion::Sad, 0.9, now - Duration::days(2)),
            Observation::new(3, Emotion::Neutral, 0.9, now - Duration::days(2)),
            Observation::new(4, Emotion::Happy, 0.9, now),
        ];

        let buckets = timeline(&records, TimelineRange::Week, &now);
        let labels: Vec<&str> = buckets.iter().map(|bucket| bucket.label.as_str()).collect();
        assert_eq!(labels, vec!["Apr 8", "Apr 10"]);
        assert_eq!(buckets[0].counts.total(), 2);

        let month = timeline(&records, TimelineRange::Month, &now);
        assert_eq!(month.len(), 3);
    }
}
