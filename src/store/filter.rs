use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Observation;

/// Capture-time window over the history. Both bounds are inclusive; a missing
/// bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeFilter {
    pub start_inclusive_millis: Option<i64>,
    pub end_inclusive_millis: Option<i64>,
}

impl RangeFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn since(start: DateTime<Utc>) -> Self {
        Self {
            start_inclusive_millis: Some(start.timestamp_millis()),
            end_inclusive_millis: None,
        }
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start_inclusive_millis: Some(start.timestamp_millis()),
            end_inclusive_millis: Some(end.timestamp_millis()),
        }
    }

    /// From UTC midnight of `now`'s day onwards.
    pub fn today(now: DateTime<Utc>) -> Self {
        let midnight = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .unwrap_or(now);
        Self::since(midnight)
    }

    pub fn trailing_days(now: DateTime<Utc>, days: i64) -> Self {
        Self::since(now - Duration::days(days))
    }

    pub fn is_unbounded(&self) -> bool {
        self.start_inclusive_millis.is_none() && self.end_inclusive_millis.is_none()
    }

    pub fn contains(&self, captured_at_millis: i64) -> bool {
        if let Some(start) = self.start_inclusive_millis {
            if captured_at_millis < start {
                return false;
            }
        }
        if let Some(end) = self.end_inclusive_millis {
            if captured_at_millis > end {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, history: Vec<Observation>) -> Vec<Observation> {
        if self.is_unbounded() {
            return history;
        }
        history
            .into_iter()
            .filter(|record| self.contains(record.timestamp))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn bounds_are_inclusive() {
        let filter = RangeFilter {
            start_inclusive_millis: Some(100),
            end_inclusive_millis: Some(200),
        };
        assert!(!filter.contains(99));
        assert!(filter.contains(100));
        assert!(filter.contains(200));
        assert!(!filter.contains(201));
    }

    #[test]
    fn open_bounds_accept_everything_on_that_side() {
        assert!(RangeFilter::all().contains(i64::MIN));
        let since = RangeFilter {
            start_inclusive_millis: Some(10),
            end_inclusive_millis: None,
        };
        assert!(since.contains(i64::MAX));
        assert!(!since.contains(9));
    }

    #[test]
    fn today_starts_at_utc_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 17, 30, 0).unwrap();
        let midnight = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(
            RangeFilter::today(now).start_inclusive_millis,
            Some(midnight.timestamp_millis())
        );
    }
}
