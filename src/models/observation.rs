//! Observation data model.
//!
//! One stored emotion-detection sample. The JSON field names are the
//! persisted/exported format and must not change.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::Emotion;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub id: i64,
    pub emotion: Emotion,
    pub confidence: f64,
    /// Capture time in epoch milliseconds.
    pub timestamp: i64,
    /// UTC calendar date of capture, `YYYY-MM-DD`.
    pub date: String,
    /// Local wall-clock time of capture, `hh:mm:ss AM`.
    pub time: String,
}

impl Observation {
    pub fn new(id: i64, emotion: Emotion, confidence: f64, captured_at: DateTime<Utc>) -> Self {
        Self {
            id,
            emotion,
            confidence: round_confidence(confidence),
            timestamp: captured_at.timestamp_millis(),
            date: display_date(captured_at),
            time: display_time(captured_at),
        }
    }

    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Shallow merge: every field present in the patch replaces the stored one.
    pub fn apply(&mut self, patch: ObservationPatch) {
        if let Some(emotion) = patch.emotion {
            self.emotion = emotion;
        }
        if let Some(confidence) = patch.confidence {
            self.confidence = round_confidence(confidence);
        }
        if let Some(timestamp) = patch.timestamp {
            self.timestamp = timestamp;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
    }
}

/// Partial field update for `update_by_id`. The id is the record's handle and
/// cannot be patched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationPatch {
    pub emotion: Option<Emotion>,
    pub confidence: Option<f64>,
    pub timestamp: Option<i64>,
    pub date: Option<String>,
    pub time: Option<String>,
}

pub fn round_confidence(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn display_date(captured_at: DateTime<Utc>) -> String {
    captured_at.format("%Y-%m-%d").to_string()
}

fn display_time(captured_at: DateTime<Utc>) -> String {
    captured_at
        .with_timezone(&Local)
        .format("%I:%M:%S %p")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn confidence_is_rounded_to_two_decimals() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let observation = Observation::new(1, Emotion::Happy, 0.8675, at);
        assert_eq!(observation.confidence, 0.87);
        assert_eq!(observation.date, "2024-03-09");
        assert_eq!(observation.timestamp, at.timestamp_millis());
        assert_eq!(observation.time.len(), "02:05:07 PM".len());
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let mut observation = Observation::new(7, Emotion::Sad, 0.6, at);
        observation.apply(ObservationPatch {
            emotion: Some(Emotion::Neutral),
            confidence: Some(0.333),
            ..Default::default()
        });

        assert_eq!(observation.id, 7);
        assert_eq!(observation.emotion, Emotion::Neutral);
        assert_eq!(observation.confidence, 0.33);
        assert_eq!(observation.date, "2024-03-09");
    }

    #[test]
    fn serializes_in_export_field_order() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap();
        let json = serde_json::to_string(&Observation::new(5, Emotion::Angry, 0.5, at)).unwrap();
        let id_pos = json.find("\"id\"").unwrap();
        let emotion_pos = json.find("\"emotion\"").unwrap();
        let time_pos = json.find("\"time\"").unwrap();
        assert!(id_pos < emotion_pos && emotion_pos < time_pos);
        assert!(json.contains("\"emotion\":\"angry\""));
    }
}
