use std::time::Duration;

use crate::settings::Settings;

/// Tunables for a detection session.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Target classification rate.
    pub fps: u32,

    /// Period between persisted observations; frame detections in between
    /// only replace the in-memory latest detection.
    pub save_interval: Duration,

    /// Detections below this confidence are discarded.
    pub min_confidence: f64,

    pub auto_save: bool,

    /// Points kept in the live mini timeline.
    pub timeline_len: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            save_interval: Duration::from_secs(10),
            min_confidence: 0.5,
            auto_save: true,
            timeline_len: 20,
        }
    }
}

impl DetectionConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            min_confidence: settings.sensitivity,
            auto_save: settings.auto_save,
            ..Self::default()
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis((1000 / u64::from(self.fps.max(1))).max(1))
    }
}
