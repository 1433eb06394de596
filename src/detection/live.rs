//! In-memory state of the running detection session. Nothing here is
//! persisted; the store only sees what the save tick appends.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::{Duration, Instant};
use uuid::Uuid;

use crate::models::Observation;

use super::classifier::Detection;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    pub at: DateTime<Utc>,
    pub detection: Detection,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StopReason {
    Cancelled,
    DeviceLost { message: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DetectionEvent {
    Detected { detection: Detection },
    Saved { observation: Observation },
    SaveFailed { message: String },
    Stopped { reason: StopReason },
}

/// Frames per second over one-second windows.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frames: u32,
    window_start: Instant,
    current: u32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            frames: 0,
            window_start: now,
            current: 0,
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= Duration::from_secs(1) {
            let elapsed_ms = elapsed.as_millis().max(1) as f64;
            self.current = (f64::from(self.frames) * 1000.0 / elapsed_ms).round() as u32;
            self.frames = 0;
            self.window_start = now;
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSnapshot {
    pub session_id: Option<Uuid>,
    pub active: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub latest: Option<Detection>,
    pub detection_count: u64,
    pub save_count: u64,
    pub fps: u32,
    pub last_save_error: Option<String>,
    pub recent: Vec<TimelinePoint>,
}

#[derive(Debug)]
pub struct LiveState {
    session_id: Option<Uuid>,
    active: bool,
    started_at: Option<DateTime<Utc>>,
    latest: Option<Detection>,
    detection_count: u64,
    save_count: u64,
    last_save_error: Option<String>,
    recent: VecDeque<TimelinePoint>,
    timeline_len: usize,
    fps: FpsCounter,
}

impl Default for LiveState {
    fn default() -> Self {
        Self {
            session_id: None,
            active: false,
            started_at: None,
            latest: None,
            detection_count: 0,
            save_count: 0,
            last_save_error: None,
            recent: VecDeque::new(),
            timeline_len: 0,
            fps: FpsCounter::new(Instant::now()),
        }
    }
}

impl LiveState {
    pub fn begin_session(&mut self, timeline_len: usize) -> Uuid {
        let session_id = Uuid::new_v4();
        *self = Self {
            session_id: Some(session_id),
            active: true,
            started_at: Some(Utc::now()),
            recent: VecDeque::with_capacity(timeline_len),
            timeline_len,
            ..Self::default()
        };
        session_id
    }

    pub fn finish(&mut self) {
        self.active = false;
    }

    pub fn record_frame(&mut self, now: Instant) {
        self.fps.tick(now);
    }

    pub fn record_detection(&mut self, detection: Detection, at: DateTime<Utc>) {
        self.latest = Some(detection);
        self.detection_count += 1;
        if self.timeline_len == 0 {
            return;
        }
        if self.recent.len() == self.timeline_len {
            self.recent.pop_front();
        }
        self.recent.push_back(TimelinePoint { at, detection });
    }

    pub fn latest(&self) -> Option<Detection> {
        self.latest
    }

    pub fn record_save(&mut self) {
        self.save_count += 1;
        self.last_save_error = None;
    }

    pub fn record_save_failure(&mut self, message: String) {
        self.last_save_error = Some(message);
    }

    pub fn snapshot(&self) -> LiveSnapshot {
        LiveSnapshot {
            session_id: self.session_id,
            active: self.active,
            started_at: self.started_at,
            latest: self.latest,
            detection_count: self.detection_count,
            save_count: self.save_count,
            fps: self.fps.current(),
            last_save_error: self.last_save_error.clone(),
            recent: self.recent.iter().cloned().collect(),
        }
    }
}
