//! Append-only emotion history kept in a single storage slot.
//!
//! Every mutation is a whole-collection read-modify-write. Mutations on one
//! `EmotionStore` (and its clones) are serialized through an async mutex;
//! writers in other processes sharing the substrate are last-writer-wins.

mod filter;
pub mod snapshot;

pub use filter::RangeFilter;

use std::sync::Arc;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::{
    analytics::{statistics, Statistics},
    error::{StoreError, StoreResult},
    models::{Emotion, Observation, ObservationPatch},
    storage::{SlotStore, EMOTION_HISTORY_KEY},
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Outcome of reading the history slot. Keeps "nothing stored" apart from
/// "something stored that cannot be read".
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryRead {
    Empty,
    Records(Vec<Observation>),
    Corrupt(String),
    Unavailable(String),
}

impl HistoryRead {
    /// Fail-soft view: unreadable history reads as no history.
    pub fn into_records(self) -> Vec<Observation> {
        match self {
            HistoryRead::Records(records) => records,
            HistoryRead::Empty | HistoryRead::Corrupt(_) | HistoryRead::Unavailable(_) => {
                Vec::new()
            }
        }
    }
}

#[derive(Clone)]
pub struct EmotionStore {
    slots: Arc<dyn SlotStore>,
    write_lock: Arc<Mutex<()>>,
}

impl EmotionStore {
    pub fn new(slots: Arc<dyn SlotStore>) -> Self {
        Self {
            slots,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn append(&self, emotion: Emotion, confidence: f64) -> StoreResult<Observation> {
        self.append_at(emotion, confidence, Utc::now()).await
    }

    pub async fn append_at(
        &self,
        emotion: Emotion,
        confidence: f64,
        captured_at: DateTime<Utc>,
    ) -> StoreResult<Observation> {
        check_finite(confidence)?;
        if !(0.0..=1.0).contains(&confidence) {
            log_warn!("appending {emotion} with out-of-range confidence {confidence}");
        }

        let _guard = self.write_lock.lock().await;
        let mut history = self.load_strict().await?;

        let id = next_id(&history, captured_at.timestamp_millis())?;
        let record = Observation::new(id, emotion, confidence, captured_at);
        history.push(record.clone());
        self.persist(&history).await?;

        log_debug!(
            "saved observation {} ({} @ {:.2}), history size {}",
            record.id,
            record.emotion,
            record.confidence,
            history.len()
        );
        Ok(record)
    }

    pub async fn read_history(&self) -> HistoryRead {
        match self.slots.get(EMOTION_HISTORY_KEY).await {
            Ok(None) => HistoryRead::Empty,
            Ok(Some(blob)) => match snapshot::decode(&blob) {
                Ok(records) => HistoryRead::Records(records),
                Err(err) => HistoryRead::Corrupt(err.to_string()),
            },
            Err(err) => HistoryRead::Unavailable(format!("{err:#}")),
        }
    }

    /// Observations inside `filter`, in stored order. Unreadable history is
    /// logged and reported as empty; use `read_history` to tell them apart.
    pub async fn query(&self, filter: &RangeFilter) -> Vec<Observation> {
        let records = match self.read_history().await {
            HistoryRead::Corrupt(reason) => {
                log_warn!("emotion history is corrupt, reading as empty: {reason}");
                Vec::new()
            }
            HistoryRead::Unavailable(reason) => {
                log_warn!("emotion history unavailable, reading as empty: {reason}");
                Vec::new()
            }
            read => read.into_records(),
        };
        filter.apply(records)
    }

    pub async fn today(&self, now: DateTime<Utc>) -> Vec<Observation> {
        self.query(&RangeFilter::today(now)).await
    }

    pub async fn last_week(&self, now: DateTime<Utc>) -> Vec<Observation> {
        self.query(&RangeFilter::trailing_days(now, 7)).await
    }

    /// The `count` most recent observations, oldest first.
    pub async fn last(&self, count: usize) -> Vec<Observation> {
        let mut history = self.query(&RangeFilter::all()).await;
        let skip = history.len().saturating_sub(count);
        history.drain(..skip);
        history
    }

    pub async fn statistics(&self, filter: &RangeFilter) -> Statistics {
        statistics(&self.query(filter).await)
    }

    /// Shallow-merge `patch` into the first record with `id`. `Ok(false)` when
    /// no record has that id.
    pub async fn update_by_id(&self, id: i64, patch: ObservationPatch) -> StoreResult<bool> {
        if let Some(confidence) = patch.confidence {
            check_finite(confidence)?;
        }

        let _guard = self.write_lock.lock().await;
        let mut history = self.load_strict().await?;

        let Some(record) = history.iter_mut().find(|record| record.id == id) else {
            log_debug!("update skipped, no observation {id}");
            return Ok(false);
        };
        record.apply(patch);
        self.persist(&history).await?;
        Ok(true)
    }

    /// Remove the record(s) with `id`. `Ok(false)` when none matched.
    pub async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut history = self.load_strict().await?;

        let before = history.len();
        history.retain(|record| record.id != id);
        if history.len() == before {
            log_debug!("delete skipped, no observation {id}");
            return Ok(false);
        }

        self.persist(&history).await?;
        Ok(true)
    }

    /// Drop the whole history slot. Irreversible.
    pub async fn clear(&self) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        self.slots.remove(EMOTION_HISTORY_KEY).await?;
        log_info!("emotion history cleared");
        Ok(())
    }

    pub async fn export_snapshot(&self) -> StoreResult<String> {
        let history = self.load_strict().await?;
        Ok(snapshot::export(&history)?)
    }

    /// Replace the whole history with the snapshot's records. Returns
    /// `Ok(false)`, leaving the history untouched, when the text is not a valid
    /// snapshot; only substrate failures are errors.
    pub async fn import_snapshot(&self, text: &str) -> StoreResult<bool> {
        let records = match snapshot::parse(text) {
            Ok(records) => records,
            Err(err) => {
                log_warn!("snapshot import rejected: {err}");
                return Ok(false);
            }
        };

        let _guard = self.write_lock.lock().await;
        self.persist(&records).await?;
        log_info!("imported {} observations", records.len());
        Ok(true)
    }

    async fn load_strict(&self) -> StoreResult<Vec<Observation>> {
        match self.read_history().await {
            HistoryRead::Empty => Ok(Vec::new()),
            HistoryRead::Records(records) => Ok(records),
            HistoryRead::Corrupt(reason) => Err(StoreError::Corrupt { reason }),
            HistoryRead::Unavailable(reason) => Err(StoreError::Storage(anyhow!(reason))),
        }
    }

    async fn persist(&self, history: &[Observation]) -> StoreResult<()> {
        let blob = snapshot::encode(history)?;
        self.slots.set(EMOTION_HISTORY_KEY, blob).await?;
        Ok(())
    }
}

/// Capture time in millis, bumped past the largest id already stored.
fn next_id(history: &[Observation], captured_at_millis: i64) -> StoreResult<i64> {
    let Some(max) = history.iter().map(|record| record.id).max() else {
        return Ok(captured_at_millis);
    };
    let bumped = max
        .checked_add(1)
        .ok_or(StoreError::IdsExhausted { max })?;
    Ok(captured_at_millis.max(bumped))
}

fn check_finite(confidence: f64) -> StoreResult<()> {
    if confidence.is_finite() {
        Ok(())
    } else {
        Err(StoreError::NonFiniteConfidence { value: confidence })
    }
}
