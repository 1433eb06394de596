use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::store::EmotionStore;

use super::classifier::Classifier;
use super::config::DetectionConfig;
use super::device::{CaptureDevice, DeviceError};
use super::live::{DetectionEvent, LiveSnapshot, LiveState};
use super::loop_worker::{detection_loop, LoopContext};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

const EVENT_CAPACITY: usize = 256;

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("detection already active")]
    AlreadyRunning,

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("detection loop task failed to join")]
    Join(#[from] JoinError),
}

/// Owns the lifecycle of one detection loop at a time.
pub struct DetectionController {
    store: EmotionStore,
    live: Arc<Mutex<LiveState>>,
    events: broadcast::Sender<DetectionEvent>,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl DetectionController {
    pub fn new(store: EmotionStore) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            live: Arc::new(Mutex::new(LiveState::default())),
            events,
            handle: None,
            cancel_token: None,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DetectionEvent> {
        self.events.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub async fn snapshot(&self) -> LiveSnapshot {
        self.live.lock().await.snapshot()
    }

    /// Open `device` and spawn the loop. An open failure is returned as is;
    /// there is no retry.
    pub async fn start(
        &mut self,
        mut device: Box<dyn CaptureDevice>,
        classifier: Arc<dyn Classifier>,
        config: DetectionConfig,
    ) -> Result<(), DetectionError> {
        if self.is_running() {
            return Err(DetectionError::AlreadyRunning);
        }

        // a loop that ended on its own still needs joining
        if let Some(finished) = self.handle.take() {
            self.cancel_token = None;
            if let Err(err) = finished.await {
                log_warn!("previous detection loop ended abnormally: {err}");
            }
        }

        device.open().await?;

        let session_id = self.live.lock().await.begin_session(config.timeline_len);
        log_info!(
            "starting detection session {session_id} at {} fps, saving every {:?}",
            config.fps,
            config.save_interval
        );

        let cancel_token = CancellationToken::new();
        let ctx = LoopContext {
            device,
            classifier,
            store: self.store.clone(),
            config,
            live: self.live.clone(),
            events: self.events.clone(),
        };
        let handle = tokio::spawn(detection_loop(ctx, cancel_token.clone()));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Cancel the loop and wait for it to release the device. Nothing is
    /// emitted after this returns.
    pub async fn stop(&mut self) -> Result<(), DetectionError> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle.await?;
        }
        Ok(())
    }
}
