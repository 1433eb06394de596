use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tokio::time::{interval, interval_at, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::store::EmotionStore;

use super::classifier::Classifier;
use super::config::DetectionConfig;
use super::device::CaptureDevice;
use super::live::{DetectionEvent, LiveState, StopReason};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// Everything a running detection loop owns or shares.
pub struct LoopContext {
    pub device: Box<dyn CaptureDevice>,
    pub classifier: Arc<dyn Classifier>,
    pub store: EmotionStore,
    pub config: DetectionConfig,
    pub live: Arc<Mutex<LiveState>>,
    pub events: broadcast::Sender<DetectionEvent>,
}

pub async fn detection_loop(ctx: LoopContext, cancel_token: CancellationToken) {
    let LoopContext {
        mut device,
        classifier,
        store,
        config,
        live,
        events,
    } = ctx;

    let mut frame_ticker = interval(config.frame_interval());
    frame_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let save_period = config.save_interval.max(Duration::from_millis(1));
    let mut save_ticker = interval_at(Instant::now() + save_period, save_period);
    save_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let reason = loop {
        tokio::select! {
            biased;

            _ = cancel_token.cancelled() => {
                log_info!("detection loop shutting down");
                break StopReason::Cancelled;
            }
            _ = save_ticker.tick(), if config.auto_save => {
                save_latest(&store, &live, &events, &cancel_token).await;
            }
            _ = frame_ticker.tick() => {
                if let Err(reason) = process_frame(
                    device.as_mut(),
                    classifier.as_ref(),
                    &config,
                    &live,
                    &events,
                    &cancel_token,
                )
                .await
                {
                    break reason;
                }
            }
        }
    };

    device.release().await;
    live.lock().await.finish();
    let _ = events.send(DetectionEvent::Stopped { reason });
}

/// One frame through the classifier. Only in-memory state changes here;
/// `Err` ends the loop.
async fn process_frame(
    device: &mut dyn CaptureDevice,
    classifier: &dyn Classifier,
    config: &DetectionConfig,
    live: &Mutex<LiveState>,
    events: &broadcast::Sender<DetectionEvent>,
    cancel_token: &CancellationToken,
) -> Result<(), StopReason> {
    let frame = match device.grab().await {
        Ok(frame) => frame,
        Err(err) => {
            log_error!("capture device lost: {err}");
            return Err(StopReason::DeviceLost {
                message: err.to_string(),
            });
        }
    };

    live.lock().await.record_frame(Instant::now());

    let detection = match classifier.classify(&frame).await {
        Ok(Some(detection)) => detection,
        Ok(None) => return Ok(()),
        Err(err) => {
            log_warn!("skipping frame {}: {err}", frame.sequence);
            return Ok(());
        }
    };

    if detection.confidence.is_nan() || detection.confidence < config.min_confidence {
        return Ok(());
    }

    // stop() may have landed while the classifier was running
    if cancel_token.is_cancelled() {
        return Ok(());
    }

    live.lock().await.record_detection(detection, frame.captured_at);
    let _ = events.send(DetectionEvent::Detected { detection });
    Ok(())
}

async fn save_latest(
    store: &EmotionStore,
    live: &Mutex<LiveState>,
    events: &broadcast::Sender<DetectionEvent>,
    cancel_token: &CancellationToken,
) {
    let Some(detection) = live.lock().await.latest() else {
        return;
    };

    let event = match store.append(detection.emotion, detection.confidence).await {
        Ok(observation) => {
            log_debug!("auto-saved {} @ {:.2}", observation.emotion, observation.confidence);
            live.lock().await.record_save();
            DetectionEvent::Saved { observation }
        }
        Err(err) => {
            let message = err.to_string();
            log_error!("auto-save failed: {message}");
            live.lock().await.record_save_failure(message.clone());
            DetectionEvent::SaveFailed { message }
        }
    };

    // stop() landed while the append was in flight
    if cancel_token.is_cancelled() {
        return;
    }
    let _ = events.send(event);
}
