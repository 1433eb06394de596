use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// One captured video frame. The pixel encoding is an agreement between the
/// device and the classifier; the detection loop never looks inside.
#[derive(Debug, Clone)]
pub struct Frame {
    pub sequence: u64,
    /// Stamped on the live timeline point for this frame's detection.
    pub captured_at: DateTime<Utc>,
    pub pixels: Arc<[u8]>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Camera permission denied. Please allow camera access in your system settings.")]
    PermissionDenied,

    #[error("No camera found. Please connect a camera and try again.")]
    NotFound,

    #[error("Camera is already in use by another application.")]
    Busy,

    #[error("Camera does not meet the required specifications.")]
    Overconstrained,

    #[error("Failed to access camera: {0}")]
    Other(String),
}

impl DeviceError {
    /// Map a platform media error name onto the user-facing variants.
    pub fn from_platform_name(name: &str, detail: &str) -> Self {
        match name {
            "NotAllowedError" | "PermissionDeniedError" => DeviceError::PermissionDenied,
            "NotFoundError" | "DevicesNotFoundError" => DeviceError::NotFound,
            "NotReadableError" | "TrackStartError" => DeviceError::Busy,
            "OverconstrainedError" => DeviceError::Overconstrained,
            _ => DeviceError::Other(detail.to_string()),
        }
    }
}

/// Live frame source. `release` must free the underlying device and is
/// called exactly once when detection stops.
#[async_trait]
pub trait CaptureDevice: Send {
    async fn open(&mut self) -> Result<(), DeviceError>;

    async fn grab(&mut self) -> Result<Frame, DeviceError>;

    async fn release(&mut self);
}
