pub mod classifier;
pub mod config;
pub mod controller;
pub mod device;
pub mod live;
mod loop_worker;

pub use classifier::{Classifier, ClassifierError, Detection};
pub use config::DetectionConfig;
pub use controller::{DetectionController, DetectionError};
pub use device::{CaptureDevice, DeviceError, Frame};
pub use live::{DetectionEvent, LiveSnapshot, StopReason, TimelinePoint};
