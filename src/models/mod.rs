pub mod emotion;
pub mod observation;

pub use emotion::{AdviceTone, Emotion, EmotionProfile};
pub use observation::{round_confidence, Observation, ObservationPatch};
