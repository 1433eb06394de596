use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Emotion;

use super::device::Frame;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Detection {
    pub emotion: Emotion,
    pub confidence: f64,
}

impl Detection {
    /// Highest-scoring label from raw per-label expression scores. Earlier
    /// labels win ties; all-zero scores give `None`.
    pub fn strongest<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = (Emotion, f64)>,
    {
        let mut best: Option<Detection> = None;
        let mut best_score = 0.0;
        for (emotion, score) in scores {
            if score > best_score {
                best_score = score;
                best = Some(Detection {
                    emotion,
                    confidence: score,
                });
            }
        }
        best
    }
}

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("expression model is not loaded")]
    ModelNotLoaded,

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Black-box facial-expression model. `Ok(None)` means no face was found.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, frame: &Frame) -> Result<Option<Detection>, ClassifierError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strongest_picks_highest_score() {
        let detection = Detection::strongest([
            (Emotion::Neutral, 0.2),
            (Emotion::Surprised, 0.7),
            (Emotion::Happy, 0.1),
        ])
        .unwrap();
        assert_eq!(detection.emotion, Emotion::Surprised);
        assert_eq!(detection.confidence, 0.7);
    }

    #[test]
    fn strongest_ignores_zero_scores() {
        assert_eq!(Detection::strongest([(Emotion::Sad, 0.0)]), None);
        assert_eq!(
            Detection::strongest([(Emotion::Sad, 0.4), (Emotion::Angry, 0.4)])
                .map(|d| d.emotion),
            Some(Emotion::Sad)
        );
    }
}
