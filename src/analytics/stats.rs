use serde::Serialize;

use crate::analytics::{
    distribution::{distribution, Distribution},
    scoring::{average_confidence, mood_score, NEUTRAL_MOOD_SCORE},
};
use crate::models::{Emotion, Observation};

/// Aggregate summary of a set of observations.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total: usize,
    pub distribution: Distribution,
    pub dominant: Option<Emotion>,
    pub average_confidence: f64,
    pub mood_score: u8,
}

impl Statistics {
    pub fn empty() -> Self {
        Self {
            total: 0,
            distribution: Distribution::default(),
            dominant: None,
            average_confidence: 0.0,
            mood_score: NEUTRAL_MOOD_SCORE,
        }
    }
}

pub fn statistics(observations: &[Observation]) -> Statistics {
    if observations.is_empty() {
        return Statistics::empty();
    }

    let distribution = distribution(observations);
    Statistics {
        total: observations.len(),
        dominant: distribution.dominant(),
        distribution,
        average_confidence: average_confidence(observations),
        mood_score: mood_score(observations),
    }
}
