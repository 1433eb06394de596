use crate::models::{round_confidence, Observation};

/// Score reported for an empty window: assume neutral rather than undefined.
pub const NEUTRAL_MOOD_SCORE: u8 = 50;

/// Mean mood weight of the window, rounded to the nearest integer.
pub fn mood_score(observations: &[Observation]) -> u8 {
    match mean_weight(observations) {
        Some(mean) => mean.round() as u8,
        None => NEUTRAL_MOOD_SCORE,
    }
}

pub fn mean_weight(observations: &[Observation]) -> Option<f64> {
    if observations.is_empty() {
        return None;
    }
    let sum: u32 = observations
        .iter()
        .map(|record| u32::from(record.emotion.mood_weight()))
        .sum();
    Some(f64::from(sum) / observations.len() as f64)
}

/// Mean stored confidence rounded to two decimals, 0 for an empty window.
pub fn average_confidence(observations: &[Observation]) -> f64 {
    if observations.is_empty() {
        return 0.0;
    }
    let sum: f64 = observations.iter().map(|record| record.confidence).sum();
    round_confidence(sum / observations.len() as f64)
}
