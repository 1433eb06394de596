use serde::{Deserialize, Serialize};

use crate::analytics::{config::TrendConfig, distribution::dominant};
use crate::models::{Emotion, Observation};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Stable,
    Improving,
    Declining,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Volatility {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub trend: Trend,
    pub volatility: Volatility,
    pub dominant_emotion: Option<Emotion>,
    /// Absent when the window was too short to analyse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<i64>,
}

impl TrendReport {
    fn insufficient() -> Self {
        Self {
            trend: Trend::Stable,
            volatility: Volatility::Low,
            dominant_emotion: None,
            average_score: None,
        }
    }
}

/// Classify mood movement over a window ordered oldest to newest.
pub fn trend(observations: &[Observation]) -> TrendReport {
    trend_with(observations, &TrendConfig::default())
}

pub fn trend_with(observations: &[Observation], config: &TrendConfig) -> TrendReport {
    if observations.len() < config.min_window.max(2) {
        return TrendReport::insufficient();
    }

    let scores: Vec<f64> = observations
        .iter()
        .map(|record| f64::from(record.emotion.mood_weight()))
        .collect();

    // The odd element lands in the second half.
    let (first_half, second_half) = scores.split_at(scores.len() / 2);
    let first_avg = mean(first_half);
    let second_avg = mean(second_half);

    let trend = if second_avg > first_avg + config.trend_margin {
        Trend::Improving
    } else if second_avg < first_avg - config.trend_margin {
        Trend::Declining
    } else {
        Trend::Stable
    };

    let avg = mean(&scores);
    let variance = population_variance(&scores, avg);
    let volatility = if variance > config.high_variance {
        Volatility::High
    } else if variance > config.medium_variance {
        Volatility::Medium
    } else {
        Volatility::Low
    };

    TrendReport {
        trend,
        volatility,
        dominant_emotion: dominant(observations),
        average_score: Some(avg.round() as i64),
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_variance(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use Emotion::*;

    fn window(emotions: &[Emotion]) -> Vec<Observation> {
        let now = Utc::now();
        emotions
            .iter()
            .enumerate()
            .map(|(i, emotion)| Observation::new(i as i64, *emotion, 0.9, now))
            .collect()
    }

    #[test]
    fn short_window_is_stable_without_analysis() {
        let report = trend(&window(&[Angry, Happy]));
        assert_eq!(report, TrendReport::insufficient());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"trend": "stable", "volatility": "low", "dominantEmotion": null})
        );
    }

    #[test]
    fn angry_to_happy_is_improving_and_volatile() {
        let report = trend(&window(&[Angry, Angry, Angry, Happy, Happy, Happy]));
        assert_eq!(report.trend, Trend::Improving);
        // variance of [10,10,10,100,100,100] is 2025
        assert_eq!(report.volatility, Volatility::High);
        assert_eq!(report.dominant_emotion, Some(Angry));
        assert_eq!(report.average_score, Some(55));
    }

    #[test]
    fn happy_to_sad_is_declining() {
        let report = trend(&window(&[Happy, Happy, Sad, Sad]));
        assert_eq!(report.trend, Trend::Declining);
        assert_eq!(report.volatility, Volatility::High);
    }

    #[test]
    fn margin_of_exactly_ten_is_stable() {
        // halves [50] and [60, 60]: difference is exactly 10
        let report = trend(&window(&[Neutral, Surprised, Surprised]));
        assert_eq!(report.trend, Trend::Stable);
        assert_eq!(report.volatility, Volatility::Low);
        assert_eq!(report.dominant_emotion, Some(Surprised));
    }

    #[test]
    fn medium_volatility_band() {
        // [50, 20, 50, 20]: mean 35, variance 225
        let report = trend(&window(&[Neutral, Sad, Neutral, Sad]));
        assert_eq!(report.volatility, Volatility::Medium);
        assert_eq!(report.trend, Trend::Stable);
    }
}
