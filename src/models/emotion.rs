//! The closed set of emotion labels and their display/advice lookup table.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Neutral,
    Surprised,
    Fearful,
    Disgusted,
}

/// Coaching tone used to pick an advice line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdviceTone {
    #[default]
    Supportive,
    Cbt,
    Motivational,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionProfile {
    pub label: &'static str,
    pub emoji: &'static str,
    pub color: &'static str,
    pub mood_weight: u8,
    pub supportive: &'static str,
    pub cbt: &'static str,
    pub motivational: &'static str,
}

const HAPPY: EmotionProfile = EmotionProfile {
    label: "Happy",
    emoji: "😊",
    color: "#10b981",
    mood_weight: 100,
    supportive: "That's wonderful! Your positive energy is contagious. Keep spreading those good vibes!",
    cbt: "Great mood! What specific thoughts or events contributed to this positive feeling?",
    motivational: "You're on fire! Channel this energy into your goals and watch yourself soar!",
};

const SAD: EmotionProfile = EmotionProfile {
    label: "Sad",
    emoji: "😢",
    color: "#3b82f6",
    mood_weight: 20,
    supportive: "I'm here for you. It's okay to feel sad sometimes. Would you like to talk about what's on your mind?",
    cbt: "I notice you're feeling down. Can you identify what thoughts are contributing to this feeling?",
    motivational: "Tough times don't last, but tough people do. This is temporary, and you're stronger than you think.",
};

const ANGRY: EmotionProfile = EmotionProfile {
    label: "Angry",
    emoji: "😡",
    color: "#ef4444",
    mood_weight: 10,
    supportive: "I can see you're upset. Take a deep breath. Let's work through this together.",
    cbt: "What triggered this anger? Let's examine if there's another way to interpret the situation.",
    motivational: "Use this energy constructively. Channel your frustration into positive action and growth.",
};

const NEUTRAL: EmotionProfile = EmotionProfile {
    label: "Neutral",
    emoji: "😐",
    color: "#6b7280",
    mood_weight: 50,
    supportive: "You seem calm and balanced. How are you feeling about things in general?",
    cbt: "A neutral state can be peaceful. What would make this moment more meaningful for you?",
    motivational: "Steady and focused. This is a great time to set new goals and plan your next move!",
};

const SURPRISED: EmotionProfile = EmotionProfile {
    label: "Surprised",
    emoji: "😮",
    color: "#f59e0b",
    mood_weight: 60,
    supportive: "Something caught your attention! Life is full of surprises.",
    cbt: "Unexpected moments can teach us a lot. What did you learn from this?",
    motivational: "Embrace the unexpected! Every surprise is an opportunity for growth.",
};

const FEARFUL: EmotionProfile = EmotionProfile {
    label: "Fearful",
    emoji: "😨",
    color: "#8b5cf6",
    mood_weight: 15,
    supportive: "It's natural to feel afraid sometimes. You're safe here. Let's talk about it.",
    cbt: "What's the worst that could happen? Let's challenge this fear with evidence.",
    motivational: "Courage isn't the absence of fear, it's acting despite it. You've got this!",
};

const DISGUSTED: EmotionProfile = EmotionProfile {
    label: "Disgusted",
    emoji: "🤢",
    color: "#84cc16",
    mood_weight: 25,
    supportive: "Something's bothering you. It's okay to have boundaries and preferences.",
    cbt: "What values does this violate for you? Understanding this can help you respond better.",
    motivational: "Trust your instincts. They're protecting you and guiding your decisions.",
};

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Neutral,
        Emotion::Surprised,
        Emotion::Fearful,
        Emotion::Disgusted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Neutral => "neutral",
            Emotion::Surprised => "surprised",
            Emotion::Fearful => "fearful",
            Emotion::Disgusted => "disgusted",
        }
    }

    pub fn profile(&self) -> &'static EmotionProfile {
        match self {
            Emotion::Happy => &HAPPY,
            Emotion::Sad => &SAD,
            Emotion::Angry => &ANGRY,
            Emotion::Neutral => &NEUTRAL,
            Emotion::Surprised => &SURPRISED,
            Emotion::Fearful => &FEARFUL,
            Emotion::Disgusted => &DISGUSTED,
        }
    }

    /// Positivity weight on the 0-100 mood scale.
    pub fn mood_weight(&self) -> u8 {
        self.profile().mood_weight
    }

    pub fn advice(&self, tone: AdviceTone) -> &'static str {
        let profile = self.profile();
        match tone {
            AdviceTone::Supportive => profile.supportive,
            AdviceTone::Cbt => profile.cbt,
            AdviceTone::Motivational => profile.motivational,
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|emotion| emotion.as_str() == value)
            .ok_or_else(|| anyhow!("unknown emotion '{value}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_match_mood_scale() {
        let weights: Vec<u8> = Emotion::ALL.iter().map(Emotion::mood_weight).collect();
        assert_eq!(weights, vec![100, 20, 10, 50, 60, 15, 25]);
    }

    #[test]
    fn labels_round_trip_through_strings() {
        for emotion in Emotion::ALL {
            assert_eq!(emotion.as_str().parse::<Emotion>().unwrap(), emotion);
            assert_eq!(
                serde_json::to_string(&emotion).unwrap(),
                format!("\"{}\"", emotion.as_str())
            );
        }
        assert!("contempt".parse::<Emotion>().is_err());
    }

    #[test]
    fn advice_follows_tone() {
        assert!(Emotion::Sad.advice(AdviceTone::Cbt).starts_with("I notice"));
        assert!(Emotion::Happy
            .advice(AdviceTone::Motivational)
            .starts_with("You're on fire"));
    }
}
