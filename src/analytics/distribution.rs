use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::models::{Emotion, Observation};

/// Per-label counts, keyed in order of first occurrence. Labels that never
/// occur are absent rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    counts: Vec<(Emotion, usize)>,
}

impl Distribution {
    pub fn tally<I>(emotions: I) -> Self
    where
        I: IntoIterator<Item = Emotion>,
    {
        let mut distribution = Self::default();
        for emotion in emotions {
            distribution.add(emotion);
        }
        distribution
    }

    pub fn add(&mut self, emotion: Emotion) {
        match self.counts.iter_mut().find(|(label, _)| *label == emotion) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((emotion, 1)),
        }
    }

    pub fn get(&self, emotion: Emotion) -> usize {
        self.counts
            .iter()
            .find(|(label, _)| *label == emotion)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, usize)> + '_ {
        self.counts.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    /// Most frequent label. Ties go to the label that occurred first.
    pub fn dominant(&self) -> Option<Emotion> {
        let mut best: Option<(Emotion, usize)> = None;
        for (emotion, count) in self.iter() {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((emotion, count)),
            }
        }
        best.map(|(emotion, _)| emotion)
    }

    /// Rounded percentage share of each label.
    pub fn percentages(&self) -> Vec<(Emotion, u32)> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }
        self.iter()
            .map(|(emotion, count)| {
                let share = (count as f64 / total as f64 * 100.0).round() as u32;
                (emotion, share)
            })
            .collect()
    }
}

impl Serialize for Distribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (emotion, count) in &self.counts {
            map.serialize_entry(emotion.as_str(), count)?;
        }
        map.end()
    }
}

pub fn distribution(observations: &[Observation]) -> Distribution {
    Distribution::tally(observations.iter().map(|record| record.emotion))
}

pub fn dominant(observations: &[Observation]) -> Option<Emotion> {
    distribution(observations).dominant()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Emotion::*;

    #[test]
    fn keys_keep_first_occurrence_order() {
        let dist = Distribution::tally([Sad, Happy, Sad, Angry]);
        let keys: Vec<Emotion> = dist.iter().map(|(emotion, _)| emotion).collect();
        assert_eq!(keys, vec![Sad, Happy, Angry]);
        assert_eq!(dist.get(Sad), 2);
        assert_eq!(dist.get(Neutral), 0);
        assert_eq!(dist.total(), 4);
    }

    #[test]
    fn dominant_tie_goes_to_first_occurring_label() {
        assert_eq!(Distribution::tally([Sad, Happy, Happy, Sad]).dominant(), Some(Sad));
        assert_eq!(Distribution::tally([Happy, Sad, Sad]).dominant(), Some(Sad));
        assert_eq!(Distribution::default().dominant(), None);
    }

    #[test]
    fn serializes_as_ordered_object() {
        let dist = Distribution::tally([Neutral, Happy, Neutral]);
        assert_eq!(
            serde_json::to_string(&dist).unwrap(),
            r#"{"neutral":2,"happy":1}"#
        );
        assert_eq!(serde_json::to_string(&Distribution::default()).unwrap(), "{}");
    }

    #[test]
    fn percentages_are_rounded_shares() {
        let dist = Distribution::tally([Happy, Happy, Sad]);
        assert_eq!(dist.percentages(), vec![(Happy, 67), (Sad, 33)]);
    }
}
