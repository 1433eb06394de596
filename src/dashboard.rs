use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::{statistics, trend, Statistics, TrendReport};
use crate::models::Observation;
use crate::store::{EmotionStore, RangeFilter};

const TREND_WINDOW: usize = 10;
const RECENT_LIMIT: usize = 50;

/// Everything the dashboard screen renders, read in one pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub generated_at: DateTime<Utc>,
    pub overall: Statistics,
    pub today: Statistics,
    pub week: Statistics,
    pub trend: TrendReport,
    /// Newest first.
    pub recent: Vec<Observation>,
}

impl DashboardSummary {
    pub async fn build(store: &EmotionStore, now: DateTime<Utc>) -> Self {
        let history = store.query(&RangeFilter::all()).await;

        let today = RangeFilter::today(now).apply(history.clone());
        let week = RangeFilter::trailing_days(now, 7).apply(history.clone());
        let trend_window = &history[history.len().saturating_sub(TREND_WINDOW)..];

        let recent: Vec<Observation> = history.iter().rev().take(RECENT_LIMIT).cloned().collect();

        Self {
            generated_at: now,
            overall: statistics(&history),
            today: statistics(&today),
            week: statistics(&week),
            trend: trend(trend_window),
            recent,
        }
    }
}
