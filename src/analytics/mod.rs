//! Pure mood analytics over observation windows.

pub mod config;
pub mod distribution;
pub mod scoring;
pub mod stats;
pub mod timeline;
pub mod trend;

pub use config::TrendConfig;
pub use distribution::{distribution, dominant, Distribution};
pub use scoring::{average_confidence, mood_score, NEUTRAL_MOOD_SCORE};
pub use stats::{statistics, Statistics};
pub use timeline::{timeline, TimelineBucket, TimelineRange};
pub use trend::{trend, trend_with, Trend, TrendReport, Volatility};
