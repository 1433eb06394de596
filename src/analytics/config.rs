/// Thresholds for trend and volatility classification.
#[derive(Debug, Clone)]
pub struct TrendConfig {
    /// Windows shorter than this are reported as stable/low without analysis.
    pub min_window: usize,

    /// Half-to-half change in mean mood weight needed to call a trend.
    pub trend_margin: f64,

    /// Population variance of mood weights above which volatility is high.
    pub high_variance: f64,

    /// Population variance above which volatility is medium.
    pub medium_variance: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            min_window: 3,
            trend_margin: 10.0,
            high_variance: 400.0,
            medium_variance: 200.0,
        }
    }
}
