// Recent form: a recency-weighted average of the last few weeks, and
// whether the team is trending up or down against its season average.

use dynasty_core::config::FormSettings;
use serde::Serialize;

/// Direction of recent scoring relative to the season average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    /// Short arrow for tables.
    pub fn symbol(&self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Down => "▼",
            Trend::Flat => "–",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Flat => "flat",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecentForm {
    /// Weighted average of the most recent scores.
    pub avg: f64,
    pub trend: Trend,
}

impl Default for RecentForm {
    fn default() -> Self {
        RecentForm {
            avg: 0.0,
            trend: Trend::Flat,
        }
    }
}

/// Compute recent form from oldest-to-newest valid scores.
///
/// The most recent score takes `settings.weights[0]`, the one before it
/// `weights[1]`, and so on. With fewer scores than weights, the weights
/// actually used are rescaled to sum to 1.
pub fn compute_recent_form(
    weekly_scores: &[f64],
    season_avg: f64,
    settings: &FormSettings,
) -> RecentForm {
    let used = weekly_scores.len().min(settings.window());
    if used == 0 {
        return RecentForm::default();
    }

    let weights = &settings.weights[..used];
    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return RecentForm::default();
    }

    let avg: f64 = weekly_scores
        .iter()
        .rev()
        .zip(weights)
        .map(|(score, w)| score * (w / total_weight))
        .sum();

    let diff = avg - season_avg;
    let threshold = season_avg * settings.trend_threshold;
    let trend = if diff > threshold {
        Trend::Up
    } else if diff < -threshold {
        Trend::Down
    } else {
        Trend::Flat
    };

    RecentForm { avg, trend }
}
