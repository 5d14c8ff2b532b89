// Week-to-week scoring consistency.

use serde::Serialize;

use crate::scores::mean;

/// Spread of a team's weekly scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsistencyMetrics {
    /// Population standard deviation of the weekly scores.
    pub std_dev: f64,
    /// Coefficient of variation in percent (lower = steadier).
    pub cv: f64,
    /// 0-100, higher = more consistent.
    pub rating: f64,
}

impl Default for ConsistencyMetrics {
    /// No scores means no variance: perfectly consistent.
    fn default() -> Self {
        ConsistencyMetrics {
            std_dev: 0.0,
            cv: 0.0,
            rating: 100.0,
        }
    }
}

/// Each CV percentage point costs this many rating points.
const CV_RATING_SCALE: f64 = 5.0;

/// Compute consistency metrics from a team's valid weekly scores.
///
/// Uses the population standard deviation (N denominator): the season's
/// weeks are the whole population, not a sample. The rating is
/// `clamp(100 - 5 * CV, 0, 100)`.
pub fn compute_consistency(weekly_scores: &[f64]) -> ConsistencyMetrics {
    if weekly_scores.is_empty() {
        return ConsistencyMetrics::default();
    }

    let n = weekly_scores.len() as f64;
    let avg = mean(weekly_scores);
    let variance = weekly_scores.iter().map(|s| (s - avg).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    let cv = if avg > 0.0 { std_dev / avg * 100.0 } else { 0.0 };
    let rating = (100.0 - cv * CV_RATING_SCALE).clamp(0.0, 100.0);

    ConsistencyMetrics { std_dev, cv, rating }
}
