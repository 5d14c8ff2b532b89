// Weekly score extraction.
//
// A team's score sequence only contains weeks with a recorded, nonzero
// score. Bye weeks and unplayed weeks are dropped here so that every rate
// statistic downstream divides by games actually played.

use dynasty_core::model::{RosterId, WeekScores};

/// Ordered valid scores for `roster_id`, one per week it actually played.
pub fn extract_weekly_scores(roster_id: RosterId, weeks: &[WeekScores]) -> Vec<f64> {
    weeks
        .iter()
        .filter_map(|week| week.valid_score(roster_id))
        .collect()
}

/// Arithmetic mean, 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
