// All-play and median records.
//
// The all-play record pits a team's weekly score against every other team
// that played that week, giving a schedule-independent view of strength.

use dynasty_core::model::{RosterId, WeekScores};
use serde::Serialize;
use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// All-play record
// ---------------------------------------------------------------------------

/// Hypothetical record against the whole league, every week.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AllPlayRecord {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl AllPlayRecord {
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// All-play win fraction (expected win percentage). 0.0 with no games.
    pub fn pct(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            return 0.0;
        }
        self.wins as f64 / games as f64
    }
}

/// Tally the all-play record for `roster_id` across `weeks`.
///
/// Weeks where the team has no valid score are skipped entirely, and
/// opponents without a valid score that week are not compared against.
pub fn compute_all_play(roster_id: RosterId, weeks: &[WeekScores]) -> AllPlayRecord {
    let mut record = AllPlayRecord::default();

    for week in weeks {
        let Some(score) = week.valid_score(roster_id) else {
            continue;
        };
        for other in week.valid_entries().filter(|e| e.roster_id != roster_id) {
            match score.partial_cmp(&other.points) {
                Some(Ordering::Greater) => record.wins += 1,
                Some(Ordering::Less) => record.losses += 1,
                _ => record.ties += 1,
            }
        }
    }

    record
}

/// Luck index: actual win fraction minus expected (all-play) win fraction.
/// Positive means the team won more than its scoring alone would suggest.
pub fn luck_index(actual_win_pct: f64, expected_win_pct: f64) -> f64 {
    actual_win_pct - expected_win_pct
}

// ---------------------------------------------------------------------------
// Median record
// ---------------------------------------------------------------------------

/// Weeks finished above versus at-or-below the league's weekly median.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MedianRecord {
    pub above: u32,
    pub below: u32,
}

/// Median of the valid scores in a week, `None` if nobody played.
pub fn weekly_median(week: &WeekScores) -> Option<f64> {
    let mut scores: Vec<f64> = week.valid_entries().map(|e| e.points).collect();
    if scores.is_empty() {
        return None;
    }
    scores.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mid = scores.len() / 2;
    if scores.len() % 2 == 0 {
        Some((scores[mid - 1] + scores[mid]) / 2.0)
    } else {
        Some(scores[mid])
    }
}

/// Count the weeks `roster_id` beat the league median.
pub fn compute_median_record(roster_id: RosterId, weeks: &[WeekScores]) -> MedianRecord {
    let mut record = MedianRecord::default();

    for week in weeks {
        let Some(median) = weekly_median(week) else {
            continue;
        };
        if let Some(score) = week.valid_score(roster_id) {
            if score > median {
                record.above += 1;
            } else {
                record.below += 1;
            }
        }
    }

    record
}
