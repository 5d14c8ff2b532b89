// Strength of schedule: how well a team's actual opponents scored.

use dynasty_core::model::{RosterId, WeekScores};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::scores::mean;

/// A team's schedule difficulty relative to the league.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrengthOfSchedule {
    /// Average score of the opponents actually faced.
    pub avg_opponent_ppg: f64,
    /// 1 = toughest schedule in the league.
    pub rank: usize,
}

/// Average valid score of the paired opponents `roster_id` faced.
///
/// Only weeks where both the team and its opponent posted a valid score
/// count. Returns 0.0 when there are none.
pub fn average_opponent_score(roster_id: RosterId, weeks: &[WeekScores]) -> f64 {
    let opponent_scores: Vec<f64> = weeks
        .iter()
        .filter(|week| week.valid_score(roster_id).is_some())
        .filter_map(|week| week.opponent_of(roster_id))
        .filter(|opp| opp.has_valid_score())
        .map(|opp| opp.points)
        .collect();

    mean(&opponent_scores)
}

/// Compute and rank strength of schedule for every team in `roster_ids`.
///
/// Ranked by average opponent score descending. Equal averages are ordered
/// by roster id ascending.
pub fn compute_all_sos(
    weeks: &[WeekScores],
    roster_ids: &[RosterId],
) -> HashMap<RosterId, StrengthOfSchedule> {
    let mut values: Vec<(RosterId, f64)> = roster_ids
        .iter()
        .map(|&rid| (rid, average_opponent_score(rid, weeks)))
        .collect();

    values.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    values
        .into_iter()
        .enumerate()
        .map(|(i, (rid, avg))| {
            (
                rid,
                StrengthOfSchedule {
                    avg_opponent_ppg: avg,
                    rank: i + 1,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynasty_core::model::MatchupEntry;

    fn entry(roster_id: RosterId, matchup_id: u32, points: f64) -> MatchupEntry {
        MatchupEntry {
            roster_id,
            matchup_id: Some(matchup_id),
            points,
        }
    }

    fn weeks() -> Vec<WeekScores> {
        vec![
            WeekScores::new(
                1,
                vec![
                    entry(1, 1, 100.0),
                    entry(2, 1, 120.0),
                    entry(3, 2, 90.0),
                    entry(4, 2, 80.0),
                ],
            ),
            WeekScores::new(
                2,
                vec![
                    entry(1, 1, 110.0),
                    entry(3, 1, 0.0),
                    entry(2, 2, 105.0),
                    entry(4, 2, 95.0),
                ],
            ),
        ]
    }

    #[test]
    fn averages_only_valid_opponent_scores() {
        let w = weeks();
        // Team 1: faced 2 (120) then 3 (0, skipped).
        assert!((average_opponent_score(1, &w) - 120.0).abs() < 1e-12);
        // Team 2: faced 1 (100) then 4 (95).
        assert!((average_opponent_score(2, &w) - 97.5).abs() < 1e-12);
        // Team 3: week 2 is its own zero, so only week 1 counts.
        assert!((average_opponent_score(3, &w) - 80.0).abs() < 1e-12);
    }

    #[test]
    fn no_games_means_zero() {
        assert_eq!(average_opponent_score(7, &weeks()), 0.0);
        assert_eq!(average_opponent_score(1, &[]), 0.0);
    }

    #[test]
    fn ranks_toughest_schedule_first() {
        let sos = compute_all_sos(&weeks(), &[1, 2, 3, 4]);
        assert_eq!(sos[&1].rank, 1);
        assert_eq!(sos[&2].rank, 2);
        // Team 4: faced 3 (90) and 2 (105) -> 97.5, ties team 2 on average.
        assert!((sos[&4].avg_opponent_ppg - 97.5).abs() < 1e-12);
        assert_eq!(sos[&4].rank, 3);
        assert_eq!(sos[&3].rank, 4);
    }

    #[test]
    fn equal_averages_break_ties_by_roster_id() {
        let sos = compute_all_sos(&[], &[9, 3, 5]);
        assert_eq!(sos[&3].rank, 1);
        assert_eq!(sos[&5].rank, 2);
        assert_eq!(sos[&9].rank, 3);
    }
}
