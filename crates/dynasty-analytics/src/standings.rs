// League standings: wins first, points-for as the tiebreaker.

use std::cmp::Ordering;

use dynasty_core::model::{RosterId, TeamSeason};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsEntry {
    pub roster_id: RosterId,
    pub owner_id: String,
    pub display_name: String,
    pub team_name: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
    pub rank: usize,
}

/// Order teams by wins descending, then points-for descending. Teams equal
/// on both keep their input order.
pub fn build_standings(teams: &[TeamSeason]) -> Vec<StandingsEntry> {
    let mut sorted: Vec<&TeamSeason> = teams.iter().collect();
    sorted.sort_by(|a, b| compare_standing(a, b));

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, t)| StandingsEntry {
            roster_id: t.roster_id,
            owner_id: t.owner_id.clone(),
            display_name: t.display_name.clone(),
            team_name: t.team_name.clone(),
            wins: t.wins,
            losses: t.losses,
            ties: t.ties,
            points_for: t.points_for,
            points_against: t.points_against,
            rank: i + 1,
        })
        .collect()
}

/// Standings comparator shared with the historical records.
pub fn compare_standing(a: &TeamSeason, b: &TeamSeason) -> Ordering {
    b.wins.cmp(&a.wins).then_with(|| {
        b.points_for
            .partial_cmp(&a.points_for)
            .unwrap_or(Ordering::Equal)
    })
}

/// Roster in first place, if any teams exist.
pub fn leader(standings: &[StandingsEntry]) -> Option<RosterId> {
    standings.first().map(|e| e.roster_id)
}
