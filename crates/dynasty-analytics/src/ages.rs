// Roster age by position: each team's average player age against the
// league-wide average for QB, RB, WR and TE.

use std::collections::HashMap;

use serde::Serialize;

/// Positions compared, in display order.
pub const AGE_POSITIONS: [&str; 4] = ["QB", "RB", "WR", "TE"];

/// What the comparison needs to know about a player.
pub trait AgedPlayer {
    fn position(&self) -> Option<&str>;
    fn age(&self) -> Option<f64>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionAge {
    pub position: String,
    pub team_avg_age: f64,
    pub league_avg_age: f64,
    /// Team minus league. Positive means the team is older.
    pub delta: f64,
    pub team_player_count: usize,
    pub league_player_count: usize,
}

fn ages_at<'a, P: AgedPlayer>(
    player_ids: impl IntoIterator<Item = &'a String>,
    players: &HashMap<String, P>,
    position: &str,
) -> Vec<f64> {
    player_ids
        .into_iter()
        .filter_map(|id| players.get(id))
        .filter(|p| p.position() == Some(position))
        .filter_map(|p| p.age())
        .collect()
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Compare `team` (a roster's player ids) against every roster in `league`.
/// Players missing from the directory or without an age are ignored, and
/// a position with nobody to average comes out as 0.
pub fn compute_position_ages<P: AgedPlayer>(
    team: &[String],
    league: &[Vec<String>],
    players: &HashMap<String, P>,
) -> Vec<PositionAge> {
    AGE_POSITIONS
        .iter()
        .map(|&position| {
            let team_ages = ages_at(team, players, position);
            let league_ages = ages_at(league.iter().flatten(), players, position);
            let team_avg_age = average(&team_ages);
            let league_avg_age = average(&league_ages);
            PositionAge {
                position: position.to_string(),
                team_avg_age,
                league_avg_age,
                delta: team_avg_age - league_avg_age,
                team_player_count: team_ages.len(),
                league_player_count: league_ages.len(),
            }
        })
        .collect()
}
