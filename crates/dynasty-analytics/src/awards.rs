// Season awards: best and worst offense by points per game, the top weekly
// score, and the closest and most lopsided games of one season.

use dynasty_core::model::LeagueSeason;
use serde::Serialize;

use crate::records::{pair_matchups, MatchupPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardKind {
    BestOffense,
    WorstOffense,
    PointCollector,
    CloseCall,
    BiggestBlowout,
}

impl AwardKind {
    pub fn label(&self) -> &'static str {
        match self {
            AwardKind::BestOffense => "Best Offense",
            AwardKind::WorstOffense => "Worst Offense",
            AwardKind::PointCollector => "Point Collector",
            AwardKind::CloseCall => "Close Call",
            AwardKind::BiggestBlowout => "Biggest Blowout",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonAward {
    pub kind: AwardKind,
    pub team: String,
    /// Points per game, points scored, or winning margin.
    pub value: f64,
    /// The week it happened, for single-game awards.
    pub week: Option<u32>,
}

impl SeasonAward {
    pub fn display_value(&self) -> String {
        match self.kind {
            AwardKind::BestOffense | AwardKind::WorstOffense => format!("{:.1} PPG", self.value),
            AwardKind::PointCollector => format!("{:.2} pts", self.value),
            AwardKind::CloseCall | AwardKind::BiggestBlowout => format!("Won by {:.2}", self.value),
        }
    }

    fn game(kind: AwardKind, pair: &MatchupPair) -> Self {
        let (winner, _) = pair.winner_and_loser();
        SeasonAward {
            kind,
            team: winner.team_name.clone(),
            value: pair.margin(),
            week: Some(pair.week),
        }
    }
}

/// Awards for one season, in display order. Categories without data (no
/// teams, no scored weeks, no decided games) are left out.
///
/// Ties go to the team listed first: roster order for offense, week order
/// for single-game awards.
pub fn compute_season_awards(season: &LeagueSeason) -> Vec<SeasonAward> {
    let mut awards = Vec::new();

    let ppg: Vec<(&str, f64)> = season
        .teams
        .iter()
        .map(|t| {
            let games = t.games_played();
            let ppg = if games > 0 {
                t.points_for / games as f64
            } else {
                0.0
            };
            (t.team_name.as_str(), ppg)
        })
        .collect();

    let best = ppg.iter().reduce(|best, t| if t.1 > best.1 { t } else { best });
    let worst = ppg.iter().reduce(|worst, t| if t.1 < worst.1 { t } else { worst });
    if let (Some(best), Some(worst)) = (best, worst) {
        for (kind, (team, value)) in [(AwardKind::BestOffense, best), (AwardKind::WorstOffense, worst)] {
            awards.push(SeasonAward {
                kind,
                team: team.to_string(),
                value: *value,
                week: None,
            });
        }
    }

    let top_score = season
        .weeks
        .iter()
        .flat_map(|week| week.valid_entries().map(move |e| (week.week, e)))
        .reduce(|best, s| if s.1.points > best.1.points { s } else { best });
    if let Some((week, entry)) = top_score {
        awards.push(SeasonAward {
            kind: AwardKind::PointCollector,
            team: season.team_name(entry.roster_id),
            value: entry.points,
            week: Some(week),
        });
    }

    let scored: Vec<MatchupPair> = season
        .weeks
        .iter()
        .flat_map(|week| pair_matchups(season, week))
        .filter(MatchupPair::both_scored)
        .collect();

    let closest = scored
        .iter()
        .filter(|p| p.margin() > 0.0)
        .reduce(|best, p| if p.margin() < best.margin() { p } else { best });
    if let Some(pair) = closest {
        awards.push(SeasonAward::game(AwardKind::CloseCall, pair));
    }

    let widest = scored
        .iter()
        .reduce(|best, p| if p.margin() > best.margin() { p } else { best });
    if let Some(pair) = widest {
        awards.push(SeasonAward::game(AwardKind::BiggestBlowout, pair));
    }

    awards
}
