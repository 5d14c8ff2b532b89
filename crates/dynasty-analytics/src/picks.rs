// Future draft-pick ownership and per-team pick capital.
//
// The league's traded-pick ledger already names the final holder of every
// pick that moved, so ownership is a single lookup per (season, round,
// original team). Anything not in the ledger still belongs to its original
// team.

use std::collections::HashMap;

use dynasty_core::model::{RosterId, TradedPick};
use serde::Serialize;
use tracing::debug;

// ---------------------------------------------------------------------------
// Ownership state
// ---------------------------------------------------------------------------

/// Where a pick sits relative to the team it originally belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum Ownership {
    Retained,
    Moved { from: RosterId, to: RosterId },
}

/// How a pick reads from one team's point of view.
///
/// `Acquired` and `TradedAway` describe the same [`Ownership::Moved`] fact
/// seen from either end of the trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickStatus {
    OwnsOwn,
    Acquired,
    TradedAway,
}

impl PickStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PickStatus::OwnsOwn => "own",
            PickStatus::Acquired => "acquired",
            PickStatus::TradedAway => "traded away",
        }
    }
}

/// Current holder of one future pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickOwnership {
    pub season: String,
    pub round: u32,
    pub original_roster_id: RosterId,
    pub current_owner: RosterId,
}

impl PickOwnership {
    pub fn ownership(&self) -> Ownership {
        if self.current_owner == self.original_roster_id {
            Ownership::Retained
        } else {
            Ownership::Moved {
                from: self.original_roster_id,
                to: self.current_owner,
            }
        }
    }

    pub fn is_retained(&self) -> bool {
        self.ownership() == Ownership::Retained
    }

    /// Status as seen by `viewer`. `None` when the viewer is neither the
    /// original team nor the current owner.
    pub fn status_for(&self, viewer: RosterId) -> Option<PickStatus> {
        match self.ownership() {
            Ownership::Retained if viewer == self.original_roster_id => Some(PickStatus::OwnsOwn),
            Ownership::Moved { to, .. } if viewer == to => Some(PickStatus::Acquired),
            Ownership::Moved { from, .. } if viewer == from => Some(PickStatus::TradedAway),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

type PickKey<'a> = (&'a str, u32, RosterId);

/// Resolve the current owner of every pick in
/// `seasons × 1..=max_rounds × roster_ids`.
///
/// Output order is season, then round, then the order of `roster_ids`.
/// When the ledger lists the same pick twice, the first entry wins.
pub fn resolve_pick_ownership(
    ledger: &[TradedPick],
    roster_ids: &[RosterId],
    seasons: &[String],
    max_rounds: u32,
) -> Vec<PickOwnership> {
    let mut moved: HashMap<PickKey<'_>, RosterId> = HashMap::with_capacity(ledger.len());
    for tp in ledger {
        moved
            .entry((tp.season.as_str(), tp.round, tp.original_roster_id))
            .or_insert(tp.owner_id);
    }

    let mut picks = Vec::with_capacity(seasons.len() * max_rounds as usize * roster_ids.len());
    for season in seasons {
        for round in 1..=max_rounds {
            for &original in roster_ids {
                let current_owner = moved
                    .get(&(season.as_str(), round, original))
                    .copied()
                    .unwrap_or(original);
                picks.push(PickOwnership {
                    season: season.clone(),
                    round,
                    original_roster_id: original,
                    current_owner,
                });
            }
        }
    }

    debug!(
        ledger = ledger.len(),
        picks = picks.len(),
        "resolved draft pick ownership"
    );
    picks
}

/// The `count` seasons following `current_season` ("2025" -> "2026", ...).
/// Empty when the season is not a year.
pub fn upcoming_seasons(current_season: &str, count: u32) -> Vec<String> {
    match current_season.trim().parse::<u32>() {
        Ok(year) => (1..=count).map(|i| (year + i).to_string()).collect(),
        Err(_) => {
            debug!(season = current_season, "season is not a year; no upcoming seasons");
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Pick capital
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamPickCapital {
    pub roster_id: RosterId,
    /// Picks the team holds now, its own and acquired.
    pub total_owned: usize,
    /// Picks originally the team's that another team holds now.
    pub total_traded_away: usize,
    /// Still holds its own first-rounder in every resolved season.
    pub owns_own_first: bool,
    /// The picks the team holds now, in resolution order.
    pub picks: Vec<PickOwnership>,
}

impl TeamPickCapital {
    pub fn acquired(&self) -> usize {
        self.picks.iter().filter(|p| !p.is_retained()).count()
    }
}

/// Summarize pick capital for each team, in `roster_ids` order.
pub fn compute_pick_capital(picks: &[PickOwnership], roster_ids: &[RosterId]) -> Vec<TeamPickCapital> {
    roster_ids
        .iter()
        .map(|&roster_id| {
            let owned: Vec<PickOwnership> = picks
                .iter()
                .filter(|p| p.current_owner == roster_id)
                .cloned()
                .collect();
            let total_traded_away = picks
                .iter()
                .filter(|p| p.original_roster_id == roster_id && !p.is_retained())
                .count();

            let mut own_firsts = picks
                .iter()
                .filter(|p| p.original_roster_id == roster_id && p.round == 1)
                .peekable();
            let owns_own_first = own_firsts.peek().is_some() && own_firsts.all(|p| p.is_retained());

            TeamPickCapital {
                roster_id,
                total_owned: owned.len(),
                total_traded_away,
                owns_own_first,
                picks: owned,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traded(season: &str, round: u32, original: RosterId, owner: RosterId) -> TradedPick {
        TradedPick {
            season: season.to_string(),
            round,
            original_roster_id: original,
            owner_id: owner,
            previous_owner_id: Some(original),
        }
    }

    fn seasons(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn traded_first_rounder_moves_to_new_owner() {
        let ledger = vec![traded("2027", 1, 5, 3)];
        let picks = resolve_pick_ownership(&ledger, &[3, 5], &seasons(&["2027"]), 4);
        assert_eq!(picks.len(), 8);

        let pick = picks
            .iter()
            .find(|p| p.season == "2027" && p.round == 1 && p.original_roster_id == 5)
            .unwrap();
        assert_eq!(pick.current_owner, 3);
        assert_eq!(pick.ownership(), Ownership::Moved { from: 5, to: 3 });

        let capital = compute_pick_capital(&picks, &[3, 5]);
        assert_eq!(capital[0].roster_id, 3);
        assert_eq!(capital[0].total_owned, 5);
        assert_eq!(capital[0].acquired(), 1);
        assert_eq!(capital[0].total_traded_away, 0);
        assert!(capital[0].owns_own_first);

        assert_eq!(capital[1].total_owned, 3);
        assert_eq!(capital[1].total_traded_away, 1);
        assert!(!capital[1].owns_own_first);
    }

    #[test]
    fn status_depends_on_viewer() {
        let pick = PickOwnership {
            season: "2027".into(),
            round: 1,
            original_roster_id: 5,
            current_owner: 3,
        };
        assert_eq!(pick.status_for(3), Some(PickStatus::Acquired));
        assert_eq!(pick.status_for(5), Some(PickStatus::TradedAway));
        assert_eq!(pick.status_for(7), None);

        let own = PickOwnership {
            current_owner: 5,
            ..pick
        };
        assert_eq!(own.status_for(5), Some(PickStatus::OwnsOwn));
        assert_eq!(own.status_for(3), None);
        assert_eq!(PickStatus::TradedAway.label(), "traded away");
    }

    #[test]
    fn untraded_league_owns_everything() {
        let picks = resolve_pick_ownership(&[], &[1, 2, 3], &seasons(&["2026", "2027"]), 4);
        assert_eq!(picks.len(), 24);
        assert!(picks.iter().all(|p| p.is_retained()));

        let capital = compute_pick_capital(&picks, &[1, 2, 3]);
        for team in &capital {
            assert_eq!(team.total_owned, 8);
            assert_eq!(team.total_traded_away, 0);
            assert!(team.owns_own_first);
        }
    }

    #[test]
    fn output_order_is_season_round_team() {
        let picks = resolve_pick_ownership(&[], &[2, 1], &seasons(&["2026", "2027"]), 2);
        let keys: Vec<(&str, u32, RosterId)> = picks
            .iter()
            .map(|p| (p.season.as_str(), p.round, p.original_roster_id))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("2026", 1, 2),
                ("2026", 1, 1),
                ("2026", 2, 2),
                ("2026", 2, 1),
                ("2027", 1, 2),
                ("2027", 1, 1),
                ("2027", 2, 2),
                ("2027", 2, 1),
            ]
        );
    }

    #[test]
    fn first_ledger_entry_wins() {
        let ledger = vec![traded("2026", 2, 1, 4), traded("2026", 2, 1, 9)];
        let picks = resolve_pick_ownership(&ledger, &[1, 4, 9], &seasons(&["2026"]), 2);
        let pick = picks
            .iter()
            .find(|p| p.round == 2 && p.original_roster_id == 1)
            .unwrap();
        assert_eq!(pick.current_owner, 4);
    }

    #[test]
    fn ledger_outside_requested_window_is_ignored() {
        let ledger = vec![traded("2030", 1, 1, 2), traded("2026", 5, 1, 2)];
        let picks = resolve_pick_ownership(&ledger, &[1, 2], &seasons(&["2026"]), 4);
        assert!(picks.iter().all(|p| p.is_retained()));
    }

    #[test]
    fn losing_one_season_first_clears_the_flag() {
        let ledger = vec![traded("2028", 1, 1, 2)];
        let picks = resolve_pick_ownership(&ledger, &[1, 2], &seasons(&["2026", "2027", "2028"]), 4);
        let capital = compute_pick_capital(&picks, &[1, 2]);
        assert!(!capital[0].owns_own_first);
        assert!(capital[1].owns_own_first);
        assert_eq!(capital[1].total_owned, 13);
    }

    #[test]
    fn no_seasons_means_no_capital() {
        let picks = resolve_pick_ownership(&[], &[1], &[], 4);
        assert!(picks.is_empty());
        let capital = compute_pick_capital(&picks, &[1]);
        assert_eq!(capital[0].total_owned, 0);
        assert!(!capital[0].owns_own_first);
    }

    #[test]
    fn upcoming_seasons_follow_the_current_year() {
        assert_eq!(upcoming_seasons("2025", 3), vec!["2026", "2027", "2028"]);
        assert!(upcoming_seasons("next", 3).is_empty());
        assert!(upcoming_seasons("2025", 0).is_empty());
    }
}
