// Playoff bracket resolution.
//
// Brackets arrive as flat matchup lists. Later-round slots may point at an
// earlier matchup ("winner of 3"); those are resolved through an index
// keyed by matchup id. The platform already records each game's winner and
// loser, so a single lookup per slot is enough.

use std::collections::{BTreeMap, HashMap};

use dynasty_core::model::{BracketKind, BracketMatchup, MatchupId, RosterId, SlotRef};
use serde::Serialize;
use tracing::debug;

// ---------------------------------------------------------------------------
// Matchup index
// ---------------------------------------------------------------------------

/// Bracket matchups keyed by matchup id.
#[derive(Debug)]
pub struct BracketIndex<'a> {
    by_id: HashMap<MatchupId, &'a BracketMatchup>,
}

impl<'a> BracketIndex<'a> {
    /// Index a bracket. If an id repeats, the first matchup wins.
    pub fn new(matchups: &'a [BracketMatchup]) -> Self {
        let mut by_id = HashMap::with_capacity(matchups.len());
        for m in matchups {
            by_id.entry(m.matchup_id).or_insert(m);
        }
        BracketIndex { by_id }
    }

    pub fn get(&self, matchup_id: MatchupId) -> Option<&'a BracketMatchup> {
        self.by_id.get(&matchup_id).copied()
    }

    /// The roster occupying a slot, if it is known yet.
    pub fn resolve_slot(&self, slot: Option<SlotRef>) -> Option<RosterId> {
        match slot? {
            SlotRef::Team(roster_id) => Some(roster_id),
            SlotRef::WinnerOf(id) => self.get(id)?.winner,
            SlotRef::LoserOf(id) => self.get(id)?.loser,
        }
    }
}

// ---------------------------------------------------------------------------
// Display rounds
// ---------------------------------------------------------------------------

/// A bracket matchup with both slots resolved to rosters where possible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMatchup {
    pub matchup_id: MatchupId,
    pub team1: Option<RosterId>,
    pub team2: Option<RosterId>,
    pub winner: Option<RosterId>,
    pub loser: Option<RosterId>,
    pub placement: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketRound {
    pub round: u32,
    pub label: String,
    pub matchups: Vec<ResolvedMatchup>,
}

/// Label a round by its position from the end.
///
/// The last round is always "Finals". Only a three-round winners bracket
/// names its earlier rounds ("Quarterfinals", "Semifinals"); every other
/// round is "Round N".
pub fn round_label(kind: BracketKind, round: u32, max_round: u32) -> String {
    if round == max_round {
        return "Finals".to_string();
    }
    match (kind, max_round, round) {
        (BracketKind::Winners, 3, 1) => "Quarterfinals".to_string(),
        (BracketKind::Winners, 3, 2) => "Semifinals".to_string(),
        _ => format!("Round {round}"),
    }
}

/// Group a bracket into labeled rounds, ascending by round number.
/// Matchups keep their input order within a round.
pub fn build_bracket_rounds(bracket: &[BracketMatchup], kind: BracketKind) -> Vec<BracketRound> {
    let index = BracketIndex::new(bracket);
    let Some(max_round) = bracket.iter().map(|m| m.round).max() else {
        return Vec::new();
    };

    let mut by_round: BTreeMap<u32, Vec<ResolvedMatchup>> = BTreeMap::new();
    for m in bracket {
        by_round.entry(m.round).or_default().push(ResolvedMatchup {
            matchup_id: m.matchup_id,
            team1: index.resolve_slot(m.team1),
            team2: index.resolve_slot(m.team2),
            winner: m.winner,
            loser: m.loser,
            placement: m.placement,
        });
    }

    by_round
        .into_iter()
        .map(|(round, matchups)| BracketRound {
            round,
            label: round_label(kind, round, max_round),
            matchups,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Placements
// ---------------------------------------------------------------------------

/// A final standing decided on the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub roster_id: RosterId,
    /// 1 = champion, 2 = runner-up, ...
    pub place: u32,
}

/// The (winner, loser) places a placement code decides in a bracket.
///
/// Winners bracket: 1 -> 1st/2nd, 3 -> 3rd/4th, 5 -> 5th/6th.
/// Losers bracket: 1 and 3 are shifted past the playoff field.
pub fn places_for_code(kind: BracketKind, code: u32, playoff_teams: u32) -> Option<(u32, u32)> {
    match (kind, code) {
        (BracketKind::Winners, 1 | 3 | 5) => Some((code, code + 1)),
        (BracketKind::Losers, 1 | 3) => Some((playoff_teams + code, playoff_teams + code + 1)),
        _ => None,
    }
}

fn collect_placements(
    bracket: &[BracketMatchup],
    kind: BracketKind,
    playoff_teams: u32,
    out: &mut Vec<Placement>,
) {
    for m in bracket {
        let (Some(winner), Some(loser), Some(code)) = (m.winner, m.loser, m.placement) else {
            continue;
        };
        if let Some((win_place, lose_place)) = places_for_code(kind, code, playoff_teams) {
            out.push(Placement {
                roster_id: winner,
                place: win_place,
            });
            out.push(Placement {
                roster_id: loser,
                place: lose_place,
            });
        }
    }
}

/// Final placements decided by both brackets, ascending by place.
/// Undecided placement games contribute nothing.
pub fn resolve_placements(
    winners: &[BracketMatchup],
    losers: &[BracketMatchup],
    playoff_teams: u32,
) -> Vec<Placement> {
    let mut placements = Vec::new();
    collect_placements(winners, BracketKind::Winners, playoff_teams, &mut placements);
    collect_placements(losers, BracketKind::Losers, playoff_teams, &mut placements);
    placements.sort_by_key(|p| p.place);
    placements
}

/// The championship game: the winners-bracket matchup deciding 1st place.
pub fn championship(winners: &[BracketMatchup]) -> Option<&BracketMatchup> {
    winners.iter().find(|m| m.placement == Some(1))
}

/// Champion roster, `None` until a championship game exists and is decided.
pub fn champion(winners: &[BracketMatchup]) -> Option<RosterId> {
    championship(winners)?.winner
}

/// Runner-up roster, `None` until a championship game exists and is decided.
pub fn runner_up(winners: &[BracketMatchup]) -> Option<RosterId> {
    championship(winners)?.loser
}

// ---------------------------------------------------------------------------
// Full resolution
// ---------------------------------------------------------------------------

/// Everything a playoff view needs for one season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayoffOutcome {
    pub winners_rounds: Vec<BracketRound>,
    pub losers_rounds: Vec<BracketRound>,
    pub placements: Vec<Placement>,
    pub champion: Option<RosterId>,
    pub runner_up: Option<RosterId>,
}

pub fn resolve_playoffs(
    winners: &[BracketMatchup],
    losers: &[BracketMatchup],
    playoff_teams: u32,
) -> PlayoffOutcome {
    let outcome = PlayoffOutcome {
        winners_rounds: build_bracket_rounds(winners, BracketKind::Winners),
        losers_rounds: build_bracket_rounds(losers, BracketKind::Losers),
        placements: resolve_placements(winners, losers, playoff_teams),
        champion: champion(winners),
        runner_up: runner_up(winners),
    };
    debug!(
        placements = outcome.placements.len(),
        champion = ?outcome.champion,
        "resolved playoff brackets"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matchup(
        round: u32,
        matchup_id: MatchupId,
        team1: Option<SlotRef>,
        team2: Option<SlotRef>,
        result: Option<(RosterId, RosterId)>,
        placement: Option<u32>,
    ) -> BracketMatchup {
        BracketMatchup {
            round,
            matchup_id,
            team1,
            team2,
            winner: result.map(|r| r.0),
            loser: result.map(|r| r.1),
            placement,
        }
    }

    /// Six-team winners bracket: two byes, three rounds, placement games.
    fn six_team_winners() -> Vec<BracketMatchup> {
        use SlotRef::*;
        vec![
            matchup(1, 1, Some(Team(4)), Some(Team(5)), Some((4, 5)), None),
            matchup(1, 2, Some(Team(3)), Some(Team(6)), Some((6, 3)), None),
            matchup(2, 3, Some(Team(1)), Some(WinnerOf(1)), Some((1, 4)), None),
            matchup(2, 4, Some(Team(2)), Some(WinnerOf(2)), Some((6, 2)), None),
            matchup(2, 5, Some(LoserOf(1)), Some(LoserOf(2)), Some((3, 5)), Some(5)),
            matchup(3, 6, Some(WinnerOf(3)), Some(WinnerOf(4)), Some((6, 1)), Some(1)),
            matchup(3, 7, Some(LoserOf(3)), Some(LoserOf(4)), Some((2, 4)), Some(3)),
        ]
    }

    fn four_team_losers() -> Vec<BracketMatchup> {
        use SlotRef::*;
        vec![
            matchup(1, 1, Some(Team(7)), Some(Team(10)), Some((10, 7)), None),
            matchup(1, 2, Some(Team(8)), Some(Team(9)), Some((8, 9)), None),
            matchup(2, 3, Some(WinnerOf(1)), Some(WinnerOf(2)), Some((8, 10)), Some(1)),
            matchup(2, 4, Some(LoserOf(1)), Some(LoserOf(2)), Some((9, 7)), Some(3)),
        ]
    }

    #[test]
    fn single_championship_game() {
        let bracket = vec![matchup(
            1,
            1,
            Some(SlotRef::Team(1)),
            Some(SlotRef::Team(2)),
            Some((1, 2)),
            Some(1),
        )];
        assert_eq!(champion(&bracket), Some(1));
        assert_eq!(runner_up(&bracket), Some(2));
    }

    #[test]
    fn no_championship_game_means_undecided() {
        let bracket = vec![matchup(
            1,
            1,
            Some(SlotRef::Team(1)),
            Some(SlotRef::Team(2)),
            Some((1, 2)),
            None,
        )];
        assert_eq!(champion(&bracket), None);
        assert_eq!(runner_up(&bracket), None);
        assert_eq!(champion(&[]), None);
    }

    #[test]
    fn undecided_championship_has_no_champion() {
        let bracket = vec![matchup(3, 6, Some(SlotRef::WinnerOf(3)), None, None, Some(1))];
        assert!(championship(&bracket).is_some());
        assert_eq!(champion(&bracket), None);
    }

    #[test]
    fn resolves_forward_references() {
        let bracket = six_team_winners();
        let index = BracketIndex::new(&bracket);
        assert_eq!(index.resolve_slot(Some(SlotRef::Team(9))), Some(9));
        assert_eq!(index.resolve_slot(Some(SlotRef::WinnerOf(2))), Some(6));
        assert_eq!(index.resolve_slot(Some(SlotRef::LoserOf(1))), Some(5));
        assert_eq!(index.resolve_slot(Some(SlotRef::WinnerOf(42))), None);
        assert_eq!(index.resolve_slot(None), None);
    }

    #[test]
    fn rounds_are_grouped_and_labeled() {
        let rounds = build_bracket_rounds(&six_team_winners(), BracketKind::Winners);
        let labels: Vec<&str> = rounds.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Quarterfinals", "Semifinals", "Finals"]);
        assert_eq!(rounds[0].matchups.len(), 2);
        assert_eq!(rounds[1].matchups.len(), 3);

        let final_game = &rounds[2].matchups[0];
        assert_eq!(final_game.team1, Some(1));
        assert_eq!(final_game.team2, Some(6));
        assert_eq!(final_game.winner, Some(6));

        let losers = build_bracket_rounds(&four_team_losers(), BracketKind::Losers);
        let labels: Vec<&str> = losers.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Round 1", "Finals"]);

        assert!(build_bracket_rounds(&[], BracketKind::Winners).is_empty());
    }

    #[test]
    fn round_labels_name_only_three_round_winners_brackets() {
        assert_eq!(round_label(BracketKind::Winners, 1, 3), "Quarterfinals");
        assert_eq!(round_label(BracketKind::Winners, 2, 3), "Semifinals");
        assert_eq!(round_label(BracketKind::Winners, 1, 2), "Round 1");
        assert_eq!(round_label(BracketKind::Winners, 2, 2), "Finals");
        assert_eq!(round_label(BracketKind::Winners, 2, 4), "Round 2");
        assert_eq!(round_label(BracketKind::Winners, 4, 4), "Finals");
        assert_eq!(round_label(BracketKind::Winners, 1, 2), "Round 1");
        assert_eq!(round_label(BracketKind::Winners, 2, 2), "Finals");
        assert_eq!(round_label(BracketKind::Losers, 2, 3), "Round 2");
        assert_eq!(round_label(BracketKind::Losers, 3, 3), "Finals");
    }

    #[test]
    fn placements_span_both_brackets() {
        let placements = resolve_placements(&six_team_winners(), &four_team_losers(), 6);
        let table: Vec<(u32, RosterId)> = placements.iter().map(|p| (p.place, p.roster_id)).collect();
        assert_eq!(
            table,
            vec![
                (1, 6),
                (2, 1),
                (3, 2),
                (4, 4),
                (5, 3),
                (6, 5),
                (7, 8),
                (8, 10),
                (9, 9),
                (10, 7),
            ]
        );
    }

    #[test]
    fn losers_bracket_ignores_fifth_place_code() {
        assert_eq!(places_for_code(BracketKind::Losers, 5, 6), None);
        assert_eq!(places_for_code(BracketKind::Winners, 5, 6), Some((5, 6)));
        assert_eq!(places_for_code(BracketKind::Winners, 2, 6), None);
        assert_eq!(places_for_code(BracketKind::Losers, 3, 4), Some((7, 8)));
    }

    #[test]
    fn undecided_games_add_no_placements() {
        let mut bracket = six_team_winners();
        for m in bracket.iter_mut() {
            m.winner = None;
            m.loser = None;
        }
        assert!(resolve_placements(&bracket, &[], 6).is_empty());
    }

    #[test]
    fn full_resolution() {
        let outcome = resolve_playoffs(&six_team_winners(), &four_team_losers(), 6);
        assert_eq!(outcome.champion, Some(6));
        assert_eq!(outcome.runner_up, Some(1));
        assert_eq!(outcome.winners_rounds.len(), 3);
        assert_eq!(outcome.losers_rounds.len(), 2);
        assert_eq!(outcome.placements.len(), 10);
    }
}
