// League records: team seasons, weekly matchup scores, bracket matchups,
// the traded-pick ledger, transactions and draft selections.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Roster identifier, unique within one league season.
pub type RosterId = u32;

/// Matchup identifier. Within a week it names the group of paired teams;
/// within a bracket it names a single bracket game.
pub type MatchupId = u32;

// ---------------------------------------------------------------------------
// Team-season record
// ---------------------------------------------------------------------------

/// A team within one season, as fetched from the league platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSeason {
    pub roster_id: RosterId,
    /// Manager (user) who owns the roster. Stable across seasons.
    pub owner_id: String,
    pub display_name: String,
    pub team_name: String,
    pub avatar: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
    /// Optimal-lineup points. Zero when the platform reports none.
    #[serde(default)]
    pub potential_points: f64,
}

impl TeamSeason {
    /// Total decided games.
    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// True when the roster's owner was found among the season's users.
    /// A departed owner keeps an `owner_id` but has no display name.
    pub fn has_manager(&self) -> bool {
        !self.owner_id.is_empty() && !self.display_name.is_empty()
    }

    /// Actual win fraction, 0.0 before any game is played.
    pub fn win_pct(&self) -> f64 {
        let games = self.games_played();
        if games == 0 {
            return 0.0;
        }
        self.wins as f64 / games as f64
    }

    /// `W-L` or `W-L-T` when ties exist.
    pub fn record_string(&self) -> String {
        if self.ties > 0 {
            format!("{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            format!("{}-{}", self.wins, self.losses)
        }
    }
}

// ---------------------------------------------------------------------------
// Weekly matchup snapshots
// ---------------------------------------------------------------------------

/// One team's line in a weekly matchup snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupEntry {
    pub roster_id: RosterId,
    /// `None` for teams on bye.
    pub matchup_id: Option<MatchupId>,
    pub points: f64,
}

impl MatchupEntry {
    /// A zero (or negative) score means the week was not played.
    pub fn has_valid_score(&self) -> bool {
        self.points > 0.0
    }
}

/// All matchup entries recorded for a single week.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeekScores {
    pub week: u32,
    pub entries: Vec<MatchupEntry>,
}

impl WeekScores {
    pub fn new(week: u32, entries: Vec<MatchupEntry>) -> Self {
        WeekScores { week, entries }
    }

    /// The entry for `roster_id`, if the team appears this week.
    pub fn entry(&self, roster_id: RosterId) -> Option<&MatchupEntry> {
        self.entries.iter().find(|e| e.roster_id == roster_id)
    }

    /// The team's score this week, only if it is a valid (nonzero) score.
    pub fn valid_score(&self, roster_id: RosterId) -> Option<f64> {
        self.entry(roster_id)
            .filter(|e| e.has_valid_score())
            .map(|e| e.points)
    }

    /// The paired opponent of `roster_id`: same matchup group, different team.
    pub fn opponent_of(&self, roster_id: RosterId) -> Option<&MatchupEntry> {
        let team = self.entry(roster_id)?;
        let group = team.matchup_id?;
        self.entries
            .iter()
            .find(|e| e.matchup_id == Some(group) && e.roster_id != roster_id)
    }

    /// Iterator over the entries with a valid score.
    pub fn valid_entries(&self) -> impl Iterator<Item = &MatchupEntry> {
        self.entries.iter().filter(|e| e.has_valid_score())
    }
}

// ---------------------------------------------------------------------------
// Playoff brackets
// ---------------------------------------------------------------------------

/// Which single-elimination bracket a matchup belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketKind {
    Winners,
    Losers,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Winners => write!(f, "winners"),
            BracketKind::Losers => write!(f, "losers"),
        }
    }
}

/// A team slot in a bracket matchup: either a seeded team or a pointer to
/// the outcome of an earlier matchup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRef {
    Team(RosterId),
    WinnerOf(MatchupId),
    LoserOf(MatchupId),
}

/// One game in a playoff bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketMatchup {
    pub round: u32,
    pub matchup_id: MatchupId,
    pub team1: Option<SlotRef>,
    pub team2: Option<SlotRef>,
    pub winner: Option<RosterId>,
    pub loser: Option<RosterId>,
    /// Which final placement this game decides (1, 3, 5), if any.
    pub placement: Option<u32>,
}

// ---------------------------------------------------------------------------
// Traded-pick ledger
// ---------------------------------------------------------------------------

/// A future draft pick that has changed hands. The ledger already reflects
/// the final owner; it is not a history to replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradedPick {
    pub season: String,
    pub round: u32,
    /// Team the pick originally belonged to.
    pub original_roster_id: RosterId,
    /// Team that holds the pick now.
    pub owner_id: RosterId,
    pub previous_owner_id: Option<RosterId>,
}

// ---------------------------------------------------------------------------
// Transactions and draft selections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Trade,
    Waiver,
    FreeAgent,
    Commissioner,
}

impl TransactionKind {
    /// Parse the platform's type string. Anything unrecognized was a
    /// commissioner action.
    pub fn from_api(kind: &str) -> Self {
        match kind {
            "trade" => TransactionKind::Trade,
            "waiver" => TransactionKind::Waiver,
            "free_agent" => TransactionKind::FreeAgent,
            _ => TransactionKind::Commissioner,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Trade => write!(f, "Trade"),
            TransactionKind::Waiver => write!(f, "Waiver"),
            TransactionKind::FreeAgent => write!(f, "Free agent"),
            TransactionKind::Commissioner => write!(f, "Commissioner"),
        }
    }
}

/// A completed roster move. Player ids map to the roster that added or
/// dropped them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    /// Milliseconds since the epoch when the move went through.
    pub completed_at: i64,
    pub roster_ids: Vec<RosterId>,
    #[serde(default)]
    pub adds: BTreeMap<String, RosterId>,
    #[serde(default)]
    pub drops: BTreeMap<String, RosterId>,
    /// FAAB bid for waiver claims.
    pub waiver_bid: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftKind {
    Startup,
    Rookie,
}

impl DraftKind {
    /// Startup drafts fill whole rosters; anything past ten rounds is one.
    pub fn from_rounds(rounds: u32) -> Self {
        if rounds > 10 {
            DraftKind::Startup
        } else {
            DraftKind::Rookie
        }
    }
}

impl fmt::Display for DraftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftKind::Startup => write!(f, "Startup"),
            DraftKind::Rookie => write!(f, "Rookie"),
        }
    }
}

/// One player taken in a league draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSelection {
    pub season: String,
    pub kind: DraftKind,
    pub round: u32,
    /// Pick number within the round, starting at 1.
    pub slot: u32,
    pub roster_id: RosterId,
    pub player_id: String,
}

// ---------------------------------------------------------------------------
// League seasons
// ---------------------------------------------------------------------------

/// Lifecycle state of a league season on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonStatus {
    PreDraft,
    Drafting,
    InSeason,
    PostSeason,
    Complete,
}

impl SeasonStatus {
    /// Parse the platform's status string. Unknown values are treated as
    /// an active season.
    pub fn from_api(status: &str) -> Self {
        match status {
            "pre_draft" => SeasonStatus::PreDraft,
            "drafting" => SeasonStatus::Drafting,
            "post_season" => SeasonStatus::PostSeason,
            "complete" => SeasonStatus::Complete,
            _ => SeasonStatus::InSeason,
        }
    }

    pub fn is_complete(&self) -> bool {
        *self == SeasonStatus::Complete
    }
}

/// One league season with everything fetched for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueSeason {
    pub league_id: String,
    /// Season year as the platform reports it ("2025").
    pub season: String,
    pub name: String,
    pub status: SeasonStatus,
    pub playoff_teams: u32,
    /// First playoff week; regular season is every week before it.
    pub playoff_week_start: u32,
    pub teams: Vec<TeamSeason>,
    /// Regular-season weeks, ascending.
    #[serde(default)]
    pub weeks: Vec<WeekScores>,
    #[serde(default)]
    pub winners_bracket: Vec<BracketMatchup>,
    #[serde(default)]
    pub losers_bracket: Vec<BracketMatchup>,
}

impl LeagueSeason {
    pub fn team(&self, roster_id: RosterId) -> Option<&TeamSeason> {
        self.teams.iter().find(|t| t.roster_id == roster_id)
    }

    /// Display name for a roster, falling back to `Team {id}`.
    pub fn team_name(&self, roster_id: RosterId) -> String {
        self.team(roster_id)
            .map(|t| t.team_name.clone())
            .unwrap_or_else(|| format!("Team {roster_id}"))
    }

    pub fn owner_of(&self, roster_id: RosterId) -> Option<&str> {
        self.team(roster_id).map(|t| t.owner_id.as_str())
    }

    pub fn roster_ids(&self) -> Vec<RosterId> {
        self.teams.iter().map(|t| t.roster_id).collect()
    }

    /// Number of regular-season weeks (`playoff_week_start - 1`).
    pub fn regular_season_weeks(&self) -> u32 {
        self.playoff_week_start.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(wins: u32, losses: u32, ties: u32) -> TeamSeason {
        TeamSeason {
            roster_id: 1,
            owner_id: "u1".into(),
            display_name: "owner".into(),
            team_name: "Team".into(),
            avatar: None,
            wins,
            losses,
            ties,
            points_for: 0.0,
            points_against: 0.0,
            potential_points: 0.0,
        }
    }

    fn entry(roster_id: RosterId, matchup_id: Option<MatchupId>, points: f64) -> MatchupEntry {
        MatchupEntry {
            roster_id,
            matchup_id,
            points,
        }
    }

    #[test]
    fn win_pct_without_games_is_zero() {
        assert_eq!(team(0, 0, 0).win_pct(), 0.0);
        assert!((team(3, 1, 0).win_pct() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn record_string_shows_ties_only_when_present() {
        assert_eq!(team(8, 6, 0).record_string(), "8-6");
        assert_eq!(team(8, 5, 1).record_string(), "8-5-1");
    }

    #[test]
    fn valid_score_skips_zero_and_missing() {
        let week = WeekScores::new(
            1,
            vec![entry(1, Some(1), 110.5), entry(2, Some(1), 0.0)],
        );
        assert_eq!(week.valid_score(1), Some(110.5));
        assert_eq!(week.valid_score(2), None);
        assert_eq!(week.valid_score(3), None);
    }

    #[test]
    fn opponent_shares_matchup_group() {
        let week = WeekScores::new(
            1,
            vec![
                entry(1, Some(1), 100.0),
                entry(2, Some(2), 90.0),
                entry(3, Some(1), 80.0),
                entry(4, None, 70.0),
            ],
        );
        assert_eq!(week.opponent_of(1).map(|e| e.roster_id), Some(3));
        assert_eq!(week.opponent_of(3).map(|e| e.roster_id), Some(1));
        assert!(week.opponent_of(2).is_none());
        assert!(week.opponent_of(4).is_none());
    }

    #[test]
    fn season_status_parses_platform_strings() {
        assert_eq!(SeasonStatus::from_api("pre_draft"), SeasonStatus::PreDraft);
        assert_eq!(SeasonStatus::from_api("complete"), SeasonStatus::Complete);
        assert_eq!(SeasonStatus::from_api("in_season"), SeasonStatus::InSeason);
        assert_eq!(SeasonStatus::from_api("something_new"), SeasonStatus::InSeason);
        assert!(SeasonStatus::Complete.is_complete());
        assert!(!SeasonStatus::PostSeason.is_complete());
    }

    #[test]
    fn league_season_lookups() {
        let season = LeagueSeason {
            league_id: "L1".into(),
            season: "2025".into(),
            name: "League".into(),
            status: SeasonStatus::InSeason,
            playoff_teams: 6,
            playoff_week_start: 15,
            teams: vec![team(3, 1, 0)],
            weeks: Vec::new(),
            winners_bracket: Vec::new(),
            losers_bracket: Vec::new(),
        };
        assert_eq!(season.team_name(1), "Team");
        assert_eq!(season.team_name(9), "Team 9");
        assert_eq!(season.owner_of(1), Some("u1"));
        assert_eq!(season.owner_of(9), None);
        assert_eq!(season.roster_ids(), vec![1]);
        assert_eq!(season.regular_season_weeks(), 14);
    }

    #[test]
    fn transaction_kinds_and_draft_kinds() {
        assert_eq!(TransactionKind::from_api("trade"), TransactionKind::Trade);
        assert_eq!(TransactionKind::from_api("free_agent"), TransactionKind::FreeAgent);
        assert_eq!(TransactionKind::from_api("something_new"), TransactionKind::Commissioner);
        assert_eq!(DraftKind::from_rounds(25), DraftKind::Startup);
        assert_eq!(DraftKind::from_rounds(10), DraftKind::Rookie);
        assert_eq!(DraftKind::from_rounds(4).to_string(), "Rookie");
    }
}
