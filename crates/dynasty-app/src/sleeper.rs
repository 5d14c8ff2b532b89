// Sleeper API wire types and their conversion into league records.
//
// Field names follow the API's JSON exactly. Everything the API may omit or
// null out is optional or defaulted, so partially populated leagues (no
// games yet, empty brackets) still decode.

use std::collections::{BTreeMap, HashMap};

use dynasty_analytics::ages::AgedPlayer;
use dynasty_core::model::{
    BracketMatchup, DraftKind, DraftSelection, MatchupEntry, RosterId, SlotRef, TeamSeason,
    TradedPick, Transaction, TransactionKind, WeekScores,
};
use serde::{Deserialize, Serialize};

/// Used when a league reports no playoff start week.
pub const DEFAULT_PLAYOFF_WEEK_START: u32 = 15;
/// Used when a league reports no playoff field size.
pub const DEFAULT_PLAYOFF_TEAMS: u32 = 6;

// ---------------------------------------------------------------------------
// League
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleeperLeague {
    pub league_id: String,
    #[serde(default)]
    pub name: String,
    /// "pre_draft", "drafting", "in_season", "complete".
    pub status: String,
    pub season: String,
    #[serde(default)]
    pub previous_league_id: Option<String>,
    #[serde(default)]
    pub total_rosters: u32,
    #[serde(default)]
    pub settings: LeagueSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueSettings {
    pub num_teams: u32,
    pub playoff_teams: u32,
    pub playoff_week_start: u32,
}

impl SleeperLeague {
    pub fn is_pre_draft(&self) -> bool {
        self.status == "pre_draft"
    }

    /// Previous season's league id. The API uses `"0"` as well as null for
    /// "none".
    pub fn previous_league(&self) -> Option<&str> {
        self.previous_league_id
            .as_deref()
            .filter(|id| !id.is_empty() && *id != "0")
    }

    pub fn playoff_week_start(&self) -> u32 {
        match self.settings.playoff_week_start {
            0 => DEFAULT_PLAYOFF_WEEK_START,
            week => week,
        }
    }

    /// Playoff field size as the league itself reports it.
    pub fn reported_playoff_teams(&self) -> Option<u32> {
        Some(self.settings.playoff_teams).filter(|&teams| teams > 0)
    }

    pub fn playoff_teams(&self) -> u32 {
        self.reported_playoff_teams().unwrap_or(DEFAULT_PLAYOFF_TEAMS)
    }
}

// ---------------------------------------------------------------------------
// Users and rosters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleeperUser {
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub metadata: Option<UserMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub team_name: Option<String>,
}

impl SleeperUser {
    /// Display name, then username, then empty.
    pub fn name(&self) -> &str {
        non_empty(self.display_name.as_deref())
            .or_else(|| non_empty(self.username.as_deref()))
            .unwrap_or("")
    }

    pub fn team_name(&self) -> Option<&str> {
        non_empty(self.metadata.as_ref().and_then(|m| m.team_name.as_deref()))
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// Team name for a roster: the owner's custom team name, then the owner's
/// display name, then `Team {id}`.
pub fn team_name(user: Option<&SleeperUser>, roster_id: RosterId) -> String {
    user.and_then(|u| u.team_name().or_else(|| non_empty(Some(u.name()))))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Team {roster_id}"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleeperRoster {
    pub roster_id: RosterId,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub players: Option<Vec<String>>,
    #[serde(default)]
    pub starters: Option<Vec<String>>,
    #[serde(default)]
    pub settings: RosterSettings,
}

/// Season totals. Points are split into an integer part and hundredths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterSettings {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub fpts: f64,
    pub fpts_decimal: f64,
    pub fpts_against: f64,
    pub fpts_against_decimal: f64,
    pub ppts: f64,
    pub ppts_decimal: f64,
}

fn join_decimal(whole: f64, hundredths: f64) -> f64 {
    whole + hundredths / 100.0
}

impl RosterSettings {
    pub fn points_for(&self) -> f64 {
        join_decimal(self.fpts, self.fpts_decimal)
    }

    pub fn points_against(&self) -> f64 {
        join_decimal(self.fpts_against, self.fpts_against_decimal)
    }

    pub fn potential_points(&self) -> f64 {
        join_decimal(self.ppts, self.ppts_decimal)
    }
}

/// Join rosters with their owners into team-season records, roster order.
pub fn to_team_seasons(rosters: &[SleeperRoster], users: &[SleeperUser]) -> Vec<TeamSeason> {
    let by_id: HashMap<&str, &SleeperUser> = users.iter().map(|u| (u.user_id.as_str(), u)).collect();

    rosters
        .iter()
        .map(|r| {
            let owner_id = r.owner_id.clone().unwrap_or_default();
            let user = by_id.get(owner_id.as_str()).copied();
            TeamSeason {
                roster_id: r.roster_id,
                display_name: user.map(|u| u.name().to_string()).unwrap_or_default(),
                team_name: team_name(user, r.roster_id),
                avatar: user.and_then(|u| u.avatar.clone()),
                owner_id,
                wins: r.settings.wins,
                losses: r.settings.losses,
                ties: r.settings.ties,
                points_for: r.settings.points_for(),
                points_against: r.settings.points_against(),
                potential_points: r.settings.potential_points(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Matchups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleeperMatchup {
    pub roster_id: RosterId,
    #[serde(default)]
    pub matchup_id: Option<u32>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub starters: Option<Vec<String>>,
    #[serde(default)]
    pub players: Option<Vec<String>>,
}

pub fn to_week_scores(week: u32, matchups: &[SleeperMatchup]) -> WeekScores {
    WeekScores::new(
        week,
        matchups
            .iter()
            .map(|m| MatchupEntry {
                roster_id: m.roster_id,
                matchup_id: m.matchup_id,
                points: m.points.unwrap_or(0.0),
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Traded picks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleeperTradedPick {
    pub season: String,
    pub round: u32,
    /// The roster the pick originally belonged to.
    pub roster_id: RosterId,
    #[serde(default)]
    pub previous_owner_id: Option<RosterId>,
    pub owner_id: RosterId,
}

pub fn to_traded_picks(picks: &[SleeperTradedPick]) -> Vec<TradedPick> {
    picks
        .iter()
        .map(|p| TradedPick {
            season: p.season.clone(),
            round: p.round,
            original_roster_id: p.roster_id,
            owner_id: p.owner_id,
            previous_owner_id: p.previous_owner_id,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Brackets
// ---------------------------------------------------------------------------

/// `{ "w": 3 }` or `{ "l": 3 }`: the winner or loser of matchup 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSource {
    #[serde(default)]
    pub w: Option<u32>,
    #[serde(default)]
    pub l: Option<u32>,
}

impl SlotSource {
    fn to_slot(self) -> Option<SlotRef> {
        match (self.w, self.l) {
            (Some(m), _) => Some(SlotRef::WinnerOf(m)),
            (None, Some(m)) => Some(SlotRef::LoserOf(m)),
            (None, None) => None,
        }
    }
}

/// A bracket slot is a roster id once known, or a pointer to an earlier game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireSlot {
    Roster(RosterId),
    From(SlotSource),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleeperBracketMatchup {
    pub r: u32,
    pub m: u32,
    #[serde(default)]
    pub t1: Option<WireSlot>,
    #[serde(default)]
    pub t2: Option<WireSlot>,
    #[serde(default)]
    pub w: Option<RosterId>,
    #[serde(default)]
    pub l: Option<RosterId>,
    #[serde(default)]
    pub p: Option<u32>,
    #[serde(default)]
    pub t1_from: Option<SlotSource>,
    #[serde(default)]
    pub t2_from: Option<SlotSource>,
}

/// A known roster wins; otherwise fall back to the feeder reference.
fn resolve_wire_slot(slot: Option<WireSlot>, from: Option<SlotSource>) -> Option<SlotRef> {
    match slot {
        Some(WireSlot::Roster(id)) => Some(SlotRef::Team(id)),
        Some(WireSlot::From(src)) => src.to_slot().or_else(|| from.and_then(SlotSource::to_slot)),
        None => from.and_then(SlotSource::to_slot),
    }
}

pub fn to_bracket(matchups: &[SleeperBracketMatchup]) -> Vec<BracketMatchup> {
    matchups
        .iter()
        .map(|m| BracketMatchup {
            round: m.r,
            matchup_id: m.m,
            team1: resolve_wire_slot(m.t1, m.t1_from),
            team2: resolve_wire_slot(m.t2, m.t2_from),
            winner: m.w,
            loser: m.l,
            placement: m.p,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleeperTransaction {
    pub transaction_id: String,
    /// "trade", "waiver", "free_agent" or "commissioner".
    #[serde(rename = "type")]
    pub kind: String,
    /// "complete", "failed", "pending".
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub status_updated: i64,
    #[serde(default)]
    pub roster_ids: Vec<RosterId>,
    #[serde(default)]
    pub adds: Option<BTreeMap<String, RosterId>>,
    #[serde(default)]
    pub drops: Option<BTreeMap<String, RosterId>>,
    #[serde(default)]
    pub settings: Option<TransactionSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionSettings {
    pub waiver_bid: Option<u32>,
}

impl SleeperTransaction {
    pub fn is_complete(&self) -> bool {
        self.status == "complete"
    }
}

/// Completed transactions only, newest first. Failed waiver claims and
/// pending trades never moved anyone.
pub fn to_transactions(raw: &[SleeperTransaction]) -> Vec<Transaction> {
    let mut transactions: Vec<Transaction> = raw
        .iter()
        .filter(|t| t.is_complete())
        .map(|t| Transaction {
            id: t.transaction_id.clone(),
            kind: TransactionKind::from_api(&t.kind),
            completed_at: t.status_updated,
            roster_ids: t.roster_ids.clone(),
            adds: t.adds.clone().unwrap_or_default(),
            drops: t.drops.clone().unwrap_or_default(),
            waiver_bid: t.settings.as_ref().and_then(|s| s.waiver_bid),
        })
        .collect();
    transactions.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    transactions
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleeperDraft {
    pub draft_id: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub settings: DraftSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftSettings {
    pub rounds: u32,
    pub teams: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleeperDraftPick {
    pub round: u32,
    /// Overall pick number, starting at 1.
    pub pick_no: u32,
    #[serde(default)]
    pub roster_id: Option<RosterId>,
    #[serde(default)]
    pub player_id: Option<String>,
}

/// Selections from one draft. Picks without a player or roster (an
/// unfinished draft) are skipped.
pub fn to_draft_selections(draft: &SleeperDraft, picks: &[SleeperDraftPick]) -> Vec<DraftSelection> {
    let kind = DraftKind::from_rounds(draft.settings.rounds);
    let teams = draft.settings.teams;
    picks
        .iter()
        .filter_map(|p| {
            let player_id = p.player_id.clone().filter(|id| !id.is_empty())?;
            let roster_id = p.roster_id?;
            let slot = match teams {
                0 => p.pick_no,
                n => (p.pick_no.saturating_sub(1) % n) + 1,
            };
            Some(DraftSelection {
                season: draft.season.clone(),
                kind,
                round: p.round,
                slot,
                roster_id,
                player_id,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleeperPlayer {
    pub player_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub team: Option<String>,
    pub age: Option<f64>,
}

impl AgedPlayer for SleeperPlayer {
    fn position(&self) -> Option<&str> {
        self.position.as_deref()
    }

    fn age(&self) -> Option<f64> {
        self.age
    }
}

impl SleeperPlayer {
    /// Full name, else "First Last". `None` if the record has neither.
    pub fn name(&self) -> Option<String> {
        if let Some(full) = non_empty(self.full_name.as_deref()) {
            return Some(full.to_string());
        }
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}
