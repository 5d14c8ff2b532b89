// Historical records across league seasons: matchup pairing, league-wide
// records and streaks, head-to-head, all-time standings, champion history.

use std::collections::{BTreeMap, HashMap, HashSet};

use dynasty_core::model::{LeagueSeason, RosterId, TeamSeason, WeekScores};
use serde::Serialize;
use tracing::debug;

use crate::bracket;
use crate::standings::build_standings;

// ---------------------------------------------------------------------------
// Matchup pairing
// ---------------------------------------------------------------------------

/// One side of a played (or scheduled) game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairSide {
    pub roster_id: RosterId,
    /// Empty when the roster has no owner.
    pub owner_id: String,
    pub team_name: String,
    pub score: f64,
}

/// Two teams that met in a given week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupPair {
    pub season: String,
    pub week: u32,
    pub team1: PairSide,
    pub team2: PairSide,
}

impl MatchupPair {
    /// Both teams posted a nonzero score.
    pub fn both_scored(&self) -> bool {
        self.team1.score > 0.0 && self.team2.score > 0.0
    }

    /// Neither team has scored yet: the game has not been played.
    pub fn unplayed(&self) -> bool {
        self.team1.score == 0.0 && self.team2.score == 0.0
    }

    pub fn margin(&self) -> f64 {
        (self.team1.score - self.team2.score).abs()
    }

    /// (higher scorer, lower scorer). Team 2 is listed first on a tie.
    pub fn winner_and_loser(&self) -> (&PairSide, &PairSide) {
        if self.team1.score > self.team2.score {
            (&self.team1, &self.team2)
        } else {
            (&self.team2, &self.team1)
        }
    }
}

fn pair_side(season: &LeagueSeason, roster_id: RosterId, score: f64) -> PairSide {
    PairSide {
        roster_id,
        owner_id: season.owner_of(roster_id).unwrap_or_default().to_string(),
        team_name: season.team_name(roster_id),
        score,
    }
}

/// Pair the entries of one week by matchup group, first-seen order.
/// Entries without a group or without an opponent are skipped.
pub fn pair_matchups(season: &LeagueSeason, week: &WeekScores) -> Vec<MatchupPair> {
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();

    for entry in &week.entries {
        let Some(group) = entry.matchup_id else {
            continue;
        };
        if seen.contains(&group) {
            continue;
        }
        let Some(opponent) = week.opponent_of(entry.roster_id) else {
            continue;
        };
        seen.insert(group);

        pairs.push(MatchupPair {
            season: season.season.clone(),
            week: week.week,
            team1: pair_side(season, entry.roster_id, entry.points),
            team2: pair_side(season, opponent.roster_id, opponent.points),
        });
    }

    pairs
}

/// Every pair from every season's recorded weeks.
pub fn history_matchup_pairs(history: &[LeagueSeason]) -> Vec<MatchupPair> {
    history
        .iter()
        .flat_map(|season| season.weeks.iter().flat_map(move |week| pair_matchups(season, week)))
        .collect()
}

/// A single team's score in a single week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyScore {
    pub season: String,
    pub week: u32,
    pub roster_id: RosterId,
    pub team_name: String,
    pub score: f64,
}

pub fn history_weekly_scores(history: &[LeagueSeason]) -> Vec<WeeklyScore> {
    let mut scores = Vec::new();
    for season in history {
        for week in &season.weeks {
            for entry in &week.entries {
                scores.push(WeeklyScore {
                    season: season.season.clone(),
                    week: week.week,
                    roster_id: entry.roster_id,
                    team_name: season.team_name(entry.roster_id),
                    score: entry.points,
                });
            }
        }
    }
    scores
}

// ---------------------------------------------------------------------------
// League records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    HighestWeeklyScore,
    LowestWeeklyScore,
    BiggestBlowout,
    ClosestGame,
    LongestWinStreak,
    LongestLosingStreak,
}

impl RecordKind {
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::HighestWeeklyScore => "Highest Weekly Score",
            RecordKind::LowestWeeklyScore => "Lowest Weekly Score",
            RecordKind::BiggestBlowout => "Biggest Blowout",
            RecordKind::ClosestGame => "Closest Game",
            RecordKind::LongestWinStreak => "Longest Win Streak",
            RecordKind::LongestLosingStreak => "Longest Losing Streak",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueRecord {
    pub kind: RecordKind,
    /// Points for score and margin records, games for streaks.
    pub value: f64,
    /// Team name, or "Winner over Loser" for game records.
    pub team: String,
    /// `None` for all-time streaks.
    pub season: Option<String>,
    pub week: Option<u32>,
}

impl LeagueRecord {
    fn game(kind: RecordKind, pair: &MatchupPair) -> Self {
        let (winner, loser) = pair.winner_and_loser();
        LeagueRecord {
            kind,
            value: pair.margin(),
            team: format!("{} over {}", winner.team_name, loser.team_name),
            season: Some(pair.season.clone()),
            week: Some(pair.week),
        }
    }

    fn score(kind: RecordKind, score: &WeeklyScore) -> Self {
        LeagueRecord {
            kind,
            value: score.score,
            team: score.team_name.clone(),
            season: Some(score.season.clone()),
            week: Some(score.week),
        }
    }

    /// Value formatted for display.
    pub fn display_value(&self) -> String {
        match self.kind {
            RecordKind::HighestWeeklyScore | RecordKind::LowestWeeklyScore => {
                format!("{:.2}", self.value)
            }
            RecordKind::BiggestBlowout | RecordKind::ClosestGame => format!("{:.2} pts", self.value),
            RecordKind::LongestWinStreak | RecordKind::LongestLosingStreak => {
                format!("{} games", self.value as u32)
            }
        }
    }
}

/// Longest streaks for one manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Streaks {
    win: u32,
    lose: u32,
}

/// Walk results in order. A tie extends the losing streak.
fn longest_streaks(results: &[bool]) -> Streaks {
    let (mut win, mut lose) = (0u32, 0u32);
    let mut best = Streaks::default();
    for &won in results {
        if won {
            win += 1;
            lose = 0;
        } else {
            lose += 1;
            win = 0;
        }
        best.win = best.win.max(win);
        best.lose = best.lose.max(lose);
    }
    best
}

struct ManagerGame<'a> {
    season: &'a str,
    week: u32,
    won: bool,
}

fn streak_records(pairs: &[MatchupPair]) -> Vec<LeagueRecord> {
    // Keyed by owner id (team name for ownerless rosters). BTreeMap keeps
    // tie resolution independent of hash order.
    let mut games: BTreeMap<&str, (Vec<ManagerGame<'_>>, &str)> = BTreeMap::new();

    for pair in pairs.iter().filter(|p| !p.unplayed()) {
        for (side, other) in [(&pair.team1, &pair.team2), (&pair.team2, &pair.team1)] {
            let key = if side.owner_id.is_empty() {
                side.team_name.as_str()
            } else {
                side.owner_id.as_str()
            };
            let slot = games.entry(key).or_insert_with(|| (Vec::new(), side.team_name.as_str()));
            slot.0.push(ManagerGame {
                season: &pair.season,
                week: pair.week,
                won: side.score > other.score,
            });
        }
    }

    let mut longest_win: Option<(u32, &str)> = None;
    let mut longest_lose: Option<(u32, &str)> = None;

    for (results, name) in games.values_mut() {
        results.sort_by(|a, b| a.season.cmp(b.season).then(a.week.cmp(&b.week)));
        let outcomes: Vec<bool> = results.iter().map(|g| g.won).collect();
        let streaks = longest_streaks(&outcomes);

        if streaks.win > longest_win.map_or(0, |(n, _)| n) {
            longest_win = Some((streaks.win, *name));
        }
        if streaks.lose > longest_lose.map_or(0, |(n, _)| n) {
            longest_lose = Some((streaks.lose, *name));
        }
    }

    let streak = |kind, (count, name): (u32, &str)| LeagueRecord {
        kind,
        value: count as f64,
        team: name.to_string(),
        season: None,
        week: None,
    };

    longest_win
        .map(|s| streak(RecordKind::LongestWinStreak, s))
        .into_iter()
        .chain(longest_lose.map(|s| streak(RecordKind::LongestLosingStreak, s)))
        .collect()
}

/// League-wide records. Earlier entries win ties.
///
/// The lowest score ignores zero weeks. Blowout and closest game only
/// consider pairs where both teams scored; the closest game also skips
/// exact ties.
pub fn compute_league_records(pairs: &[MatchupPair], scores: &[WeeklyScore]) -> Vec<LeagueRecord> {
    let mut records = Vec::new();

    let highest = scores.iter().reduce(|best, s| if s.score > best.score { s } else { best });
    if let Some(highest) = highest {
        records.push(LeagueRecord::score(RecordKind::HighestWeeklyScore, highest));

        let lowest = scores
            .iter()
            .filter(|s| s.score > 0.0)
            .reduce(|worst, s| if s.score < worst.score { s } else { worst });
        if let Some(lowest) = lowest {
            records.push(LeagueRecord::score(RecordKind::LowestWeeklyScore, lowest));
        }
    }

    let scored: Vec<&MatchupPair> = pairs.iter().filter(|p| p.both_scored()).collect();
    let biggest = scored
        .iter()
        .copied()
        .reduce(|best, p| if p.margin() > best.margin() { p } else { best });
    if let Some(biggest) = biggest {
        records.push(LeagueRecord::game(RecordKind::BiggestBlowout, biggest));
    }
    let closest = scored
        .iter()
        .copied()
        .filter(|p| p.margin() > 0.0)
        .reduce(|best, p| if p.margin() < best.margin() { p } else { best });
    if let Some(closest) = closest {
        records.push(LeagueRecord::game(RecordKind::ClosestGame, closest));
    }

    records.extend(streak_records(pairs));

    debug!(
        pairs = pairs.len(),
        scores = scores.len(),
        records = records.len(),
        "computed league records"
    );
    records
}

// ---------------------------------------------------------------------------
// Head-to-head
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct H2HSide {
    pub owner_id: String,
    pub name: String,
    pub wins: u32,
    pub total_points: f64,
    pub avg_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum H2HOutcome {
    Manager1,
    Manager2,
    Tie,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct H2HGame {
    pub season: String,
    pub week: u32,
    pub score1: f64,
    pub score2: f64,
    pub outcome: H2HOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHead {
    pub manager1: H2HSide,
    pub manager2: H2HSide,
    pub ties: u32,
    pub total_games: u32,
    pub games: Vec<H2HGame>,
}

/// Every meeting between two managers (by owner id), in pair order.
/// Unplayed games are left out.
pub fn compute_head_to_head(
    manager1: (&str, &str),
    manager2: (&str, &str),
    pairs: &[MatchupPair],
) -> HeadToHead {
    let (m1_id, m1_name) = manager1;
    let (m2_id, m2_name) = manager2;

    let mut games = Vec::new();
    let (mut m1_wins, mut m2_wins, mut ties) = (0u32, 0u32, 0u32);
    let (mut m1_points, mut m2_points) = (0.0f64, 0.0f64);

    for pair in pairs.iter().filter(|p| !p.unplayed()) {
        let (score1, score2) = if pair.team1.owner_id == m1_id && pair.team2.owner_id == m2_id {
            (pair.team1.score, pair.team2.score)
        } else if pair.team1.owner_id == m2_id && pair.team2.owner_id == m1_id {
            (pair.team2.score, pair.team1.score)
        } else {
            continue;
        };

        m1_points += score1;
        m2_points += score2;
        let outcome = if score1 > score2 {
            m1_wins += 1;
            H2HOutcome::Manager1
        } else if score2 > score1 {
            m2_wins += 1;
            H2HOutcome::Manager2
        } else {
            ties += 1;
            H2HOutcome::Tie
        };

        games.push(H2HGame {
            season: pair.season.clone(),
            week: pair.week,
            score1,
            score2,
            outcome,
        });
    }

    let total_games = m1_wins + m2_wins + ties;
    let avg = |points: f64| {
        if total_games > 0 {
            points / total_games as f64
        } else {
            0.0
        }
    };

    HeadToHead {
        manager1: H2HSide {
            owner_id: m1_id.to_string(),
            name: m1_name.to_string(),
            wins: m1_wins,
            total_points: m1_points,
            avg_score: avg(m1_points),
        },
        manager2: H2HSide {
            owner_id: m2_id.to_string(),
            name: m2_name.to_string(),
            wins: m2_wins,
            total_points: m2_points,
            avg_score: avg(m2_points),
        },
        ties,
        total_games,
        games,
    }
}

// ---------------------------------------------------------------------------
// All-time standings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonResult {
    pub season: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
    /// Regular-season standings finish, 1-based.
    pub finish: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllTimeStanding {
    pub manager_id: String,
    /// Most recent display name.
    pub display_name: String,
    pub avatar: Option<String>,
    pub seasons_played: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub total_ties: u32,
    pub total_points_for: f64,
    pub total_points_against: f64,
    pub championships: u32,
    pub playoff_appearances: u32,
    pub best_finish: usize,
    pub season_results: Vec<SeasonResult>,
}

impl AllTimeStanding {
    fn new(manager_id: &str) -> Self {
        AllTimeStanding {
            manager_id: manager_id.to_string(),
            display_name: String::new(),
            avatar: None,
            seasons_played: 0,
            total_wins: 0,
            total_losses: 0,
            total_ties: 0,
            total_points_for: 0.0,
            total_points_against: 0.0,
            championships: 0,
            playoff_appearances: 0,
            best_finish: usize::MAX,
            season_results: Vec::new(),
        }
    }

    pub fn win_pct(&self) -> f64 {
        let games = self.total_wins + self.total_losses + self.total_ties;
        if games == 0 {
            return 0.0;
        }
        self.total_wins as f64 / games as f64
    }
}

/// Aggregate every manager's seasons.
///
/// Finish is the regular-season standings position; a finish within the
/// season's playoff field counts as a playoff appearance. `champions` maps
/// season to the champion's roster id. Rosters whose owner cannot be
/// resolved to a league user are skipped.
/// Sorted by total wins, then total points-for.
pub fn compute_all_time_standings(
    history: &[LeagueSeason],
    champions: &HashMap<String, RosterId>,
) -> Vec<AllTimeStanding> {
    let mut ordered: Vec<&LeagueSeason> = history.iter().collect();
    ordered.sort_by(|a, b| a.season.cmp(&b.season));

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut managers: Vec<AllTimeStanding> = Vec::new();

    for season in ordered {
        let champion = champions.get(&season.season).copied();
        for entry in build_standings(&season.teams) {
            if !season.team(entry.roster_id).is_some_and(TeamSeason::has_manager) {
                continue;
            }
            let slot = *index.entry(entry.owner_id.clone()).or_insert_with(|| {
                managers.push(AllTimeStanding::new(&entry.owner_id));
                managers.len() - 1
            });
            let manager = &mut managers[slot];

            manager.seasons_played += 1;
            manager.total_wins += entry.wins;
            manager.total_losses += entry.losses;
            manager.total_ties += entry.ties;
            manager.total_points_for += entry.points_for;
            manager.total_points_against += entry.points_against;
            if champion == Some(entry.roster_id) {
                manager.championships += 1;
            }
            if entry.rank <= season.playoff_teams as usize {
                manager.playoff_appearances += 1;
            }
            manager.best_finish = manager.best_finish.min(entry.rank);
            manager.display_name = entry.display_name.clone();
            manager.avatar = season.team(entry.roster_id).and_then(|t| t.avatar.clone());

            manager.season_results.push(SeasonResult {
                season: season.season.clone(),
                wins: entry.wins,
                losses: entry.losses,
                ties: entry.ties,
                points_for: entry.points_for,
                points_against: entry.points_against,
                finish: entry.rank,
            });
        }
    }

    managers.sort_by(|a, b| {
        b.total_wins.cmp(&a.total_wins).then_with(|| {
            b.total_points_for
                .partial_cmp(&a.total_points_for)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });
    managers
}

// ---------------------------------------------------------------------------
// Champion history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finalist {
    pub roster_id: RosterId,
    pub name: String,
    pub avatar: Option<String>,
    /// Regular-season record, empty if the roster is unknown.
    pub record: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionEntry {
    pub season: String,
    pub league_id: String,
    pub champion: Finalist,
    pub runner_up: Option<Finalist>,
}

fn finalist(season: &LeagueSeason, roster_id: RosterId) -> Finalist {
    let team = season.team(roster_id);
    Finalist {
        roster_id,
        name: season.team_name(roster_id),
        avatar: team.and_then(|t| t.avatar.clone()),
        record: team.map(|t| t.record_string()).unwrap_or_default(),
    }
}

/// Champions of completed seasons, oldest first. Seasons whose bracket has
/// no decided championship game are left out.
pub fn compute_champion_history(history: &[LeagueSeason]) -> Vec<ChampionEntry> {
    let mut entries: Vec<ChampionEntry> = history
        .iter()
        .filter(|s| s.status.is_complete())
        .filter_map(|season| {
            let champion = bracket::champion(&season.winners_bracket)?;
            Some(ChampionEntry {
                season: season.season.clone(),
                league_id: season.league_id.clone(),
                champion: finalist(season, champion),
                runner_up: bracket::runner_up(&season.winners_bracket)
                    .map(|id| finalist(season, id)),
            })
        })
        .collect();
    entries.sort_by(|a, b| a.season.cmp(&b.season));
    entries
}

/// Season -> champion roster id, for the all-time standings.
pub fn champion_map(champions: &[ChampionEntry]) -> HashMap<String, RosterId> {
    champions
        .iter()
        .map(|c| (c.season.clone(), c.champion.roster_id))
        .collect()
}
