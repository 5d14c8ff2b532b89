// Plain-text league report.
//
// `build_report` runs every calculator over the loaded data; the render
// functions turn the result into fixed-width text sections.

use std::collections::HashMap;

use dynasty_analytics::acquisition::{acquisition_mix, trace_acquisitions};
use dynasty_analytics::ages::{compute_position_ages, PositionAge};
use dynasty_analytics::awards::{compute_season_awards, SeasonAward};
use dynasty_analytics::bracket::{resolve_playoffs, BracketRound, PlayoffOutcome};
use dynasty_analytics::picks::{
    compute_pick_capital, resolve_pick_ownership, upcoming_seasons, PickOwnership, PickStatus,
    TeamPickCapital,
};
use dynasty_analytics::power::{
    attach_previous_ranks, compute_insights, compute_league_power_rankings, LeagueInsights,
    PowerRanking,
};
use dynasty_analytics::records::{
    champion_map, compute_all_time_standings, compute_champion_history, compute_league_records,
    history_matchup_pairs, history_weekly_scores, AllTimeStanding, ChampionEntry, LeagueRecord,
};
use dynasty_analytics::standings::{build_standings, leader, StandingsEntry};
use dynasty_core::config::Config;
use dynasty_core::model::{LeagueSeason, RosterId};
use tracing::debug;

use crate::fetch::{LeagueActivity, SeasonBundle};
use crate::players::{player_name, PlayerDirectory};

// ---------------------------------------------------------------------------
// Report data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LeagueReport {
    pub league_name: String,
    pub season: String,
    pub team_names: HashMap<RosterId, String>,
    pub standings: Vec<StandingsEntry>,
    pub rankings: Vec<PowerRanking>,
    pub insights: Option<LeagueInsights>,
    pub playoffs: PlayoffOutcome,
    pub pick_seasons: Vec<String>,
    pub picks: Vec<PickOwnership>,
    pub capital: Vec<TeamPickCapital>,
    /// Starting lineups by name, when requested.
    pub lineups: Option<Vec<(RosterId, Vec<String>)>>,
    /// Awards for each season covered, newest first.
    pub awards: Vec<SeasonAwards>,
    /// Per-team roster breakdowns, when requested.
    pub rosters: Option<Vec<RosterReport>>,
    pub history: Option<HistoryReport>,
}

#[derive(Debug, Clone)]
pub struct SeasonAwards {
    pub season: String,
    pub awards: Vec<SeasonAward>,
}

#[derive(Debug, Clone)]
pub struct RosterReport {
    pub roster_id: RosterId,
    pub ages: Vec<PositionAge>,
    pub players: Vec<RosteredPlayer>,
    /// Acquisition counts by source, empty without league activity.
    pub mix: Vec<(&'static str, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RosteredPlayer {
    pub name: String,
    pub position: String,
    /// How the player joined the team, when league activity was loaded.
    pub acquired: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HistoryReport {
    pub champions: Vec<ChampionEntry>,
    pub records: Vec<LeagueRecord>,
    pub all_time: Vec<AllTimeStanding>,
}

impl LeagueReport {
    fn name(&self, roster_id: RosterId) -> String {
        self.team_names
            .get(&roster_id)
            .cloned()
            .unwrap_or_else(|| format!("Team {roster_id}"))
    }
}

/// Weeks with at least one valid score.
fn played_weeks(season: &LeagueSeason) -> usize {
    season
        .weeks
        .iter()
        .filter(|w| w.valid_entries().next().is_some())
        .count()
}

/// Run every calculator over the current season and, if given, the full
/// league history (newest first, current season included). Roster sections
/// need the player directory; acquisitions also need `activity`.
pub fn build_report(
    bundle: &SeasonBundle,
    history: &[LeagueSeason],
    players: Option<&PlayerDirectory>,
    activity: Option<&LeagueActivity>,
    config: &Config,
) -> LeagueReport {
    let season = &bundle.season;
    let team_names = season
        .teams
        .iter()
        .map(|t| (t.roster_id, t.team_name.clone()))
        .collect();

    let standings = build_standings(&season.teams);

    let mut rankings = compute_league_power_rankings(&season.teams, &season.weeks, &config.analytics);
    let played = played_weeks(season);
    if played >= 2 {
        let previous =
            compute_league_power_rankings(&season.teams, &season.weeks[..played - 1], &config.analytics);
        attach_previous_ranks(&mut rankings, &previous);
    }
    let insights = compute_insights(&rankings);

    let playoff_teams = bundle
        .reported_playoff_teams
        .unwrap_or(config.league.playoff_teams);
    let playoffs = resolve_playoffs(&season.winners_bracket, &season.losers_bracket, playoff_teams);

    let roster_ids = season.roster_ids();
    let pick_seasons = upcoming_seasons(&season.season, config.draft.future_seasons);
    let picks = resolve_pick_ownership(&bundle.traded_picks, &roster_ids, &pick_seasons, config.draft.rounds);
    let capital = compute_pick_capital(&picks, &roster_ids);

    let lineups = match (config.report.include_rosters, players) {
        (true, Some(players)) => Some(
            roster_ids
                .iter()
                .map(|id| {
                    let names = bundle
                        .starters
                        .get(id)
                        .map(|ids| ids.iter().map(|p| player_name(players, p)).collect())
                        .unwrap_or_default();
                    (*id, names)
                })
                .collect(),
        ),
        _ => None,
    };

    let rosters = match (config.report.include_rosters, players) {
        (true, Some(players)) => Some(build_rosters(bundle, players, activity)),
        _ => None,
    };

    let award_seasons = if history.is_empty() {
        std::slice::from_ref(season)
    } else {
        history
    };
    let awards = award_seasons
        .iter()
        .map(|s| SeasonAwards {
            season: s.season.clone(),
            awards: compute_season_awards(s),
        })
        .collect();

    let history = (!history.is_empty()).then(|| build_history(history));

    debug!(
        teams = season.teams.len(),
        picks = picks.len(),
        history = history.is_some(),
        "report built"
    );

    LeagueReport {
        league_name: season.name.clone(),
        season: season.season.clone(),
        team_names,
        standings,
        rankings,
        insights,
        playoffs,
        pick_seasons,
        picks,
        capital,
        lineups,
        awards,
        rosters,
        history,
    }
}

fn build_rosters(
    bundle: &SeasonBundle,
    players: &PlayerDirectory,
    activity: Option<&LeagueActivity>,
) -> Vec<RosterReport> {
    let season = &bundle.season;
    let roster_ids = season.roster_ids();
    let league: Vec<Vec<String>> = roster_ids
        .iter()
        .map(|id| bundle.roster_players.get(id).cloned().unwrap_or_default())
        .collect();

    roster_ids
        .iter()
        .zip(&league)
        .map(|(&roster_id, ids)| {
            let acquisitions = activity.map(|a| {
                trace_acquisitions(roster_id, ids, &a.transactions, &a.selections)
            });
            let rostered = ids
                .iter()
                .enumerate()
                .map(|(i, id)| RosteredPlayer {
                    name: player_name(players, id),
                    position: players
                        .get(id)
                        .and_then(|p| p.position.clone())
                        .unwrap_or_else(|| "?".to_string()),
                    acquired: acquisitions
                        .as_ref()
                        .and_then(|list| list.get(i))
                        .map(|a| a.describe(|from| season.team_name(from))),
                })
                .collect();
            RosterReport {
                roster_id,
                ages: compute_position_ages(ids, &league, players),
                players: rostered,
                mix: acquisitions.as_deref().map(acquisition_mix).unwrap_or_default(),
            }
        })
        .collect()
}

fn build_history(history: &[LeagueSeason]) -> HistoryReport {
    let champions = compute_champion_history(history);
    let records = compute_league_records(&history_matchup_pairs(history), &history_weekly_scores(history));
    let all_time = compute_all_time_standings(history, &champion_map(&champions));
    HistoryReport {
        champions,
        records,
        all_time,
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn render_report(report: &LeagueReport) -> String {
    let mut out = String::with_capacity(8192);
    out.push_str(&format!("{} -- {} season\n\n", report.league_name, report.season));
    out.push_str(&render_standings(report));
    out.push('\n');
    out.push_str(&render_power_rankings(report));
    out.push('\n');
    out.push_str(&render_playoffs(report));
    out.push('\n');
    out.push_str(&render_draft_picks(report));
    if let Some(lineups) = &report.lineups {
        out.push('\n');
        out.push_str(&render_lineups(report, lineups));
    }
    if let Some(rosters) = &report.rosters {
        out.push('\n');
        out.push_str(&render_rosters(report, rosters));
    }
    out.push('\n');
    out.push_str(&render_awards(&report.awards));
    if let Some(history) = &report.history {
        out.push('\n');
        out.push_str(&render_history(history));
    }
    out
}

pub fn render_standings(report: &LeagueReport) -> String {
    let mut out = String::from("## STANDINGS\n");
    out.push_str(&format!(
        "{:>3}  {:<28} {:>8} {:>9} {:>9}\n",
        "#", "Team", "Record", "PF", "PA"
    ));
    for e in &report.standings {
        let record = if e.ties > 0 {
            format!("{}-{}-{}", e.wins, e.losses, e.ties)
        } else {
            format!("{}-{}", e.wins, e.losses)
        };
        out.push_str(&format!(
            "{:>3}  {:<28} {:>8} {:>9.2} {:>9.2}\n",
            e.rank, e.team_name, record, e.points_for, e.points_against
        ));
    }
    out
}

fn movement_str(r: &PowerRanking) -> String {
    match r.movement() {
        Some(m) if m > 0 => format!("+{m}"),
        Some(m) if m < 0 => m.to_string(),
        Some(_) => "=".to_string(),
        None => String::new(),
    }
}

pub fn render_power_rankings(report: &LeagueReport) -> String {
    let mut out = String::from("## POWER RANKINGS\n");
    out.push_str(&format!(
        "{:>3} {:>3}  {:<28} {:>6}  {:<10} {:>7} {:>6} {:>6} {:>5} {:>6}\n",
        "#", "+/-", "Team", "Score", "Tier", "All-Play", "Luck", "SOS", "Cons", "Form"
    ));
    for r in &report.rankings {
        out.push_str(&format!(
            "{:>3} {:>3}  {:<28} {:>6.1}  {:<10} {:>3}-{:<4} {:>+6.3} {:>6} {:>5.0} {:>5.1}{}\n",
            r.rank,
            movement_str(r),
            r.team_name,
            r.power_score,
            r.tier.label(),
            r.all_play.wins,
            r.all_play.losses,
            r.metrics.luck_index,
            r.metrics.sos.rank,
            r.metrics.consistency.rating,
            r.metrics.recent_form.avg,
            r.metrics.recent_form.trend.symbol(),
        ));
    }

    if let Some(i) = &report.insights {
        out.push_str("\nInsights:\n");
        out.push_str(&format!("  Luckiest:         {}\n", report.name(i.luckiest)));
        out.push_str(&format!("  Unluckiest:       {}\n", report.name(i.unluckiest)));
        out.push_str(&format!("  Most consistent:  {}\n", report.name(i.most_consistent)));
        out.push_str(&format!("  Most volatile:    {}\n", report.name(i.most_volatile)));
        out.push_str(&format!("  Hardest schedule: {}\n", report.name(i.hardest_schedule)));
        out.push_str(&format!("  Easiest schedule: {}\n", report.name(i.easiest_schedule)));
    }
    out
}

fn slot_name(report: &LeagueReport, slot: Option<RosterId>) -> String {
    slot.map(|id| report.name(id)).unwrap_or_else(|| "TBD".to_string())
}

fn render_rounds(report: &LeagueReport, title: &str, rounds: &[BracketRound], out: &mut String) {
    if rounds.is_empty() {
        return;
    }
    out.push_str(&format!("{title}:\n"));
    for round in rounds {
        out.push_str(&format!("  {}\n", round.label));
        for m in &round.matchups {
            let result = match m.winner {
                Some(w) => format!("  -> {}", report.name(w)),
                None => String::new(),
            };
            out.push_str(&format!(
                "    {} vs {}{}\n",
                slot_name(report, m.team1),
                slot_name(report, m.team2),
                result
            ));
        }
    }
}

pub fn render_playoffs(report: &LeagueReport) -> String {
    let mut out = String::from("## PLAYOFFS\n");
    let playoffs = &report.playoffs;

    match playoffs.champion {
        Some(champ) => {
            out.push_str(&format!("Champion:  {}\n", report.name(champ)));
            if let Some(ru) = playoffs.runner_up {
                out.push_str(&format!("Runner-up: {}\n", report.name(ru)));
            }
        }
        None => {
            out.push_str("Champion:  not yet decided\n");
            if let Some(first) = leader(&report.standings) {
                out.push_str(&format!("Regular-season leader: {}\n", report.name(first)));
            }
        }
    }

    if playoffs.winners_rounds.is_empty() && playoffs.losers_rounds.is_empty() {
        out.push_str("No bracket yet.\n");
        return out;
    }

    render_rounds(report, "Winners bracket", &playoffs.winners_rounds, &mut out);
    render_rounds(report, "Losers bracket", &playoffs.losers_rounds, &mut out);

    if !playoffs.placements.is_empty() {
        out.push_str("Final placements:\n");
        for p in &playoffs.placements {
            out.push_str(&format!("  {:>2}. {}\n", p.place, report.name(p.roster_id)));
        }
    }
    out
}

/// One team's picks as that team sees them: held picks, then picks it gave up.
fn team_pick_lines(report: &LeagueReport, viewer: RosterId) -> Vec<String> {
    let mut lines = Vec::new();
    for pick in report.picks.iter() {
        let Some(status) = pick.status_for(viewer) else {
            continue;
        };
        let detail = match status {
            PickStatus::OwnsOwn => String::new(),
            PickStatus::Acquired => format!(" from {}", report.name(pick.original_roster_id)),
            PickStatus::TradedAway => format!(" to {}", report.name(pick.current_owner)),
        };
        lines.push(format!(
            "{} R{}{} ({})",
            pick.season,
            pick.round,
            detail,
            status.label()
        ));
    }
    lines
}

pub fn render_draft_picks(report: &LeagueReport) -> String {
    let mut out = String::from("## DRAFT PICKS\n");
    if report.pick_seasons.is_empty() {
        out.push_str("No upcoming seasons.\n");
        return out;
    }
    out.push_str(&format!("Seasons: {}\n", report.pick_seasons.join(", ")));

    for entry in &report.standings {
        let Some(capital) = report.capital.iter().find(|c| c.roster_id == entry.roster_id) else {
            continue;
        };
        out.push_str(&format!(
            "\n{}: {} owned ({} acquired), {} traded away{}\n",
            entry.team_name,
            capital.total_owned,
            capital.acquired(),
            capital.total_traded_away,
            if capital.owns_own_first {
                ", owns all own 1sts"
            } else {
                ""
            }
        ));
        for line in team_pick_lines(report, entry.roster_id) {
            out.push_str(&format!("  {line}\n"));
        }
    }
    out
}

fn render_lineups(report: &LeagueReport, lineups: &[(RosterId, Vec<String>)]) -> String {
    let mut out = String::from("## STARTING LINEUPS\n");
    for (roster_id, names) in lineups {
        let list = if names.is_empty() {
            "(none)".to_string()
        } else {
            names.join(", ")
        };
        out.push_str(&format!("{}: {}\n", report.name(*roster_id), list));
    }
    out
}

fn age_cell(age: &PositionAge) -> String {
    if age.team_player_count == 0 {
        format!("{} -", age.position)
    } else {
        format!("{} {:.1} ({:+.1})", age.position, age.team_avg_age, age.delta)
    }
}

pub fn render_rosters(report: &LeagueReport, rosters: &[RosterReport]) -> String {
    let mut out = String::from("## ROSTERS\n");
    for (i, roster) in rosters.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{}\n", report.name(roster.roster_id)));
        let ages: Vec<String> = roster.ages.iter().map(age_cell).collect();
        out.push_str(&format!("  Age vs league: {}\n", ages.join("  ")));
        for p in &roster.players {
            match &p.acquired {
                Some(how) => out.push_str(&format!("  {:<24} {:<3} {}\n", p.name, p.position, how)),
                None => out.push_str(&format!("  {:<24} {}\n", p.name, p.position)),
            }
        }
        if !roster.mix.is_empty() {
            let mix: Vec<String> = roster
                .mix
                .iter()
                .map(|(label, count)| format!("{label} {count}"))
                .collect();
            out.push_str(&format!("  Acquired: {}\n", mix.join(", ")));
        }
    }
    out
}

pub fn render_awards(seasons: &[SeasonAwards]) -> String {
    let mut out = String::from("## SEASON AWARDS\n");
    for s in seasons {
        out.push_str(&format!("{}:\n", s.season));
        if s.awards.is_empty() {
            out.push_str("  none yet\n");
        }
        for a in &s.awards {
            let week = a.week.map(|w| format!("  [week {w}]")).unwrap_or_default();
            out.push_str(&format!(
                "  {:<16} {:<24} {}{}\n",
                a.kind.label(),
                a.team,
                a.display_value(),
                week
            ));
        }
    }
    out
}

pub fn render_history(history: &HistoryReport) -> String {
    let mut out = String::from("## LEAGUE HISTORY\n");

    out.push_str("Champions:\n");
    if history.champions.is_empty() {
        out.push_str("  none yet\n");
    }
    for c in &history.champions {
        let runner_up = c
            .runner_up
            .as_ref()
            .map(|r| format!(" over {}", r.name))
            .unwrap_or_default();
        out.push_str(&format!(
            "  {}  {} ({}){}\n",
            c.season, c.champion.name, c.champion.record, runner_up
        ));
    }

    if !history.records.is_empty() {
        out.push_str("\nRecords:\n");
        for r in &history.records {
            let when = match (&r.season, r.week) {
                (Some(season), Some(week)) => format!("{season} week {week}"),
                (Some(season), None) => season.clone(),
                _ => "all-time".to_string(),
            };
            out.push_str(&format!(
                "  {:<22} {:>12}  {}  [{}]\n",
                r.kind.label(),
                r.display_value(),
                r.team,
                when
            ));
        }
    }

    if !history.all_time.is_empty() {
        out.push_str("\nAll-time standings:\n");
        for (i, m) in history.all_time.iter().enumerate() {
            out.push_str(&format!(
                "  {:>2}. {:<20} {:>3}-{:<3} {:>10.2} PF  {} titles  {} playoffs  best {}\n",
                i + 1,
                m.display_name,
                m.total_wins,
                m.total_losses,
                m.total_points_for,
                m.championships,
                m.playoff_appearances,
                m.best_finish
            ));
        }
    }
    out
}
