// Season loading: pulls everything one league season needs from a source
// and converts it into league records for the analytics engine.

use std::collections::{HashMap, HashSet};

use anyhow::Context;
use dynasty_core::model::{
    DraftSelection, LeagueSeason, RosterId, SeasonStatus, TradedPick, Transaction,
};
use futures_util::future::{join_all, try_join_all};
use tracing::{debug, info, warn};

use crate::sleeper::{
    to_bracket, to_draft_selections, to_team_seasons, to_traded_picks, to_transactions,
    to_week_scores, SleeperLeague,
};
use crate::source::{LeagueSource, SourceError};

/// Transaction weeks requested per season, preseason moves included in week 1.
pub const TRANSACTION_WEEKS: u32 = 18;

/// One season plus the pieces that only the current season's report uses.
#[derive(Debug, Clone)]
pub struct SeasonBundle {
    pub season: LeagueSeason,
    pub traded_picks: Vec<TradedPick>,
    /// Starting lineup player ids per roster.
    pub starters: HashMap<RosterId, Vec<String>>,
    /// Every rostered player id per roster.
    pub roster_players: HashMap<RosterId, Vec<String>>,
    pub previous_league_id: Option<String>,
    /// Playoff field size from the league settings, when it sets one.
    pub reported_playoff_teams: Option<u32>,
}

/// The league whose data should be shown for `league_id`.
///
/// A league that has not drafted yet has no games, so its previous season
/// is used instead when there is one.
pub async fn resolve_data_league<S>(source: &S, league_id: &str) -> anyhow::Result<SleeperLeague>
where
    S: LeagueSource + ?Sized,
{
    let league = source
        .league(league_id)
        .await
        .with_context(|| format!("failed to fetch league {league_id}"))?;

    if league.is_pre_draft() {
        if let Some(previous) = league.previous_league() {
            info!(
                league_id,
                previous, "league is pre-draft; using previous season's data"
            );
            return source
                .league(previous)
                .await
                .with_context(|| format!("failed to fetch previous league {previous}"));
        }
    }
    Ok(league)
}

/// Fetch and convert one league season.
///
/// League, users and rosters are fetched together, then every regular-season
/// week, then brackets and the traded-pick ledger.
pub async fn load_season<S>(source: &S, league_id: &str) -> anyhow::Result<SeasonBundle>
where
    S: LeagueSource + ?Sized,
{
    let (league, users, rosters) = tokio::try_join!(
        source.league(league_id),
        source.users(league_id),
        source.rosters(league_id),
    )
    .with_context(|| format!("failed to fetch league {league_id}"))?;

    let regular_weeks = league.playoff_week_start().saturating_sub(1);
    debug!(league_id, weeks = regular_weeks, "fetching weekly matchups");
    let weekly = try_join_all((1..=regular_weeks).map(|week| source.matchups(league_id, week)))
        .await
        .with_context(|| format!("failed to fetch matchups for league {league_id}"))?;

    let (winners, losers, traded) = tokio::try_join!(
        source.winners_bracket(league_id),
        source.losers_bracket(league_id),
        source.traded_picks(league_id),
    )
    .with_context(|| format!("failed to fetch brackets for league {league_id}"))?;

    let weeks = weekly
        .iter()
        .zip(1..)
        .map(|(matchups, week)| to_week_scores(week, matchups))
        .collect();

    let starters = rosters
        .iter()
        .map(|r| (r.roster_id, r.starters.clone().unwrap_or_default()))
        .collect();
    let roster_players = rosters
        .iter()
        .map(|r| (r.roster_id, r.players.clone().unwrap_or_default()))
        .collect();

    let season = LeagueSeason {
        league_id: league.league_id.clone(),
        season: league.season.clone(),
        name: league.name.clone(),
        status: SeasonStatus::from_api(&league.status),
        playoff_teams: league.playoff_teams(),
        playoff_week_start: league.playoff_week_start(),
        teams: to_team_seasons(&rosters, &users),
        weeks,
        winners_bracket: to_bracket(&winners),
        losers_bracket: to_bracket(&losers),
    };

    info!(
        league_id,
        season = %season.season,
        teams = season.teams.len(),
        weeks = season.weeks.len(),
        "season loaded"
    );

    Ok(SeasonBundle {
        season,
        traded_picks: to_traded_picks(&traded),
        starters,
        roster_players,
        previous_league_id: league.previous_league().map(str::to_string),
        reported_playoff_teams: league.reported_playoff_teams(),
    })
}

/// Every season of the league, newest first, following previous-league
/// links from `league_id` until they run out.
pub async fn load_history<S>(source: &S, league_id: &str) -> anyhow::Result<Vec<LeagueSeason>>
where
    S: LeagueSource + ?Sized,
{
    let mut seasons = Vec::new();
    let mut visited = HashSet::new();
    let mut next = Some(league_id.to_string());

    while let Some(id) = next.take() {
        if !visited.insert(id.clone()) {
            debug!(league_id = %id, "league chain loops; stopping");
            break;
        }
        let bundle = load_season(source, &id).await?;
        next = bundle.previous_league_id;
        seasons.push(bundle.season);
    }

    info!(seasons = seasons.len(), "league history loaded");
    Ok(seasons)
}

/// Roster moves and draft selections for one league season.
#[derive(Debug, Clone, Default)]
pub struct LeagueActivity {
    /// Completed transactions, newest first.
    pub transactions: Vec<Transaction>,
    pub selections: Vec<DraftSelection>,
}

/// A list that could not be fetched counts as empty; the report still
/// renders without it.
fn or_empty<T>(result: Result<Vec<T>, SourceError>, what: &str) -> Vec<T> {
    match result {
        Ok(list) => list,
        Err(SourceError::NotFound { .. }) => Vec::new(),
        Err(e) => {
            warn!(error = %e, what, "skipping unavailable league activity");
            Vec::new()
        }
    }
}

/// Fetch every week's transactions and every draft's picks for `league_id`.
pub async fn load_activity<S>(source: &S, league_id: &str) -> LeagueActivity
where
    S: LeagueSource + ?Sized,
{
    let weekly = join_all((1..=TRANSACTION_WEEKS).map(|week| source.transactions(league_id, week))).await;
    let raw: Vec<_> = weekly
        .into_iter()
        .flat_map(|week| or_empty(week, "transactions"))
        .collect();
    let transactions = to_transactions(&raw);

    let drafts = or_empty(source.drafts(league_id).await, "drafts");
    let picks = join_all(drafts.iter().map(|d| source.draft_picks(&d.draft_id))).await;
    let selections = drafts
        .iter()
        .zip(picks)
        .flat_map(|(draft, picks)| to_draft_selections(draft, &or_empty(picks, "draft picks")))
        .collect::<Vec<_>>();

    info!(
        league_id,
        transactions = transactions.len(),
        drafts = drafts.len(),
        selections = selections.len(),
        "league activity loaded"
    );
    LeagueActivity {
        transactions,
        selections,
    }
}
