// League data sources: where Sleeper resources come from.
//
// A source only has to hand back the raw JSON body for a resource. The
// typed accessors decode it, so the HTTP client and the snapshot directory
// share one decoding path.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::trace;

use crate::sleeper::{
    SleeperBracketMatchup, SleeperDraft, SleeperDraftPick, SleeperLeague, SleeperMatchup,
    SleeperPlayer, SleeperRoster, SleeperTradedPick, SleeperTransaction, SleeperUser,
};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {path} failed: {source}")]
    Http {
        path: String,
        source: reqwest::Error,
    },

    #[error("league API returned status {status} for {path}")]
    Status { path: String, status: u16 },

    #[error("failed to read snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },

    #[error("not found: {what}")]
    NotFound { what: String },
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// One fetchable Sleeper resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource<'a> {
    League(&'a str),
    Users(&'a str),
    Rosters(&'a str),
    Matchups(&'a str, u32),
    TradedPicks(&'a str),
    WinnersBracket(&'a str),
    LosersBracket(&'a str),
    Transactions(&'a str, u32),
    Drafts(&'a str),
    /// Keyed by draft id, not league id.
    DraftPicks(&'a str),
    Players,
}

impl Resource<'_> {
    /// Path relative to the API base URL.
    pub fn api_path(&self) -> String {
        match self {
            Resource::League(id) => format!("/league/{id}"),
            Resource::Users(id) => format!("/league/{id}/users"),
            Resource::Rosters(id) => format!("/league/{id}/rosters"),
            Resource::Matchups(id, week) => format!("/league/{id}/matchups/{week}"),
            Resource::TradedPicks(id) => format!("/league/{id}/traded_picks"),
            Resource::WinnersBracket(id) => format!("/league/{id}/winners_bracket"),
            Resource::LosersBracket(id) => format!("/league/{id}/losers_bracket"),
            Resource::Transactions(id, week) => format!("/league/{id}/transactions/{week}"),
            Resource::Drafts(id) => format!("/league/{id}/drafts"),
            Resource::DraftPicks(draft_id) => format!("/draft/{draft_id}/picks"),
            Resource::Players => "/players/nfl".to_string(),
        }
    }

    /// File path relative to a snapshot directory.
    pub fn snapshot_path(&self) -> PathBuf {
        let file = |id: &str, name: String| PathBuf::from(id).join(name);
        match self {
            Resource::League(id) => file(id, "league.json".into()),
            Resource::Users(id) => file(id, "users.json".into()),
            Resource::Rosters(id) => file(id, "rosters.json".into()),
            Resource::Matchups(id, week) => file(id, format!("matchups_{week}.json")),
            Resource::TradedPicks(id) => file(id, "traded_picks.json".into()),
            Resource::WinnersBracket(id) => file(id, "winners_bracket.json".into()),
            Resource::LosersBracket(id) => file(id, "losers_bracket.json".into()),
            Resource::Transactions(id, week) => file(id, format!("transactions_{week}.json")),
            Resource::Drafts(id) => file(id, "drafts.json".into()),
            Resource::DraftPicks(draft_id) => file("drafts", format!("{draft_id}_picks.json")),
            Resource::Players => PathBuf::from("players_nfl.json"),
        }
    }
}

/// Decode a raw body. The API answers unknown leagues with a literal `null`.
pub fn decode<T: DeserializeOwned>(resource: &Resource<'_>, raw: &str) -> Result<T, SourceError> {
    if raw.trim() == "null" {
        return Err(SourceError::NotFound {
            what: resource.api_path(),
        });
    }
    serde_json::from_str(raw).map_err(|source| SourceError::Decode {
        path: resource.api_path(),
        source,
    })
}

/// Decode a list body, treating `null` as empty.
fn decode_list<T: DeserializeOwned>(resource: &Resource<'_>, raw: &str) -> Result<Vec<T>, SourceError> {
    let list: Option<Vec<T>> = serde_json::from_str(raw).map_err(|source| SourceError::Decode {
        path: resource.api_path(),
        source,
    })?;
    Ok(list.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// LeagueSource trait
// ---------------------------------------------------------------------------

/// Anything that can serve Sleeper league resources.
#[async_trait]
pub trait LeagueSource: Send + Sync {
    /// Raw JSON body for `resource`.
    async fn fetch_raw(&self, resource: Resource<'_>) -> Result<String, SourceError>;

    async fn league(&self, league_id: &str) -> Result<SleeperLeague, SourceError> {
        let resource = Resource::League(league_id);
        let raw = self.fetch_raw(resource).await?;
        decode(&resource, &raw)
    }

    async fn users(&self, league_id: &str) -> Result<Vec<SleeperUser>, SourceError> {
        let resource = Resource::Users(league_id);
        let raw = self.fetch_raw(resource).await?;
        decode_list(&resource, &raw)
    }

    async fn rosters(&self, league_id: &str) -> Result<Vec<SleeperRoster>, SourceError> {
        let resource = Resource::Rosters(league_id);
        let raw = self.fetch_raw(resource).await?;
        decode_list(&resource, &raw)
    }

    async fn matchups(&self, league_id: &str, week: u32) -> Result<Vec<SleeperMatchup>, SourceError> {
        let resource = Resource::Matchups(league_id, week);
        let raw = self.fetch_raw(resource).await?;
        trace!(league_id, week, bytes = raw.len(), "matchups fetched");
        decode_list(&resource, &raw)
    }

    async fn traded_picks(&self, league_id: &str) -> Result<Vec<SleeperTradedPick>, SourceError> {
        let resource = Resource::TradedPicks(league_id);
        let raw = self.fetch_raw(resource).await?;
        decode_list(&resource, &raw)
    }

    async fn winners_bracket(&self, league_id: &str) -> Result<Vec<SleeperBracketMatchup>, SourceError> {
        let resource = Resource::WinnersBracket(league_id);
        let raw = self.fetch_raw(resource).await?;
        decode_list(&resource, &raw)
    }

    async fn losers_bracket(&self, league_id: &str) -> Result<Vec<SleeperBracketMatchup>, SourceError> {
        let resource = Resource::LosersBracket(league_id);
        let raw = self.fetch_raw(resource).await?;
        decode_list(&resource, &raw)
    }

    /// Roster moves processed in one week (the API calls it a "round").
    async fn transactions(&self, league_id: &str, week: u32) -> Result<Vec<SleeperTransaction>, SourceError> {
        let resource = Resource::Transactions(league_id, week);
        let raw = self.fetch_raw(resource).await?;
        decode_list(&resource, &raw)
    }

    async fn drafts(&self, league_id: &str) -> Result<Vec<SleeperDraft>, SourceError> {
        let resource = Resource::Drafts(league_id);
        let raw = self.fetch_raw(resource).await?;
        decode_list(&resource, &raw)
    }

    async fn draft_picks(&self, draft_id: &str) -> Result<Vec<SleeperDraftPick>, SourceError> {
        let resource = Resource::DraftPicks(draft_id);
        let raw = self.fetch_raw(resource).await?;
        decode_list(&resource, &raw)
    }

    /// The full NFL player directory, keyed by player id.
    async fn players(&self) -> Result<HashMap<String, SleeperPlayer>, SourceError> {
        let resource = Resource::Players;
        let raw = self.fetch_raw(resource).await?;
        decode(&resource, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_paths() {
        assert_eq!(Resource::League("123").api_path(), "/league/123");
        assert_eq!(Resource::Matchups("123", 7).api_path(), "/league/123/matchups/7");
        assert_eq!(Resource::Players.api_path(), "/players/nfl");
        assert_eq!(
            Resource::Transactions("123", 3).api_path(),
            "/league/123/transactions/3"
        );
        assert_eq!(Resource::Drafts("123").api_path(), "/league/123/drafts");
        assert_eq!(Resource::DraftPicks("D9").api_path(), "/draft/D9/picks");
    }

    #[test]
    fn snapshot_paths() {
        assert_eq!(
            Resource::Matchups("123", 7).snapshot_path(),
            PathBuf::from("123").join("matchups_7.json")
        );
        assert_eq!(
            Resource::WinnersBracket("9").snapshot_path(),
            PathBuf::from("9").join("winners_bracket.json")
        );
        assert_eq!(Resource::Players.snapshot_path(), PathBuf::from("players_nfl.json"));
        assert_eq!(
            Resource::Transactions("9", 2).snapshot_path(),
            PathBuf::from("9").join("transactions_2.json")
        );
        assert_eq!(
            Resource::DraftPicks("D9").snapshot_path(),
            PathBuf::from("drafts").join("D9_picks.json")
        );
    }

    #[test]
    fn null_league_is_not_found() {
        let resource = Resource::League("missing");
        let result: Result<SleeperLeague, _> = decode(&resource, "null");
        match result {
            Err(SourceError::NotFound { what }) => assert_eq!(what, "/league/missing"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn null_list_is_empty() {
        let resource = Resource::WinnersBracket("1");
        let list: Vec<SleeperBracketMatchup> = decode_list(&resource, "null").unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let resource = Resource::Users("1");
        let result: Result<Vec<SleeperUser>, _> = decode_list(&resource, "{not json");
        assert!(matches!(result, Err(SourceError::Decode { .. })));
    }
}
