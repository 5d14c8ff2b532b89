// Offline league source: Sleeper responses saved as JSON files.
//
// Layout under the root directory:
//   <league_id>/league.json, users.json, rosters.json, traded_picks.json,
//   <league_id>/winners_bracket.json, losers_bracket.json,
//   <league_id>/matchups_<week>.json, transactions_<week>.json, drafts.json,
//   drafts/<draft_id>_picks.json,
//   players_nfl.json

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::source::{LeagueSource, Resource, SourceError};

#[derive(Debug, Clone)]
pub struct SnapshotDir {
    root: PathBuf,
}

impl SnapshotDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, resource: &Resource<'_>) -> PathBuf {
        self.root.join(resource.snapshot_path())
    }
}

#[async_trait]
impl LeagueSource for SnapshotDir {
    async fn fetch_raw(&self, resource: Resource<'_>) -> Result<String, SourceError> {
        let path = self.path_for(&resource);
        debug!(path = %path.display(), "reading snapshot");

        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(raw),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SourceError::NotFound {
                what: path.display().to_string(),
            }),
            Err(source) => Err(SourceError::Io { path, source }),
        }
    }
}
