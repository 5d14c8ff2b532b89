// NFL player directory with an explicit time-to-live.
//
// The directory is several megabytes and changes rarely, so it is fetched
// at most once per TTL. The cache is a plain value the caller owns; the
// current time is passed in rather than read from the clock.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::sleeper::SleeperPlayer;
use crate::source::{LeagueSource, SourceError};

/// Player id -> player record.
pub type PlayerDirectory = HashMap<String, SleeperPlayer>;

#[derive(Debug, Clone)]
pub struct PlayerDirectoryCache {
    ttl: Duration,
    entry: Option<CachedDirectory>,
}

#[derive(Debug, Clone)]
struct CachedDirectory {
    fetched_at: DateTime<Utc>,
    players: PlayerDirectory,
}

impl PlayerDirectoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    pub fn with_ttl_hours(hours: u32) -> Self {
        Self::new(Duration::hours(i64::from(hours)))
    }

    /// True when nothing is cached or the cached copy is at least `ttl` old.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match &self.entry {
            Some(entry) => now - entry.fetched_at >= self.ttl,
            None => true,
        }
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.entry.as_ref().map(|e| e.fetched_at)
    }

    /// Seed the cache with an already fetched directory.
    pub fn insert(&mut self, players: PlayerDirectory, now: DateTime<Utc>) {
        self.entry = Some(CachedDirectory {
            fetched_at: now,
            players,
        });
    }

    /// The cached directory, re-fetching from `source` only when stale.
    /// A failed refresh leaves the previous copy in place.
    pub async fn get_or_refresh<S>(
        &mut self,
        source: &S,
        now: DateTime<Utc>,
    ) -> Result<&PlayerDirectory, SourceError>
    where
        S: LeagueSource + ?Sized,
    {
        if self.is_stale(now) {
            let players = source.players().await?;
            info!(players = players.len(), "player directory refreshed");
            self.insert(players, now);
        } else {
            debug!("player directory served from cache");
        }

        match &self.entry {
            Some(entry) => Ok(&entry.players),
            None => Err(SourceError::NotFound {
                what: "player directory".to_string(),
            }),
        }
    }

    /// Cached directory without refreshing, if any.
    pub fn players(&self) -> Option<&PlayerDirectory> {
        self.entry.as_ref().map(|e| &e.players)
    }
}

/// A player's display name, or the raw id when the directory lacks it.
pub fn player_name(players: &PlayerDirectory, player_id: &str) -> String {
    players
        .get(player_id)
        .and_then(SleeperPlayer::name)
        .unwrap_or_else(|| player_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Resource;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a fixed directory and counts fetches.
    struct CountingSource {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl LeagueSource for CountingSource {
        async fn fetch_raw(&self, resource: Resource<'_>) -> Result<String, SourceError> {
            assert_eq!(resource, Resource::Players);
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(r#"{"4046": {"player_id": "4046", "full_name": "Patrick Mahomes", "position": "QB"}}"#
                .to_string())
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        use chrono::TimeZone;
        Utc.with_ymd_and_hms(2025, 9, 7, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn fetches_once_within_ttl() {
        let source = CountingSource {
            fetches: AtomicUsize::new(0),
        };
        let mut cache = PlayerDirectoryCache::with_ttl_hours(24);
        assert!(cache.is_stale(at(0)));

        let players = cache.get_or_refresh(&source, at(0)).await.unwrap();
        assert_eq!(players.len(), 1);
        cache.get_or_refresh(&source, at(23)).await.unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(cache.fetched_at(), Some(at(0)));
    }

    #[tokio::test]
    async fn refetches_once_stale() {
        let source = CountingSource {
            fetches: AtomicUsize::new(0),
        };
        let mut cache = PlayerDirectoryCache::with_ttl_hours(1);
        cache.get_or_refresh(&source, at(0)).await.unwrap();
        cache.get_or_refresh(&source, at(1)).await.unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
        assert_eq!(cache.fetched_at(), Some(at(1)));
    }

    #[test]
    fn name_lookup_falls_back_to_id() {
        let mut cache = PlayerDirectoryCache::with_ttl_hours(24);
        assert!(cache.players().is_none());

        let mut players = PlayerDirectory::new();
        players.insert(
            "4046".to_string(),
            SleeperPlayer {
                full_name: Some("Patrick Mahomes".into()),
                ..Default::default()
            },
        );
        cache.insert(players, at(0));
        let players = cache.players().unwrap();

        assert_eq!(player_name(players, "4046"), "Patrick Mahomes");
        assert_eq!(player_name(players, "9999"), "9999");
    }
}
