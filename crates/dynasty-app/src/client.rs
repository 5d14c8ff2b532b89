// Sleeper HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::source::{LeagueSource, Resource, SourceError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const USER_AGENT: &str = concat!("dynasty/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// SleeperClient
// ---------------------------------------------------------------------------

/// Read-only client for the public Sleeper API.
#[derive(Debug, Clone)]
pub struct SleeperClient {
    http: reqwest::Client,
    base_url: String,
}

impl SleeperClient {
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| SourceError::Http {
                path: base_url.to_string(),
                source,
            })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, resource: &Resource<'_>) -> String {
        format!("{}{}", self.base_url, resource.api_path())
    }
}

#[async_trait]
impl LeagueSource for SleeperClient {
    async fn fetch_raw(&self, resource: Resource<'_>) -> Result<String, SourceError> {
        let path = resource.api_path();
        let url = self.url(&resource);
        debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| SourceError::Http {
                path: path.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "league API request failed");
            return Err(SourceError::Status {
                path,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| SourceError::Http { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_base_and_path() {
        let client = SleeperClient::new("https://api.sleeper.app/v1/").unwrap();
        assert_eq!(client.base_url(), "https://api.sleeper.app/v1");
        assert_eq!(
            client.url(&Resource::Matchups("42", 3)),
            "https://api.sleeper.app/v1/league/42/matchups/3"
        );
        assert_eq!(
            client.url(&Resource::Players),
            "https://api.sleeper.app/v1/players/nfl"
        );
    }
}
