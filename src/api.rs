//! API client for the TVmaze REST service.
//!
//! This module provides the [`ShowSource`] seam the cache fetches through, and
//! [`TvMazeClient`], the reqwest-backed implementation used by the binary.
//! Requests are made once; there is no retry or backoff.

use crate::error::FetchError;
use crate::types::{Episode, Show, ShowId};
use log::debug;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com";
pub const DEFAULT_USER_AGENT: &str = concat!("show-browser/", env!("CARGO_PKG_VERSION"));

/// A read-only source of shows and episodes.
///
/// Implementations must surface any non-success response or transport failure
/// as a [`FetchError`].
#[allow(async_fn_in_trait)]
pub trait ShowSource {
    /// List every show the source knows about.
    async fn fetch_shows(&self) -> Result<Vec<Show>, FetchError>;

    /// List all episodes of one show.
    async fn fetch_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>, FetchError>;
}

/// HTTP client for the TVmaze API.
#[derive(Clone, Debug)]
pub struct TvMazeClient {
    client: reqwest::Client,
    base_url: String,
}

impl TvMazeClient {
    /// Build a client against `base_url` with the given user agent and timeout.
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    /// Wrap an existing reqwest client.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the show list endpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use show_browser::api::TvMazeClient;
    ///
    /// let client = TvMazeClient::with_client(reqwest::Client::new(), "https://api.tvmaze.com/");
    /// assert_eq!(client.shows_url(), "https://api.tvmaze.com/shows");
    /// ```
    pub fn shows_url(&self) -> String {
        format!("{}/shows", self.base_url)
    }

    /// URL of the episode list endpoint for one show.
    pub fn episodes_url(&self, show_id: ShowId) -> String {
        format!("{}/shows/{}/episodes", self.base_url, show_id)
    }

    /// `GET /shows`
    pub async fn list_shows(&self) -> Result<Vec<Show>, FetchError> {
        let shows: Vec<Show> = self.get_json(&self.shows_url()).await?;
        debug!("Fetched {} shows", shows.len());
        Ok(shows)
    }

    /// `GET /shows/{id}/episodes`
    pub async fn list_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>, FetchError> {
        let episodes: Vec<Episode> = self.get_json(&self.episodes_url(show_id)).await?;
        debug!("Fetched {} episodes for show {}", episodes.len(), show_id);
        Ok(episodes)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl ShowSource for TvMazeClient {
    async fn fetch_shows(&self) -> Result<Vec<Show>, FetchError> {
        self.list_shows().await
    }

    async fn fetch_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>, FetchError> {
        self.list_episodes(show_id).await
    }
}
