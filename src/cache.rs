//! Session-lived cache of fetched shows and episodes.
//!
//! The cache is the single source of truth for everything the browser shows.
//! Entries are filled at most once per key and never evicted or refreshed, so
//! repeated lookups after a successful fetch never touch the network again.

use crate::api::ShowSource;
use crate::error::FetchError;
use crate::types::{Episode, Show, ShowId};
use log::{debug, warn};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Fetched shows plus a per-show map of fetched episodes.
#[derive(Debug, Default)]
pub struct ShowCache {
    shows: Option<Vec<Show>>,
    episodes: HashMap<ShowId, Vec<Episode>>,
}

impl ShowCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached shows, fetching and sorting them on first use.
    ///
    /// On failure nothing is stored, so a later call fetches again.
    pub async fn get_shows<S: ShowSource>(&mut self, source: &S) -> Result<&[Show], FetchError> {
        if self.shows.is_none() {
            let shows = source.fetch_shows().await?;
            return Ok(self.store_shows(shows));
        }

        Ok(self.shows().unwrap_or_default())
    }

    /// Cached episodes of `show_id`, fetching them on first use.
    ///
    /// A failure only affects this show's entry.
    pub async fn get_episodes<S: ShowSource>(
        &mut self,
        source: &S,
        show_id: ShowId,
    ) -> Result<&[Episode], FetchError> {
        if !self.has_episodes(show_id) {
            let episodes = source.fetch_episodes(show_id).await?;
            return Ok(self.store_episodes(show_id, episodes));
        }

        Ok(self.episodes(show_id).unwrap_or_default())
    }

    pub fn shows(&self) -> Option<&[Show]> {
        self.shows.as_deref()
    }

    pub fn show(&self, show_id: ShowId) -> Option<&Show> {
        self.shows()?.iter().find(|s| s.id == show_id)
    }

    pub fn episodes(&self, show_id: ShowId) -> Option<&[Episode]> {
        self.episodes.get(&show_id).map(Vec::as_slice)
    }

    pub fn has_shows(&self) -> bool {
        self.shows.is_some()
    }

    pub fn has_episodes(&self, show_id: ShowId) -> bool {
        self.episodes.contains_key(&show_id)
    }

    /// Store a freshly fetched show list, sorted by name.
    ///
    /// The first stored list wins; later lists are dropped.
    pub fn store_shows(&mut self, mut shows: Vec<Show>) -> &[Show] {
        if self.shows.is_some() {
            warn!("Show list already cached, ignoring {} refetched shows", shows.len());
        } else {
            sort_shows(&mut shows);
            debug!("Caching {} shows", shows.len());
            self.shows = Some(shows);
        }

        self.shows().unwrap_or_default()
    }

    /// Store the fetched episodes of one show. The first stored list wins.
    pub fn store_episodes(&mut self, show_id: ShowId, episodes: Vec<Episode>) -> &[Episode] {
        let entry = self.episodes.entry(show_id).or_insert_with(|| {
            debug!("Caching {} episodes for show {}", episodes.len(), show_id);
            episodes
        });
        entry.as_slice()
    }
}

/// Order names case-insensitively, falling back to the raw text so that the
/// order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort shows by name ascending. Stable for equal names.
pub fn sort_shows(shows: &mut [Show]) {
    shows.sort_by(|a, b| compare_names(&a.name, &b.name));
}
