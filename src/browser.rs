//! Navigation and selection state for the show browser.
//!
//! [`Browser`] owns the session's [`ShowCache`] and reacts to one [`Message`]
//! per user action or finished fetch. It never performs I/O itself: when data
//! is missing it hands back a [`Command`] for the host to run, and the host
//! feeds the result back in as another message. Everything on screen is
//! derived on demand by [`Browser::view`].

use crate::cache::ShowCache;
use crate::error::FetchError;
use crate::filter::{Query, filter_episodes, filter_shows};
use crate::types::{Episode, EpisodeId, Show, ShowId};
use crate::view::{Placeholders, Surface, message_surface, surface};
use log::{debug, error, info};
use std::collections::{HashMap, HashSet};

pub const LOADING_SHOWS: &str = "Loading shows...";
pub const LOADING_EPISODES: &str = "Loading episodes...";
pub const SHOWS_FAILED: &str = "Failed to load shows. Please try again later.";
pub const EPISODES_FAILED: &str = "Failed to load episodes. Please try again later.";

/// Which of the two views is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewState {
    ShowsView,
    EpisodesView(ShowId),
}

/// A user action or a completed fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Show search text changed
    ShowQueryChanged(String),
    /// Show selector changed; `None` is the sentinel
    ShowSelected(Option<ShowId>),
    /// A show card's title was clicked
    ShowActivated(ShowId),
    /// Episode search text changed
    EpisodeQueryChanged(String),
    /// Episode selector changed; `None` is the sentinel
    EpisodeSelected(Option<EpisodeId>),
    /// Return to the show list
    Back,
    /// Try the show list again after a failure
    Reload,
    ShowsLoaded(Result<Vec<Show>, FetchError>),
    EpisodesLoaded {
        show_id: ShowId,
        result: Result<Vec<Episode>, FetchError>,
    },
}

/// A fetch the host must perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FetchShows,
    FetchEpisodes(ShowId),
}

#[derive(Debug, Clone, PartialEq)]
enum FetchState {
    Pending,
    Failed(FetchError),
}

/// Everything the UI needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub state: ViewState,
    pub shows: Surface<ShowId>,
    /// Present only in the episodes view.
    pub episodes: Option<EpisodesPage>,
    /// Episode fetches still in flight, across all shows.
    pub pending_episodes: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodesPage {
    pub show_id: ShowId,
    /// Name of the show, if the show list knows it.
    pub show_name: Option<String>,
    pub surface: Surface<EpisodeId>,
}

/// Session state: cache, current view and selection.
#[derive(Debug)]
pub struct Browser {
    cache: ShowCache,
    placeholders: Placeholders,
    state: ViewState,
    show_query: String,
    selected_show: Option<ShowId>,
    episode_query: String,
    selected_episode: Option<EpisodeId>,
    shows_fetch: Option<FetchState>,
    episode_fetches: HashMap<ShowId, FetchState>,
}

impl Browser {
    pub fn new(placeholders: Placeholders) -> Self {
        Self {
            cache: ShowCache::new(),
            placeholders,
            state: ViewState::ShowsView,
            show_query: String::new(),
            selected_show: None,
            episode_query: String::new(),
            selected_episode: None,
            shows_fetch: None,
            episode_fetches: HashMap::new(),
        }
    }

    /// Kick off the eager show-list fetch.
    pub fn start(&mut self) -> Option<Command> {
        self.request_shows()
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn cache(&self) -> &ShowCache {
        &self.cache
    }

    /// Show ids whose episode fetch has not returned yet.
    pub fn pending_episodes(&self) -> HashSet<ShowId> {
        self.episode_fetches
            .iter()
            .filter(|(_, state)| **state == FetchState::Pending)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Apply one message, returning a fetch to run if data is missing.
    pub fn update(&mut self, message: Message) -> Option<Command> {
        match message {
            Message::ShowQueryChanged(text) => {
                self.show_query = text;
                self.selected_show = None;
                None
            }
            Message::ShowSelected(None) => {
                self.selected_show = None;
                self.show_query.clear();
                None
            }
            Message::ShowSelected(Some(show_id)) | Message::ShowActivated(show_id) => {
                self.open_show(show_id)
            }
            Message::EpisodeQueryChanged(text) => {
                self.episode_query = text;
                self.selected_episode = None;
                None
            }
            Message::EpisodeSelected(episode_id) => {
                self.selected_episode = episode_id;
                self.episode_query.clear();
                None
            }
            Message::Back => {
                self.go_back();
                None
            }
            Message::Reload => self.request_shows(),
            Message::ShowsLoaded(result) => {
                self.shows_loaded(result);
                None
            }
            Message::EpisodesLoaded { show_id, result } => {
                self.episodes_loaded(show_id, result);
                None
            }
        }
    }

    fn request_shows(&mut self) -> Option<Command> {
        if self.cache.has_shows() || self.shows_fetch == Some(FetchState::Pending) {
            return None;
        }

        self.shows_fetch = Some(FetchState::Pending);
        Some(Command::FetchShows)
    }

    fn open_show(&mut self, show_id: ShowId) -> Option<Command> {
        info!("Opening episodes of show {}", show_id);

        self.selected_show = Some(show_id);
        self.state = ViewState::EpisodesView(show_id);
        self.episode_query.clear();
        self.selected_episode = None;

        if self.cache.has_episodes(show_id) {
            return None;
        }

        match self.episode_fetches.get(&show_id) {
            Some(FetchState::Pending) => {
                debug!("Episodes of show {} already in flight", show_id);
                None
            }
            _ => {
                self.episode_fetches.insert(show_id, FetchState::Pending);
                Some(Command::FetchEpisodes(show_id))
            }
        }
    }

    fn go_back(&mut self) {
        self.state = ViewState::ShowsView;
        self.selected_episode = None;
        self.episode_query.clear();
        self.selected_show = None;
        self.show_query.clear();
    }

    fn shows_loaded(&mut self, result: Result<Vec<Show>, FetchError>) {
        match result {
            Ok(shows) => {
                self.cache.store_shows(shows);
                self.shows_fetch = None;
            }
            Err(err) => {
                error!("Error loading shows: {}", err);
                self.shows_fetch = Some(FetchState::Failed(err));
            }
        }
    }

    fn episodes_loaded(&mut self, show_id: ShowId, result: Result<Vec<Episode>, FetchError>) {
        match result {
            Ok(episodes) => {
                self.cache.store_episodes(show_id, episodes);
                self.episode_fetches.remove(&show_id);
            }
            Err(err) => {
                error!("Error loading episodes for show {}: {}", show_id, err);
                self.episode_fetches.insert(show_id, FetchState::Failed(err));
            }
        }

        if self.state != ViewState::EpisodesView(show_id) {
            debug!("Episodes of show {} arrived after navigating away", show_id);
        }
    }

    /// Derive the current page.
    pub fn view(&self) -> PageView {
        let episodes = match self.state {
            ViewState::EpisodesView(show_id) => Some(self.episodes_page(show_id)),
            ViewState::ShowsView => None,
        };

        PageView {
            state: self.state,
            shows: self.shows_surface(),
            episodes,
            pending_episodes: self.pending_episodes().len(),
        }
    }

    fn shows_surface(&self) -> Surface<ShowId> {
        let Some(shows) = self.cache.shows() else {
            let message = match &self.shows_fetch {
                Some(FetchState::Failed(_)) => SHOWS_FAILED,
                _ => LOADING_SHOWS,
            };
            return message_surface::<Show>(&[], message, &self.show_query);
        };

        let visible: Vec<&Show> = match self.selected_show {
            Some(id) => shows.iter().filter(|s| s.id == id).collect(),
            None => filter_shows(shows, &Query::new(&self.show_query)),
        };

        surface(
            shows,
            &visible,
            &self.show_query,
            self.selected_show,
            &self.placeholders,
        )
    }

    fn episodes_page(&self, show_id: ShowId) -> EpisodesPage {
        let surface = match self.cache.episodes(show_id) {
            Some(episodes) => {
                let visible: Vec<&Episode> = match self.selected_episode {
                    Some(id) => episodes.iter().filter(|e| e.id == id).collect(),
                    None => filter_episodes(episodes, &Query::new(&self.episode_query)),
                };
                surface(
                    episodes,
                    &visible,
                    &self.episode_query,
                    self.selected_episode,
                    &self.placeholders,
                )
            }
            None => {
                let message = match self.episode_fetches.get(&show_id) {
                    Some(FetchState::Failed(_)) => EPISODES_FAILED,
                    _ => LOADING_EPISODES,
                };
                message_surface::<Episode>(&[], message, &self.episode_query)
            }
        };

        EpisodesPage {
            show_id,
            show_name: self.cache.show(show_id).map(|s| s.name.clone()),
            surface,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rating;
    use crate::view::ListBody;

    fn show(id: u64, name: &str) -> Show {
        Show {
            id: ShowId(id),
            name: name.to_string(),
            summary: None,
            genres: vec!["Comedy".to_string()],
            status: "Ended".to_string(),
            rating: Rating::default(),
            runtime: Some(30),
            image: None,
        }
    }

    fn episode(id: u64, season: u32, number: u32, name: &str) -> Episode {
        Episode {
            id: EpisodeId(id),
            name: name.to_string(),
            season,
            number,
            summary: None,
            runtime: None,
            image: None,
        }
    }

    fn loaded_browser() -> Browser {
        let mut browser = Browser::new(Placeholders::default());
        assert_eq!(browser.start(), Some(Command::FetchShows));
        browser.update(Message::ShowsLoaded(Ok(vec![
            show(2, "Breaking Bad"),
            show(1, "Archer"),
        ])));
        browser
    }

    #[test]
    fn test_initial_view_is_loading_shows() {
        let mut browser = Browser::new(Placeholders::default());
        browser.start();
        let page = browser.view();
        assert_eq!(page.state, ViewState::ShowsView);
        assert_eq!(page.shows.list.message(), Some(LOADING_SHOWS));
        assert!(page.episodes.is_none());
    }

    #[test]
    fn test_start_twice_fetches_once() {
        let mut browser = Browser::new(Placeholders::default());
        assert!(browser.start().is_some());
        assert!(browser.start().is_none());
    }

    #[test]
    fn test_loaded_shows_are_sorted_and_counted() {
        let browser = loaded_browser();
        let page = browser.view();
        let titles: Vec<_> = page.shows.list.cards().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Archer", "Breaking Bad"]);
        assert_eq!(page.shows.count.to_string(), "2 shows of 2 shows");
        assert_eq!(page.shows.selector.options.len(), 2);
    }

    #[test]
    fn test_show_query_filters_list_not_selector() {
        let mut browser = loaded_browser();
        browser.update(Message::ShowQueryChanged("arch".to_string()));
        let page = browser.view();
        assert_eq!(page.shows.list.cards().len(), 1);
        assert_eq!(page.shows.count.to_string(), "1 show of 2 shows");
        assert_eq!(page.shows.selector.options.len(), 2);
        assert_eq!(page.shows.query, "arch");
    }

    #[test]
    fn test_show_sentinel_restores_full_list() {
        let mut browser = loaded_browser();
        browser.update(Message::ShowQueryChanged("zzz".to_string()));
        assert_eq!(
            browser.view().shows.list,
            ListBody::Message("No shows found.".to_string())
        );

        browser.update(Message::ShowSelected(None));
        let page = browser.view();
        assert_eq!(page.shows.count.to_string(), "2 shows of 2 shows");
        assert_eq!(page.shows.query, "");
    }

    #[test]
    fn test_failed_show_fetch_and_reload() {
        let mut browser = Browser::new(Placeholders::default());
        browser.start();
        browser.update(Message::ShowsLoaded(Err(FetchError::Transport(
            "offline".to_string(),
        ))));

        assert_eq!(browser.view().shows.list.message(), Some(SHOWS_FAILED));
        assert!(!browser.cache().has_shows());
        assert_eq!(browser.update(Message::Reload), Some(Command::FetchShows));
        assert_eq!(browser.update(Message::Reload), None);
    }

    #[test]
    fn test_reload_is_noop_when_cached() {
        let mut browser = loaded_browser();
        assert_eq!(browser.update(Message::Reload), None);
    }

    #[test]
    fn test_selecting_show_opens_episodes_view() {
        let mut browser = loaded_browser();
        let cmd = browser.update(Message::ShowSelected(Some(ShowId(1))));
        assert_eq!(cmd, Some(Command::FetchEpisodes(ShowId(1))));
        assert_eq!(browser.state(), ViewState::EpisodesView(ShowId(1)));

        let page = browser.view();
        let episodes = page.episodes.unwrap();
        assert_eq!(episodes.show_name.as_deref(), Some("Archer"));
        assert_eq!(episodes.surface.list.message(), Some(LOADING_EPISODES));
        assert!(browser.pending_episodes().contains(&ShowId(1)));
        assert_eq!(page.pending_episodes, 1);
    }

    #[test]
    fn test_pending_count_spans_shows() {
        let mut browser = loaded_browser();
        browser.update(Message::ShowActivated(ShowId(1)));
        browser.update(Message::Back);
        browser.update(Message::ShowActivated(ShowId(2)));
        assert_eq!(browser.view().pending_episodes, 2);

        browser.update(Message::EpisodesLoaded {
            show_id: ShowId(1),
            result: Ok(Vec::new()),
        });
        assert_eq!(browser.view().pending_episodes, 1);
        assert_eq!(browser.pending_episodes(), HashSet::from([ShowId(2)]));
    }

    #[test]
    fn test_episodes_render_after_load() {
        let mut browser = loaded_browser();
        browser.update(Message::ShowActivated(ShowId(1)));
        browser.update(Message::EpisodesLoaded {
            show_id: ShowId(1),
            result: Ok(vec![episode(10, 1, 1, "Mole Hunt"), episode(11, 1, 2, "Training Day")]),
        });

        let surface = browser.view().episodes.unwrap().surface;
        assert_eq!(surface.list.cards()[0].title, "Mole Hunt - S01E01");
        assert_eq!(surface.count.to_string(), "2 episodes of 2 episodes");
        assert_eq!(surface.selector.options[1].label, "Training Day - S01E02");
        assert!(browser.pending_episodes().is_empty());
    }

    #[test]
    fn test_reopening_cached_show_does_not_refetch() {
        let mut browser = loaded_browser();
        browser.update(Message::ShowActivated(ShowId(1)));
        browser.update(Message::EpisodesLoaded {
            show_id: ShowId(1),
            result: Ok(vec![episode(10, 1, 1, "Mole Hunt")]),
        });
        browser.update(Message::Back);

        assert_eq!(browser.update(Message::ShowActivated(ShowId(1))), None);
    }

    #[test]
    fn test_in_flight_fetch_not_duplicated() {
        let mut browser = loaded_browser();
        assert!(browser.update(Message::ShowActivated(ShowId(2))).is_some());
        browser.update(Message::Back);
        assert!(browser.update(Message::ShowActivated(ShowId(2))).is_none());
    }

    #[test]
    fn test_episode_selection_and_sentinel() {
        let mut browser = loaded_browser();
        browser.update(Message::ShowActivated(ShowId(1)));
        browser.update(Message::EpisodesLoaded {
            show_id: ShowId(1),
            result: Ok(vec![episode(10, 1, 1, "Mole Hunt"), episode(11, 1, 2, "Training Day")]),
        });

        browser.update(Message::EpisodeSelected(Some(EpisodeId(11))));
        let surface = browser.view().episodes.unwrap().surface;
        assert_eq!(surface.list.cards().len(), 1);
        assert_eq!(surface.count.to_string(), "1 episode of 2 episodes");
        assert_eq!(surface.selector.selected_index(), 2);

        browser.update(Message::EpisodeSelected(None));
        let surface = browser.view().episodes.unwrap().surface;
        assert_eq!(surface.list.cards().len(), 2);
        assert_eq!(surface.count.to_string(), "2 episodes of 2 episodes");
    }

    #[test]
    fn test_episode_query_clears_selection() {
        let mut browser = loaded_browser();
        browser.update(Message::ShowActivated(ShowId(1)));
        browser.update(Message::EpisodesLoaded {
            show_id: ShowId(1),
            result: Ok(vec![episode(10, 1, 1, "Mole Hunt"), episode(11, 1, 2, "Training Day")]),
        });
        browser.update(Message::EpisodeSelected(Some(EpisodeId(10))));
        browser.update(Message::EpisodeQueryChanged("train".to_string()));

        let surface = browser.view().episodes.unwrap().surface;
        assert_eq!(surface.selector.selected, None);
        assert_eq!(surface.list.cards()[0].title, "Training Day - S01E02");
        assert_eq!(surface.count.to_string(), "1 episode of 2 episodes");
    }

    #[test]
    fn test_back_resets_everything() {
        let mut browser = loaded_browser();
        browser.update(Message::ShowQueryChanged("bad".to_string()));
        browser.update(Message::ShowActivated(ShowId(2)));
        browser.update(Message::EpisodeQueryChanged("pilot".to_string()));
        browser.update(Message::Back);

        assert_eq!(browser.state(), ViewState::ShowsView);
        let page = browser.view();
        assert_eq!(page.shows.query, "");
        assert_eq!(page.shows.selector.selected, None);
        assert_eq!(page.shows.count.to_string(), "2 shows of 2 shows");

        browser.update(Message::ShowActivated(ShowId(1)));
        let surface = browser.view().episodes.unwrap().surface;
        assert_eq!(surface.query, "");
    }

    #[test]
    fn test_late_result_does_not_change_current_view() {
        let mut browser = loaded_browser();
        browser.update(Message::ShowActivated(ShowId(1)));
        browser.update(Message::Back);
        browser.update(Message::ShowActivated(ShowId(2)));

        browser.update(Message::EpisodesLoaded {
            show_id: ShowId(1),
            result: Ok(vec![episode(10, 1, 1, "Mole Hunt")]),
        });

        let page = browser.view().episodes.unwrap();
        assert_eq!(page.show_id, ShowId(2));
        assert_eq!(page.surface.list.message(), Some(LOADING_EPISODES));
        assert!(browser.cache().has_episodes(ShowId(1)));
    }

    #[test]
    fn test_failed_episodes_can_be_retried() {
        let mut browser = loaded_browser();
        browser.update(Message::ShowActivated(ShowId(1)));
        browser.update(Message::EpisodesLoaded {
            show_id: ShowId(1),
            result: Err(FetchError::Status {
                status: 503,
                url: "/shows/1/episodes".to_string(),
            }),
        });

        let page = browser.view();
        assert_eq!(
            page.episodes.unwrap().surface.list.message(),
            Some(EPISODES_FAILED)
        );
        assert_eq!(page.shows.count.to_string(), "1 show of 2 shows");

        browser.update(Message::Back);
        assert_eq!(
            browser.update(Message::ShowActivated(ShowId(1))),
            Some(Command::FetchEpisodes(ShowId(1)))
        );
    }
}
