//! Application state management and input handling.

use crate::browser::{Browser, Command, Message, PageView, ViewState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

use super::types::{Action, Focus};

/// Application state for the TUI.
pub struct App {
    /// Cache, navigation and selection state
    browser: Browser,
    /// Page derived from `browser`, refreshed after every change to it
    pub(super) page: PageView,
    /// Current focus
    pub focus: Focus,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Highlighted card in the show list
    pub show_list_state: ListState,
    /// Highlighted card in the episode list
    pub episode_list_state: ListState,
    /// Highlighted entry of the open selector popup
    pub selector_state: ListState,
    /// Whether help modal is shown
    pub show_help: bool,
}

impl App {
    /// Create a new App around a browser.
    pub fn new(browser: Browser) -> Self {
        let mut show_list_state = ListState::default();
        show_list_state.select(Some(0));

        Self {
            page: browser.view(),
            browser,
            focus: Focus::List,
            should_quit: false,
            show_list_state,
            episode_list_state: ListState::default(),
            selector_state: ListState::default(),
            show_help: false,
        }
    }

    /// Kick off the initial show fetch.
    pub fn start(&mut self) -> Option<Command> {
        let command = self.browser.start();
        self.refresh();
        command
    }

    /// Apply a message and clamp list highlights to the new page.
    pub fn apply(&mut self, message: Message) -> Option<Command> {
        let command = self.browser.update(message);
        self.refresh();
        command
    }

    fn refresh(&mut self) {
        self.page = self.browser.view();
        self.clamp_highlights();
    }

    fn dispatch(&mut self, message: Message) -> Action {
        self.apply(message).into()
    }

    fn clamp_highlights(&mut self) {
        let page = &self.page;

        let shows = page.shows.list.cards().len();
        clamp(&mut self.show_list_state, shows);

        let episodes = page
            .episodes
            .as_ref()
            .map(|e| e.surface.list.cards().len())
            .unwrap_or(0);
        clamp(&mut self.episode_list_state, episodes);
    }

    fn list_state_mut(&mut self) -> &mut ListState {
        match self.browser.state() {
            ViewState::ShowsView => &mut self.show_list_state,
            ViewState::EpisodesView(_) => &mut self.episode_list_state,
        }
    }

    /// Search text of the active view.
    pub fn current_query(&self) -> &str {
        match &self.page.episodes {
            Some(episodes) => &episodes.surface.query,
            None => &self.page.shows.query,
        }
    }

    fn query_message(&self, text: String) -> Message {
        match self.browser.state() {
            ViewState::ShowsView => Message::ShowQueryChanged(text),
            ViewState::EpisodesView(_) => Message::EpisodeQueryChanged(text),
        }
    }

    /// Number of entries in the active selector, sentinel included.
    fn selector_len(&self) -> usize {
        match &self.page.episodes {
            Some(episodes) => episodes.surface.selector.len(),
            None => self.page.shows.selector.len(),
        }
    }

    /// Handle keyboard input and return an action.
    pub fn handle_input(&mut self, key: KeyEvent) -> Action {
        // Global quit with Ctrl+C or Ctrl+Q
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => {
                    self.should_quit = true;
                    return Action::Quit;
                }
                _ => {}
            }
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return Action::None;
        }

        match self.focus {
            Focus::Search => self.handle_search_input(key),
            Focus::Selector => self.handle_selector_input(key),
            Focus::List => self.handle_list_input(key),
        }
    }

    fn handle_search_input(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.focus = Focus::List;
                Action::None
            }
            KeyCode::Char(c) => {
                let mut query = self.current_query().to_string();
                query.push(c);
                let message = self.query_message(query);
                self.list_state_mut().select(Some(0));
                self.dispatch(message)
            }
            KeyCode::Backspace => {
                let mut query = self.current_query().to_string();
                if query.pop().is_none() {
                    return Action::None;
                }
                let message = self.query_message(query);
                self.list_state_mut().select(Some(0));
                self.dispatch(message)
            }
            _ => Action::None,
        }
    }

    fn open_selector(&mut self) {
        let index = match &self.page.episodes {
            Some(episodes) => episodes.surface.selector.selected_index(),
            None => self.page.shows.selector.selected_index(),
        };
        self.selector_state.select(Some(index));
        self.focus = Focus::Selector;
    }

    fn handle_selector_input(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self.selector_state.selected().unwrap_or(0);
                if i > 0 {
                    self.selector_state.select(Some(i - 1));
                }
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.selector_state.selected().unwrap_or(0);
                if i < self.selector_len().saturating_sub(1) {
                    self.selector_state.select(Some(i + 1));
                }
                Action::None
            }
            KeyCode::Enter => {
                let index = self.selector_state.selected().unwrap_or(0);
                self.focus = Focus::List;

                let message = match &self.page.episodes {
                    Some(episodes) => episodes
                        .surface
                        .selector
                        .value_at(index)
                        .map(Message::EpisodeSelected),
                    None => self
                        .page
                        .shows
                        .selector
                        .value_at(index)
                        .map(Message::ShowSelected),
                };

                match message {
                    Some(message) => {
                        self.list_state_mut().select(Some(0));
                        let action = self.dispatch(message);
                        // Picking a show switches to its episodes.
                        self.episode_list_state.select(Some(0));
                        action
                    }
                    None => Action::None,
                }
            }
            KeyCode::Esc => {
                self.focus = Focus::List;
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_list_input(&mut self, key: KeyEvent) -> Action {
        let in_episodes = matches!(self.browser.state(), ViewState::EpisodesView(_));

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                let state = self.list_state_mut();
                let i = state.selected().unwrap_or(0);
                if i > 0 {
                    state.select(Some(i - 1));
                }
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.visible_cards();
                let state = self.list_state_mut();
                let i = state.selected().unwrap_or(0);
                if i < len.saturating_sub(1) {
                    state.select(Some(i + 1));
                }
                Action::None
            }
            KeyCode::Enter if !in_episodes => {
                let index = self.show_list_state.selected().unwrap_or(0);
                match self.page.shows.list.cards().get(index).map(|card| card.id) {
                    Some(show_id) => {
                        self.episode_list_state.select(Some(0));
                        self.dispatch(Message::ShowActivated(show_id))
                    }
                    None => Action::None,
                }
            }
            KeyCode::Char('/') => {
                self.focus = Focus::Search;
                Action::None
            }
            KeyCode::Char('s') => {
                self.open_selector();
                Action::None
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                Action::None
            }
            KeyCode::Char('r') => self.dispatch(Message::Reload),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') if in_episodes => {
                self.show_list_state.select(Some(0));
                self.dispatch(Message::Back)
            }
            KeyCode::Esc => self.dispatch(Message::ShowSelected(None)),
            KeyCode::Char('q') => {
                self.should_quit = true;
                Action::Quit
            }
            _ => Action::None,
        }
    }

    fn visible_cards(&self) -> usize {
        match &self.page.episodes {
            Some(episodes) => episodes.surface.list.cards().len(),
            None => self.page.shows.list.cards().len(),
        }
    }
}

fn clamp(state: &mut ListState, len: usize) {
    match (state.selected(), len) {
        (_, 0) => state.select(None),
        (None, _) => state.select(Some(0)),
        (Some(i), len) if i >= len => state.select(Some(len - 1)),
        _ => {}
    }
}
