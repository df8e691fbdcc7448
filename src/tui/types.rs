//! TUI type definitions for focus and actions.

use crate::browser::Command;

/// Which widget receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The card list of the current view
    List,
    /// The search box of the current view
    Search,
    /// The selector popup of the current view
    Selector,
}

/// Actions returned to the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No action, continue running
    None,
    /// Quit the application
    Quit,
    /// Run a fetch in the background
    Fetch(Command),
}

impl From<Option<Command>> for Action {
    fn from(command: Option<Command>) -> Self {
        match command {
            Some(command) => Action::Fetch(command),
            None => Action::None,
        }
    }
}
