//! A terminal browser for TV shows and episodes, written in Rust.
//!
//! show-browser fetches the show catalogue from the TVmaze API once per
//! session, fetches each show's episodes the first time they are opened, and
//! derives every filtered view from that in-memory cache.
//!
//! # Features
//!
//! - Search shows by name, summary or genre
//! - Jump to a show through the selector or its card
//! - Search and pick episodes of the open show
//! - "N of M" counters that always match the rendered list
//!
//! # Usage
//!
//! ```bash
//! # Interactive TUI
//! cargo run
//!
//! # Print the shows matching a query and exit
//! cargo run -- --plain --query drama
//!
//! # Print the episodes of one show
//! cargo run -- --plain --show 82
//! ```

pub mod api;
pub mod browser;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod tui;
pub mod types;
pub mod view;
