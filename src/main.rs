//! Main entry point for the show-browser CLI application.

use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, info, warn};
use ratatui::prelude::*;
use show_browser::api::TvMazeClient;
use show_browser::browser::{Browser, Command, Message};
use show_browser::cache::ShowCache;
use show_browser::config::Config;
use show_browser::error::Result;
use show_browser::filter::{Query, filter_episodes, filter_shows};
use show_browser::tui::{Action, App, draw, poll_event};
use show_browser::types::ShowId;
use show_browser::view::{Placeholders, Surface, surface};
use std::io::{self, stdout};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Command-line arguments for the show-browser application.
#[derive(Parser, Debug)]
#[command(
    name = "show-browser",
    version,
    about = "Browse TV shows and episodes from TVmaze",
    long_about = "Search, filter and browse TV shows and their episodes in a TUI, \
                  backed by an in-memory cache of the TVmaze API."
)]
struct Args {
    /// Base address of the API (overrides config)
    #[arg(long)]
    base_url: Option<String>,

    /// Log verbosity level: 0=error, 1=warn, 2=info, 3=debug, 4=trace
    #[arg(short, long, default_value_t = 1)]
    log: u8,

    /// Print the rendered list to stdout instead of starting the TUI
    #[arg(long)]
    plain: bool,

    /// With --plain: filter the printed list
    #[arg(short, long, requires = "plain")]
    query: Option<String>,

    /// With --plain: print the episodes of this show id
    #[arg(short, long, requires = "plain")]
    show: Option<u64>,

    /// Write a default config file if none exists, print its path and exit
    #[arg(long)]
    init_config: bool,
}

/// Initialize the terminal for TUI rendering.
fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.log {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    debug!("Log level set to {:?}", log_level);

    if args.init_config {
        let path = Config::create_default_if_missing()?;
        println!("{}", path.display());
        return Ok(());
    }

    // Load config
    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config: {}. Using defaults.", e);
        Config::new()
    });

    // Merge config with CLI args
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }

    let client = config.client()?;
    info!("Using API at {}", client.base_url());

    if args.plain {
        let query = args.query.unwrap_or_default();
        print_plain(&client, &config.placeholders(), &query, args.show.map(ShowId)).await?;
        return Ok(());
    }

    let mut terminal = init_terminal()?;
    let mut app = App::new(Browser::new(config.placeholders()));

    let result = run_app(&mut terminal, &mut app, client).await;

    restore_terminal()?;

    Ok(result?)
}

/// Run a fetch in the background and deliver its result as a message.
fn spawn_fetch(client: &TvMazeClient, command: Command, tx: &UnboundedSender<Message>) {
    let client = client.clone();
    let tx = tx.clone();

    tokio::spawn(async move {
        let message = match command {
            Command::FetchShows => Message::ShowsLoaded(client.list_shows().await),
            Command::FetchEpisodes(show_id) => Message::EpisodesLoaded {
                show_id,
                result: client.list_episodes(show_id).await,
            },
        };

        if tx.send(message).is_err() {
            debug!("Event loop gone, dropping result of {:?}", command);
        }
    });
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: TvMazeClient,
) -> Result<()> {
    let (tx, mut rx): (UnboundedSender<Message>, UnboundedReceiver<Message>) =
        mpsc::unbounded_channel();

    if let Some(command) = app.start() {
        spawn_fetch(&client, command, &tx);
    }

    loop {
        // Apply finished fetches
        while let Ok(message) = rx.try_recv() {
            if let Some(command) = app.apply(message) {
                spawn_fetch(&client, command, &tx);
            }
        }

        // Draw UI
        terminal.draw(|f| draw(f, app))?;

        // Poll for events
        if let Some(Event::Key(key)) = poll_event(Duration::from_millis(50))? {
            match app.handle_input(key) {
                Action::Quit => break,
                Action::Fetch(command) => spawn_fetch(&client, command, &tx),
                Action::None => {}
            }
        }

        if app.should_quit {
            break;
        }

        // Let spawned fetches make progress between polls.
        tokio::task::yield_now().await;
    }

    Ok(())
}

/// Fetch through the cache and print one surface to stdout.
async fn print_plain(
    client: &TvMazeClient,
    placeholders: &Placeholders,
    query: &str,
    show_id: Option<ShowId>,
) -> Result<()> {
    let mut cache = ShowCache::new();
    let filter = Query::new(query);

    match show_id {
        Some(show_id) => {
            let episodes = cache.get_episodes(client, show_id).await?;
            let visible = filter_episodes(episodes, &filter);
            print_surface(&surface(episodes, &visible, query, None, placeholders));
        }
        None => {
            let shows = cache.get_shows(client).await?;
            let visible = filter_shows(shows, &filter);
            print_surface(&surface(shows, &visible, query, None, placeholders));
        }
    }

    Ok(())
}

fn print_surface<Id>(surface: &Surface<Id>) {
    println!("Showing {}", surface.count);
    println!();

    if let Some(message) = surface.list.message() {
        println!("{}", message);
        return;
    }

    for card in surface.list.cards() {
        println!("{}", card.title);
        for (label, value) in &card.details {
            println!("  {}: {}", label, value);
        }
        println!("  Image: {}", card.image);
        for line in card.summary.lines() {
            println!("  {}", line);
        }
        println!();
    }
}
