//! UI rendering functions for the TUI.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use super::state::App;
use super::types::Focus;
use crate::browser::{PageView, ViewState};
use crate::view::{Card, ListBody, Selector, Surface, pluralize};

/// Draw the UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let page = &app.page;

    // Create main layout
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Search bar
            Constraint::Min(0),    // Cards
            Constraint::Length(3), // Footer
        ])
        .split(size);

    draw_header(frame, page, chunks[0]);

    match &page.episodes {
        Some(episodes) => {
            draw_search_bar(frame, app, &episodes.surface.query, chunks[1]);
            draw_surface(
                frame,
                &episodes.surface,
                &mut app.episode_list_state,
                chunks[2],
            );
        }
        None => {
            draw_search_bar(frame, app, &page.shows.query, chunks[1]);
            draw_surface(frame, &page.shows, &mut app.show_list_state, chunks[2]);
        }
    }

    draw_footer(frame, app, page, chunks[3]);

    if app.focus == Focus::Selector {
        match &page.episodes {
            Some(episodes) => {
                draw_selector_popup(frame, &episodes.surface.selector, &mut app.selector_state)
            }
            None => draw_selector_popup(frame, &page.shows.selector, &mut app.selector_state),
        }
    }

    if app.show_help {
        draw_help_modal(frame, page);
    }
}

fn draw_header(frame: &mut Frame, page: &PageView, area: Rect) {
    let location = match &page.episodes {
        Some(episodes) => match &episodes.show_name {
            Some(name) => format!("{} / Episodes", name),
            None => format!("Show {} / Episodes", episodes.show_id),
        },
        None => "Shows".to_string(),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "show-browser",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(format!("[{}]", location), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(loading_text(page), Style::default().fg(Color::Yellow)),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn loading_text(page: &PageView) -> String {
    match page.pending_episodes {
        0 => String::new(),
        n => format!("loading {} episode {}", n, pluralize(n, "list", "lists")),
    }
}

fn draw_search_bar(frame: &mut Frame, app: &App, query: &str, area: Rect) {
    let focused = app.focus == Focus::Search;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let search_text = if query.is_empty() && !focused {
        "Press '/' to search..."
    } else {
        query
    };

    let search = Paragraph::new(search_text)
        .style(if focused {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search")
                .border_style(border_style),
        );

    frame.render_widget(search, area);

    if focused {
        let width = query.chars().count() as u16;
        frame.set_cursor_position((area.x + width + 1, area.y + 1));
    }
}

fn draw_surface<Id>(frame: &mut Frame, surface: &Surface<Id>, state: &mut ListState, area: Rect) {
    let title = format!("Showing {}", surface.count);

    let cards = match &surface.list {
        ListBody::Message(message) => {
            let body = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title(title))
                .wrap(Wrap { trim: true });
            frame.render_widget(body, area);
            return;
        }
        ListBody::Cards(cards) => cards,
    };

    // Split into list and details
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let items: Vec<ListItem> = cards.iter().map(|c| ListItem::new(c.title.as_str())).collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], state);

    let details = state
        .selected()
        .and_then(|i| cards.get(i))
        .map(card_text)
        .unwrap_or_default();

    let details_widget = Paragraph::new(details)
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(Wrap { trim: true });

    frame.render_widget(details_widget, chunks[1]);
}

fn card_text<Id>(card: &Card<Id>) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        card.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    for (label, value) in &card.details {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", label), Style::default().fg(Color::Cyan)),
            Span::raw(value.clone()),
        ]));
    }

    lines.push(Line::from(Span::styled(
        format!("Image: {}", card.image),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::default());
    lines.extend(card.summary.lines().map(|l| Line::from(l.to_string())));

    lines
}

fn draw_footer(frame: &mut Frame, app: &App, page: &PageView, area: Rect) {
    let help_text = match (app.focus, page.state) {
        (Focus::Search, _) => "[type] filter  [Bksp] delete  [Enter/Esc] done",
        (Focus::Selector, _) => "[↑↓] navigate  [Enter] select  [Esc] close",
        (Focus::List, ViewState::ShowsView) => {
            "[↑↓] navigate  [Enter] episodes  [/] search  [s] select  [r] reload  [?] help  [q] quit"
        }
        (Focus::List, ViewState::EpisodesView(_)) => {
            "[↑↓] navigate  [/] search  [s] select  [b] back  [?] help  [q] quit"
        }
    };

    let footer = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

fn draw_selector_popup<Id: PartialEq + Copy>(
    frame: &mut Frame,
    selector: &Selector<Id>,
    state: &mut ListState,
) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = (0..selector.len())
        .filter_map(|i| selector.label(i))
        .map(ListItem::new)
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, state);
}

fn draw_help_modal(frame: &mut Frame, page: &PageView) {
    let area = centered_rect(70, 80, frame.area());
    frame.render_widget(Clear, area);

    let (title, content) = get_help_content(page);

    let help_text = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Help - {}", title))
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(help_text, area);
}

fn get_help_content(page: &PageView) -> (&'static str, String) {
    let global_keys = "\
Global Commands
───────────────
  ?           Show/hide this help
  Ctrl+C      Force quit
  Ctrl+Q      Force quit
  /           Focus search bar
  s           Open selector
  q           Quit

";

    let search_keys = "\
Search Bar
──────────
  (Type)      Filter the list as you type
  Backspace   Delete character
  Enter/Esc   Leave search bar

";

    let show_keys = "\
Shows
─────
  j / ↓       Move down
  k / ↑       Move up
  Enter       Open episodes of the show
  Esc         Clear search and selection
  r           Reload shows after a failure

";

    let episode_keys = "\
Episodes
────────
  j / ↓       Move down
  k / ↑       Move up
  b / Esc     Back to shows

";

    match page.state {
        ViewState::ShowsView => {
            let content = format!("{}{}{}Press ? to close", global_keys, show_keys, search_keys);
            ("Shows", content)
        }
        ViewState::EpisodesView(_) => {
            let content = format!(
                "{}{}{}Press ? to close",
                global_keys, episode_keys, search_keys
            );
            ("Episodes", content)
        }
    }
}

/// Helper function to create a centered rect.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
