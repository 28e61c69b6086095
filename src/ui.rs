//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the controller's `View` with `ratatui`: a loading
//! screen until the playlist is read, then the import line, the track list
//! and the now-playing status.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::View;
use crate::config::UiSettings;

const CONTROLS: [(&str, &str); 7] = [
    ("j/k", "up/down"),
    ("enter", "play selected song"),
    ("space/p", "play/pause"),
    ("s", "stop"),
    ("h/l", "seek"),
    ("a", "import files"),
    ("q", "quit"),
];

/// Transient state owned by the event loop that the frame also shows.
pub struct Status<'a> {
    /// Import prompt contents while the prompt is open.
    pub import_input: Option<&'a str>,
    /// Imports dispatched but not finished yet.
    pub pending_imports: usize,
    /// Position reported by the player; `None` when nothing is loaded.
    pub elapsed: Option<Duration>,
    pub playing: bool,
}

/// Render the controls help text.
fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{}] {}", k, v))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Pick the slice of a `total`-long list to show in `height` rows so that
/// `cursor` stays centered when possible. Returns `(start, end, cursor_in_window)`.
fn visible_window(total: usize, height: usize, cursor: usize) -> (usize, usize, usize) {
    let cursor = cursor.min(total.saturating_sub(1));
    if total <= height || height == 0 {
        return (0, total, cursor);
    }

    let half = height / 2;
    let mut start = cursor.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, cursor - start)
}

fn now_playing_text(view: &View, status: &Status) -> Option<String> {
    let name = view.now_playing?;
    let state = if status.playing { "Playing" } else { "Paused" };
    // Before anything is loaded, show the saved position instead.
    let elapsed = status
        .elapsed
        .or_else(|| view.position.and_then(|secs| Duration::try_from_secs_f64(secs).ok()))
        .unwrap_or_default();
    Some(format!(
        "Now Playing: {} [{}] {}",
        name,
        format_mmss(elapsed),
        state
    ))
}

fn bordered(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, view: &View, status: &Status, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    if view.loading {
        draw_loading(frame, chunks[2]);
        return;
    }

    // Import line
    let import_text = match status.import_input {
        Some(input) => format!("Import path: {}_", input),
        None if status.pending_imports > 0 => {
            format!("Importing {} file(s)...", status.pending_imports)
        }
        None => "Press [a] to import audio files or folders".to_string(),
    };
    let mut import_par = Paragraph::new(import_text).block(bordered(" import "));
    if status.import_input.is_some() {
        import_par = import_par.bold();
    }
    frame.render_widget(import_par, chunks[1]);

    // Playlist; nothing to show or play while it is empty.
    if view.names.is_empty() {
        let empty = Paragraph::new("The playlist is empty.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" playlist "));
        frame.render_widget(empty, chunks[2]);
    } else {
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let (start, end, cursor_in_window) =
            visible_window(view.names.len(), list_height, view.cursor);

        let items: Vec<ListItem> = view.names[start..end]
            .iter()
            .enumerate()
            .map(|(offset, name)| {
                let marker = if start + offset == view.selected {
                    "♪ "
                } else {
                    "  "
                };
                ListItem::new(format!("{}{}", marker, name))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" playlist "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(cursor_in_window));
        frame.render_stateful_widget(list, chunks[2], &mut state);

        if let Some(text) = now_playing_text(view, status) {
            let now_playing = Paragraph::new(text).block(bordered(" now playing "));
            frame.render_widget(now_playing, chunks[3]);
        }
    }

    let footer = Paragraph::new(controls_text())
        .block(bordered(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

fn draw_loading(frame: &mut Frame, area: Rect) {
    let loading = Paragraph::new("Loading...")
        .alignment(Alignment::Center)
        .slow_blink()
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(loading, area);
}
