//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, Mode};
use crate::audio::PlaybackInfo;
use crate::catalog::{PlayableTrack, format_created_at};
use crate::config::{ControlsSettings, UiSettings};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play");
    map.insert("space/p", "pause");
    map.insert("+/-", "volume");
    map.insert("u", "upload");
    map.insert("d", "delete");
    map.insert("r", "refresh");
    map.insert("K", "details");
    map.insert("q", "quit");
    map
});

/// Everything `draw` needs, read out of the shared state once per frame.
pub struct View<'a> {
    pub tracks: &'a [PlayableTrack],
    pub uploading: bool,
    pub selection: Option<&'a PlayableTrack>,
    pub playback: &'a PlaybackInfo,
}

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "gg/G", "enter", "space/p", "H/L", "+/-", "u", "d", "r", "K", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the status line: upload state, now playing, transport state.
fn status_text(view: &View, base_url: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!("Server: {}", base_url));
    parts.push(format!("Tracks: {}", view.tracks.len()));

    if view.uploading {
        parts.push("Uploading...".to_string());
    }

    match view.selection {
        Some(track) => {
            let label = if track.label().is_empty() {
                track.url.as_str()
            } else {
                track.label()
            };
            parts.push(format!(
                "Now playing: {} [{}]",
                label,
                format_mmss(view.playback.elapsed)
            ));
            let state = if view.playback.playing {
                "Playing"
            } else {
                "Paused"
            };
            parts.push(state.to_string());
        }
        None => parts.push("Stopped".to_string()),
    }

    parts.push(format!(
        "Vol: {}%",
        (view.playback.volume * 100.0).round() as u32
    ));

    parts.join(" • ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn track_row<'a>(track: &'a PlayableTrack, selected: bool, date_format: &str) -> ListItem<'a> {
    let marker = if selected { "♪ " } else { "  " };
    let mut spans = vec![Span::raw(marker), Span::raw(track.label())];

    let created = format_created_at(track.track.created_at.as_deref(), date_format);
    if !created.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::raw(created).dim());
    }
    if let Some(len) = track.length_label() {
        spans.push(Span::raw(format!("  ({len})")).dim());
    }
    ListItem::new(Line::from(spans))
}

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 1,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    view: &View,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" musicshare ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status_par = Paragraph::new(status_text(view, &app.base_url))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Track list
    {
        let selected_id = view.selection.map(|t| t.id());
        let items: Vec<ListItem> = view
            .tracks
            .iter()
            .map(|t| track_row(t, Some(t.id()) == selected_id, &ui_settings.date_format))
            .collect();

        let title = if view.tracks.is_empty() {
            " tracks (none yet, press u to upload) "
        } else {
            " tracks "
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if !view.tracks.is_empty() {
            state.select(Some(app.cursor.min(view.tracks.len() - 1)));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    let list_area = chunks[2];

    // Details popup (keeps list visible under it)
    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 9, list_area);
        frame.render_widget(Clear, popup_area);

        let meta = match app.highlighted(view.tracks) {
            Some(track) => format!(
                "Title: {}\nId: {}\nPath: {}\nURL: {}\nUploaded: {}",
                track.label(),
                track.id(),
                track.track.file_path,
                track.url,
                format_created_at(track.track.created_at.as_deref(), &ui_settings.date_format),
            ),
            None => "No track highlighted".to_string(),
        };
        let meta_paragraph = Paragraph::new(meta)
            .block(popup_block(" details (K closes) "))
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    match &app.mode {
        Mode::Normal => {}
        Mode::UploadPrompt(input) => {
            let popup_area = centered_rect_sized(72, 5, list_area);
            frame.render_widget(Clear, popup_area);
            let prompt = Paragraph::new(format!("{}▏", input))
                .block(popup_block(" upload file (enter sends, esc cancels) "));
            frame.render_widget(prompt, popup_area);
        }
        Mode::ConfirmDelete(track) => {
            let popup_area = centered_rect_sized(60, 5, list_area);
            frame.render_widget(Clear, popup_area);
            let question = Paragraph::new(format!("Delete \"{}\"? [y/n]", track.label()))
                .alignment(Alignment::Center)
                .block(popup_block(" confirm "))
                .wrap(Wrap { trim: true });
            frame.render_widget(question, popup_area);
        }
    }

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}
