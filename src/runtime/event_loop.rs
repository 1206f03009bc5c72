use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::task;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::app::{App, Confirmation, Mode};
use crate::audio::AudioPlayer;
use crate::catalog::{CatalogManager, HttpTrackApi, PlayableTrack};
use crate::config;
use crate::playback::PlaybackCoordinator;
use crate::ui;

/// Everything the loop needs besides the terminal and the `App` model.
pub struct Context<'a> {
    pub settings: &'a config::Settings,
    pub catalog: &'a Rc<CatalogManager<HttpTrackApi>>,
    pub coordinator: &'a PlaybackCoordinator,
    pub audio_player: &'a AudioPlayer,
}

/// Internal two-key prefix state used for `gg` handling.
#[derive(Default)]
struct KeyState {
    pending_gg: bool,
}

/// Main terminal event loop: draws, then waits for either a key or a redraw
/// tick. Catalog operations are spawned as local tasks so the UI keeps
/// redrawing while they are in flight. Returns `Ok(())` when quit is requested.
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    ctx: &Context<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(ctx.settings.ui.tick_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut keys = KeyState::default();

    loop {
        let tracks = ctx.catalog.tracks();
        app.clamp_cursor(tracks.len());
        let selection = ctx.coordinator.selection();
        let playback = ctx.audio_player.snapshot();
        let view = ui::View {
            tracks: &tracks,
            uploading: ctx.catalog.is_uploading(),
            selection: selection.as_ref(),
            playback: &playback,
        };
        terminal.draw(|f| ui::draw(f, app, &view, &ctx.settings.ui, &ctx.settings.controls))?;

        tokio::select! {
            _ = ticker.tick() => {}
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, &tracks, app, ctx, &mut keys) {
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }

    Ok(())
}

fn spawn_refresh(ctx: &Context<'_>) {
    let catalog = ctx.catalog.clone();
    task::spawn_local(async move { catalog.refresh().await });
}

fn spawn_upload(ctx: &Context<'_>, path: Option<PathBuf>) {
    let Some(path) = path else {
        return;
    };
    let catalog = ctx.catalog.clone();
    task::spawn_local(async move { catalog.upload_path(&path).await });
}

fn spawn_delete(ctx: &Context<'_>, track: PlayableTrack, answer: Confirmation) {
    let catalog = ctx.catalog.clone();
    task::spawn_local(async move { catalog.delete(&track, &answer).await });
}

/// Handle one key press. Returns `true` when the app should quit.
fn handle_key_event(
    key: KeyEvent,
    tracks: &[PlayableTrack],
    app: &mut App,
    ctx: &Context<'_>,
    keys: &mut KeyState,
) -> bool {
    match app.mode {
        Mode::UploadPrompt(_) => {
            keys.pending_gg = false;
            match key.code {
                KeyCode::Esc => app.cancel_prompt(),
                KeyCode::Backspace => app.pop_prompt_char(),
                KeyCode::Enter => {
                    let path = app.submit_upload_prompt();
                    debug!(?path, "upload prompt submitted");
                    spawn_upload(ctx, path);
                }
                KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
                _ => {}
            }
            return false;
        }
        Mode::ConfirmDelete(_) => {
            keys.pending_gg = false;
            let granted = match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => true,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
                _ => return false,
            };
            if let Some((track, answer)) = app.answer_delete(granted) {
                spawn_delete(ctx, track, answer);
            }
            return false;
        }
        Mode::Normal => {}
    }

    let controls = &ctx.settings.controls;
    match key.code {
        KeyCode::Char('q') => {
            keys.pending_gg = false;
            ctx.audio_player
                .quit_softly(Duration::from_millis(ctx.settings.audio.quit_fade_out_ms));
            return true;
        }
        KeyCode::Char('g') => {
            if keys.pending_gg {
                keys.pending_gg = false;
                app.top();
            } else {
                keys.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            keys.pending_gg = false;
            app.bottom(tracks.len());
        }
        KeyCode::Char('j') | KeyCode::Down => {
            keys.pending_gg = false;
            app.next(tracks.len());
        }
        KeyCode::Char('k') | KeyCode::Up => {
            keys.pending_gg = false;
            app.prev(tracks.len());
        }
        KeyCode::Enter => {
            keys.pending_gg = false;
            if let Some(track) = app.highlighted(tracks) {
                ctx.coordinator.select(track.clone());
            }
        }
        KeyCode::Char('u') => {
            keys.pending_gg = false;
            if !app.open_upload_prompt(ctx.catalog.is_uploading()) {
                debug!("upload already in flight, prompt not opened");
            }
        }
        KeyCode::Char('d') => {
            keys.pending_gg = false;
            if let Some(track) = app.highlighted(tracks) {
                app.ask_delete(track.clone());
            }
        }
        KeyCode::Char('r') => {
            keys.pending_gg = false;
            spawn_refresh(ctx);
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            keys.pending_gg = false;
            ctx.audio_player.toggle_pause();
        }
        KeyCode::Char('L') => {
            keys.pending_gg = false;
            let secs = controls.scrub_seconds.min(i32::MAX as u64) as i32;
            ctx.audio_player.seek_by(secs);
        }
        KeyCode::Char('H') => {
            keys.pending_gg = false;
            let secs = controls.scrub_seconds.min(i32::MAX as u64) as i32;
            ctx.audio_player.seek_by(-secs);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            keys.pending_gg = false;
            ctx.audio_player.adjust_volume(controls.volume_step);
        }
        KeyCode::Char('-') => {
            keys.pending_gg = false;
            ctx.audio_player.adjust_volume(-controls.volume_step);
        }
        KeyCode::Char('K') => {
            keys.pending_gg = false;
            app.toggle_metadata_window();
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            keys.pending_gg = false;
        }
        _ => {}
    }

    false
}
