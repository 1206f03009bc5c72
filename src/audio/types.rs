//! Commands accepted by the audio thread and the state it publishes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::catalog::TrackId;

#[derive(Debug)]
pub enum AudioCmd {
    /// Stop whatever is loaded and bind a new source.
    Load { key: TrackId, url: String },
    /// Fetch, decode and start the bound source.
    Play,
    /// Toggle pause/resume.
    TogglePause,
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i32),
    /// Set output volume (0.0 to 1.0).
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Clone)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Key of the bound source, if any.
    pub key: Option<TrackId>,
    /// Elapsed playback time for the bound source.
    pub elapsed: Duration,
    /// Whether audio is currently coming out.
    pub playing: bool,
    pub volume: f32,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            key: None,
            elapsed: Duration::ZERO,
            playing: false,
            volume: 1.0,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
