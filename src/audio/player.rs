use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::catalog::TrackId;
use crate::config::AudioSettings;
use crate::playback::{PlaybackError, PlaybackResource};

use super::fetch::clamp_volume;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// Cloneable handle to the audio thread.
///
/// One clone is handed to the playback coordinator as its resource; others
/// are used for transport controls and for reading `PlaybackInfo`.
#[derive(Clone)]
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl AudioPlayer {
    /// Spawn the audio thread. Track URLs are resolved against `base_url`.
    pub fn new(base_url: String, audio_settings: AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo {
            volume: clamp_volume(audio_settings.volume),
            ..PlaybackInfo::default()
        }));

        let audio_handle = spawn_audio_thread(base_url, rx, playback_info.clone(), audio_settings);

        Self {
            tx,
            playback: playback_info,
            join: Arc::new(Mutex::new(Some(audio_handle))),
        }
    }

    /// A player with no thread behind it; commands land in the returned receiver.
    #[cfg(test)]
    pub(super) fn detached() -> (Self, mpsc::Receiver<AudioCmd>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let player = Self {
            tx,
            playback: Arc::new(Mutex::new(PlaybackInfo::default())),
            join: Arc::new(Mutex::new(None)),
        };
        (player, rx)
    }

    pub fn snapshot(&self) -> PlaybackInfo {
        self.playback
            .lock()
            .map(|info| info.clone())
            .unwrap_or_default()
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    pub fn toggle_pause(&self) {
        let _ = self.send(AudioCmd::TogglePause);
    }

    pub fn seek_by(&self, secs: i32) {
        let _ = self.send(AudioCmd::SeekBy(secs));
    }

    /// Nudge the volume by `delta`, clamped to 0.0..=1.0.
    pub fn adjust_volume(&self, delta: f32) {
        let current = self.snapshot().volume;
        let _ = self.send(AudioCmd::SetVolume(clamp_volume(current + delta)));
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl PlaybackResource for AudioPlayer {
    fn bind(&mut self, key: &TrackId, url: &str) {
        let cmd = AudioCmd::Load {
            key: key.clone(),
            url: url.to_string(),
        };
        if self.send(cmd).is_err() {
            debug!(%key, "audio thread gone, bind dropped");
        }
    }

    fn begin(&mut self) -> Result<(), PlaybackError> {
        self.send(AudioCmd::Play)
            .map_err(|_| PlaybackError::Disconnected)
    }
}
