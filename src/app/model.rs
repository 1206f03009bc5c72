//! Application model types: `App`, `Mode` and `Confirmation`.

use std::env;
use std::ffi::OsStr;
use std::path::PathBuf;

use crate::catalog::{ConfirmGate, PlayableTrack};

/// What the keyboard is currently talking to.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Browsing the track list.
    Normal,
    /// Typing the path of a file to upload.
    UploadPrompt(String),
    /// Waiting for a yes/no answer before deleting this track.
    ConfirmDelete(PlayableTrack),
}

/// The user's answer to the delete dialog, used as the catalog's gate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Granted,
    Declined,
}

impl ConfirmGate for Confirmation {
    fn confirm(&self, _track: &PlayableTrack) -> bool {
        *self == Confirmation::Granted
    }
}

/// The terminal application model.
pub struct App {
    /// Index of the highlighted row in the catalog.
    pub cursor: usize,
    pub mode: Mode,
    pub base_url: String,
    pub metadata_window: bool,
}

impl App {
    pub fn new(base_url: String) -> Self {
        Self {
            cursor: 0,
            mode: Mode::Normal,
            base_url,
            metadata_window: false,
        }
    }

    /// Keep the cursor on a valid row after the catalog was replaced.
    pub fn clamp_cursor(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    /// Move the cursor down, wrapping to the first row.
    pub fn next(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor + 1) % len;
    }

    /// Move the cursor up, wrapping to the last row.
    pub fn prev(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = if self.cursor == 0 {
            len - 1
        } else {
            (self.cursor - 1).min(len - 1)
        };
    }

    pub fn top(&mut self) {
        self.cursor = 0;
    }

    pub fn bottom(&mut self, len: usize) {
        self.cursor = len.saturating_sub(1);
    }

    pub fn highlighted<'a>(&self, tracks: &'a [PlayableTrack]) -> Option<&'a PlayableTrack> {
        tracks.get(self.cursor)
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    /// Open the upload prompt unless an upload is already in flight.
    ///
    /// Returns whether the prompt was opened.
    pub fn open_upload_prompt(&mut self, uploading: bool) -> bool {
        if uploading || self.mode != Mode::Normal {
            return false;
        }
        self.mode = Mode::UploadPrompt(String::new());
        true
    }

    pub fn push_prompt_char(&mut self, c: char) {
        if let Mode::UploadPrompt(ref mut input) = self.mode {
            input.push(c);
        }
    }

    pub fn pop_prompt_char(&mut self) {
        if let Mode::UploadPrompt(ref mut input) = self.mode {
            input.pop();
        }
    }

    /// Close the upload prompt and return the path typed into it.
    ///
    /// A blank prompt yields `None`, which uploads nothing.
    pub fn submit_upload_prompt(&mut self) -> Option<PathBuf> {
        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::UploadPrompt(input) => parse_upload_path(&input),
            other => {
                self.mode = other;
                None
            }
        }
    }

    pub fn cancel_prompt(&mut self) {
        if let Mode::UploadPrompt(_) = self.mode {
            self.mode = Mode::Normal;
        }
    }

    /// Ask for confirmation before deleting `track`.
    pub fn ask_delete(&mut self, track: PlayableTrack) {
        if self.mode == Mode::Normal {
            self.mode = Mode::ConfirmDelete(track);
        }
    }

    /// Close the delete dialog, returning the track and the answer given.
    pub fn answer_delete(&mut self, granted: bool) -> Option<(PlayableTrack, Confirmation)> {
        let track = match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::ConfirmDelete(track) => track,
            other => {
                self.mode = other;
                return None;
            }
        };
        let answer = if granted {
            Confirmation::Granted
        } else {
            Confirmation::Declined
        };
        Some((track, answer))
    }
}

/// Turn prompt input into a path: trims whitespace and surrounding quotes
/// (terminals add them when a file is dropped in) and expands a leading `~/`
/// against `$HOME`.
pub fn parse_upload_path(input: &str) -> Option<PathBuf> {
    parse_upload_path_with_home(input, env::var_os("HOME").as_deref())
}

/// `parse_upload_path` with an explicit home directory. Without one, `~/`
/// is left as typed.
pub fn parse_upload_path_with_home(input: &str, home: Option<&OsStr>) -> Option<PathBuf> {
    let trimmed = input.trim();
    let unquoted = trimmed
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(trimmed)
        .trim();
    if unquoted.is_empty() {
        return None;
    }

    if let Some(rest) = unquoted.strip_prefix("~/") {
        if let Some(home) = home {
            return Some(PathBuf::from(home).join(rest));
        }
    }
    Some(PathBuf::from(unquoted))
}
