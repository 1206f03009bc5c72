//! rodio-backed playback resource.
//!
//! A dedicated thread owns the output stream and the current `Sink`. The
//! rest of the program talks to it through `AudioPlayer`, which is both the
//! `PlaybackResource` the coordinator drives and the handle the UI uses for
//! transport controls (pause, seek, volume).

mod fetch;
mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{AudioCmd, PlaybackInfo};

#[cfg(test)]
mod tests;
