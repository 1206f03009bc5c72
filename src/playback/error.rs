use thiserror::Error;

/// Reasons the playback resource refused or failed to start audio.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// The audio thread is gone.
    #[error("audio thread is not running")]
    Disconnected,

    /// No output device could be opened.
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),

    /// Nothing is bound to play.
    #[error("no source bound")]
    NoSource,

    /// The source could not be downloaded.
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The source was fetched but could not be decoded.
    #[error("failed to decode {url}: {reason}")]
    Decode { url: String, reason: String },
}
