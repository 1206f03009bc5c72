use thiserror::Error;

/// Failures talking to the track service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (connection, TLS, body I/O).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server responded with status {0}")]
    Status(u16),

    /// The track listing could not be decoded.
    #[error("invalid track listing: {0}")]
    Decode(#[source] serde_json::Error),
}
