//! Building `rodio` sinks from downloaded track bytes.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::playback::PlaybackError;

/// Create a paused `Sink` for `bytes` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    url: &str,
    bytes: Arc<[u8]>,
    start_at: Duration,
) -> Result<Sink, PlaybackError> {
    let source = Decoder::new(Cursor::new(bytes))
        .map_err(|e| PlaybackError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })?
        // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
