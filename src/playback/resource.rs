use crate::catalog::TrackId;

use super::error::PlaybackError;

/// A single audio output that plays one source at a time.
///
/// Modelled after a media element: a source is bound, then playback is
/// requested. Pause, seek and volume are the implementation's own transport
/// controls and are not part of this seam.
pub trait PlaybackResource {
    /// Tear down whatever is bound and bind `url` as a fresh source.
    ///
    /// `key` identifies the source; rebinding the same key still starts over.
    fn bind(&mut self, key: &TrackId, url: &str);

    /// Request playback of the bound source.
    ///
    /// An `Err` means the request was refused outright. Implementations may
    /// also fail later, asynchronously; they report such failures through
    /// the same rejection policy.
    fn begin(&mut self) -> Result<(), PlaybackError>;
}
