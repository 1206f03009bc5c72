//! Playback coordinator: which track is selected, and what the shared
//! audio output is bound to.
//!
//! Selection lives in `ClientState::selection`. The coordinator subscribes to
//! that cell once, and every write with a track rebinds the single playback
//! resource to that track's URL and asks it to start. Start failures are
//! swallowed on purpose; see `ignore_playback_rejection`.

mod coordinator;
mod error;
mod resource;

pub use coordinator::PlaybackCoordinator;
pub use error::PlaybackError;
pub use resource::PlaybackResource;

use tracing::debug;

/// The designated branch for rejected playback starts.
///
/// Autoplay-style refusals, unreachable sources and undecodable audio all end
/// here: the selection stays updated and nothing is reported to the user.
pub(crate) fn ignore_playback_rejection(err: &PlaybackError) {
    debug!(error = %err, "playback start rejected");
}
