//! Catalog manager: the client's view of the tracks stored by the server.
//!
//! The catalog is never patched locally. Every successful mutation (upload,
//! delete) is followed by a full re-fetch, and every successful fetch replaces
//! the whole list. Failed requests leave the previous catalog in place.

mod api;
mod error;
mod manager;
mod model;
mod upload;

pub use api::{HttpTrackApi, TrackApi, parse_track_listing, resolve_url};
pub use error::ApiError;
pub use manager::{CatalogManager, ConfirmGate};
pub use model::{PlayableTrack, Track, TrackId, format_created_at, normalize_url};
pub use upload::{UploadFile, guess_content_type};

use tracing::warn;

/// The designated branch for transport/server failures.
///
/// Catalog operations never raise to their callers; a failed request is
/// logged here and otherwise observable only as "nothing changed".
pub(crate) fn ignore_transport_failure(operation: &str, err: &ApiError) {
    warn!(operation, error = %err, "catalog request failed, keeping previous state");
}
