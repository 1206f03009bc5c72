use std::path::Path;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::state::{ClientState, StateCell};

use super::api::TrackApi;
use super::ignore_transport_failure;
use super::model::PlayableTrack;
use super::upload::UploadFile;

/// Interactive yes/no gate consulted before a delete request is sent.
pub trait ConfirmGate {
    fn confirm(&self, track: &PlayableTrack) -> bool;
}

impl<F> ConfirmGate for F
where
    F: Fn(&PlayableTrack) -> bool,
{
    fn confirm(&self, track: &PlayableTrack) -> bool {
        self(track)
    }
}

/// Holds the `uploading` flag high for as long as it lives.
///
/// Dropping the guard (normal return, error path, or the future being
/// dropped mid-request) puts the flag back to idle.
struct BusyGuard<'a> {
    flag: &'a StateCell<bool>,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a StateCell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Keeps `ClientState::catalog` in line with the server.
pub struct CatalogManager<A> {
    api: A,
    state: Rc<ClientState>,
}

impl<A: TrackApi> CatalogManager<A> {
    pub fn new(api: A, state: Rc<ClientState>) -> Self {
        Self { api, state }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn tracks(&self) -> Vec<PlayableTrack> {
        self.state.catalog.get()
    }

    pub fn is_uploading(&self) -> bool {
        self.state.uploading.get()
    }

    /// Re-fetch the listing and replace the whole catalog with it.
    ///
    /// On failure the current catalog is kept as is.
    pub async fn refresh(&self) {
        match self.api.list_tracks().await {
            Ok(records) => {
                let tracks: Vec<PlayableTrack> =
                    records.into_iter().map(PlayableTrack::from).collect();
                debug!(count = tracks.len(), "catalog replaced");
                self.state.catalog.set(tracks);
            }
            Err(e) => ignore_transport_failure("refresh", &e),
        }
    }

    /// Upload the picked file, then refresh.
    ///
    /// `None` means nothing was picked and does nothing at all. Concurrent
    /// calls are not serialized: each one raises and lowers `uploading` on
    /// its own.
    pub async fn upload(&self, file: Option<UploadFile>) {
        let Some(file) = file else {
            return;
        };
        let _busy = BusyGuard::acquire(&self.state.uploading);
        self.send_upload(&file).await;
    }

    /// Read the file at `path` and upload it, then refresh.
    ///
    /// `uploading` is raised before the disk read. A file that cannot be
    /// read is treated as nothing picked: no request is sent.
    pub async fn upload_path(&self, path: &Path) {
        let _busy = BusyGuard::acquire(&self.state.uploading);
        let file = match UploadFile::read(path).await {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read upload file");
                return;
            }
        };
        self.send_upload(&file).await;
    }

    async fn send_upload(&self, file: &UploadFile) {
        if !file.is_audio() {
            debug!(file = %file.file_name, content_type = %file.content_type, "uploading non-audio file");
        }
        match self.api.upload_track(file).await {
            Ok(()) => {
                info!(file = %file.file_name, "upload accepted");
                self.refresh().await;
            }
            Err(e) => ignore_transport_failure("upload", &e),
        }
    }

    /// Delete `track` on the server once `gate` confirms, then refresh.
    ///
    /// A declined gate sends nothing. The current selection is not touched
    /// here even when it refers to the deleted track.
    pub async fn delete(&self, track: &PlayableTrack, gate: &impl ConfirmGate) {
        if !gate.confirm(track) {
            debug!(id = %track.id(), "delete declined");
            return;
        }

        match self.api.delete_track(track.id()).await {
            Ok(()) => {
                info!(id = %track.id(), "track deleted");
                self.refresh().await;
            }
            Err(e) => ignore_transport_failure("delete", &e),
        }
    }
}
