use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::catalog::PlayableTrack;
use crate::state::ClientState;

use super::ignore_playback_rejection;
use super::resource::PlaybackResource;

/// Owns the selection and drives the shared playback resource from it.
pub struct PlaybackCoordinator {
    state: Rc<ClientState>,
}

impl PlaybackCoordinator {
    /// Take ownership of `resource` and start following selection changes.
    ///
    /// The resource is only ever touched from the selection observer, so the
    /// latest `select` is always the last one to rebind it.
    pub fn new<R>(state: Rc<ClientState>, resource: R) -> Self
    where
        R: PlaybackResource + 'static,
    {
        let resource = RefCell::new(resource);
        state.selection.subscribe(move |selection| {
            let Some(track) = selection else {
                return;
            };
            let mut resource = resource.borrow_mut();
            resource.bind(track.id(), &track.url);
            if let Err(e) = resource.begin() {
                ignore_playback_rejection(&e);
            }
        });

        Self { state }
    }

    /// Make `track` the current selection and start playing it.
    ///
    /// Always replaces the previous selection, including with the same track.
    pub fn select(&self, track: PlayableTrack) {
        info!(id = %track.id(), url = %track.url, "selected track");
        self.state.selection.set(Some(track));
    }

    pub fn selection(&self) -> Option<PlayableTrack> {
        self.state.selection.get()
    }
}
