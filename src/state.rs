//! Shared client state.
//!
//! `ClientState` is the single container for everything the core mutates:
//! the catalog, the upload busy flag and the playback selection. Each field is
//! a `StateCell`, so components can register observers on the cells they
//! care about and react synchronously to every write.

mod cell;

pub use cell::StateCell;

use crate::catalog::PlayableTrack;

/// Named state cells shared by the catalog manager and playback coordinator.
///
/// The catalog manager writes `catalog` and `uploading`; the playback
/// coordinator writes `selection`. Neither touches the other's cells.
#[derive(Default)]
pub struct ClientState {
    pub catalog: StateCell<Vec<PlayableTrack>>,
    pub uploading: StateCell<bool>,
    pub selection: StateCell<Option<PlayableTrack>>,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests;
