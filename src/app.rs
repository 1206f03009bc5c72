//! Application module: exposes the terminal model used by the UI and runtime.
//!
//! The `App` model lives in `app::model` and holds cursor and prompt state.
//! Track data itself lives in `ClientState`.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
