//! Playlist controller.
//!
//! `App` lives in `app::model` and owns the playlist, the selected track and
//! the resume position, keeping the preferences file in step with them.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
