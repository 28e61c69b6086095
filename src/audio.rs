//! Audio playback on a dedicated thread.
//!
//! The UI thread sends `AudioCmd`s; the audio thread owns the `rodio` output
//! stream, decodes track payloads and publishes `PlaybackInfo` through a
//! shared handle that the event loop samples for position ticks.

mod clock;
mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{AudioCmd, PlaybackInfo};
