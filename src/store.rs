//! Durable storage: the SQLite-backed track store and the TOML preferences
//! file that remembers where playback left off.
//!
//! Both stores open their backing file per operation and hold no handle
//! between calls, so worker threads can use them without coordination.

mod error;
mod prefs;
mod tracks;

pub use error::StoreError;
pub use prefs::{PrefKey, PreferenceStore, format_position, parse_index, parse_position};
pub use tracks::{SCHEMA_VERSION, TrackStore};
