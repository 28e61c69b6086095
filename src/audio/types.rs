//! Commands accepted by the audio thread and the state it shares back.

use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current track with playlist entry `index`, positioned at
    /// `start_at`, playing right away when `autoplay` is set.
    Load {
        index: usize,
        audio_data: String,
        start_at: Duration,
        autoplay: bool,
    },
    /// Toggle pause/resume of the loaded track.
    TogglePause,
    /// Move the loaded track's position by this many seconds (negative
    /// rewinds), clamped to the track's bounds.
    SeekBy(i32),
    /// Stop and unload the current track.
    Stop,
    /// Stop playback and end the audio thread.
    Quit,
}

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Playlist index of the loaded track (if any).
    pub index: Option<usize>,
    /// Position within the loaded track, including the resume offset.
    pub elapsed: Duration,
    /// Whether playback is currently active.
    pub playing: bool,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
