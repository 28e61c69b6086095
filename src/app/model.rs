//! Playlist controller: `App`, its lifecycle `Phase` and the `Resume`
//! instruction produced when saved state is restored.
//!
//! `App` owns the in-memory playlist, the selected index and the last known
//! playback position. Every user or playback action goes through it so the
//! in-memory state and the preferences file move together.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::store::{
    PrefKey, PreferenceStore, StoreError, format_position, parse_index, parse_position,
};
use crate::track::Track;

/// Lifecycle of the controller. `Loading` is left exactly once.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Loading,
    Ready,
}

/// Restored state for the player: which track, where in it, and whether to
/// start playing immediately.
#[derive(Clone, Debug, PartialEq)]
pub struct Resume {
    pub index: usize,
    pub seek: Option<Duration>,
    pub autoplay: bool,
}

/// Everything the presentation layer needs to draw a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct View<'a> {
    pub loading: bool,
    pub names: Vec<&'a str>,
    pub selected: usize,
    pub cursor: usize,
    pub now_playing: Option<&'a str>,
    pub position: Option<f64>,
}

/// The playlist controller.
pub struct App {
    phase: Phase,
    playlist: Vec<Track>,
    selected: usize,
    position: Option<f64>,
    /// UI highlight; becomes the selection on `select`.
    pub cursor: usize,
    prefs: PreferenceStore,
    autoplay_on_resume: bool,
    restored: bool,
}

impl App {
    /// Create a controller in the `Loading` phase.
    pub fn new(prefs: PreferenceStore, autoplay_on_resume: bool) -> Self {
        Self {
            phase: Phase::Loading,
            playlist: Vec::new(),
            selected: 0,
            position: None,
            cursor: 0,
            prefs,
            autoplay_on_resume,
            restored: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn playlist(&self) -> &[Track] {
        &self.playlist
    }

    pub fn has_tracks(&self) -> bool {
        !self.playlist.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Last position recorded or restored, in seconds.
    pub fn position(&self) -> Option<f64> {
        self.position
    }

    /// The track that is (or would be) playing.
    pub fn now_playing(&self) -> Option<&Track> {
        self.playlist.get(self.selected)
    }

    /// Leave `Loading` with the outcome of the startup store read.
    ///
    /// A failed read counts as an empty playlist. Returns the resume
    /// instruction when there is something to play.
    pub fn finish_loading(&mut self, loaded: Result<Vec<Track>, StoreError>) -> Option<Resume> {
        if self.phase == Phase::Ready {
            warn!("ignoring a second startup load");
            return None;
        }

        self.playlist = match loaded {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!(error = %e, "could not load playlist, starting empty");
                Vec::new()
            }
        };
        self.phase = Phase::Ready;
        info!(tracks = self.playlist.len(), "playlist ready");

        self.restore_once()
    }

    /// Add a freshly imported track to the end of the playlist.
    ///
    /// Selection and position are left alone, except that the first track of
    /// a previously empty playlist triggers the one-time restore.
    pub fn push_imported(&mut self, track: Track) -> Option<Resume> {
        if self.phase == Phase::Loading {
            // The startup load replaces the playlist wholesale; the stored copy shows up there.
            debug!(name = %track.name, "import finished before the playlist loaded");
            return None;
        }
        self.playlist.push(track);
        self.restore_once()
    }

    /// Make `index` the selected track (clamped into the playlist).
    ///
    /// Non-zero selections are saved as `currentSongIndex`. Returns the index
    /// actually selected along with its track.
    pub fn select(&mut self, index: usize) -> Option<(usize, &Track)> {
        if self.phase != Phase::Ready || self.playlist.is_empty() {
            return None;
        }

        let index = self.clamp(index);
        self.selected = index;
        self.cursor = index;

        // Zero is never written: a stored index survives a selection of the first track.
        if index != 0 {
            if let Err(e) = self.prefs.set(PrefKey::CurrentSongIndex, &index.to_string()) {
                warn!(error = %e, index, "could not save selected track");
            }
        }

        self.playlist.get(index).map(|track| (index, track))
    }

    /// Select whatever the cursor points at.
    pub fn select_cursor(&mut self) -> Option<(usize, &Track)> {
        self.select(self.cursor)
    }

    /// Record the playback position reported by the player.
    ///
    /// Non-zero positions are saved as `currentTime` with two decimals.
    pub fn record_position(&mut self, secs: f64) {
        if self.phase != Phase::Ready || self.playlist.is_empty() || !secs.is_finite() {
            return;
        }

        self.position = Some(secs);
        if secs != 0.0 {
            if let Err(e) = self.prefs.set(PrefKey::CurrentTime, &format_position(secs)) {
                warn!(error = %e, "could not save playback position");
            }
        }
    }

    /// Take in a position report from the player.
    ///
    /// Only the selected track counts. While paused a report is recorded only
    /// when it differs from the last position, which is how a seek on a
    /// paused track gets saved.
    pub fn observe_playback(&mut self, index: Option<usize>, elapsed: Duration, playing: bool) {
        if index != Some(self.selected) {
            return;
        }
        let secs = elapsed.as_secs_f64();
        if playing || self.position != Some(secs) {
            self.record_position(secs);
        }
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self) {
        if !self.playlist.is_empty() {
            self.cursor = (self.cursor + 1) % self.playlist.len();
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self) {
        if !self.playlist.is_empty() {
            self.cursor = self
                .cursor
                .checked_sub(1)
                .unwrap_or(self.playlist.len() - 1);
        }
    }

    pub fn view(&self) -> View<'_> {
        View {
            loading: self.is_loading(),
            names: self.playlist.iter().map(|t| t.name.as_str()).collect(),
            selected: self.selected,
            cursor: self.cursor,
            now_playing: self.now_playing().map(|t| t.name.as_str()),
            position: self.position,
        }
    }

    fn clamp(&self, index: usize) -> usize {
        index.min(self.playlist.len().saturating_sub(1))
    }

    /// Apply the saved index and position the first time the playlist has
    /// something in it.
    fn restore_once(&mut self) -> Option<Resume> {
        if self.restored || self.playlist.is_empty() {
            return None;
        }
        self.restored = true;

        let saved_index = parse_index(self.prefs.get(PrefKey::CurrentSongIndex).as_deref());
        let saved_time = parse_position(self.prefs.get(PrefKey::CurrentTime).as_deref());

        self.selected = self.clamp(saved_index.unwrap_or(0));
        self.cursor = self.selected;
        self.position = saved_time;
        debug!(?saved_index, ?saved_time, selected = self.selected, "restored playback state");

        Some(Resume {
            index: self.selected,
            seek: saved_time.and_then(|secs| Duration::try_from_secs_f64(secs).ok()),
            autoplay: self.autoplay_on_resume,
        })
    }
}
