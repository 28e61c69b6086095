use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::app::{App, Resume};
use crate::audio::{AudioCmd, AudioPlayer};
use crate::store::{StoreError, TrackStore};
use crate::track::Track;

/// Open the track store and read every track on a background thread.
///
/// The single result arrives on the returned channel.
pub fn spawn_loader(store: TrackStore) -> Receiver<Result<Vec<Track>, StoreError>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = store.initialize().and_then(|()| store.load_all());
        if let Err(e) = &result {
            warn!(path = %store.path().display(), error = %e, "track store unavailable");
        }
        let _ = tx.send(result);
    });
    rx
}

/// Hand a restored selection and position to the audio thread.
pub fn apply_resume(app: &App, audio_player: &AudioPlayer, resume: Resume) {
    let Some(track) = app.playlist().get(resume.index) else {
        return;
    };
    debug!(index = resume.index, seek = ?resume.seek, "resuming playback");

    let _ = audio_player.send(AudioCmd::Load {
        index: resume.index,
        audio_data: track.audio_data.clone(),
        start_at: resume.seek.unwrap_or(Duration::ZERO),
        autoplay: resume.autoplay,
    });
}
