use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::store::TrackStore;
use crate::track::{Track, encode_data_url, mime_for_path};

use super::{ImportError, ImportEvent};

pub(super) fn spawn_import(
    path: PathBuf,
    store: TrackStore,
    tx: Sender<ImportEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || import_file(&path, &store, &tx))
}

/// Read, encode and commit one file, reporting progress on `tx`.
pub(super) fn import_file(path: &Path, store: &TrackStore, tx: &Sender<ImportEvent>) {
    let result = commit(path, store, tx);
    match &result {
        Ok(track) => {
            let id = track.id.map(|id| id.to_string()).unwrap_or_default();
            info!(path = %path.display(), %id, "imported track");
        }
        Err(e) => warn!(path = %path.display(), error = %e, "import failed"),
    }

    // The receiver is gone once the UI has shut down; nothing left to tell.
    let _ = tx.send(ImportEvent::Finished {
        path: path.to_path_buf(),
        result,
    });
}

fn commit(path: &Path, store: &TrackStore, tx: &Sender<ImportEvent>) -> Result<Track, ImportError> {
    let track = read_track(path)?;
    let _ = tx.send(ImportEvent::Encoded(track.clone()));

    // Names are not unique; a repeat import is kept as its own track.
    if let Ok(existing) = store.find_by_name(&track.name) {
        if !existing.is_empty() {
            debug!(name = %track.name, copies = existing.len(), "track name already in store");
        }
    }
    Ok(store.append(&track)?)
}

/// Read a file and build its (id-less) track.
pub fn read_track(path: &Path) -> Result<Track, ImportError> {
    let bytes = fs::read(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(Track::new(name, encode_data_url(mime_for_path(path), &bytes)))
}
