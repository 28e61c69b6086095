//! Importer: turns user-chosen files into tracks.
//!
//! Each file is read, encoded and committed on its own worker thread. The
//! encoded track is handed to the playlist right away (optimistic update)
//! while the same track is appended to the durable store independently.

mod expand;
mod worker;

use std::path::PathBuf;
use std::sync::mpsc::Sender;

use tracing::debug;

use crate::config::ImportSettings;
use crate::store::{StoreError, TrackStore};
use crate::track::Track;

pub use expand::expand_paths;

/// Progress reported by importer threads to the event loop.
#[derive(Debug)]
pub enum ImportEvent {
    /// A file was read and encoded; it belongs in the playlist now.
    Encoded(Track),
    /// The durable write for `path` is done (or the file never got that far).
    Finished {
        path: PathBuf,
        result: Result<Track, ImportError>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not store track: {0}")]
    Store(#[from] StoreError),
}

pub struct Importer {
    store: TrackStore,
    settings: ImportSettings,
    tx: Sender<ImportEvent>,
}

impl Importer {
    pub fn new(store: TrackStore, settings: ImportSettings, tx: Sender<ImportEvent>) -> Self {
        Self {
            store,
            settings,
            tx,
        }
    }

    /// Start importing every file named by `paths` (directories are expanded).
    ///
    /// Returns how many files were dispatched; one `Finished` event follows
    /// for each of them.
    pub fn import(&self, paths: &[PathBuf]) -> usize {
        let files = expand_paths(paths, &self.settings);
        debug!(requested = paths.len(), files = files.len(), "starting import batch");

        for file in &files {
            worker::spawn_import(file.clone(), self.store.clone(), self.tx.clone());
        }
        files.len()
    }
}
