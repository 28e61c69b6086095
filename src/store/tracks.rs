use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, Row, TransactionBehavior, params};
use tracing::{debug, info};

use crate::track::{Track, TrackId};

use super::error::StoreError;

/// Schema version stamped into `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// Durable record store holding one row per imported track.
///
/// Every operation opens its own connection and closes it before returning.
#[derive(Debug, Clone)]
pub struct TrackStore {
    path: PathBuf,
}

impl TrackStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open (creating if absent) the database and bring its schema up to date.
    ///
    /// Re-running this against an existing database leaves its rows untouched.
    pub fn initialize(&self) -> Result<(), StoreError> {
        let _conn = self.open()?;
        Ok(())
    }

    /// Every stored track, oldest import first.
    pub fn load_all(&self) -> Result<Vec<Track>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare("SELECT id, name, audio_data FROM playlist ORDER BY id ASC")?;
        let rows = stmt.query_map([], track_from_row)?;

        let mut tracks = Vec::new();
        for track in rows {
            tracks.push(track?);
        }
        debug!(count = tracks.len(), path = %self.path.display(), "loaded tracks");
        Ok(tracks)
    }

    /// Persist `track` as a new row. Any id already on `track` is ignored;
    /// the returned copy carries the id the database assigned.
    pub fn append(&self, track: &Track) -> Result<Track, StoreError> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO playlist (name, audio_data) VALUES (?1, ?2)",
            params![track.name, track.audio_data],
        )?;
        let id = TrackId(conn.last_insert_rowid());
        debug!(%id, name = %track.name, "appended track");

        Ok(Track::new(track.name.clone(), track.audio_data.clone()).with_id(id))
    }

    /// Tracks whose name matches exactly, oldest first.
    pub fn find_by_name(&self, name: &str) -> Result<Vec<Track>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, audio_data FROM playlist WHERE name = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![name], track_from_row)?;

        let mut tracks = Vec::new();
        for track in rows {
            tracks.push(track?);
        }
        Ok(tracks)
    }

    fn open(&self) -> Result<Connection, StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut conn = Connection::open(&self.path)?;
        // Importer threads may open the database at the same time.
        conn.busy_timeout(Duration::from_secs(5))?;
        migrate(&mut conn)?;
        Ok(conn)
    }
}

fn track_from_row(row: &Row<'_>) -> rusqlite::Result<Track> {
    let id = TrackId(row.get(0)?);
    Ok(Track::new(row.get::<_, String>(1)?, row.get::<_, String>(2)?).with_id(id))
}

fn schema_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("PRAGMA user_version", [], |r| r.get(0))
}

/// Upgrade the schema step by step from the stored version to `SCHEMA_VERSION`.
///
/// New fields go in a new `if version < N` step followed by bumping
/// `SCHEMA_VERSION`; existing steps never change.
fn migrate(conn: &mut Connection) -> Result<(), StoreError> {
    let found = schema_version(conn)?;
    if found == SCHEMA_VERSION {
        return Ok(());
    }
    if found > SCHEMA_VERSION {
        return Err(StoreError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    // Another connection may have migrated while we waited for the write lock.
    let version = schema_version(&tx)?;

    if version < 1 {
        tx.execute_batch(
            "CREATE TABLE IF NOT EXISTS playlist (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                audio_data TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS playlist_name ON playlist (name);
            CREATE INDEX IF NOT EXISTS playlist_audio_data ON playlist (audio_data);",
        )?;
    }

    if version < SCHEMA_VERSION {
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        info!(from = version, to = SCHEMA_VERSION, "migrated track database schema");
    }
    tx.commit()?;
    Ok(())
}
