use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use toml::{Table, Value};
use tracing::warn;

use super::error::StoreError;

/// Keys of the resume-state preferences file.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PrefKey {
    /// Last observed playback position, seconds with two decimals.
    CurrentTime,
    /// Last selected playlist index.
    CurrentSongIndex,
}

impl PrefKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CurrentTime => "currentTime",
            Self::CurrentSongIndex => "currentSongIndex",
        }
    }
}

/// Small key-value store persisted as a flat TOML table of strings.
///
/// Reads never fail: a missing file, a missing key or an unreadable file all
/// come back as `None`. Writes rewrite the whole file.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw stored value for `key`, if any.
    pub fn get(&self, key: PrefKey) -> Option<String> {
        let table = match self.read_table() {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable preferences");
                return None;
            }
        };

        match table.get(key.as_str())? {
            Value::String(s) => Some(s.clone()),
            // Hand-edited files may hold bare numbers.
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            _ => None,
        }
    }

    /// Store `value` under `key`, keeping every other key as it was.
    pub fn set(&self, key: PrefKey, value: &str) -> Result<(), StoreError> {
        let mut table = match self.read_table() {
            Ok(t) => t,
            Err(StoreError::Decode(e)) => {
                warn!(path = %self.path.display(), error = %e, "replacing corrupt preferences");
                Table::new()
            }
            Err(e) => return Err(e),
        };
        table.insert(key.as_str().to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, toml::to_string(&table)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn read_table(&self) -> Result<Table, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(toml::from_str::<Table>(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Table::new()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Parse a stored playback position; anything that is not a non-negative
/// number small enough to seek to means "no seek".
pub fn parse_position(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|secs| Duration::try_from_secs_f64(*secs).is_ok())
}

/// Parse a stored playlist index.
pub fn parse_index(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
}

/// Text form of a playback position: seconds with two decimals.
pub fn format_position(secs: f64) -> String {
    format!("{secs:.2}")
}
