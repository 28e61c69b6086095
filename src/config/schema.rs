use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/encore/config.toml` or `~/.config/encore/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ENCORE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub import: ImportSettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the track database, the preferences file and the log.
    /// Defaults to `$XDG_DATA_HOME/encore` or `~/.local/share/encore`.
    pub data_dir: Option<PathBuf>,
    /// SQLite database file name, relative to `data_dir`.
    pub database_file: String,
    /// Preferences (resume state) file name, relative to `data_dir`.
    pub preferences_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            database_file: "playlist.db".to_string(),
            preferences_file: "preferences.toml".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// File extensions picked up when a directory is imported
    /// (case-insensitive, without dot). Files named explicitly are always accepted.
    pub extensions: Vec<String>,
    /// Whether to recurse into subdirectories of an imported directory.
    pub recursive: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to follow symlinks while walking directories.
    pub follow_links: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            extensions: ["mp3", "flac", "wav", "ogg", "m4a", "aac", "opus"]
                .into_iter()
                .map(String::from)
                .collect(),
            recursive: true,
            include_hidden: false,
            follow_links: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Start playing as soon as the saved position has been restored.
    pub autoplay_on_resume: bool,
    /// How often the playback position is sampled and saved (milliseconds).
    pub position_tick_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            autoplay_on_resume: true,
            position_tick_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `h` / `l` (or the arrow keys).
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ encore: pick up where you left off ~ ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Log file name, relative to the data directory.
    pub file_name: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_name: "encore.log".to_string(),
        }
    }
}
