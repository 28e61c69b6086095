use thiserror::Error;

/// Errors raised by the track store and the preferences store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite operation error (wraps rusqlite::Error)
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Preferences file exists but is not valid TOML
    #[error("preferences file is not valid TOML: {0}")]
    Decode(#[from] toml::de::Error),

    #[error("could not encode preferences: {0}")]
    Encode(#[from] toml::ser::Error),

    /// Database was written by a newer schema than this build understands
    #[error("track database schema v{found} is newer than supported v{supported}")]
    SchemaTooNew { found: i64, supported: i64 },
}
