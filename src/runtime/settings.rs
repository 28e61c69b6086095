use crate::config::Settings;

/// Settings to start with, plus a note when the defaults had to stand in.
///
/// The note is returned rather than printed so it can go to the log once
/// logging (which itself depends on the settings) is running.
pub fn load_settings() -> (Settings, Option<String>) {
    let loaded = Settings::load()
        .map_err(|e| format!("failed to load config, using defaults: {e}"))
        .and_then(|s| match s.validate() {
            Ok(()) => Ok(s),
            Err(msg) => Err(format!("invalid config, using defaults: {msg}")),
        });

    match loaded {
        Ok(settings) => (settings, None),
        Err(note) => (Settings::default(), Some(note)),
    }
}
