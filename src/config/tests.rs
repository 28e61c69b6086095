use super::load::{default_config_path, default_data_dir, resolve_config_path};
use super::schema::*;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_encore_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", "/tmp/encore-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/encore-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/xdg-config-home")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn default_data_dir_falls_back_to_home_local_share() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_DATA_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_data_dir().unwrap(),
        PathBuf::from("/tmp/home-dir")
            .join(".local/share")
            .join("encore")
    );
}

#[test]
fn storage_paths_are_joined_onto_the_configured_data_dir() {
    let mut s = Settings::default();
    s.storage.data_dir = Some(PathBuf::from("/srv/encore"));

    assert_eq!(s.database_path(), PathBuf::from("/srv/encore/playlist.db"));
    assert_eq!(
        s.preferences_path(),
        PathBuf::from("/srv/encore/preferences.toml")
    );
    assert_eq!(s.log_path(), PathBuf::from("/srv/encore/encore.log"));
}

#[test]
fn validate_rejects_zero_tick_and_empty_file_names() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.playback.position_tick_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.storage.database_file = "  ".into();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.storage.preferences_file = String::new();
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[storage]
data_dir = "/var/lib/encore"
database_file = "tracks.sqlite"

[import]
extensions = ["mp3"]
recursive = false
include_hidden = true

[playback]
autoplay_on_resume = false
position_tick_ms = 1000

[controls]
scrub_seconds = 15

[ui]
header_text = "hello"

[log]
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ENCORE__PLAYBACK__POSITION_TICK_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.storage.data_dir, Some(PathBuf::from("/var/lib/encore")));
    assert_eq!(s.storage.database_file, "tracks.sqlite");
    assert_eq!(s.storage.preferences_file, "preferences.toml");
    assert_eq!(s.import.extensions, vec!["mp3".to_string()]);
    assert!(!s.import.recursive);
    assert!(s.import.include_hidden);
    assert!(s.import.follow_links);
    assert!(!s.playback.autoplay_on_resume);
    assert_eq!(s.playback.position_tick_ms, 1000);
    assert_eq!(s.controls.scrub_seconds, 15);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.log.level, "debug");
    assert_eq!(s.log.file_name, "encore.log");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
position_tick_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ENCORE__PLAYBACK__POSITION_TICK_MS", "750");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.position_tick_ms, 750);
    assert_eq!(s.controls.scrub_seconds, 5);
}
