use super::*;
use crate::store::{PrefKey, PreferenceStore, StoreError, TrackStore};
use crate::track::{Track, TrackId};
use std::time::Duration;

fn t(name: &str) -> Track {
    Track::new(name, format!("data:audio/mpeg;base64,{}", name.len()))
}

fn stored(n: usize) -> Vec<Track> {
    (0..n)
        .map(|i| t(&format!("{i}.mp3")).with_id(TrackId(i as i64 + 1)))
        .collect()
}

fn setup() -> (tempfile::TempDir, PreferenceStore) {
    let dir = tempfile::tempdir().unwrap();
    let prefs = PreferenceStore::new(dir.path().join("preferences.toml"));
    (dir, prefs)
}

fn ready(prefs: &PreferenceStore, tracks: Vec<Track>) -> (App, Option<Resume>) {
    let mut app = App::new(prefs.clone(), true);
    let resume = app.finish_loading(Ok(tracks));
    (app, resume)
}

#[test]
fn starts_loading_and_ignores_actions_until_ready() {
    let (_dir, prefs) = setup();
    let mut app = App::new(prefs.clone(), true);

    assert!(app.is_loading());
    assert!(app.view().loading);
    assert!(app.select(2).is_none());
    app.record_position(12.0);

    assert_eq!(app.position(), None);
    assert_eq!(prefs.get(PrefKey::CurrentTime), None);
    assert_eq!(prefs.get(PrefKey::CurrentSongIndex), None);
}

#[test]
fn empty_store_startup_is_ready_with_no_resume() {
    let (_dir, prefs) = setup();
    prefs.set(PrefKey::CurrentTime, "10.00").unwrap();

    let (app, resume) = ready(&prefs, Vec::new());

    assert!(!app.is_loading());
    assert!(!app.view().loading);
    assert!(app.playlist().is_empty());
    assert_eq!(resume, None);
    assert_eq!(app.now_playing(), None);
    assert_eq!(app.position(), None);
}

#[test]
fn failed_load_degrades_to_an_empty_playlist() {
    let (_dir, prefs) = setup();
    let mut app = App::new(prefs, true);
    let err = StoreError::Io(std::io::Error::other("disk on fire"));

    assert_eq!(app.finish_loading(Err(err)), None);
    assert!(!app.is_loading());
    assert!(!app.has_tracks());
}

#[test]
fn first_launch_defaults_to_first_track_without_seek() {
    let (_dir, prefs) = setup();
    let (app, resume) = ready(&prefs, stored(3));

    assert_eq!(
        resume,
        Some(Resume {
            index: 0,
            seek: None,
            autoplay: true
        })
    );
    assert_eq!(app.selected(), 0);
    assert_eq!(app.now_playing().map(|t| t.name.as_str()), Some("0.mp3"));
}

#[test]
fn selected_index_survives_a_restart() {
    let (_dir, prefs) = setup();
    let (mut app, _) = ready(&prefs, stored(3));
    let picked = app.select(2).map(|(i, t)| (i, t.name.clone()));
    assert_eq!(picked, Some((2, "2.mp3".to_string())));
    drop(app);

    let (app, resume) = ready(&prefs, stored(3));
    assert_eq!(app.selected(), 2);
    assert_eq!(resume.map(|r| r.index), Some(2));
}

#[test]
fn playback_position_is_restored_rounded_to_hundredths() {
    let (_dir, prefs) = setup();
    let (mut app, _) = ready(&prefs, stored(1));
    app.record_position(12.0);
    app.record_position(37.4612);
    drop(app);

    let (app, resume) = ready(&prefs, stored(1));
    let resume = resume.unwrap();
    assert!(resume.autoplay);
    let seek = resume.seek.unwrap().as_secs_f64();
    assert!((seek - 37.46).abs() < 1e-9);
    assert_eq!(app.position(), Some(37.46));
}

#[test]
fn zero_values_never_overwrite_saved_preferences() {
    let (_dir, prefs) = setup();
    let (mut app, _) = ready(&prefs, stored(3));
    app.select(1);
    app.record_position(5.5);

    app.select(0);
    app.record_position(0.0);

    assert_eq!(app.selected(), 0);
    assert_eq!(app.position(), Some(0.0));
    assert_eq!(prefs.get(PrefKey::CurrentSongIndex).as_deref(), Some("1"));
    assert_eq!(prefs.get(PrefKey::CurrentTime).as_deref(), Some("5.50"));
}

#[test]
fn stale_index_is_clamped_into_a_shorter_playlist() {
    let (_dir, prefs) = setup();
    prefs.set(PrefKey::CurrentSongIndex, "9").unwrap();

    let (app, resume) = ready(&prefs, stored(2));
    assert_eq!(app.selected(), 1);
    assert_eq!(resume.map(|r| r.index), Some(1));
}

#[test]
fn malformed_preferences_fall_back_to_defaults() {
    let (_dir, prefs) = setup();
    prefs.set(PrefKey::CurrentSongIndex, "two").unwrap();
    prefs.set(PrefKey::CurrentTime, "soon").unwrap();

    let (app, resume) = ready(&prefs, stored(2));
    assert_eq!(app.selected(), 0);
    assert_eq!(resume.unwrap().seek, None);
}

#[test]
fn oversized_saved_position_restores_without_a_seek() {
    let (dir, prefs) = setup();
    std::fs::write(
        dir.path().join("preferences.toml"),
        "currentSongIndex = \"1\"\ncurrentTime = 1e30\n",
    )
    .unwrap();

    let (app, resume) = ready(&prefs, stored(2));
    let resume = resume.unwrap();
    assert_eq!(resume.index, 1);
    assert_eq!(resume.seek, None);
    assert_eq!(app.position(), None);
}

#[test]
fn select_clamps_out_of_range_requests() {
    let (_dir, prefs) = setup();
    let (mut app, _) = ready(&prefs, stored(3));

    let picked = app.select(42).map(|(i, t)| (i, t.name.clone()));
    assert_eq!(picked, Some((2, "2.mp3".to_string())));
    assert_eq!(app.selected(), 2);
    assert_eq!(app.cursor, 2);
    assert_eq!(prefs.get(PrefKey::CurrentSongIndex).as_deref(), Some("2"));
}

#[test]
fn imports_append_without_touching_selection_or_position() {
    let (_dir, prefs) = setup();
    let (mut app, _) = ready(&prefs, stored(2));
    app.select(1);
    app.record_position(3.25);

    assert_eq!(app.push_imported(t("new.mp3")), None);
    assert_eq!(app.playlist().len(), 3);
    assert_eq!(app.playlist()[2].id, None);
    assert_eq!(app.selected(), 1);
    assert_eq!(app.position(), Some(3.25));
}

#[test]
fn first_import_into_an_empty_playlist_restores_once() {
    let (_dir, prefs) = setup();
    prefs.set(PrefKey::CurrentTime, "8.00").unwrap();
    let (mut app, resume) = ready(&prefs, Vec::new());
    assert_eq!(resume, None);

    let resume = app.push_imported(t("a.mp3")).unwrap();
    assert_eq!(resume.index, 0);
    assert_eq!(resume.seek, Some(Duration::from_secs(8)));

    assert_eq!(app.push_imported(t("b.mp3")), None);
    let names: Vec<&str> = app.view().names;
    assert_eq!(names, vec!["a.mp3", "b.mp3"]);
}

#[test]
fn import_then_restart_shows_tracks_in_import_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = TrackStore::new(dir.path().join("playlist.db"));
    let prefs = PreferenceStore::new(dir.path().join("preferences.toml"));
    store.initialize().unwrap();

    let (mut app, _) = ready(&prefs, store.load_all().unwrap());
    for name in ["a.mp3", "b.mp3"] {
        let track = t(name);
        app.push_imported(track.clone());
        store.append(&track).unwrap();
    }
    assert_eq!(app.view().names, vec!["a.mp3", "b.mp3"]);

    let (reloaded, _) = ready(&prefs, store.load_all().unwrap());
    let ids: Vec<_> = reloaded.playlist().iter().map(|t| t.id).collect();
    assert_eq!(reloaded.view().names, vec!["a.mp3", "b.mp3"]);
    assert!(ids.iter().all(Option::is_some));
    assert!(ids[0] < ids[1]);
}

#[test]
fn second_startup_load_is_ignored() {
    let (_dir, prefs) = setup();
    let (mut app, _) = ready(&prefs, stored(2));
    assert_eq!(app.finish_loading(Ok(stored(5))), None);
    assert_eq!(app.playlist().len(), 2);
}

#[test]
fn cursor_wraps_and_select_cursor_commits_it() {
    let (_dir, prefs) = setup();
    let (mut app, _) = ready(&prefs, stored(3));

    app.prev();
    assert_eq!(app.cursor, 2);
    app.next();
    assert_eq!(app.cursor, 0);
    app.next();
    assert_eq!(app.selected(), 0);

    let picked = app.select_cursor().map(|(i, t)| (i, t.name.clone()));
    assert_eq!(picked, Some((1, "1.mp3".to_string())));
    let view = app.view();
    assert_eq!(view.selected, 1);
    assert_eq!(view.now_playing, Some("1.mp3"));
}

#[test]
fn select_cursor_reports_the_clamped_index() {
    let (_dir, prefs) = setup();
    let (mut app, _) = ready(&prefs, stored(3));
    app.cursor = 10;

    let index = app.select_cursor().map(|(i, _)| i);
    assert_eq!(index, Some(2));
    assert_eq!(app.selected(), 2);
    assert_eq!(app.cursor, 2);
}

#[test]
fn player_reports_only_count_for_the_selected_track() {
    let (_dir, prefs) = setup();
    let (mut app, _) = ready(&prefs, stored(3));
    app.select(1);

    app.observe_playback(Some(2), Duration::from_secs(40), true);
    app.observe_playback(None, Duration::from_secs(41), true);
    assert_eq!(app.position(), None);

    app.observe_playback(Some(1), Duration::from_secs(12), true);
    assert_eq!(app.position(), Some(12.0));
    assert_eq!(prefs.get(PrefKey::CurrentTime).as_deref(), Some("12.00"));
}

#[test]
fn seeking_while_paused_is_saved_once() {
    let (_dir, prefs) = setup();
    let (mut app, _) = ready(&prefs, stored(1));
    app.observe_playback(Some(0), Duration::from_secs(30), true);

    // Paused and unmoved: nothing new to save.
    prefs.set(PrefKey::CurrentTime, "1.00").unwrap();
    app.observe_playback(Some(0), Duration::from_secs(30), false);
    assert_eq!(prefs.get(PrefKey::CurrentTime).as_deref(), Some("1.00"));

    // Paused after a rewind: the new position is saved.
    app.observe_playback(Some(0), Duration::from_secs(25), false);
    assert_eq!(app.position(), Some(25.0));
    assert_eq!(prefs.get(PrefKey::CurrentTime).as_deref(), Some("25.00"));
}
