use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::App;
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;
use crate::import::{ImportEvent, Importer};
use crate::store::StoreError;
use crate::track::Track;
use crate::ui;

use super::startup::apply_resume;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Contents of the import prompt while it is open.
    pub import_input: Option<String>,
    /// Paths waiting for the playlist to finish loading before import starts.
    pub deferred_imports: Vec<PathBuf>,
    /// Imports dispatched whose `Finished` event has not arrived.
    pub pending_imports: usize,
    last_tick: Instant,
}

impl EventLoopState {
    pub fn new(deferred_imports: Vec<PathBuf>) -> Self {
        Self {
            import_input: None,
            deferred_imports,
            pending_imports: 0,
            last_tick: Instant::now(),
        }
    }
}

/// Main terminal event loop: handles input, UI drawing, the startup load,
/// importer progress and position ticks. Returns `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    importer: &Importer,
    startup_rx: &Receiver<Result<Vec<Track>, StoreError>>,
    import_rx: &Receiver<ImportEvent>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = Duration::from_millis(settings.playback.position_tick_ms);

    loop {
        if app.is_loading() {
            poll_startup(app, audio_player, importer, startup_rx, state);
        }

        while let Ok(ev) = import_rx.try_recv() {
            handle_import_event(ev, app, audio_player, state);
        }

        let info = audio_player.info();
        if state.last_tick.elapsed() >= tick {
            state.last_tick = Instant::now();
            app.observe_playback(info.index, info.elapsed, info.playing);
        }

        let view = app.view();
        let status = ui::Status {
            import_input: state.import_input.as_deref(),
            pending_imports: state.pending_imports,
            elapsed: info.index.map(|_| info.elapsed),
            playing: info.playing,
        };
        terminal.draw(|f| ui::draw(f, &view, &status, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let scrub_seconds = settings.controls.scrub_seconds;
                if handle_key_event(key, app, audio_player, importer, scrub_seconds, state) {
                    break;
                }
            }
        }
    }

    // Save where we stopped; the last tick may be up to one interval old.
    let info = audio_player.info();
    if info.index == Some(app.selected()) {
        app.record_position(info.elapsed.as_secs_f64());
    }

    Ok(())
}

fn poll_startup(
    app: &mut App,
    audio_player: &AudioPlayer,
    importer: &Importer,
    startup_rx: &Receiver<Result<Vec<Track>, StoreError>>,
    state: &mut EventLoopState,
) {
    let loaded = match startup_rx.try_recv() {
        Ok(result) => result,
        Err(TryRecvError::Empty) => return,
        Err(TryRecvError::Disconnected) => {
            warn!("playlist loader exited without a result");
            Ok(Vec::new())
        }
    };

    if let Some(resume) = app.finish_loading(loaded) {
        apply_resume(app, audio_player, resume);
    }

    if !state.deferred_imports.is_empty() {
        let paths = std::mem::take(&mut state.deferred_imports);
        state.pending_imports += importer.import(&paths);
    }
}

fn handle_import_event(
    ev: ImportEvent,
    app: &mut App,
    audio_player: &AudioPlayer,
    state: &mut EventLoopState,
) {
    match ev {
        ImportEvent::Encoded(track) => {
            if let Some(resume) = app.push_imported(track) {
                apply_resume(app, audio_player, resume);
            }
        }
        ImportEvent::Finished { path, result } => {
            state.pending_imports = state.pending_imports.saturating_sub(1);
            if let Err(e) = result {
                // Already logged by the worker; the UI stays quiet about it.
                debug!(path = %path.display(), error = %e, "import did not complete");
            }
        }
    }
}

/// Returns `true` when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    audio_player: &AudioPlayer,
    importer: &Importer,
    scrub_seconds: u64,
    state: &mut EventLoopState,
) -> bool {
    if let Some(input) = state.import_input.as_mut() {
        match key.code {
            KeyCode::Esc => state.import_input = None,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Enter => {
                let path = input.trim().to_string();
                state.import_input = None;
                if !path.is_empty() {
                    state.pending_imports += importer.import(&[PathBuf::from(path)]);
                }
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    input.push(c);
                }
            }
            _ => {}
        }
        return false;
    }

    if key.code == KeyCode::Char('q') {
        return true;
    }
    // Only quitting is possible until the playlist has loaded.
    if app.is_loading() {
        return false;
    }

    match key.code {
        KeyCode::Char('a') => state.import_input = Some(String::new()),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Char('l') | KeyCode::Right => {
            let secs = scrub_seconds.min(i32::MAX as u64) as i32;
            let _ = audio_player.send(AudioCmd::SeekBy(secs));
        }
        KeyCode::Char('h') | KeyCode::Left => {
            let secs = scrub_seconds.min(i32::MAX as u64) as i32;
            let _ = audio_player.send(AudioCmd::SeekBy(-secs));
        }
        KeyCode::Enter => {
            let picked = app
                .select_cursor()
                .map(|(index, track)| (index, track.audio_data.clone()));
            if let Some((index, audio_data)) = picked {
                let _ = audio_player.send(AudioCmd::Load {
                    index,
                    audio_data,
                    start_at: Duration::ZERO,
                    autoplay: true,
                });
            }
        }
        KeyCode::Char('s') => {
            let _ = audio_player.send(AudioCmd::Stop);
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            if app.has_tracks() {
                let _ = audio_player.send(AudioCmd::TogglePause);
            }
        }
        _ => {}
    }

    false
}
