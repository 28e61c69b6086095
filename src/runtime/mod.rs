use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::import::{ImportEvent, Importer};
use crate::logging;
use crate::store::{PreferenceStore, TrackStore};

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_note) = settings::load_settings();
    if let Some(note) = &config_note {
        eprintln!("encore: {note}");
    }
    if let Err(e) = logging::init(&settings) {
        eprintln!("encore: logging disabled: {e}");
    }
    if let Some(note) = config_note {
        warn!("{note}");
    }
    info!(data_dir = %settings.data_dir().display(), "starting encore");

    // Anything on the command line is the first import batch.
    let initial_imports: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();

    let store = TrackStore::new(settings.database_path());
    let prefs = PreferenceStore::new(settings.preferences_path());
    info!(
        database = %store.path().display(),
        preferences = %prefs.path().display(),
        "using storage"
    );
    let mut app = App::new(prefs, settings.playback.autoplay_on_resume);

    let startup_rx = startup::spawn_loader(store.clone());
    let (import_tx, import_rx) = mpsc::channel::<ImportEvent>();
    let importer = Importer::new(store, settings.import.clone(), import_tx);
    let audio_player = AudioPlayer::new();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(initial_imports);

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &audio_player,
            &importer,
            &startup_rx,
            &import_rx,
            &mut state,
        )
    })();

    audio_player.quit();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("encore stopped");
    run_result
}
