use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, info, warn};

use super::clock::PlaybackClock;
use super::sink::create_sink_at;
use super::types::{AudioCmd, PlaybackHandle};

/// What the audio thread currently has loaded.
struct Loaded {
    index: usize,
    audio_data: String,
    total: Option<Duration>,
    sink: Sink,
    clock: PlaybackClock,
}

pub(super) fn spawn_audio_thread(rx: Receiver<AudioCmd>, playback_info: PlaybackHandle) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "no audio output device; playback disabled");
                // Keep draining so senders never observe a closed channel mid-session.
                while let Ok(cmd) = rx.recv() {
                    if matches!(cmd, AudioCmd::Quit) {
                        break;
                    }
                }
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut loaded: Option<Loaded> = None;

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(AudioCmd::Quit) => {
                    if let Some(l) = loaded.take() {
                        l.sink.stop();
                    }
                    publish(&playback_info, None);
                    info!("audio thread stopped");
                    return;
                }
                Ok(cmd) => handle_cmd(cmd, &stream, &mut loaded),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }

            // The source ran dry: the track finished on its own.
            if let Some(l) = loaded.as_mut() {
                if l.clock.is_running() && l.sink.empty() {
                    l.clock.pause(Instant::now());
                    debug!(index = l.index, "track finished");
                }
            }

            publish(&playback_info, loaded.as_ref());
        }
    })
}

fn handle_cmd(cmd: AudioCmd, stream: &OutputStream, loaded: &mut Option<Loaded>) {
    match cmd {
        AudioCmd::Load {
            index,
            audio_data,
            start_at,
            autoplay,
        } => {
            if let Some(old) = loaded.take() {
                old.sink.stop();
            }

            match create_sink_at(stream, &audio_data, start_at) {
                Ok((sink, total)) => {
                    let mut clock = PlaybackClock::starting_at(start_at);
                    if autoplay {
                        sink.play();
                        clock.resume(Instant::now());
                    }
                    debug!(index, start_at = ?start_at, ?total, autoplay, "loaded track");
                    *loaded = Some(Loaded {
                        index,
                        audio_data,
                        total,
                        sink,
                        clock,
                    });
                }
                Err(e) => warn!(index, error = %e, "cannot play track"),
            }
        }

        AudioCmd::SeekBy(secs) => {
            let Some(l) = loaded.as_mut() else {
                return;
            };
            // Scrubbing: rebuild the sink and skip into the payload.
            let now = Instant::now();
            let target = l.clock.seek_target(now, secs, l.total);
            match create_sink_at(stream, &l.audio_data, target) {
                Ok((sink, _)) => {
                    l.sink.stop();
                    if l.clock.is_running() {
                        sink.play();
                    }
                    l.sink = sink;
                    l.clock.seek_to(now, target);
                    debug!(index = l.index, secs, target = ?target, "seeked");
                }
                Err(e) => warn!(index = l.index, error = %e, "cannot seek track"),
            }
        }

        AudioCmd::TogglePause => {
            if let Some(l) = loaded.as_mut() {
                let now = Instant::now();
                if l.clock.is_running() {
                    l.sink.pause();
                    l.clock.pause(now);
                } else if !l.sink.empty() {
                    l.sink.play();
                    l.clock.resume(now);
                }
            }
        }

        AudioCmd::Stop => {
            if let Some(l) = loaded.take() {
                l.sink.stop();
            }
        }

        AudioCmd::Quit => {}
    }
}

fn publish(playback_info: &PlaybackHandle, loaded: Option<&Loaded>) {
    if let Ok(mut info) = playback_info.lock() {
        match loaded {
            Some(l) => {
                info.index = Some(l.index);
                info.elapsed = l.clock.elapsed(Instant::now());
                info.playing = l.clock.is_running();
            }
            None => {
                info.index = None;
                info.elapsed = Duration::ZERO;
                info.playing = false;
            }
        }
    }
}
