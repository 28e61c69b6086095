//! Building `rodio` sinks from a track's `data:` URL payload.

use std::io::Cursor;
use std::time::Duration;

use rodio::decoder::DecoderError;
use rodio::{Decoder, OutputStream, Sink, Source};
use tracing::debug;

use crate::track::{DataUrl, DataUrlError};

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("bad audio payload: {0}")]
    Payload(#[from] DataUrlError),
    #[error("could not decode audio: {0}")]
    Decode(#[from] DecoderError),
}

/// Create a paused `Sink` for `audio_data` that starts playback at `start_at`.
///
/// Also returns the track's length when the decoder can tell.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    audio_data: &str,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), SinkError> {
    let payload = DataUrl::parse(audio_data)?;
    debug!(mime = %payload.mime, bytes = payload.bytes.len(), "decoding track payload");
    let decoder = Decoder::new(Cursor::new(payload.bytes))?;
    let total = decoder.total_duration();
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}
