use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

#[derive(Debug, thiserror::Error)]
pub enum DataUrlError {
    #[error("not a data URL")]
    MissingScheme,
    #[error("data URL has no ',' separating header and payload")]
    MissingPayload,
    #[error("only base64 data URLs are supported")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    /// Parse a `data:<mime>;base64,<payload>` URL.
    pub fn parse(url: &str) -> Result<Self, DataUrlError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or(DataUrlError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUrlError::MissingPayload)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(DataUrlError::NotBase64)?;
        let bytes = STANDARD.decode(payload.trim())?;

        Ok(Self {
            mime: mime.to_string(),
            bytes,
        })
    }
}

/// Encode `bytes` as a base64 `data:` URL with the given MIME type.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Guess an audio MIME type from the file extension.
///
/// Unknown extensions map to `application/octet-stream`; the type is a hint
/// for the decoder and never used to reject a file.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());

    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("wav") => "audio/wav",
        Some("ogg" | "oga") => "audio/ogg",
        Some("opus") => "audio/opus",
        Some("m4a" | "mp4") => "audio/mp4",
        Some("aac") => "audio/aac",
        _ => "application/octet-stream",
    }
}
