use std::fmt;

/// Store-assigned track identifier. Monotonically increasing, never reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackId(pub i64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One imported audio file.
///
/// `id` is `None` for the optimistic copy the importer hands to the playlist
/// before (and independently of) the durable write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: Option<TrackId>,
    /// Original file name; not unique.
    pub name: String,
    /// Full file content as a `data:<mime>;base64,...` URL.
    pub audio_data: String,
}

impl Track {
    pub fn new(name: impl Into<String>, audio_data: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            audio_data: audio_data.into(),
        }
    }

    pub fn with_id(mut self, id: TrackId) -> Self {
        self.id = Some(id);
        self
    }

    /// True when both tracks hold the same name and payload, whatever their ids.
    #[cfg(test)]
    pub fn same_content(&self, other: &Track) -> bool {
        self.name == other.name && self.audio_data == other.audio_data
    }
}
