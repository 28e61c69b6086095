//! Track records and their self-describing audio payload.
//!
//! A `Track` carries the whole audio file inline as a `data:` URL so that a
//! stored record is playable without the original file still being around.

mod data_url;
mod model;

pub use data_url::{DataUrl, DataUrlError, encode_data_url, mime_for_path};
pub use model::{Track, TrackId};
