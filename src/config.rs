//! Settings schema and loading.
//!
//! Settings come from `ENCORE__*` environment variables, an optional
//! `config.toml` and struct defaults, in that order of precedence. They also
//! decide where the track database, preferences file and log live.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
