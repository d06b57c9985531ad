//! Error types (thiserror-based).
//!
//! The scheduler itself never fails. Everything here comes from the
//! boundary: chord lookup, note-name parsing and finite output.

use thiserror::Error;

/// Crate error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A finite render or encode was asked for a source with no end.
    #[error("cannot render an infinite-duration source without an explicit length")]
    InfiniteDuration,

    /// Too many samples for the 32-bit size fields of a WAV header.
    #[error("{0} samples do not fit in a WAV file")]
    WavTooLong(usize),

    /// The chord name is not in the chord table.
    #[error("unknown chord: {0}")]
    UnknownChord(String),

    /// A note name such as `E2` or `c#4` could not be parsed.
    #[error("invalid note name: {0}")]
    InvalidNoteName(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
