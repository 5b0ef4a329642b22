//! Error taxonomy for the note core.
//!
//! Core operations return these instead of panicking; the command layer
//! wraps them in `anyhow` and decides what the user sees.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteError {
    /// The local store could not be read or written.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The stored note collection is not valid JSON of the expected shape.
    #[error("stored notes are malformed: {0}")]
    MalformedPersistedData(String),

    /// An import document is not a JSON array.
    #[error("invalid import format: {0}")]
    InvalidImportFormat(String),

    /// No note with the given id exists.
    #[error("no note with id {0}")]
    NotFound(String),

    /// A field failed validation.
    #[error("{0}")]
    ValidationFailed(String),
}

impl NoteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<rusqlite::Error> for NoteError {
    fn from(e: rusqlite::Error) -> Self {
        Self::StorageUnavailable(e.to_string())
    }
}
