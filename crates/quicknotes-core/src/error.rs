//! Note operation errors
//!
//! These are the user-facing failures of the note store. Validation and
//! not-found errors map to 4xx responses; running out of ids is a server fault.

use thiserror::Error;

/// Input rejected on note creation
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Title or content was not supplied at all
    #[error("Title and content are required")]
    MissingFields,

    /// Title or content was blank after trimming
    #[error("Title and content cannot be empty")]
    EmptyFields,
}

/// Errors returned by `NoteStore` operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NoteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No note with the requested id
    #[error("Note not found")]
    NotFound { id: u64 },

    /// Every representable id has been handed out
    #[error("No note ids left")]
    IdsExhausted,
}

impl NoteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, NoteError::NotFound { .. })
    }
}

/// Result type for note operations
pub type NoteResult<T> = Result<T, NoteError>;
