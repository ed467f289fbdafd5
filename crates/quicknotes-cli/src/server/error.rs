//! HTTP error responses
//!
//! Every failure is answered with `{"error": "<message>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quicknotes_core::{NoteError, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body of an error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Note(#[from] NoteError),

    /// The `{id}` path segment is not a note id
    #[error("Note not found")]
    InvalidNoteId,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Note(NoteError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Note(NoteError::NotFound { .. }) | ApiError::InvalidNoteId => {
                StatusCode::NOT_FOUND
            }
            ApiError::Note(NoteError::IdsExhausted) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Note(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
