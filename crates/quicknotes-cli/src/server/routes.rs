//! Route handlers

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use quicknotes_core::{NewNote, Note, NoteChanges, ValidationError, TIMESTAMP_FORMAT};
use serde_json::{json, Value};
use tracing::debug;

use super::{ApiError, AppState, DeleteResponse, DELETED_MESSAGE};

pub(super) async fn home() -> &'static str {
    "Notes App Backend is running!"
}

pub(super) async fn health(State(state): State<AppState>) -> Json<Value> {
    let store = state.store.lock().await;
    let status = store.persistence_status();

    Json(json!({
        "status": if status.is_healthy() { "healthy" } else { "degraded" },
        "service": "quicknotes",
        "notes": store.len(),
        "persistence": {
            "snapshot_path": status.snapshot_path.as_ref().map(|p| p.display().to_string()),
            "healthy": status.is_healthy(),
            "last_error": status.last_error,
            "last_saved": status.last_saved.map(|t| t.format(TIMESTAMP_FORMAT).to_string()),
        }
    }))
}

pub(super) async fn list_notes(State(state): State<AppState>) -> Json<Vec<Note>> {
    Json(state.store.lock().await.list().to_vec())
}

pub(super) async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<NewNote>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    // An unreadable body carries no fields at all
    let Json(body) = payload.map_err(|rejection| {
        debug!(%rejection, "Rejected create body");
        ApiError::from(ValidationError::MissingFields)
    })?;

    let note = state
        .store
        .lock()
        .await
        .add(body.title.as_deref(), body.content.as_deref())?;

    Ok((StatusCode::CREATED, Json(note)))
}

pub(super) async fn update_note(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<NoteChanges>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::InvalidNoteId)?;
    let changes = match payload {
        Ok(Json(changes)) => changes,
        Err(rejection) => {
            debug!(%rejection, id, "Treating unreadable update body as empty");
            NoteChanges::default()
        }
    };

    let note = state.store.lock().await.update(
        id,
        changes.title.as_deref(),
        changes.content.as_deref(),
    )?;

    Ok(Json(note))
}

pub(super) async fn delete_note(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::InvalidNoteId)?;
    let deleted_note = state.store.lock().await.delete(id)?;

    Ok(Json(DeleteResponse {
        message: DELETED_MESSAGE.to_string(),
        deleted_note,
    }))
}
