use axum::{extract::State, http::StatusCode, response::Json};

use crate::api::extract::{RecordId, ValidJson};
use crate::api::handlers::{create_failed, not_found, store_failure, ApiError, AppState};
use crate::model::{IdResponse, NewNote, Note, NotePatch};
use crate::store::traits::Store;

/// GET /notes
pub async fn list_notes<S: Store>(
    State(store): State<AppState<S>>,
) -> Result<Json<Vec<Note>>, ApiError> {
    match store.list_notes().await {
        Ok(notes) => Ok(Json(notes)),
        Err(e) => Err(store_failure("list notes", e)),
    }
}

/// POST /notes
/// A dangling `recipe` or `bean` reference is rejected by the store and
/// reported as a failed create
pub async fn create_note<S: Store>(
    State(store): State<AppState<S>>,
    ValidJson(new_note): ValidJson<NewNote>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    match store.create_note(new_note).await {
        Ok(Some(note)) => {
            log::info!(
                "Created note {} for recipe {} and bean {}",
                note.id,
                note.recipe,
                note.bean
            );
            Ok((StatusCode::CREATED, Json(IdResponse::new(note.id))))
        }
        Ok(None) => Err(create_failed("note", None)),
        Err(e) => Err(create_failed("note", Some(e))),
    }
}

/// PATCH /notes/{id}
pub async fn update_note<S: Store>(
    State(store): State<AppState<S>>,
    record_id: RecordId,
    ValidJson(patch): ValidJson<NotePatch>,
) -> Result<Json<IdResponse>, ApiError> {
    let id = record_id.or_not_found("Note")?;

    match store.update_note(id, patch).await {
        Ok(Some(note)) => {
            log::info!("Updated note {}", note.id);
            Ok(Json(IdResponse::new(note.id)))
        }
        Ok(None) => {
            log::warn!("Note {} not found for update", id);
            Err(not_found("Note"))
        }
        Err(e) => Err(store_failure("update note", e)),
    }
}

/// DELETE /notes/{id}
pub async fn delete_note<S: Store>(
    State(store): State<AppState<S>>,
    record_id: RecordId,
) -> Result<Json<IdResponse>, ApiError> {
    let id = record_id.or_not_found("Note")?;

    match store.delete_note(id).await {
        Ok(Some(note)) => {
            log::info!("Deleted note {}", note.id);
            Ok(Json(IdResponse::new(note.id)))
        }
        Ok(None) => {
            log::warn!("Note {} not found for delete", id);
            Err(not_found("Note"))
        }
        Err(e) => Err(store_failure("delete note", e)),
    }
}
