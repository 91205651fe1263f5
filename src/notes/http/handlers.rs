use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    notes::NoteWithUsername,
};

use super::dto::{CreateNoteRequest, DeleteNoteRequest, MessageResponse, UpdateNoteRequest};

/// Unwrap a JSON body. A request without a JSON body is read as an empty one so the
/// field checks report what is missing.
fn json_body<T: Default>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    }
}

#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "All notes with their owner's username", body = [NoteWithUsername]),
        (status = 400, description = "No notes found", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    tag = "Notes"
)]
pub async fn list_notes(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<Vec<NoteWithUsername>>)> {
    let notes = state.notes.list().await?;
    Ok((StatusCode::OK, Json(notes)))
}

#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created", body = MessageResponse),
        (status = 400, description = "Missing fields, unknown user or invalid note data", body = crate::error::ErrorBody),
        (status = 409, description = "Duplicate note title", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    tag = "Notes"
)]
pub async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let request = json_body(payload)?;
    let note = state.notes.create(request.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("New note created: {}", note.title),
        }),
    ))
}

#[utoipa::path(
    patch,
    path = "/notes",
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated", body = MessageResponse),
        (status = 400, description = "Missing fields or note not found", body = crate::error::ErrorBody),
        (status = 409, description = "Duplicate note title", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    tag = "Notes"
)]
pub async fn update_note(
    State(state): State<AppState>,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let request = json_body(payload)?;
    let note = state.notes.update(request.into()).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: format!("Updated note: {}", note.title),
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/notes",
    request_body = DeleteNoteRequest,
    responses(
        (status = 200, description = "Note deleted", body = String),
        (status = 400, description = "Missing id or note not found", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    tag = "Notes"
)]
pub async fn delete_note(
    State(state): State<AppState>,
    payload: Result<Json<DeleteNoteRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<String>)> {
    let request = json_body(payload)?;
    let note = state.notes.delete(request.into()).await?;

    Ok((
        StatusCode::OK,
        Json(format!("Note {} with ID {} deleted", note.title, note.id)),
    ))
}
