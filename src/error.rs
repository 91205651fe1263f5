use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::notes::NoteError;
use crate::store::StoreError;

#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Conflict(String),
    Store(StoreError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<NoteError> for ApiError {
    fn from(err: NoteError) -> Self {
        match err {
            NoteError::DuplicateTitle => ApiError::Conflict(err.to_string()),
            NoteError::Store(e) => ApiError::Store(e),
            NoteError::NoNotes
            | NoteError::FieldsRequired
            | NoteError::NoteIdRequired
            | NoteError::UserNotFound
            | NoteError::NoteNotFound
            | NoteError::InvalidData => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::BadRequest(msg) => {
                tracing::debug!("rejected request: {msg}");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorBody {
                        error: "BAD_REQUEST",
                        message: msg,
                    }),
                )
                    .into_response()
            }
            ApiError::Conflict(msg) => {
                tracing::debug!("conflicting request: {msg}");
                (
                    StatusCode::CONFLICT,
                    Json(ErrorBody {
                        error: "CONFLICT",
                        message: msg,
                    }),
                )
                    .into_response()
            }
            ApiError::Store(e) => {
                tracing::error!("store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: "INTERNAL",
                        message: "Internal server error".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
