use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::notes::service::{CreateNoteInput, DeleteNoteInput, UpdateNoteInput};

#[derive(Deserialize, Default, ToSchema)]
pub struct CreateNoteRequest {
    /// Id of the owning user.
    pub user: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
}

#[derive(Deserialize, Default, ToSchema)]
pub struct UpdateNoteRequest {
    pub id: Option<String>,
    pub user: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
    /// Must be a JSON boolean; anything else is treated as missing.
    #[schema(value_type = bool)]
    pub completed: Option<Value>,
}

#[derive(Deserialize, Default, ToSchema)]
pub struct DeleteNoteRequest {
    pub id: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl From<CreateNoteRequest> for CreateNoteInput {
    fn from(r: CreateNoteRequest) -> Self {
        Self {
            user: r.user,
            title: r.title,
            text: r.text,
        }
    }
}

impl From<UpdateNoteRequest> for UpdateNoteInput {
    fn from(r: UpdateNoteRequest) -> Self {
        Self {
            id: r.id,
            user: r.user,
            title: r.title,
            text: r.text,
            completed: r.completed.as_ref().and_then(Value::as_bool),
        }
    }
}

impl From<DeleteNoteRequest> for DeleteNoteInput {
    fn from(r: DeleteNoteRequest) -> Self {
        Self { id: r.id }
    }
}
