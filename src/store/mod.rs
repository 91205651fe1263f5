use async_trait::async_trait;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PgNoteStore, PgUserStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema, sqlx::FromRow)]
pub struct Note {
    pub id: Uuid,
    /// Owning user.
    #[sqlx(rename = "user_id")]
    pub user: Uuid,
    pub title: String,
    pub text: String,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Fields supplied on insert. `completed` always starts out `false`.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub user: Uuid,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Another note already owns this title.
    #[error("title already taken: {0}")]
    TitleTaken(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait NoteStore: Send + Sync {
    /// All notes in the store's natural order.
    async fn find_all(&self) -> StoreResult<Vec<Note>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Note>>;

    /// Exact, case-sensitive title match.
    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Note>>;

    /// Insert a note. `None` means the store accepted the call but produced no record.
    async fn create(&self, note: NewNote) -> StoreResult<Option<Note>>;

    /// Overwrite owner, title, text and completion of an existing note.
    /// Returns `None` if the note no longer exists.
    async fn save(&self, note: &Note) -> StoreResult<Option<Note>>;

    /// Remove a note permanently, returning the record as it was before removal.
    async fn delete(&self, id: Uuid) -> StoreResult<Option<Note>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Batched lookup. Unknown ids are skipped; order is unspecified.
    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>>;
}
