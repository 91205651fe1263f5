use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{NewNote, Note, NoteStore, StoreError, StoreResult, User, UserStore};

const NOTE_COLUMNS: &str = "id, user_id, title, text, completed, created_at, updated_at";

fn map_write_error(err: sqlx::Error, title: &str) -> StoreError {
    if err
        .as_database_error()
        .is_some_and(|e| e.is_unique_violation())
    {
        StoreError::TitleTaken(title.to_string())
    } else {
        StoreError::Database(err)
    }
}

#[derive(Clone)]
pub struct PgNoteStore {
    db: PgPool,
}

impl PgNoteStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn find_all(&self) -> StoreResult<Vec<Note>> {
        let rows = sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes ORDER BY seq"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Note>> {
        let row = sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Note>> {
        let row = sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE title = $1"
        ))
        .bind(title)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn create(&self, note: NewNote) -> StoreResult<Option<Note>> {
        sqlx::query_as::<_, Note>(&format!(
            r#"
            INSERT INTO notes (id, user_id, title, text)
            VALUES ($1, $2, $3, $4)
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(note.user)
        .bind(&note.title)
        .bind(&note.text)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_write_error(e, &note.title))
    }

    async fn save(&self, note: &Note) -> StoreResult<Option<Note>> {
        sqlx::query_as::<_, Note>(&format!(
            r#"
            UPDATE notes
            SET user_id = $2, title = $3, text = $4, completed = $5, updated_at = now()
            WHERE id = $1
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(note.id)
        .bind(note.user)
        .bind(&note.title)
        .bind(&note.text)
        .bind(note.completed)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_write_error(e, &note.title))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<Option<Note>> {
        let row = sqlx::query_as::<_, Note>(&format!(
            "DELETE FROM notes WHERE id = $1 RETURNING {NOTE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows =
            sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.db)
                .await?;

        Ok(rows)
    }
}
