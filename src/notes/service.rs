use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::store::{NewNote, Note, NoteStore, StoreError, UserStore};

#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("No notes found")]
    NoNotes,
    #[error("All fields are required")]
    FieldsRequired,
    #[error("Note ID required")]
    NoteIdRequired,
    #[error("User not found")]
    UserNotFound,
    #[error("Note not found")]
    NoteNotFound,
    #[error("Duplicate note title")]
    DuplicateTitle,
    #[error("Invalid note data received")]
    InvalidData,
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for NoteError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TitleTaken(_) => NoteError::DuplicateTitle,
            other => NoteError::Store(other),
        }
    }
}

/// A stored note joined with its owner's username.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NoteWithUsername {
    #[serde(flatten)]
    pub note: Note,
    /// Absent when the owning user no longer exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct CreateNoteInput {
    pub user: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct UpdateNoteInput {
    pub id: Option<String>,
    pub user: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Default, Clone)]
pub struct DeleteNoteInput {
    pub id: Option<String>,
}

/// Take a field only if it is present and non-empty.
fn required(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteStore>,
    users: Arc<dyn UserStore>,
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteStore>, users: Arc<dyn UserStore>) -> Self {
        Self { notes, users }
    }

    /// Every note with its owner's username attached.
    ///
    /// Owners are resolved with one batched lookup over the distinct user ids.
    pub async fn list(&self) -> Result<Vec<NoteWithUsername>, NoteError> {
        let notes = self.notes.find_all().await?;
        if notes.is_empty() {
            return Err(NoteError::NoNotes);
        }

        let mut seen = HashSet::new();
        let user_ids: Vec<Uuid> = notes
            .iter()
            .map(|n| n.user)
            .filter(|id| seen.insert(*id))
            .collect();

        let usernames: HashMap<Uuid, String> = self
            .users
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        let missing = user_ids
            .iter()
            .filter(|id| !usernames.contains_key(*id))
            .count();
        if missing > 0 {
            tracing::warn!(missing, "notes reference users that no longer exist");
        }

        Ok(notes
            .into_iter()
            .map(|note| NoteWithUsername {
                username: usernames.get(&note.user).cloned(),
                note,
            })
            .collect())
    }

    pub async fn create(&self, input: CreateNoteInput) -> Result<Note, NoteError> {
        let (Some(user), Some(title), Some(text)) = (
            required(input.user),
            required(input.title),
            required(input.text),
        ) else {
            return Err(NoteError::FieldsRequired);
        };

        let user = Uuid::parse_str(&user).map_err(|_| NoteError::UserNotFound)?;
        if self.users.find_by_id(user).await?.is_none() {
            return Err(NoteError::UserNotFound);
        }

        if self.notes.find_by_title(&title).await?.is_some() {
            return Err(NoteError::DuplicateTitle);
        }

        let note = self
            .notes
            .create(NewNote { user, title, text })
            .await?
            .ok_or(NoteError::InvalidData)?;

        tracing::info!(note_id = %note.id, user_id = %note.user, "note created");
        Ok(note)
    }

    /// Replace owner, title, text and completion of an existing note.
    ///
    /// A note may keep its own title; taking another note's title is a conflict.
    pub async fn update(&self, input: UpdateNoteInput) -> Result<Note, NoteError> {
        let (Some(id), Some(user), Some(title), Some(text), Some(completed)) = (
            required(input.id),
            required(input.user),
            required(input.title),
            required(input.text),
            input.completed,
        ) else {
            return Err(NoteError::FieldsRequired);
        };

        let id = Uuid::parse_str(&id).map_err(|_| NoteError::NoteNotFound)?;
        let user = Uuid::parse_str(&user).map_err(|_| NoteError::UserNotFound)?;
        let mut note = self
            .notes
            .find_by_id(id)
            .await?
            .ok_or(NoteError::NoteNotFound)?;

        let duplicate = self.notes.find_by_title(&title).await?;
        if duplicate.is_some_and(|d| d.id != id) {
            return Err(NoteError::DuplicateTitle);
        }

        // the owner is not re-validated on update
        note.user = user;
        note.title = title;
        note.text = text;
        note.completed = completed;

        let updated = self
            .notes
            .save(&note)
            .await?
            .ok_or(NoteError::NoteNotFound)?;

        tracing::info!(note_id = %updated.id, completed = updated.completed, "note updated");
        Ok(updated)
    }

    /// Remove a note, returning it as it was before deletion.
    pub async fn delete(&self, input: DeleteNoteInput) -> Result<Note, NoteError> {
        let id = required(input.id).ok_or(NoteError::NoteIdRequired)?;
        let id = Uuid::parse_str(&id).map_err(|_| NoteError::NoteNotFound)?;

        if self.notes.find_by_id(id).await?.is_none() {
            return Err(NoteError::NoteNotFound);
        }

        let removed = self
            .notes
            .delete(id)
            .await?
            .ok_or(NoteError::NoteNotFound)?;

        tracing::info!(note_id = %removed.id, "note deleted");
        Ok(removed)
    }
}
