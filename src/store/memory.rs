use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{NewNote, Note, NoteStore, StoreError, StoreResult, User, UserStore};

#[derive(Debug, Default)]
struct Inner {
    notes: Vec<Note>,
    users: Vec<User>,
}

/// In-memory notes and users, kept in insertion order.
///
/// Title uniqueness is checked under the same lock as the write, so concurrent
/// creates with one title cannot both succeed.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user so notes can reference it.
    pub fn insert_user(&self, username: impl Into<String>) -> User {
        let user = User {
            id: Uuid::new_v4(),
            username: username.into(),
        };
        self.lock().users.push(user.clone());
        user
    }

    /// Drop a user, leaving any of their notes behind.
    pub fn remove_user(&self, id: Uuid) -> bool {
        let mut inner = self.lock();
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        inner.users.len() != before
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // a poisoned lock only means another test thread panicked mid-write
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn find_all(&self) -> StoreResult<Vec<Note>> {
        Ok(self.lock().notes.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Note>> {
        Ok(self.lock().notes.iter().find(|n| n.id == id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Note>> {
        Ok(self.lock().notes.iter().find(|n| n.title == title).cloned())
    }

    async fn create(&self, note: NewNote) -> StoreResult<Option<Note>> {
        let mut inner = self.lock();
        if inner.notes.iter().any(|n| n.title == note.title) {
            return Err(StoreError::TitleTaken(note.title));
        }

        let now = OffsetDateTime::now_utc();
        let note = Note {
            id: Uuid::new_v4(),
            user: note.user,
            title: note.title,
            text: note.text,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        inner.notes.push(note.clone());
        Ok(Some(note))
    }

    async fn save(&self, note: &Note) -> StoreResult<Option<Note>> {
        let mut inner = self.lock();
        if inner
            .notes
            .iter()
            .any(|n| n.title == note.title && n.id != note.id)
        {
            return Err(StoreError::TitleTaken(note.title.clone()));
        }

        let Some(stored) = inner.notes.iter_mut().find(|n| n.id == note.id) else {
            return Ok(None);
        };
        stored.user = note.user;
        stored.title = note.title.clone();
        stored.text = note.text.clone();
        stored.completed = note.completed;
        stored.updated_at = OffsetDateTime::now_utc();
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<Option<Note>> {
        let mut inner = self.lock();
        let Some(pos) = inner.notes.iter().position(|n| n.id == id) else {
            return Ok(None);
        };
        Ok(Some(inner.notes.remove(pos)))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        Ok(self
            .lock()
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_note(user: Uuid, title: &str) -> NewNote {
        NewNote {
            user,
            title: title.to_string(),
            text: "text".to_string(),
        }
    }

    #[tokio::test]
    async fn create_defaults_completed_and_keeps_insertion_order() {
        let store = MemoryStore::new();
        let user = store.insert_user("alice");

        let first = store.create(new_note(user.id, "first")).await.unwrap().unwrap();
        let second = store.create(new_note(user.id, "second")).await.unwrap().unwrap();

        assert!(!first.completed);
        let all = store.find_all().await.unwrap();
        assert_eq!(
            all.iter().map(|n| n.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
    }

    #[tokio::test]
    async fn create_rejects_taken_title() {
        let store = MemoryStore::new();
        let user = store.insert_user("alice");
        store.create(new_note(user.id, "same")).await.unwrap();

        let err = store.create(new_note(user.id, "same")).await.unwrap_err();
        assert!(matches!(err, StoreError::TitleTaken(t) if t == "same"));
    }

    #[tokio::test]
    async fn save_allows_own_title_but_not_anothers() {
        let store = MemoryStore::new();
        let user = store.insert_user("alice");
        let a = store.create(new_note(user.id, "a")).await.unwrap().unwrap();
        store.create(new_note(user.id, "b")).await.unwrap();

        let mut edited = a.clone();
        edited.completed = true;
        let saved = store.save(&edited).await.unwrap().unwrap();
        assert!(saved.completed);
        assert_eq!(saved.title, "a");

        edited.title = "b".to_string();
        assert!(matches!(
            store.save(&edited).await,
            Err(StoreError::TitleTaken(_))
        ));
    }

    #[tokio::test]
    async fn delete_returns_removed_note() {
        let store = MemoryStore::new();
        let user = store.insert_user("alice");
        let note = store.create(new_note(user.id, "gone")).await.unwrap().unwrap();

        let removed = store.delete(note.id).await.unwrap().unwrap();
        assert_eq!(removed.title, "gone");
        assert!(NoteStore::find_by_id(&store, note.id).await.unwrap().is_none());
        assert!(store.delete(note.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_ids_skips_unknown_users() {
        let store = MemoryStore::new();
        let alice = store.insert_user("alice");
        let bob = store.insert_user("bob");
        store.remove_user(bob.id);

        let found = store.find_by_ids(&[alice.id, bob.id]).await.unwrap();
        assert_eq!(found, vec![alice]);
    }
}
