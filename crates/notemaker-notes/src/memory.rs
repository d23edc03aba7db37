//! In-memory note repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use notemaker_core::{Error, Note, NoteRepository, Result};

/// Note repository backed by a shared map. Clones see the same notes.
#[derive(Clone, Default)]
pub struct InMemoryNoteRepository {
    notes: Arc<RwLock<HashMap<Uuid, Note>>>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored notes.
    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn insert(&self, note: Note) -> Result<()> {
        let mut notes = self.notes.write().await;
        if notes.contains_key(&note.id) {
            return Err(Error::InvalidInput(format!("note {} already exists", note.id)));
        }
        notes.insert(note.id, note);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Note>> {
        Ok(self.notes.read().await.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Note>> {
        let notes = self.notes.read().await;
        let mut owned: Vec<Note> = notes
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(owned)
    }

    async fn update(&self, note: Note) -> Result<()> {
        let mut notes = self.notes.write().await;
        match notes.get_mut(&note.id) {
            Some(existing) => {
                *existing = note;
                Ok(())
            }
            None => Err(Error::NoteNotFound(note.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.notes.write().await.remove(&id).is_some())
    }
}
