//! Note lifecycle: create, read, update and delete with media cleanup.
//!
//! Every operation is scoped to the calling user. A note owned by someone
//! else is [`Error::Forbidden`]; a missing note is [`Error::NoteNotFound`].
//!
//! Deleting a note first purges the remote assets it owns (from both its
//! attachment list and the tags in its content), then deletes the record.
//! Purge failures are logged and reported but never block the delete.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use notemaker_core::{
    collect_references, purge, AssetStore, Error, Note, NoteInput, NoteRepository, PurgeOptions,
    PurgeReport, Result,
};

/// Result of deleting a note.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub note_id: Uuid,
    /// What happened to the note's remote assets.
    pub purge: PurgeReport,
}

/// Note operations for authenticated users.
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
    store: Arc<dyn AssetStore>,
    purge_options: PurgeOptions,
}

impl NoteService {
    pub fn new(repo: Arc<dyn NoteRepository>, store: Arc<dyn AssetStore>) -> Self {
        Self {
            repo,
            store,
            purge_options: PurgeOptions::default(),
        }
    }

    /// Override fan-out and per-call deadline used when deleting notes.
    pub fn with_purge_options(mut self, options: PurgeOptions) -> Self {
        self.purge_options = options;
        self
    }

    pub fn purge_options(&self) -> &PurgeOptions {
        &self.purge_options
    }

    /// Create a note owned by `user_id`.
    pub async fn create(&self, user_id: Uuid, input: NoteInput) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::now_v7(),
            user_id,
            title: input.title,
            content: input.content,
            attachments: input.attachments,
            created_at: now,
            updated_at: now,
        };
        self.repo.insert(note.clone()).await?;

        info!(
            note_id = %note.id,
            user_id = %user_id,
            attachment_count = note.attachments.len(),
            "Note created"
        );
        Ok(note)
    }

    /// Fetch one of the user's notes.
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Note> {
        self.load_owned(user_id, id).await
    }

    /// All of the user's notes, most recently updated first.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Note>> {
        self.repo.list_for_user(user_id).await
    }

    /// Replace title, content and attachments of one of the user's notes.
    pub async fn update(&self, user_id: Uuid, id: Uuid, input: NoteInput) -> Result<Note> {
        let mut note = self.load_owned(user_id, id).await?;
        note.title = input.title;
        note.content = input.content;
        note.attachments = input.attachments;
        note.updated_at = Utc::now();
        self.repo.update(note.clone()).await?;

        debug!(note_id = %id, user_id = %user_id, "Note updated");
        Ok(note)
    }

    /// Delete one of the user's notes and the remote assets it owns.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<DeleteOutcome> {
        let note = self.load_owned(user_id, id).await?;

        let references = collect_references(&note.content, &note.attachments);
        let report = purge(&references, self.store.as_ref(), &self.purge_options).await;
        if !report.is_clean() {
            warn!(
                note_id = %id,
                failure_count = report.failure_count(),
                "Some note assets could not be deleted; deleting note anyway"
            );
        }

        if !self.repo.delete(id).await? {
            // Removed concurrently after the load; the assets are already handled.
            debug!(note_id = %id, "Note already gone at delete");
        }

        info!(
            note_id = %id,
            user_id = %user_id,
            reference_count = references.len(),
            success_count = report.success_count(),
            failure_count = report.failure_count(),
            "Note deleted"
        );
        Ok(DeleteOutcome {
            note_id: id,
            purge: report,
        })
    }

    async fn load_owned(&self, user_id: Uuid, id: Uuid) -> Result<Note> {
        let note = self.repo.get(id).await?.ok_or(Error::NoteNotFound(id))?;
        if note.user_id != user_id {
            return Err(Error::Forbidden(format!(
                "note {} belongs to another user",
                id
            )));
        }
        Ok(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryNoteRepository;
    use notemaker_assets::InMemoryAssetStore;
    use notemaker_core::AttachmentRecord;

    fn service() -> (NoteService, InMemoryNoteRepository, InMemoryAssetStore) {
        let repo = InMemoryNoteRepository::new();
        let store = InMemoryAssetStore::new();
        let svc = NoteService::new(Arc::new(repo.clone()), Arc::new(store.clone()));
        (svc, repo, store)
    }

    fn input(title: &str, content: &str) -> NoteInput {
        NoteInput {
            title: title.to_string(),
            content: content.to_string(),
            attachments: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (svc, _, _) = service();
        let user = Uuid::now_v7();

        let note = svc.create(user, input("t", "body")).await.unwrap();
        let fetched = svc.get(user, note.id).await.unwrap();

        assert_eq!(fetched, note);
        assert_eq!(note.created_at, note.updated_at);
    }

    #[tokio::test]
    async fn test_get_other_users_note_is_forbidden() {
        let (svc, _, _) = service();
        let note = svc.create(Uuid::now_v7(), input("t", "")).await.unwrap();

        let err = svc.get(Uuid::now_v7(), note.id).await.unwrap_err();

        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_get_missing_note() {
        let (svc, _, _) = service();
        let id = Uuid::now_v7();
        let err = svc.get(Uuid::now_v7(), id).await.unwrap_err();
        assert!(matches!(err, Error::NoteNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_bumps_timestamp() {
        let (svc, _, _) = service();
        let user = Uuid::now_v7();
        let note = svc.create(user, input("old", "a")).await.unwrap();

        let mut next = input("new", "b [MEDIA:image:https://x/a.png|a1|image]");
        next.attachments = vec![AttachmentRecord::new("https://x/a.png", "a1", "image")];
        let updated = svc.update(user, note.id, next).await.unwrap();

        assert_eq!(updated.title, "new");
        assert_eq!(updated.attachments.len(), 1);
        assert_eq!(updated.created_at, note.created_at);
        assert!(updated.updated_at >= note.updated_at);
        assert_eq!(svc.get(user, note.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_by_other_user_is_forbidden() {
        let (svc, _, _) = service();
        let note = svc.create(Uuid::now_v7(), input("t", "")).await.unwrap();
        let err = svc
            .update(Uuid::now_v7(), note.id, input("x", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_delete_purges_owned_assets() {
        let (svc, repo, store) = service();
        let user = Uuid::now_v7();
        let mut note_input = input(
            "t",
            "[MEDIA:image:https://x/a.png|a1|image]\n\n[MEDIA:video:https://x/v.mp4|v1|video]\n\n[MEDIA:audio:https://x/s.mp3]",
        );
        note_input.attachments = vec![AttachmentRecord::new("https://x/a.png", "a1", "image")];
        let note = svc.create(user, note_input).await.unwrap();

        let outcome = svc.delete(user, note.id).await.unwrap();

        assert_eq!(outcome.purge.succeeded, vec!["a1", "v1"]);
        assert_eq!(store.deleted_ids(), vec!["a1", "v1"]);
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_proceeds_when_purge_fails() {
        let repo = InMemoryNoteRepository::new();
        let store = InMemoryAssetStore::new().fail_on("a1", "store unavailable");
        let svc = NoteService::new(Arc::new(repo.clone()), Arc::new(store.clone()));
        let user = Uuid::now_v7();
        let note = svc
            .create(user, input("t", "[MEDIA:image:https://x/a.png|a1|image]"))
            .await
            .unwrap();

        let outcome = svc.delete(user, note.id).await.unwrap();

        assert_eq!(outcome.purge.failure_count(), 1);
        assert!(matches!(
            svc.get(user, note.id).await,
            Err(Error::NoteNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_by_other_user_touches_nothing() {
        let (svc, repo, store) = service();
        let note = svc
            .create(Uuid::now_v7(), input("t", "[MEDIA:image:u|a1|image]"))
            .await
            .unwrap();

        let err = svc.delete(Uuid::now_v7(), note.id).await.unwrap_err();

        assert!(matches!(err, Error::Forbidden(_)));
        assert!(store.calls().is_empty());
        assert_eq!(repo.len().await, 1);
    }
}
