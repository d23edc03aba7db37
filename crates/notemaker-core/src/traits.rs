//! Collaborator traits.
//!
//! These traits define the interfaces to the asset store and note storage,
//! enabling pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Note;

// =============================================================================
// ASSET STORE
// =============================================================================

/// Remote media host that owns uploaded assets.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Delete one asset by its store identifier and resource type.
    async fn delete_asset(&self, asset_id: &str, asset_kind: &str) -> Result<()>;
}

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Storage for note records.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note.
    async fn insert(&self, note: Note) -> Result<()>;

    /// Fetch a note by id.
    async fn get(&self, id: Uuid) -> Result<Option<Note>>;

    /// All notes owned by a user, most recently updated first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Note>>;

    /// Replace an existing note.
    async fn update(&self, note: Note) -> Result<()>;

    /// Delete a note. Returns false when it did not exist.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}
