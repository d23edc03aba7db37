//! # notemaker-notes
//!
//! Note lifecycle for notemaker: per-user CRUD where deleting a note also
//! deletes the media it owns on the remote asset store.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use notemaker_assets::InMemoryAssetStore;
//! use notemaker_core::NoteInput;
//! use notemaker_notes::{InMemoryNoteRepository, NoteService};
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = InMemoryAssetStore::new();
//!     let service = NoteService::new(
//!         Arc::new(InMemoryNoteRepository::new()),
//!         Arc::new(store.clone()),
//!     );
//!     let user = Uuid::now_v7();
//!     let note = service
//!         .create(user, NoteInput {
//!             title: "Trip".to_string(),
//!             content: "[MEDIA:image:https://x/a.png|trip/a|image]".to_string(),
//!             attachments: Vec::new(),
//!         })
//!         .await
//!         .unwrap();
//!
//!     let outcome = service.delete(user, note.id).await.unwrap();
//!     assert_eq!(outcome.purge.succeeded, vec!["trip/a"]);
//! }
//! ```

pub mod memory;
pub mod profile;
pub mod service;

pub use memory::InMemoryNoteRepository;
pub use profile::clear_profile_picture;
pub use service::{DeleteOutcome, NoteService};
