//! # notemaker-core
//!
//! Core types and logic for notemaker notes with embedded media.
//!
//! - [`media_tag`]: the inline `[MEDIA:kind:url|asset_id|asset_kind]` codec
//! - [`content`]: previews and editor-side content clean-up
//! - [`reconcile`]: which remote assets a note owns
//! - [`purge`]: best-effort deletion of those assets
//! - [`traits`]: asset store and note storage collaborators

pub mod content;
pub mod defaults;
pub mod error;
pub mod media_tag;
pub mod models;
pub mod purge;
pub mod reconcile;
pub mod traits;

// Re-export commonly used types at crate root
pub use content::{attachments_from_content, normalize, preview, strip_ephemeral};
pub use error::{Error, Result};
pub use media_tag::{decode_all, encode, find_tags, replace_tags, TagMatch};
pub use models::*;
pub use purge::{purge, PurgeFailure, PurgeOptions, PurgeReport};
pub use reconcile::collect_references;
pub use traits::*;
