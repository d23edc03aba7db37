//! Centralized default constants for notemaker.
//!
//! All crates reference these constants instead of defining their own
//! magic numbers. Organized by domain area.

// =============================================================================
// MEDIA TAGS
// =============================================================================

/// Asset kind assumed when a tag or attachment record carries none.
pub const ASSET_KIND: &str = "auto";

/// URL scheme of client-local object URLs that do not survive a reload.
pub const EPHEMERAL_URL_PREFIX: &str = "blob:";

// =============================================================================
// PREVIEW
// =============================================================================

/// Default note preview length in characters for list views.
pub const PREVIEW_LENGTH: usize = 150;

// =============================================================================
// ASSET CLEANUP
// =============================================================================

/// Maximum number of asset deletions in flight during one purge.
pub const PURGE_CONCURRENCY: usize = 4;

/// Timeout for a single asset deletion call in seconds.
pub const ASSET_DELETE_TIMEOUT_SECS: u64 = 5;

/// Default asset store API base URL.
pub const ASSET_API_BASE: &str = "https://api.cloudinary.com";

/// Resource type used for destroy calls when the stored kind is `auto`.
pub const DESTROY_RESOURCE_TYPE: &str = "image";
