//! Data models for notes and their embedded media.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults;

// =============================================================================
// MEDIA TYPES
// =============================================================================

/// Kind of media embedded in a note.
///
/// The lowercase tokens are part of the persisted tag format and are
/// matched case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

impl MediaKind {
    /// The literal token used inside a media tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }

    /// Human-readable label used in note previews.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Audio => "Audio",
            Self::Video => "Video",
        }
    }

    /// Best guess at the media kind of an attachment record, which does not
    /// store one. The asset store's resource type decides when it is specific;
    /// otherwise the URL's file extension does, falling back to `Image`.
    pub fn infer(asset_kind: &str, url: &str) -> Self {
        match asset_kind {
            "image" => return Self::Image,
            "video" => {
                // Audio uploads are classified as video by the asset store.
                if has_audio_extension(url) {
                    return Self::Audio;
                }
                return Self::Video;
            }
            _ => {}
        }
        if has_audio_extension(url) {
            Self::Audio
        } else if has_video_extension(url) {
            Self::Video
        } else {
            Self::Image
        }
    }
}

fn extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next()?;
    let (_, ext) = file.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

fn has_audio_extension(url: &str) -> bool {
    matches!(
        extension(url).as_deref(),
        Some("mp3" | "wav" | "ogg" | "oga" | "m4a" | "aac" | "flac" | "opus" | "weba")
    )
}

fn has_video_extension(url: &str) -> bool {
    matches!(
        extension(url).as_deref(),
        Some("mp4" | "webm" | "mov" | "mkv" | "avi" | "m4v")
    )
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "audio" => Ok(Self::Audio),
            "video" => Ok(Self::Video),
            _ => Err(format!("Invalid media kind: {}", s)),
        }
    }
}

/// Resource type the asset store should file an upload under, from its MIME type.
pub fn asset_kind_for_mime(mime: &str) -> &'static str {
    if mime.starts_with("image/") {
        "image"
    } else if mime.starts_with("video/") {
        "video"
    } else {
        defaults::ASSET_KIND
    }
}

/// One media item embedded in note content.
///
/// `asset_id` is `None` when the media was never registered with the asset
/// store (an externally hosted URL). `asset_kind` is `None` when no kind
/// was recorded; [`MediaReference::asset_kind`] then reports `"auto"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaReference {
    pub kind: MediaKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_kind: Option<String>,
}

impl MediaReference {
    /// Reference to media that is not held by the asset store.
    pub fn new(kind: MediaKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            asset_id: None,
            asset_kind: None,
        }
    }

    /// Attach asset-store identity. Empty strings are stored as absent.
    pub fn with_asset(mut self, asset_id: impl Into<String>, asset_kind: impl Into<String>) -> Self {
        self.asset_id = non_empty(asset_id.into());
        self.asset_kind = non_empty(asset_kind.into());
        self
    }

    /// Asset-store identifier, empty when unregistered.
    pub fn asset_id(&self) -> &str {
        self.asset_id.as_deref().unwrap_or("")
    }

    /// Effective asset-store resource type.
    pub fn asset_kind(&self) -> &str {
        self.asset_kind.as_deref().unwrap_or(defaults::ASSET_KIND)
    }

    /// True when the asset store holds this media and it can be deleted remotely.
    pub fn is_registered(&self) -> bool {
        !self.asset_id().is_empty()
    }

    /// True for client-local object URLs that will not resolve after a reload.
    pub fn is_ephemeral(&self) -> bool {
        self.url.starts_with(defaults::EPHEMERAL_URL_PREFIX)
    }

    /// Build a reference from a persisted attachment record.
    pub fn from_attachment(record: &AttachmentRecord) -> Self {
        let asset_kind = record.asset_kind.as_deref().unwrap_or("");
        Self {
            kind: MediaKind::infer(asset_kind, &record.url),
            url: record.url.clone(),
            asset_id: record.asset_id.clone().and_then(non_empty),
            asset_kind: record.asset_kind.clone().and_then(non_empty),
        }
    }

    /// The persisted attachment record for this reference.
    pub fn to_attachment(&self) -> AttachmentRecord {
        AttachmentRecord {
            url: self.url.clone(),
            asset_id: self.asset_id.clone(),
            asset_kind: self.asset_kind.clone(),
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Structured attachment entry persisted next to note content.
///
/// Field names on the wire follow the stored document shape
/// (`public_id`, `resource_type`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRecord {
    #[serde(default)]
    pub url: String,
    #[serde(
        default,
        rename = "public_id",
        alias = "asset_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub asset_id: Option<String>,
    #[serde(
        default,
        rename = "resource_type",
        alias = "asset_kind",
        skip_serializing_if = "Option::is_none"
    )]
    pub asset_kind: Option<String>,
}

impl AttachmentRecord {
    pub fn new(url: impl Into<String>, asset_id: impl Into<String>, asset_kind: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            asset_id: non_empty(asset_id.into()),
            asset_kind: non_empty(asset_kind.into()),
        }
    }

    /// Asset-store identifier, empty when unregistered.
    pub fn asset_id(&self) -> &str {
        self.asset_id.as_deref().unwrap_or("")
    }
}

// =============================================================================
// NOTES
// =============================================================================

/// A stored note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    /// Media owned by the note. Legacy `imageUrls`/`videoUrls` arrays are not
    /// carried: they hold bare URLs with no asset id, and tags plus this list
    /// already cover every stored media item. They are ignored on read.
    #[serde(default)]
    pub attachments: Vec<AttachmentRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by the editor on create and update. Missing fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentRecord>,
}

/// Media fields of a user profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePicture {
    #[serde(default, rename = "profilePic")]
    pub url: String,
    #[serde(default, rename = "profilePicPublicId")]
    pub asset_id: String,
}
