//! Inline media tag codec.
//!
//! Note content embeds media as textual tags:
//!
//! ```text
//! [MEDIA:<kind>:<url>]
//! [MEDIA:<kind>:<url>|<asset_id>]
//! [MEDIA:<kind>:<url>|<asset_id>|<asset_kind>]
//! ```
//!
//! `kind` is one of `image`, `audio`, `video`. `url` and `asset_id` never
//! contain `|` or `]`; `asset_kind` never contains `]`. Stored notes already
//! use this form, so the grammar must not change.
//!
//! # Examples
//!
//! ```
//! use notemaker_core::{decode_all, encode, MediaKind, MediaReference};
//!
//! let r = MediaReference::new(MediaKind::Image, "http://x/y.png").with_asset("abc123", "image");
//! let tag = encode(&r).unwrap();
//! assert_eq!(tag, "[MEDIA:image:http://x/y.png|abc123|image]");
//! assert_eq!(decode_all(&format!("see {tag}")), vec![r]);
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use tracing::trace;

use crate::error::{Error, Result};
use crate::models::{MediaKind, MediaReference};

static MEDIA_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[MEDIA:(image|audio|video):([^|\]]+)(?:\|([^|\]]*))?(?:\|([^\]]*))?\]")
        .expect("media tag pattern is valid")
});

/// A tag located in note content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    /// Byte range of the whole tag, brackets included.
    pub range: Range<usize>,
    pub reference: MediaReference,
}

/// Serialize a reference as an inline tag.
///
/// The asset id segment is written only when non-empty, and the asset kind
/// only when non-empty and the asset id was written.
///
/// # Errors
///
/// Returns [`Error::InvalidReference`] when the URL is empty, or when a field
/// contains a character the grammar uses as a delimiter.
pub fn encode(reference: &MediaReference) -> Result<String> {
    validate(reference)?;

    let mut tag = format!("[MEDIA:{}:{}", reference.kind, reference.url);
    let asset_id = reference.asset_id();
    if !asset_id.is_empty() {
        tag.push('|');
        tag.push_str(asset_id);
        if let Some(kind) = reference.asset_kind.as_deref().filter(|k| !k.is_empty()) {
            tag.push('|');
            tag.push_str(kind);
        }
    }
    tag.push(']');
    Ok(tag)
}

fn validate(reference: &MediaReference) -> Result<()> {
    if reference.url.is_empty() {
        return Err(Error::InvalidReference("url is empty".to_string()));
    }
    if reference.url.contains(['|', ']']) {
        return Err(Error::InvalidReference(format!(
            "url contains a tag delimiter: {}",
            reference.url
        )));
    }
    if reference.asset_id().contains(['|', ']']) {
        return Err(Error::InvalidReference(format!(
            "asset id contains a tag delimiter: {}",
            reference.asset_id()
        )));
    }
    if reference.asset_kind().contains(']') {
        return Err(Error::InvalidReference(format!(
            "asset kind contains a tag delimiter: {}",
            reference.asset_kind()
        )));
    }
    Ok(())
}

/// Locate every well-formed tag in `content`, left to right.
///
/// Fragments that do not satisfy the grammar are plain text and are skipped.
pub fn find_tags(content: &str) -> Vec<TagMatch> {
    MEDIA_TAG
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let kind: MediaKind = caps.get(1)?.as_str().parse().ok()?;
            let url = caps.get(2)?.as_str();
            let asset_id = caps.get(3).map(|m| m.as_str()).unwrap_or("");
            let asset_kind = caps.get(4).map(|m| m.as_str()).unwrap_or("");
            trace!(kind = %kind, url, asset_id, asset_kind, "media_tag: matched");

            Some(TagMatch {
                range: whole.range(),
                reference: MediaReference::new(kind, url).with_asset(asset_id, asset_kind),
            })
        })
        .collect()
}

/// Decode every tag in `content` into references, in order of appearance.
pub fn decode_all(content: &str) -> Vec<MediaReference> {
    find_tags(content)
        .into_iter()
        .map(|m| m.reference)
        .collect()
}

/// Rebuild `content` with each tag replaced by `replace`'s output.
///
/// Returning `None` drops the tag text entirely.
pub fn replace_tags<F>(content: &str, mut replace: F) -> String
where
    F: FnMut(&MediaReference) -> Option<String>,
{
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for m in find_tags(content) {
        out.push_str(&content[last..m.range.start]);
        if let Some(replacement) = replace(&m.reference) {
            out.push_str(&replacement);
        }
        last = m.range.end;
    }
    out.push_str(&content[last..]);
    out
}
