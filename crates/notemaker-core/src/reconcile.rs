//! Attachment reconciliation: which remote assets does a note own?
//!
//! A note records its media twice, once as tags inside the content and once
//! as the structured attachment list. Both may be stale or partial, so
//! cleanup takes the union, keyed by asset id.

use std::collections::HashSet;
use tracing::debug;

use crate::media_tag::decode_all;
use crate::models::{AttachmentRecord, MediaReference};

/// Deduplicated references to every registered asset a note points at.
///
/// Attachment records are scanned before content tags and the first
/// occurrence of an asset id wins, so an attachment's recorded kind takes
/// precedence over a tag's. References without an asset id are left out;
/// there is nothing to delete remotely for them.
pub fn collect_references(content: &str, attachments: &[AttachmentRecord]) -> Vec<MediaReference> {
    let candidates = attachments
        .iter()
        .map(MediaReference::from_attachment)
        .chain(decode_all(content));

    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for reference in candidates {
        if !reference.is_registered() {
            continue;
        }
        if seen.insert(reference.asset_id().to_string()) {
            unique.push(reference);
        } else {
            debug!(
                asset_id = reference.asset_id(),
                asset_kind = reference.asset_kind(),
                "reconcile: duplicate asset reference dropped"
            );
        }
    }
    unique
}
