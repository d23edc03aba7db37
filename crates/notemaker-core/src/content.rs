//! Text operations over note content that respect embedded media tags.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::media_tag::{find_tags, replace_tags};
use crate::models::{AttachmentRecord, MediaReference};

static EXCESS_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("newline pattern is valid"));

/// Trim the content and collapse runs of three or more newlines into two.
pub fn normalize(content: &str) -> String {
    EXCESS_NEWLINES
        .replace_all(content.trim(), "\n\n")
        .into_owned()
}

/// Short list-view text for a note: tags become `[Image Attachment]` style
/// labels and the result is cut to `limit` characters, with `...` appended
/// when anything was cut.
pub fn preview(content: &str, limit: usize) -> String {
    let labelled = replace_tags(content, |r| Some(format!("[{} Attachment]", r.kind.label())));
    if labelled.chars().count() <= limit {
        return labelled;
    }
    let mut out: String = labelled.chars().take(limit).collect();
    out.push_str("...");
    out
}

/// Remove tags pointing at client-local `blob:` URLs.
///
/// Returns the cleaned, normalized content and the references that were
/// removed, in order.
pub fn strip_ephemeral(content: &str) -> (String, Vec<MediaReference>) {
    let mut removed = Vec::new();
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for m in find_tags(content) {
        if m.reference.is_ephemeral() {
            out.push_str(&content[last..m.range.start]);
            last = m.range.end;
            removed.push(m.reference);
        }
    }

    if removed.is_empty() {
        return (content.to_string(), removed);
    }
    out.push_str(&content[last..]);
    (normalize(&out), removed)
}

/// The attachment list the editor persists next to `content`: one record per
/// tag, in order of appearance.
pub fn attachments_from_content(content: &str) -> Vec<AttachmentRecord> {
    find_tags(content)
        .into_iter()
        .map(|m| m.reference.to_attachment())
        .collect()
}
