//! Shared key derivation for stored files and their derived artifacts.
//!
//! Primary keys: `library/files/{d[0..2]}/{d[2..4]}/{digest}{ext}`.
//! Derived keys reuse the stored file's stem (the digest), so they are
//! deterministic in the stored name, not the content.

use std::path::Path;

use mediatheque_core::constants::{FILES_PREFIX, PREVIEWS_PREFIX, THUMBNAILS_PREFIX};

/// Lower-cased extension of `name`, with leading dot, or empty.
pub(crate) fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Build the content-addressed key for a digest and original filename.
///
/// The first four hex characters of the digest become two nested directory
/// segments to bound per-directory fan-out.
pub fn content_key(digest: &str, original_name: &str) -> String {
    format!(
        "{}/{}/{}/{}{}",
        FILES_PREFIX,
        &digest[..2],
        &digest[2..4],
        digest,
        extension_of(original_name)
    )
}

fn stem_of(stored_key: &str) -> &str {
    Path::new(stored_key)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(stored_key)
}

/// Derived thumbnail key for a stored file: `{stem}_thumb.jpg` under the
/// thumbnails root.
pub fn thumbnail_key(stored_key: &str) -> String {
    format!("{}/{}_thumb.jpg", THUMBNAILS_PREFIX, stem_of(stored_key))
}

/// Derived preview key for a stored file: `{stem}_preview.pdf` under the
/// previews root.
pub fn preview_key(stored_key: &str) -> String {
    format!("{}/{}_preview.pdf", PREVIEWS_PREFIX, stem_of(stored_key))
}
