//! Shared constants for the library pipeline.

/// Maximum accepted upload size: 50 MiB.
pub const MAX_UPLOAD_SIZE_BYTES: usize = 50 * 1024 * 1024;

/// Upper bound on extracted text previews (first-page text, OCR output).
pub const TEXT_PREVIEW_MAX_CHARS: usize = 1000;

/// Bounding box for image thumbnails, aspect-preserving.
pub const THUMBNAIL_MAX_DIM: u32 = 200;

/// Key prefix for primary stored files.
pub const FILES_PREFIX: &str = "library/files";

/// Key prefix for derived thumbnails.
pub const THUMBNAILS_PREFIX: &str = "library/thumbnails";

/// Key prefix for derived previews.
pub const PREVIEWS_PREFIX: &str = "library/previews";
