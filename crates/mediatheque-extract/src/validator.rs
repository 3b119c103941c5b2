//! Upload validation: extension allow-list, size ceiling, declared
//! content-type check.
//!
//! Validation gates uploads before they reach the content store. It checks
//! the *declared* content type against the extension's expectation; the
//! extraction pipeline later dispatches on the *sniffed* type, which can
//! disagree for a mislabeled upload. That divergence is inherited behavior
//! and deliberately left in place.

use std::path::Path;

use mediatheque_core::constants::MAX_UPLOAD_SIZE_BYTES;

/// Allowed extensions and the declared content type each must carry.
///
/// This table is a format contract shared with upload clients; changing it
/// breaks interoperability.
pub const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
];

/// Expected declared content type for an extension (lower-case, no dot).
pub fn expected_content_type(extension: &str) -> Option<&'static str> {
    ALLOWED_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, ct)| *ct)
}

/// Upload validation errors. Each is fatal to the single upload it
/// rejects.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File extension not allowed: {extension:?} (allowed: pdf, doc, docx, jpg, jpeg, png)")]
    UnsupportedExtension { extension: String },

    #[error("File too large: {size} bytes (maximum allowed: {max_mib} MiB)")]
    FileTooLarge { size: usize, max_mib: usize },

    #[error("Content type not allowed: {content_type} (expected for .{extension}: {expected})")]
    ContentTypeMismatch {
        extension: String,
        content_type: String,
        expected: &'static str,
    },
}

/// Upload file validator.
pub struct UploadValidator {
    max_size: usize,
}

impl UploadValidator {
    pub fn new(max_size: usize) -> Self {
        UploadValidator { max_size }
    }

    /// Validate an upload. Check order is extension → size → declared
    /// content type; the first failure short-circuits the rest.
    pub fn validate(
        &self,
        filename: &str,
        declared_content_type: &str,
        size: usize,
    ) -> Result<(), ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let Some(expected) = expected_content_type(&extension) else {
            return Err(ValidationError::UnsupportedExtension { extension });
        };

        if size > self.max_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max_mib: self.max_size / (1024 * 1024),
            });
        }

        if !declared_content_type.eq_ignore_ascii_case(expected) {
            return Err(ValidationError::ContentTypeMismatch {
                extension,
                content_type: declared_content_type.to_string(),
                expected,
            });
        }

        Ok(())
    }
}

impl Default for UploadValidator {
    fn default() -> Self {
        UploadValidator::new(MAX_UPLOAD_SIZE_BYTES)
    }
}
