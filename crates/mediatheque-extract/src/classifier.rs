//! Content-based format classification.
//!
//! Classification sniffs byte signatures and ignores both the filename
//! extension and whatever content type the uploader declared. This is the
//! dispatch key for extraction: a mislabeled upload is routed by what it
//! actually is.

use std::io;
use std::path::Path;

const MIME_PDF: &str = "application/pdf";
const MIME_MSWORD: &str = "application/msword";
const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Supported document kinds, as determined by content sniffing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image,
    Word,
    /// Anything else; carries the sniffed MIME type for logging.
    Other(String),
}

impl DocumentKind {
    /// Map a sniffed MIME type to a document kind.
    pub fn from_mime(mime: &str) -> Self {
        match mime {
            MIME_PDF => DocumentKind::Pdf,
            MIME_MSWORD | MIME_DOCX => DocumentKind::Word,
            m if m.starts_with("image/") => DocumentKind::Image,
            other => DocumentKind::Other(other.to_string()),
        }
    }
}

/// Classify the file at `path` by its byte signature.
///
/// Files with no recognizable signature classify as
/// `Other("application/octet-stream")`; that is a normal outcome, not an
/// error. I/O failures (missing or unreadable file) do error.
pub fn classify(path: &Path) -> io::Result<DocumentKind> {
    match infer::get_from_path(path)? {
        Some(kind) => Ok(DocumentKind::from_mime(kind.mime_type())),
        None => Ok(DocumentKind::Other("application/octet-stream".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn from_mime_maps_supported_kinds() {
        assert_eq!(DocumentKind::from_mime("application/pdf"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_mime("image/jpeg"), DocumentKind::Image);
        assert_eq!(DocumentKind::from_mime("image/png"), DocumentKind::Image);
        assert_eq!(DocumentKind::from_mime(MIME_MSWORD), DocumentKind::Word);
        assert_eq!(DocumentKind::from_mime(MIME_DOCX), DocumentKind::Word);
        assert_eq!(
            DocumentKind::from_mime("application/zip"),
            DocumentKind::Other("application/zip".to_string())
        );
    }

    #[test]
    fn classify_pdf_by_signature() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.bin");
        fs::write(&path, b"%PDF-1.4\n%fake minimal pdf\n").unwrap();

        assert_eq!(classify(&path).unwrap(), DocumentKind::Pdf);
    }

    #[test]
    fn classify_ignores_misleading_extension() {
        let dir = tempdir().unwrap();
        // A real PNG named .pdf must still classify as an image.
        let path = dir.path().join("liar.pdf");
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]));
        img.save_with_format(&path, image::ImageFormat::Png).unwrap();

        assert_eq!(classify(&path).unwrap(), DocumentKind::Image);
    }

    #[test]
    fn classify_unknown_signature_is_other() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mystery");
        fs::write(&path, b"nothing recognizable here").unwrap();

        assert!(matches!(classify(&path).unwrap(), DocumentKind::Other(_)));
    }

    #[test]
    fn classify_missing_file_errors() {
        let dir = tempdir().unwrap();
        assert!(classify(&dir.path().join("absent.pdf")).is_err());
    }
}
