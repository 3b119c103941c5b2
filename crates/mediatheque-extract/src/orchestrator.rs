//! Extraction orchestrator: classify → dispatch → clean.
//!
//! The orchestrator never fails its caller. Unsupported formats yield an
//! empty mapping, and any extractor error is caught, logged, and degraded
//! to an empty mapping, so batch callers iterating many files keep going
//! past individual failures.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tokio::fs;

use crate::classifier::{self, DocumentKind};
use crate::document::WordExtractor;
use crate::image::ImageExtractor;
use crate::metadata::Metadata;
use crate::ocr::TextRecognizer;
use crate::pdf::PdfExtractor;
use crate::traits::MetadataExtractor;
use mediatheque_storage::paths;

/// Dispatches stored files to the extractor matching their sniffed format.
pub struct Orchestrator {
    media_root: PathBuf,
    pdf: Option<PdfExtractor>,
    image: ImageExtractor,
    word: WordExtractor,
}

impl Orchestrator {
    /// Build an orchestrator rooted at `media_root` (thumbnails are written
    /// below it).
    ///
    /// `pdf` is `None` when the Pdfium library could not be bound; PDF
    /// files then degrade to empty metadata instead of failing ingestion.
    /// The OCR recognizer is likewise optional.
    pub fn new(
        media_root: impl Into<PathBuf>,
        pdf: Option<PdfExtractor>,
        recognizer: Option<Arc<TextRecognizer>>,
    ) -> Self {
        Orchestrator {
            media_root: media_root.into(),
            pdf,
            image: ImageExtractor::new(recognizer),
            word: WordExtractor,
        }
    }

    /// Extract metadata from the file at `path`.
    ///
    /// The returned mapping is already cleaned; `miniature` is set to the
    /// thumbnail's storage key when one was written.
    pub async fn extract(&self, path: &Path) -> Metadata {
        let kind = match classifier::classify(path) {
            Ok(kind) => kind,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to classify file, skipping extraction"
                );
                return Metadata::new();
            }
        };

        if let DocumentKind::Other(mime) = &kind {
            tracing::debug!(
                path = %path.display(),
                mime_type = %mime,
                "Unsupported format, no metadata extracted"
            );
            return Metadata::new();
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let thumb_key = paths::thumbnail_key(name);
        let thumb_target = self.media_root.join(&thumb_key);
        if let Some(parent) = thumb_target.parent() {
            if let Err(e) = fs::create_dir_all(parent).await {
                tracing::warn!(
                    path = %parent.display(),
                    error = %e,
                    "Failed to create thumbnail directory, skipping extraction"
                );
                return Metadata::new();
            }
        }

        let result = match kind {
            DocumentKind::Pdf => match &self.pdf {
                Some(pdf) => pdf.extract(path, &thumb_target).await,
                None => {
                    tracing::warn!(
                        path = %path.display(),
                        "PDF renderer unavailable, returning empty mapping"
                    );
                    Ok(Metadata::new())
                }
            },
            DocumentKind::Image => self.image.extract(path, &thumb_target).await,
            DocumentKind::Word => self.word.extract(path, &thumb_target).await,
            DocumentKind::Other(_) => unreachable!("handled above"),
        };

        match result {
            Ok(mut metadata) => {
                if !metadata.is_empty() && fs::try_exists(&thumb_target).await.unwrap_or(false) {
                    metadata.insert("miniature".to_string(), Value::String(thumb_key));
                }
                clean(metadata)
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Metadata extraction failed, returning empty mapping"
                );
                Metadata::new()
            }
        }
    }
}

/// Normalize an extracted mapping.
///
/// Strings are trimmed; list elements are stringified, trimmed, and
/// dropped when empty; null fields are dropped entirely; every other value
/// passes through unchanged.
pub fn clean(metadata: Metadata) -> Metadata {
    let mut cleaned = Metadata::new();
    for (key, value) in metadata {
        match value {
            Value::Null => {}
            Value::String(s) => {
                cleaned.insert(key, Value::String(s.trim().to_string()));
            }
            Value::Array(items) => {
                let items = items
                    .into_iter()
                    .filter_map(|item| {
                        let text = match item {
                            Value::Null => return None,
                            Value::String(s) => s,
                            other => other.to_string(),
                        };
                        let text = text.trim().to_string();
                        (!text.is_empty()).then_some(Value::String(text))
                    })
                    .collect();
                cleaned.insert(key, Value::Array(items));
            }
            other => {
                cleaned.insert(key, other);
            }
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn orchestrator(media_root: &Path) -> Orchestrator {
        Orchestrator::new(media_root, None, None)
    }

    #[test]
    fn clean_trims_drops_and_stringifies() {
        let mut metadata = Metadata::new();
        metadata.insert("titre".to_string(), json!("  x "));
        metadata.insert("auteur".to_string(), Value::Null);
        metadata.insert("mots_cles".to_string(), json!(["a", "", " b "]));
        metadata.insert("nombre_pages".to_string(), json!(12));

        let cleaned = clean(metadata);

        assert_eq!(cleaned["titre"], json!("x"));
        assert!(!cleaned.contains_key("auteur"));
        assert_eq!(cleaned["mots_cles"], json!(["a", "b"]));
        assert_eq!(cleaned["nombre_pages"], json!(12));
    }

    #[test]
    fn clean_stringifies_numeric_list_elements() {
        let mut metadata = Metadata::new();
        metadata.insert("taille".to_string(), json!([200, 100]));

        let cleaned = clean(metadata);
        assert_eq!(cleaned["taille"], json!(["200", "100"]));
    }

    #[tokio::test]
    async fn extract_unsupported_format_is_empty_and_silent() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("archive.zip");
        // Minimal zip local-file-header signature.
        std::fs::write(&source, b"PK\x03\x04rest of archive").unwrap();

        let metadata = orchestrator(dir.path()).extract(&source).await;
        assert!(metadata.is_empty());
    }

    #[tokio::test]
    async fn extract_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let metadata = orchestrator(dir.path())
            .extract(&dir.path().join("absent.pdf"))
            .await;
        assert!(metadata.is_empty());
    }

    #[tokio::test]
    async fn extract_image_produces_metadata_and_thumbnail() {
        let dir = tempdir().unwrap();
        let media_root = dir.path().join("media");
        let source = dir.path().join("affiche.png");
        let img = image::RgbaImage::from_pixel(64, 32, image::Rgba([0, 128, 0, 255]));
        img.save_with_format(&source, image::ImageFormat::Png).unwrap();

        let metadata = orchestrator(&media_root).extract(&source).await;

        assert_eq!(metadata["taille"], json!(["64", "32"]));
        assert_eq!(metadata["format"], json!("Png"));

        let thumb_key = metadata["miniature"].as_str().unwrap();
        assert_eq!(thumb_key, "library/thumbnails/affiche_thumb.jpg");
        assert!(media_root.join(thumb_key).exists());
    }

    #[tokio::test]
    async fn extract_pdf_without_renderer_is_empty() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("doc.pdf");
        std::fs::write(&source, b"%PDF-1.4\nminimal\n").unwrap();

        let metadata = orchestrator(dir.path()).extract(&source).await;
        assert!(metadata.is_empty());
    }
}
