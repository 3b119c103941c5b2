//! Image extractor - intrinsic properties, OCR text, and a bounded
//! thumbnail.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use image::{GenericImageView, ImageReader};
use serde_json::json;

use crate::metadata::{truncate_chars, Metadata};
use crate::ocr::TextRecognizer;
use crate::traits::MetadataExtractor;
use mediatheque_core::constants::{TEXT_PREVIEW_MAX_CHARS, THUMBNAIL_MAX_DIM};

/// Image metadata extractor.
///
/// When no recognizer is injected, `texte_extrait` is empty rather than
/// the extraction failing: OCR is an optional capability, not a
/// precondition.
pub struct ImageExtractor {
    recognizer: Option<Arc<TextRecognizer>>,
}

impl ImageExtractor {
    pub fn new(recognizer: Option<Arc<TextRecognizer>>) -> Self {
        ImageExtractor { recognizer }
    }

    fn try_extract(&self, path: &Path, thumb_target: &Path) -> Result<Metadata, anyhow::Error> {
        let reader = ImageReader::open(path)
            .with_context(|| format!("Failed to open image {}", path.display()))?
            .with_guessed_format()?;
        let format = reader.format().map(|f| format!("{:?}", f));
        let img = reader
            .decode()
            .with_context(|| format!("Failed to decode image {}", path.display()))?;

        let (width, height) = img.dimensions();
        let mode = format!("{:?}", img.color());

        let text = match &self.recognizer {
            Some(recognizer) => recognizer.recognize(&img.to_rgb8())?,
            None => String::new(),
        };

        let thumb = img.thumbnail(THUMBNAIL_MAX_DIM, THUMBNAIL_MAX_DIM);
        thumb.to_rgb8().save(thumb_target).with_context(|| {
            format!("Failed to write thumbnail {}", thumb_target.display())
        })?;

        let mut metadata = Metadata::new();
        metadata.insert("format".to_string(), json!(format));
        metadata.insert("mode".to_string(), json!(mode));
        metadata.insert("taille".to_string(), json!([width, height]));
        metadata.insert(
            "texte_extrait".to_string(),
            json!(truncate_chars(&text, TEXT_PREVIEW_MAX_CHARS)),
        );
        Ok(metadata)
    }
}

#[async_trait]
impl MetadataExtractor for ImageExtractor {
    async fn extract(
        &self,
        path: &Path,
        thumb_target: &Path,
    ) -> Result<Metadata, anyhow::Error> {
        match self.try_extract(path, thumb_target) {
            Ok(metadata) => Ok(metadata),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Image metadata extraction failed, returning empty mapping"
                );
                Ok(Metadata::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use tempfile::tempdir;

    fn write_test_image(path: &Path, width: u32, height: u32) {
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        img.save_with_format(path, ImageFormat::Png).unwrap();
    }

    #[tokio::test]
    async fn extract_reads_intrinsic_properties() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("rouge.png");
        let thumb = dir.path().join("rouge_thumb.jpg");
        write_test_image(&source, 320, 240);

        let extractor = ImageExtractor::new(None);
        let metadata = extractor.extract(&source, &thumb).await.unwrap();

        assert_eq!(metadata["format"], json!("Png"));
        assert_eq!(metadata["taille"], json!([320, 240]));
        assert_eq!(metadata["texte_extrait"], json!(""));
        assert!(metadata["mode"].as_str().is_some());
    }

    #[tokio::test]
    async fn extract_writes_bounded_thumbnail() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("grand.png");
        let thumb = dir.path().join("grand_thumb.jpg");
        write_test_image(&source, 800, 400);

        let extractor = ImageExtractor::new(None);
        extractor.extract(&source, &thumb).await.unwrap();

        let written = image::open(&thumb).unwrap();
        let (w, h) = written.dimensions();
        assert!(w <= THUMBNAIL_MAX_DIM && h <= THUMBNAIL_MAX_DIM);
        // Aspect ratio preserved: 2:1 input stays 2:1.
        assert_eq!(w, 200);
        assert_eq!(h, 100);
    }

    #[tokio::test]
    async fn extract_on_garbage_degrades_to_empty_mapping() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("pas_une_image.png");
        let thumb = dir.path().join("pas_une_image_thumb.jpg");
        std::fs::write(&source, b"not an image").unwrap();

        let extractor = ImageExtractor::new(None);
        let metadata = extractor.extract(&source, &thumb).await.unwrap();

        assert!(metadata.is_empty());
        assert!(!thumb.exists());
    }
}
