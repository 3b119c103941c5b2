//! PDF extractor - document info fields, page count, first-page text, and
//! a first-page thumbnail render.

use std::path::Path;

use async_trait::async_trait;
use pdfium_render::prelude::*;
use serde_json::{json, Value};

use crate::metadata::{truncate_chars, Metadata};
use crate::traits::MetadataExtractor;
use mediatheque_core::constants::TEXT_PREVIEW_MAX_CHARS;

/// PDF metadata extractor backed by Pdfium.
///
/// Binding to the Pdfium library happens once at construction; the
/// instance is then reused for every document.
pub struct PdfExtractor {
    pdfium: Pdfium,
}

impl PdfExtractor {
    /// Bind Pdfium from `library_dir` when given, falling back to the
    /// system library path.
    pub fn new(library_dir: Option<&Path>) -> Result<Self, anyhow::Error> {
        let bindings = match library_dir {
            Some(dir) => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
                    .or_else(|_| Pdfium::bind_to_system_library())
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| anyhow::anyhow!("Failed to bind Pdfium library: {}", e))?;

        Ok(PdfExtractor {
            pdfium: Pdfium::new(bindings),
        })
    }

    fn info_field(info: &PdfMetadata, tag: PdfDocumentMetadataTagType) -> Value {
        info.get(tag)
            .map(|t| Value::String(t.value().to_string()))
            .unwrap_or(Value::Null)
    }

    fn try_extract(&self, path: &Path, thumb_target: &Path) -> Result<Metadata, anyhow::Error> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| anyhow::anyhow!("Failed to open PDF {}: {}", path.display(), e))?;

        let info = document.metadata();
        let mut metadata = Metadata::new();
        metadata.insert(
            "titre".to_string(),
            Self::info_field(&info, PdfDocumentMetadataTagType::Title),
        );
        metadata.insert(
            "auteur".to_string(),
            Self::info_field(&info, PdfDocumentMetadataTagType::Author),
        );
        metadata.insert(
            "sujet".to_string(),
            Self::info_field(&info, PdfDocumentMetadataTagType::Subject),
        );
        metadata.insert(
            "mots_cles".to_string(),
            Self::info_field(&info, PdfDocumentMetadataTagType::Keywords),
        );
        metadata.insert(
            "createur".to_string(),
            Self::info_field(&info, PdfDocumentMetadataTagType::Creator),
        );
        metadata.insert(
            "producteur".to_string(),
            Self::info_field(&info, PdfDocumentMetadataTagType::Producer),
        );
        metadata.insert(
            "date_creation".to_string(),
            Self::info_field(&info, PdfDocumentMetadataTagType::CreationDate),
        );
        metadata.insert(
            "date_modification".to_string(),
            Self::info_field(&info, PdfDocumentMetadataTagType::ModificationDate),
        );

        let pages = document.pages();
        metadata.insert("nombre_pages".to_string(), json!(pages.len()));

        // Bounded preview of the first page only, not full-text indexing.
        let first_page = pages
            .first()
            .map_err(|e| anyhow::anyhow!("Failed to open first page: {}", e))?;
        let text = first_page.text().map(|t| t.all()).unwrap_or_default();
        metadata.insert(
            "texte_premiere_page".to_string(),
            json!(truncate_chars(&text, TEXT_PREVIEW_MAX_CHARS)),
        );

        let bitmap = first_page
            .render_with_config(&PdfRenderConfig::new().scale_page_by_factor(1.0))
            .map_err(|e| anyhow::anyhow!("Failed to render first page: {}", e))?;
        bitmap
            .as_image()
            .into_rgb8()
            .save(thumb_target)
            .map_err(|e| {
                anyhow::anyhow!(
                    "Failed to write thumbnail {}: {}",
                    thumb_target.display(),
                    e
                )
            })?;

        Ok(metadata)
    }
}

#[async_trait]
impl MetadataExtractor for PdfExtractor {
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
                    "PDF metadata extraction failed, returning empty mapping"
                );
                Ok(Metadata::new())
            }
        }
    }
}
