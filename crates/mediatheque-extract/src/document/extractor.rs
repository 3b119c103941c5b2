//! Word extractor stub.
//!
//! Word metadata extraction is not implemented. The stub keeps the gap
//! visible at the dispatch site instead of silently misrouting Word files
//! to another extractor.

use std::path::Path;

use async_trait::async_trait;

use crate::metadata::Metadata;
use crate::traits::MetadataExtractor;

/// Placeholder extractor for `.doc`/`.docx` files; always yields an empty
/// mapping.
pub struct WordExtractor;

#[async_trait]
impl MetadataExtractor for WordExtractor {
    async fn extract(
        &self,
        path: &Path,
        _thumb_target: &Path,
    ) -> Result<Metadata, anyhow::Error> {
        // TODO: read .docx core properties (docProps/core.xml inside the
        // zip container); legacy .doc has no planned backend.
        tracing::debug!(
            path = %path.display(),
            "Word metadata extraction not implemented, returning empty mapping"
        );
        Ok(Metadata::new())
    }
}
