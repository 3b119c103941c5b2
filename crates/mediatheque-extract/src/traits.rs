//! Core trait for metadata extractors.

use std::path::Path;

use async_trait::async_trait;

use crate::metadata::Metadata;

/// Format-specific metadata extractor.
///
/// Implementations catch and log their own internal failures and return an
/// empty mapping instead of erroring; the orchestrator's catch around each
/// dispatch is the second line of defense. The `Err` arm therefore only
/// carries failures an implementation chose not to absorb.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    /// Extract descriptive metadata from the file at `path`.
    ///
    /// Formats that support it render a thumbnail to `thumb_target`
    /// (created or overwritten; the parent directory must exist).
    async fn extract(&self, path: &Path, thumb_target: &Path)
        -> Result<Metadata, anyhow::Error>;
}
