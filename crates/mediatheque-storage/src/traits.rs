//! Storage abstraction trait
//!
//! This module defines the ContentStore trait implemented by the
//! content-addressed local backend.

use std::path::PathBuf;
use std::pin::Pin;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Store failed: {0}")]
    StoreFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Content-addressed store abstraction.
///
/// Stored paths are a pure function of content digest and original
/// extension, so a write to an already-existing key is a no-op success.
/// The dedup check-then-write is **not** mutually excluded: two concurrent
/// stores of identical content may at worst perform one redundant write of
/// the same bytes. Callers needing a strict exactly-once write must add
/// external locking.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store a buffer and return its content-addressed storage key.
    ///
    /// Identical content always resolves to the same key; the extension of
    /// the key derives from the first filename that created it.
    async fn store(&self, original_name: &str, data: Vec<u8>) -> StorageResult<String>;

    /// Store from a reader without buffering the whole input in memory.
    ///
    /// The digest is computed chunk by chunk while the content spools to a
    /// temporary file, which is promoted to the final key only when the
    /// content is new.
    async fn store_stream(
        &self,
        original_name: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<String>;

    /// Read a stored file by its key.
    async fn read(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Check if a key exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get the size in bytes of a stored file, if it exists.
    async fn content_length(&self, key: &str) -> StorageResult<u64>;

    /// Delete a stored file. Deleting a missing key is a no-op success.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Resolve a key to an absolute filesystem path (no existence check).
    fn absolute_path(&self, key: &str) -> StorageResult<PathBuf>;
}
