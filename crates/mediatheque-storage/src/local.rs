use crate::paths;
use crate::traits::{ContentStore, StorageError, StorageResult};
use async_trait::async_trait;
use mediatheque_core::constants::FILES_PREFIX;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Content-addressed local filesystem store.
///
/// Every stored file lives at a path derived from the SHA-256 digest of
/// its content, so re-uploading identical bytes is a no-op that returns
/// the already-stored key.
#[derive(Clone)]
pub struct HashedLocalStore {
    base_path: PathBuf,
}

impl HashedLocalStore {
    /// Create a new store rooted at `base_path` (e.g. the media root).
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(HashedLocalStore { base_path })
    }

    /// Convert a storage key to a filesystem path, rejecting traversal
    /// sequences that could escape the base directory.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }
        Ok(self.base_path.join(key))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Look for an already-stored file with this digest, regardless of the
    /// extension it was first stored under. Returns its key when found.
    async fn find_existing(&self, digest: &str) -> StorageResult<Option<String>> {
        let dir = self
            .base_path
            .join(FILES_PREFIX)
            .join(&digest[..2])
            .join(&digest[2..4]);

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            // Fan-out directory not created yet: nothing stored here.
            Err(_) => return Ok(None),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let matches = name
                .strip_prefix(digest)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'));
            if matches {
                return Ok(Some(format!(
                    "{}/{}/{}/{}",
                    FILES_PREFIX,
                    &digest[..2],
                    &digest[2..4],
                    name
                )));
            }
        }

        Ok(None)
    }
}

#[async_trait]
impl ContentStore for HashedLocalStore {
    async fn store(&self, original_name: &str, data: Vec<u8>) -> StorageResult<String> {
        let start = std::time::Instant::now();

        let mut hasher = Sha256::new();
        hasher.update(&data);
        let digest = hex::encode(hasher.finalize());

        if let Some(existing) = self.find_existing(&digest).await? {
            tracing::debug!(
                key = %existing,
                original_name = %original_name,
                "Content already stored, returning existing key"
            );
            return Ok(existing);
        }

        let key = paths::content_key(&digest, original_name);
        let path = self.key_to_path(&key)?;
        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::StoreFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::StoreFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::StoreFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Stored new content"
        );

        Ok(key)
    }

    async fn store_stream(
        &self,
        original_name: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<String> {
        let start = std::time::Instant::now();

        // Spool to a temp file in the same filesystem while hashing, so the
        // final promotion is a rename rather than a copy.
        let tmp = tempfile::Builder::new()
            .prefix(".ingest-")
            .tempfile_in(&self.base_path)
            .map_err(|e| StorageError::StoreFailed(format!("Failed to create temp file: {}", e)))?;
        let mut spool = fs::File::from_std(tmp.reopen().map_err(|e| {
            StorageError::StoreFailed(format!("Failed to reopen temp file: {}", e))
        })?);

        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; STREAM_CHUNK_SIZE];
        let mut total: u64 = 0;
        loop {
            let n = reader.read(&mut buf).await.map_err(|e| {
                StorageError::StoreFailed(format!("Failed to read upload stream: {}", e))
            })?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
            spool.write_all(&buf[..n]).await.map_err(|e| {
                StorageError::StoreFailed(format!("Failed to spool upload stream: {}", e))
            })?;
            total += n as u64;
        }
        spool.sync_all().await.map_err(|e| {
            StorageError::StoreFailed(format!("Failed to sync temp file: {}", e))
        })?;
        drop(spool);

        let digest = hex::encode(hasher.finalize());

        if let Some(existing) = self.find_existing(&digest).await? {
            tracing::debug!(
                key = %existing,
                original_name = %original_name,
                "Content already stored, discarding spooled stream"
            );
            return Ok(existing);
        }

        let key = paths::content_key(&digest, original_name);
        let path = self.key_to_path(&key)?;
        self.ensure_parent_dir(&path).await?;

        tmp.persist(&path).map_err(|e| {
            StorageError::StoreFailed(format!(
                "Failed to promote temp file to {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = total,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Stored new content from stream"
        );

        Ok(key)
    }

    async fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Ok(data)
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn content_length(&self, key: &str) -> StorageResult<u64> {
        let path = self.key_to_path(key)?;
        let meta = fs::metadata(&path)
            .await
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;
        Ok(meta.len())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), key = %key, "Deleted stored file");

        Ok(())
    }

    fn absolute_path(&self, key: &str) -> StorageResult<PathBuf> {
        self.key_to_path(key)
    }
}
