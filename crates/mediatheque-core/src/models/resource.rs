use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalogued library resource.
///
/// `stored_key` is the content-addressed key returned by the store;
/// `miniature` is the derived thumbnail key, empty until one is generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub original_filename: String,
    pub stored_key: String,
    pub content_type: String,
    pub size_bytes: i64,
    #[serde(default)]
    pub miniature: Option<String>,
    pub ingested_at: DateTime<Utc>,
}

impl Resource {
    pub fn has_thumbnail(&self) -> bool {
        self.miniature.as_deref().is_some_and(|m| !m.is_empty())
    }
}

/// JSON-file backed resource catalog.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub resources: Vec<Resource>,
}

impl Catalog {
    /// Load the catalog from `path`. A missing file yields an empty catalog.
    pub fn load(path: &Path) -> Result<Self, anyhow::Error> {
        if !path.exists() {
            return Ok(Catalog::default());
        }
        let raw = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read catalog {}: {}", path.display(), e))?;
        let catalog = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog {}: {}", path.display(), e))?;
        Ok(catalog)
    }

    /// Persist the catalog to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), anyhow::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)
            .map_err(|e| anyhow::anyhow!("Failed to write catalog {}: {}", path.display(), e))?;
        Ok(())
    }

    pub fn get(&self, id: i64) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut Resource> {
        self.resources.iter_mut().find(|r| r.id == id)
    }

    /// Next free resource id.
    pub fn next_id(&self) -> i64 {
        self.resources.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }

    /// Look up an existing record for a stored key (dedup hit on re-ingest).
    pub fn find_by_key(&self, stored_key: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.stored_key == stored_key)
    }

    pub fn push(&mut self, resource: Resource) {
        self.resources.push(resource);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample(id: i64, key: &str) -> Resource {
        Resource {
            id,
            original_filename: "rapport.pdf".to_string(),
            stored_key: key.to_string(),
            content_type: "application/pdf".to_string(),
            size_bytes: 1234,
            miniature: None,
            ingested_at: Utc::now(),
        }
    }

    #[test]
    fn load_missing_catalog_is_empty() {
        let dir = tempdir().unwrap();
        let catalog = Catalog::load(&dir.path().join("catalog.json")).unwrap();
        assert!(catalog.resources.is_empty());
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let mut catalog = Catalog::default();
        catalog.push(sample(1, "library/files/ab/cd/abcd.pdf"));
        catalog.save(&path).unwrap();

        let reloaded = Catalog::load(&path).unwrap();
        assert_eq!(reloaded.resources.len(), 1);
        assert_eq!(reloaded.resources[0].id, 1);
        assert_eq!(
            reloaded.resources[0].stored_key,
            "library/files/ab/cd/abcd.pdf"
        );
    }

    #[test]
    fn next_id_increments_past_max() {
        let mut catalog = Catalog::default();
        assert_eq!(catalog.next_id(), 1);
        catalog.push(sample(7, "k"));
        assert_eq!(catalog.next_id(), 8);
    }

    #[test]
    fn find_by_key_matches_dedup_hit() {
        let mut catalog = Catalog::default();
        catalog.push(sample(1, "library/files/aa/bb/aabb.pdf"));
        assert!(catalog.find_by_key("library/files/aa/bb/aabb.pdf").is_some());
        assert!(catalog.find_by_key("library/files/cc/dd/ccdd.pdf").is_none());
    }

    #[test]
    fn has_thumbnail_ignores_empty_string() {
        let mut resource = sample(1, "k");
        assert!(!resource.has_thumbnail());
        resource.miniature = Some(String::new());
        assert!(!resource.has_thumbnail());
        resource.miniature = Some("library/thumbnails/aabb_thumb.jpg".to_string());
        assert!(resource.has_thumbnail());
    }
}
