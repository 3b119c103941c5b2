//! Configuration module
//!
//! Env-var driven configuration for the storage root, catalog location,
//! upload limits, and optional OCR model / PDF renderer paths.

use std::env;
use std::path::PathBuf;

use crate::constants::MAX_UPLOAD_SIZE_BYTES;

const DEFAULT_MEDIA_ROOT: &str = "media";
const DEFAULT_CATALOG_FILE: &str = "catalog.json";

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Root directory all storage keys are resolved against.
    pub media_root: PathBuf,
    /// Path of the JSON resource catalog.
    pub catalog_path: PathBuf,
    /// Maximum accepted upload size in bytes.
    pub max_upload_size_bytes: usize,
    /// Path of the rten text-detection model. OCR is disabled when unset.
    pub ocr_detection_model: Option<PathBuf>,
    /// Path of the rten text-recognition model. OCR is disabled when unset.
    pub ocr_recognition_model: Option<PathBuf>,
    /// Directory to search for the Pdfium dynamic library before falling
    /// back to the system library path.
    pub pdfium_library_dir: Option<PathBuf>,
}

impl Config {
    /// Build configuration from environment variables.
    ///
    /// Recognized variables: `MEDIA_ROOT`, `CATALOG_PATH`,
    /// `MAX_UPLOAD_SIZE_BYTES`, `OCR_DETECTION_MODEL`,
    /// `OCR_RECOGNITION_MODEL`, `PDFIUM_LIBRARY_DIR`.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let media_root =
            PathBuf::from(env::var("MEDIA_ROOT").unwrap_or_else(|_| DEFAULT_MEDIA_ROOT.into()));

        let catalog_path = env::var("CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| media_root.join(DEFAULT_CATALOG_FILE));

        let max_upload_size_bytes = match env::var("MAX_UPLOAD_SIZE_BYTES") {
            Ok(v) => v
                .parse::<usize>()
                .map_err(|e| anyhow::anyhow!("Invalid MAX_UPLOAD_SIZE_BYTES '{}': {}", v, e))?,
            Err(_) => MAX_UPLOAD_SIZE_BYTES,
        };

        Ok(Config {
            media_root,
            catalog_path,
            max_upload_size_bytes,
            ocr_detection_model: env::var("OCR_DETECTION_MODEL").ok().map(PathBuf::from),
            ocr_recognition_model: env::var("OCR_RECOGNITION_MODEL").ok().map(PathBuf::from),
            pdfium_library_dir: env::var("PDFIUM_LIBRARY_DIR").ok().map(PathBuf::from),
        })
    }

    /// True when both OCR model paths are configured.
    pub fn ocr_configured(&self) -> bool {
        self.ocr_detection_model.is_some() && self.ocr_recognition_model.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            media_root: PathBuf::from(DEFAULT_MEDIA_ROOT),
            catalog_path: PathBuf::from(DEFAULT_MEDIA_ROOT).join(DEFAULT_CATALOG_FILE),
            max_upload_size_bytes: MAX_UPLOAD_SIZE_BYTES,
            ocr_detection_model: None,
            ocr_recognition_model: None,
            pdfium_library_dir: None,
        }
    }
}
