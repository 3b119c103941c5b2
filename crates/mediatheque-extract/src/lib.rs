//! Médiathèque Extraction Library
//!
//! This crate provides upload validation, content-based format
//! classification, and per-format metadata extraction for library
//! resources:
//!
//! - Validation (`validator`): extension allow-list, size ceiling, and
//!   declared content-type check, applied before anything touches storage.
//! - Classification (`classifier`): byte-signature sniffing, independent
//!   of filename or declared type.
//! - Extraction (`pdf`, `image`, `document`): format-specific extractors
//!   producing a metadata mapping and, where supported, a thumbnail.
//! - Orchestration (`orchestrator`): classify → dispatch → clean, with
//!   extraction failures degraded to empty mappings so batch callers can
//!   keep going.

pub mod classifier;
pub mod document;
pub mod image;
pub mod metadata;
pub mod ocr;
pub mod orchestrator;
pub mod pdf;
pub mod traits;
pub mod validator;

// Re-export commonly used types
pub use self::classifier::{classify, DocumentKind};
pub use self::document::WordExtractor;
pub use self::image::ImageExtractor;
pub use self::metadata::Metadata;
pub use self::ocr::TextRecognizer;
pub use self::orchestrator::{clean, Orchestrator};
pub use self::pdf::PdfExtractor;
pub use self::traits::MetadataExtractor;
pub use self::validator::{UploadValidator, ValidationError};
