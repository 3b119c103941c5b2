//! Médiathèque Storage Library
//!
//! This crate provides the content-addressed file store used by the
//! library pipeline. Files are identified by the SHA-256 digest of their
//! byte content; identical content is stored once no matter how many times
//! or under how many names it is uploaded.
//!
//! # Storage key format
//!
//! - **Primary files**: `library/files/{d[0..2]}/{d[2..4]}/{digest}{ext}`
//!   where `ext` is the lower-cased extension of the original filename.
//!   The two nested two-character segments bound directory fan-out.
//! - **Thumbnails**: `library/thumbnails/{stem}_thumb.jpg`
//! - **Previews**: `library/previews/{stem}_preview.pdf`
//!
//! Keys must not contain `..` or a leading `/`. Key derivation is
//! centralized in the `paths` module so every caller stays consistent.

pub mod local;
pub mod paths;
pub mod traits;

// Re-export commonly used types
pub use local::HashedLocalStore;
pub use traits::{ContentStore, StorageError, StorageResult};
