//! Data models for the application
//!
//! Catalog records describing ingested library resources. The catalog is
//! the only persistent state this workspace owns; extracted metadata is
//! returned to callers rather than stored wholesale.

mod resource;

pub use resource::{Catalog, Resource};
