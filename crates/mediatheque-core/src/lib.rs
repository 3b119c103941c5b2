//! Médiathèque Core Library
//!
//! This crate provides core domain models, configuration, and shared
//! constants used across all Médiathèque components.

pub mod config;
pub mod constants;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use models::{Catalog, Resource};
