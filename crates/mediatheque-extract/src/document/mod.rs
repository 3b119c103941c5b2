//! Word document extraction module

pub mod extractor;

pub use extractor::WordExtractor;
