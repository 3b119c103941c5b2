//! PDF metadata extraction module

pub mod extractor;

pub use extractor::PdfExtractor;
