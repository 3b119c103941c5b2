//! Extracted metadata mapping.
//!
//! Metadata is a flat field → value mapping rather than a typed struct:
//! the set of fields differs per format and every value must stay
//! JSON-serializable (string, integer, list of strings, or null) for the
//! callers that persist it.
//!
//! Field names follow the catalogue's established vocabulary: PDF
//! documents produce `titre`, `auteur`, `sujet`, `mots_cles`, `createur`,
//! `producteur`, `date_creation`, `date_modification`, `nombre_pages`,
//! `texte_premiere_page`; images produce `format`, `mode`, `taille`,
//! `texte_extrait`. The orchestrator adds `miniature` when a thumbnail
//! was written.

use std::collections::BTreeMap;

/// Field name → JSON value mapping produced by one extraction.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Truncate to at most `max_chars` characters (not bytes, so multi-byte
/// text never splits mid-character).
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
