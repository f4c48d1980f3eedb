//! Common types for the retrieval subsystem.
//!
//! These types are used across all backends and embedding providers, and
//! are always available regardless of feature flags.

use serde::{Deserialize, Serialize};
use wortschatz_core::Level;

// ============================================================================
// Configuration
// ============================================================================

/// Candidate field names probed when extracting a vocabulary term from a
/// structured search hit, in priority order: the domain term first, then
/// generic synonyms. `contents` last, because the seeded record schema
/// stores its flat payload under that column.
pub const DEFAULT_TERM_FIELDS: [&str; 7] = [
    "german_term",
    "word",
    "vocab",
    "term",
    "vocabulary",
    "text",
    "contents",
];

/// Retrieval subsystem configuration.
///
/// Controls the index storage location, table naming conventions,
/// embedding model, and extraction behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Path to the vector database directory.
    pub db_path: String,

    /// Embedding model name (e.g., "all-minilm-l6-v2").
    pub model: String,

    /// Embedding dimension. Must match what the loader stored.
    pub dimension: usize,

    /// Path to cache directory for embedding model files.
    pub cache_path: Option<String>,

    /// Default search result limit.
    pub default_limit: usize,

    /// Table naming convention templates, tried in order.
    ///
    /// Two conventions exist in historically seeded databases, so both
    /// are attempted by default rather than asserting one is canonical.
    pub naming: Vec<String>,

    /// Candidate field names for term extraction, in priority order.
    pub term_fields: Vec<String>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            db_path: "lancedb_data".to_string(),
            model: "all-minilm-l6-v2".to_string(),
            dimension: 384,
            cache_path: None,
            default_limit: 10,
            naming: vec![
                NamingConvention::UPPER_VOCABULARY.to_string(),
                NamingConvention::LOWER_CSV.to_string(),
            ],
            term_fields: DEFAULT_TERM_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RetrievalConfig {
    /// The configured naming conventions as templates ready to expand.
    pub fn conventions(&self) -> Vec<NamingConvention> {
        self.naming.iter().map(NamingConvention::new).collect()
    }
}

// ============================================================================
// Table naming
// ============================================================================

/// A per-level table naming convention.
///
/// Templates expand `{LEVEL}` to the uppercase level ("A1") and `{level}`
/// to the lowercase form ("a1").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    template: String,
}

impl NamingConvention {
    /// Legacy convention used by the vocabulary loader: `A1_MINIMAL_vocabulary`.
    pub const UPPER_VOCABULARY: &'static str = "{LEVEL}_MINIMAL_vocabulary";

    /// Legacy convention inherited from CSV-derived table names: `a1_minimal.csv`.
    pub const LOWER_CSV: &'static str = "{level}_minimal.csv";

    /// Create a convention from a template string.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Expand the template for a level.
    pub fn table_name(&self, level: Level) -> String {
        self.template
            .replace("{LEVEL}", level.as_str())
            .replace("{level}", level.as_lowercase())
    }
}

// ============================================================================
// Search hits
// ============================================================================

/// The payload attached to a stored record or search hit.
///
/// The index backends do not enforce a schema contract, so a hit's
/// payload is either a flat string or a structured record. Structured
/// records keep their fields as an ordered list of pairs so that
/// last-resort extraction ("first value regardless of field name") is
/// well defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    /// A plain vocabulary string.
    Text(String),
    /// A structured record with named fields in storage order.
    Record(Vec<(String, serde_json::Value)>),
}

impl Payload {
    /// Build a structured payload from `(name, value)` pairs.
    pub fn record<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        Payload::Record(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Whether the payload carries no content at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Text(s) => s.trim().is_empty(),
            Payload::Record(pairs) => pairs.is_empty(),
        }
    }

    /// Look up a field by exact name in a structured payload.
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        match self {
            Payload::Text(_) => None,
            Payload::Record(pairs) => pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v),
        }
    }
}

/// One candidate returned by a similarity search.
///
/// Hits arrive from the backend pre-sorted by ascending distance (most
/// similar first); everything downstream preserves that order.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Stable record identifier.
    pub id: String,

    /// Primary payload.
    pub payload: Payload,

    /// Optional metadata side-channel, probed only when the primary
    /// payload is empty.
    pub metadata: Option<Payload>,

    /// Raw distance from the query vector (lower is more similar).
    pub distance: f32,
}

impl SearchHit {
    /// Create a hit with no metadata side-channel.
    pub fn new(id: impl Into<String>, payload: Payload, distance: f32) -> Self {
        Self {
            id: id.into(),
            payload,
            metadata: None,
            distance,
        }
    }

    /// Attach a metadata side-channel.
    pub fn with_metadata(mut self, metadata: Payload) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
