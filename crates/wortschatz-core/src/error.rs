//! Error types for Wortschatz operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used
//! across all Wortschatz crates. Uses `thiserror` for derive macros.
//!
//! The retrieval-specific variants (`InvalidLevel`, `ModelUnavailable`,
//! `IndexNotFound`, `SearchFailed`) propagate unchanged to callers: the
//! HTTP layer maps them to status codes, nothing downgrades them to empty
//! results.

use thiserror::Error;

/// Errors that can occur in Wortschatz operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A backend resource was not found (table, file, record).
    ///
    /// Backend-internal; the registry translates open failures into
    /// [`Error::IndexNotFound`] with full diagnostic context.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The requested CEFR level is not one of A1, A2, B1, B2.
    ///
    /// Caller error: surfaced before any I/O, never retried.
    #[error("Invalid level: '{0}' (expected one of A1, A2, B1, B2)")]
    InvalidLevel(String),

    /// The embedding model could not be initialized or run.
    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    /// No vocabulary index exists for the requested level under any
    /// attempted name.
    ///
    /// Carries every name that was tried, the backend's reported table
    /// inventory (when the backend supports listing), and the storage
    /// path, so an operator can seed the missing index without
    /// re-running with extra instrumentation.
    #[error(
        "Vocabulary index not found: tried {attempted:?}, backend reports {existing:?}, storage path '{db_path}'"
    )]
    IndexNotFound {
        /// Table names attempted, in order.
        attempted: Vec<String>,
        /// Tables the backend reported as existing, if it supports listing.
        existing: Option<Vec<String>>,
        /// Storage location of the index backend.
        db_path: String,
    },

    /// The backend failed to execute a nearest-neighbor query.
    #[error("Vector search failed: {0}")]
    SearchFailed(String),

    /// LLM provider error.
    #[error("LLM error: {0}")]
    Llm(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create a model unavailable error.
    pub fn model_unavailable(msg: impl Into<String>) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    /// Create a search failed error.
    pub fn search_failed(msg: impl Into<String>) -> Self {
        Self::SearchFailed(msg.into())
    }

    /// Create an LLM error.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }
}

/// Result type alias using Wortschatz's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        assert!(matches!(Error::config("bad"), Error::Config(_)));
        assert!(matches!(Error::not_found("x"), Error::NotFound(_)));
        assert!(matches!(
            Error::model_unavailable("no weights"),
            Error::ModelUnavailable(_)
        ));
        assert!(matches!(Error::search_failed("io"), Error::SearchFailed(_)));
        assert!(matches!(Error::llm("timeout"), Error::Llm(_)));
    }

    #[test]
    fn test_invalid_level_display() {
        let err = Error::InvalidLevel("C1".to_string());
        let msg = err.to_string();
        assert!(msg.contains("C1"));
        assert!(msg.contains("A1, A2, B1, B2"));
    }

    #[test]
    fn test_index_not_found_display_carries_diagnostics() {
        let err = Error::IndexNotFound {
            attempted: vec![
                "A1_MINIMAL_vocabulary".to_string(),
                "a1_minimal.csv".to_string(),
            ],
            existing: Some(vec!["b2_minimal.csv".to_string()]),
            db_path: "/data/lancedb".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("A1_MINIMAL_vocabulary"));
        assert!(msg.contains("a1_minimal.csv"));
        assert!(msg.contains("b2_minimal.csv"));
        assert!(msg.contains("/data/lancedb"));
    }

    #[test]
    fn test_index_not_found_display_without_inventory() {
        let err = Error::IndexNotFound {
            attempted: vec!["a1_minimal.csv".to_string()],
            existing: None,
            db_path: "/data/lancedb".to_string(),
        };
        assert!(err.to_string().contains("None"));
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
