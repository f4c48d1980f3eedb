//! FastEmbed embedding provider.
//!
//! Wraps the `fastembed` crate to provide local embedding generation via
//! pre-trained models. The vocabulary indexes were seeded with
//! all-MiniLM-L6-v2 (384 dimensions), so that is the default.
//!
//! # Thread Safety
//!
//! `fastembed::TextEmbedding` is not `Send + Sync`, so we wrap it in
//! `Arc<Mutex<>>` and use `tokio::task::spawn_blocking` for embedding calls.
//!
//! # Feature Gate
//!
//! This module requires the `vector-fastembed` feature.

use crate::embedding::EmbeddingProvider;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use wortschatz_core::{Error, Result};

/// Map a model name string to a fastembed `EmbeddingModel` enum variant.
fn resolve_model(name: &str) -> Result<fastembed::EmbeddingModel> {
    match name {
        "all-minilm-l6-v2" | "AllMiniLML6V2" => Ok(fastembed::EmbeddingModel::AllMiniLML6V2),
        "bge-small-en-v1.5" | "BGESmallENV15" => Ok(fastembed::EmbeddingModel::BGESmallENV15),
        "multilingual-e5-small" | "MultilingualE5Small" => {
            Ok(fastembed::EmbeddingModel::MultilingualE5Small)
        }
        other => Err(Error::config(format!(
            "Unknown embedding model: '{other}'. Supported: all-minilm-l6-v2, bge-small-en-v1.5, multilingual-e5-small"
        ))),
    }
}

/// FastEmbed-based embedding provider.
///
/// The model is loaded once at construction and reused for all
/// subsequent calls; construction is the expensive step and belongs on a
/// blocking thread.
pub struct FastEmbedProvider {
    model: Arc<Mutex<fastembed::TextEmbedding>>,
    dimension: usize,
    model_name: String,
}

impl FastEmbedProvider {
    /// Create a new FastEmbed provider with the given model name.
    ///
    /// Downloads the model if not cached locally. Failures (missing
    /// artifact, no network for first download) surface as
    /// `ModelUnavailable` and are not retried here.
    pub fn new(model_name: &str, cache_path: Option<&str>) -> Result<Self> {
        let model_enum = resolve_model(model_name)?;

        let mut init = fastembed::InitOptions::new(model_enum);
        if let Some(path) = cache_path {
            init = init.with_cache_dir(std::path::PathBuf::from(path));
        }

        let mut text_embedding = fastembed::TextEmbedding::try_new(init).map_err(|e| {
            Error::model_unavailable(format!("failed to initialize fastembed model: {e}"))
        })?;

        // Probe dimension via a test embedding
        let probe = text_embedding.embed(vec!["dimension probe"], None).map_err(|e| {
            Error::model_unavailable(format!("failed to probe embedding dimension: {e}"))
        })?;

        let dimension = probe
            .first()
            .map(|v| v.len())
            .ok_or_else(|| Error::model_unavailable("empty probe embedding"))?;

        Ok(Self {
            model: Arc::new(Mutex::new(text_embedding)),
            dimension,
            model_name: model_name.to_string(),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let model = self.model.clone();
        let text = text.to_string();

        tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|e| Error::model_unavailable(format!("mutex poisoned: {e}")))?;
            let results = model
                .embed(vec![text], None)
                .map_err(|e| Error::model_unavailable(format!("embedding failed: {e}")))?;
            results
                .into_iter()
                .next()
                .ok_or_else(|| Error::model_unavailable("no embedding returned"))
        })
        .await
        .map_err(|e| Error::model_unavailable(format!("spawn_blocking failed: {e}")))?
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

impl std::fmt::Debug for FastEmbedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedProvider")
            .field("model", &self.model_name)
            .field("dimension", &self.dimension)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_model_known() {
        assert!(resolve_model("all-minilm-l6-v2").is_ok());
        assert!(resolve_model("bge-small-en-v1.5").is_ok());
        assert!(resolve_model("multilingual-e5-small").is_ok());
    }

    #[test]
    fn test_resolve_model_aliases() {
        assert!(resolve_model("AllMiniLML6V2").is_ok());
        assert!(resolve_model("BGESmallENV15").is_ok());
    }

    #[test]
    fn test_resolve_model_unknown() {
        let err = resolve_model("nonexistent-model").unwrap_err();
        assert!(err.to_string().contains("Unknown embedding model"));
    }

    // Integration tests requiring model download are gated with #[ignore]
    #[tokio::test]
    #[ignore = "requires model download (~80MB)"]
    async fn test_fastembed_provider_creation() {
        let provider = FastEmbedProvider::new("all-minilm-l6-v2", None).unwrap();
        assert_eq!(provider.dimension(), 384);
        assert_eq!(provider.name(), "all-minilm-l6-v2");
    }

    #[tokio::test]
    #[ignore = "requires model download (~80MB)"]
    async fn test_fastembed_deterministic() {
        let provider = FastEmbedProvider::new("all-minilm-l6-v2", None).unwrap();
        let e1 = provider.embed("gleicher text").await.unwrap();
        let e2 = provider.embed("gleicher text").await.unwrap();
        assert_eq!(e1, e2);
    }
}
