//! The vocabulary retrieval service.
//!
//! `VocabRetriever` is the context object request handlers share: it owns
//! the once-initialized embedding model slot and the per-level index
//! registry. Construct one at process startup and pass it by `Arc` to
//! every handler; nothing here relies on module-level globals.
//!
//! # Initialization
//!
//! The embedding model is expensive to load (model weights), so it is
//! built lazily by a factory on the first `fetch_vocab` call. The
//! `OnceCell` guarantees exactly one factory invocation per process even
//! under concurrent first calls; the factory runs on the blocking thread
//! pool because model loading blocks.

use crate::catalog::IndexCatalog;
use crate::embedding::EmbeddingProvider;
use crate::registry::IndexRegistry;
use crate::types::RetrievalConfig;
use crate::{extract, search};
use std::sync::Arc;
use tokio::sync::OnceCell;
use wortschatz_core::{Error, Level, Result};

/// Builds the embedding provider on first use.
///
/// Must be cheap to clone and safe to call from a blocking thread.
pub type ProviderFactory = Arc<dyn Fn() -> Result<Arc<dyn EmbeddingProvider>> + Send + Sync>;

/// Retrieves the vocabulary terms most semantically similar to a query,
/// scoped to a CEFR level.
pub struct VocabRetriever {
    registry: IndexRegistry,
    model: OnceCell<Arc<dyn EmbeddingProvider>>,
    factory: ProviderFactory,
    term_fields: Vec<String>,
    default_limit: usize,
}

impl VocabRetriever {
    /// Create a retriever with a lazy provider factory.
    pub fn new(
        catalog: Arc<dyn IndexCatalog>,
        config: &RetrievalConfig,
        factory: ProviderFactory,
    ) -> Self {
        Self {
            registry: IndexRegistry::new(catalog, config.conventions()),
            model: OnceCell::new(),
            factory,
            term_fields: config.term_fields.clone(),
            default_limit: config.default_limit,
        }
    }

    /// Create a retriever around an already-initialized provider.
    ///
    /// Used by tests and by callers that want eager model loading.
    pub fn with_provider(
        catalog: Arc<dyn IndexCatalog>,
        config: &RetrievalConfig,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        let for_factory = Arc::clone(&provider);
        Self {
            registry: IndexRegistry::new(catalog, config.conventions()),
            model: OnceCell::new_with(Some(provider)),
            factory: Arc::new(move || Ok(Arc::clone(&for_factory))),
            term_fields: config.term_fields.clone(),
            default_limit: config.default_limit,
        }
    }

    /// Create a retriever that lazily loads a fastembed model.
    #[cfg(feature = "vector-fastembed")]
    pub fn with_fastembed(catalog: Arc<dyn IndexCatalog>, config: &RetrievalConfig) -> Self {
        let model_name = config.model.clone();
        let cache_path = config.cache_path.clone();
        let factory: ProviderFactory = Arc::new(move || {
            let provider =
                crate::fastembed::FastEmbedProvider::new(&model_name, cache_path.as_deref())?;
            Ok(Arc::new(provider) as Arc<dyn EmbeddingProvider>)
        });
        Self::new(catalog, config, factory)
    }

    /// The configured default result count.
    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Fetch the `n` vocabulary terms most similar to `query` for a
    /// level given as a string.
    ///
    /// The level is validated before any I/O: an unknown level fails
    /// with `InvalidLevel` without loading the model or opening an
    /// index.
    ///
    /// # Errors
    ///
    /// `InvalidLevel`, `ModelUnavailable`, `IndexNotFound`, or
    /// `SearchFailed`; all propagate unchanged. Individual malformed
    /// hits degrade to skips, so the result may be shorter than `n`.
    pub async fn fetch_vocab(&self, query: &str, level: &str, n: usize) -> Result<Vec<String>> {
        let level = Level::parse(level)?;
        self.fetch_for_level(query, level, n).await
    }

    /// Fetch terms for an already-validated level.
    ///
    /// `n` must be positive; it is handed to the backend unclamped.
    pub async fn fetch_for_level(&self, query: &str, level: Level, n: usize) -> Result<Vec<String>> {
        let index = self.registry.resolve(level).await?;
        let provider = self.provider().await?;
        let query_vector = provider.embed(query).await?;
        let hits = search::execute(index.as_ref(), &query_vector, n).await?;

        let mut terms = extract::extract_terms(&hits, &self.term_fields);
        terms.truncate(n);
        log::info!(
            "retrieved {} term(s) for level {} (query len {})",
            terms.len(),
            level,
            query.len()
        );
        Ok(terms)
    }

    async fn provider(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        self.model
            .get_or_try_init(|| async {
                let factory = Arc::clone(&self.factory);
                tokio::task::spawn_blocking(move || factory())
                    .await
                    .map_err(|e| Error::model_unavailable(format!("model load task failed: {e}")))?
            })
            .await
            .cloned()
    }
}

// ============================================================================
// Tests
// ============================================================================
