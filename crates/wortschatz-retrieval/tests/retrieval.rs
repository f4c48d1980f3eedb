//! End-to-end retrieval tests over fake backends.
//!
//! These exercise the whole pipeline (level validation, lazy model
//! initialization, table-name resolution, search, extraction) with
//! instrumented catalogs and providers so that caching and
//! single-initialization invariants are observable.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wortschatz_core::{Error, Level};
use wortschatz_retrieval::{
    EmbeddingProvider, IndexCatalog, IndexRegistry, MemoryCatalog, MemoryRecord,
    MockEmbeddingProvider, NamingConvention, Payload, ProviderFactory, RetrievalConfig,
    VectorIndex, VocabRetriever,
};

// ============================================================================
// Instrumented fakes
// ============================================================================

/// Catalog wrapper that counts listing and open calls.
struct CountingCatalog {
    inner: MemoryCatalog,
    list_calls: AtomicUsize,
    open_calls: AtomicUsize,
}

impl CountingCatalog {
    fn new(inner: MemoryCatalog) -> Self {
        Self {
            inner,
            list_calls: AtomicUsize::new(0),
            open_calls: AtomicUsize::new(0),
        }
    }

    fn io_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst) + self.open_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IndexCatalog for CountingCatalog {
    fn supports_listing(&self) -> bool {
        self.inner.supports_listing()
    }

    async fn list_tables(&self) -> wortschatz_core::Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_tables().await
    }

    async fn open_table(&self, name: &str) -> wortschatz_core::Result<Arc<dyn VectorIndex>> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.open_table(name).await
    }

    fn storage_path(&self) -> &str {
        self.inner.storage_path()
    }
}

/// A catalog whose listing advertises names its `open_table` refuses:
/// the inventory claims `A1_MINIMAL_vocabulary` but only
/// `a1_minimal.csv` actually opens.
struct MismatchedCatalog {
    openable: MemoryCatalog,
}

#[async_trait]
impl IndexCatalog for MismatchedCatalog {
    fn supports_listing(&self) -> bool {
        true
    }

    async fn list_tables(&self) -> wortschatz_core::Result<Vec<String>> {
        Ok(vec!["A1_MINIMAL_vocabulary".to_string()])
    }

    async fn open_table(&self, name: &str) -> wortschatz_core::Result<Arc<dyn VectorIndex>> {
        self.openable.open_table(name).await
    }

    fn storage_path(&self) -> &str {
        "/fake/mismatched"
    }
}

/// Factory that counts how many providers it constructs.
fn counting_factory(dimension: usize, constructions: Arc<AtomicUsize>) -> ProviderFactory {
    Arc::new(move || {
        constructions.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockEmbeddingProvider::new(dimension)) as Arc<dyn EmbeddingProvider>)
    })
}

// ============================================================================
// Fixtures
// ============================================================================

fn food_vocab_catalog(table: &str, dimension: usize) -> MemoryCatalog {
    let provider = MockEmbeddingProvider::new(dimension);
    let terms = ["Brot", "Milch", "Apfel", "Kaffee", "Bahnhof"];
    let records = terms
        .iter()
        .enumerate()
        .map(|(i, term)| {
            let embedding = futures::executor::block_on(provider.embed(term)).unwrap();
            MemoryRecord::record(
                format!("a1-{i}"),
                Payload::record([("german_term", *term), ("english_translation", "…")]),
                embedding,
            )
        })
        .collect();
    MemoryCatalog::new().with_table(table, records)
}

fn l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

// ============================================================================
// Level validation
// ============================================================================

#[tokio::test]
async fn invalid_level_fails_without_any_io() {
    let catalog = Arc::new(CountingCatalog::new(food_vocab_catalog("a1_minimal.csv", 8)));
    let constructions = Arc::new(AtomicUsize::new(0));
    let retriever = VocabRetriever::new(
        Arc::clone(&catalog) as Arc<dyn IndexCatalog>,
        &RetrievalConfig::default(),
        counting_factory(8, Arc::clone(&constructions)),
    );

    for bad in ["C1", "C2", "", "A9", "fortgeschritten"] {
        let err = retriever.fetch_vocab("Essen", bad, 5).await.unwrap_err();
        assert!(matches!(err, Error::InvalidLevel(_)), "accepted {bad:?}");
    }

    assert_eq!(catalog.io_calls(), 0, "invalid level must not touch the backend");
    assert_eq!(
        constructions.load(Ordering::SeqCst),
        0,
        "invalid level must not load the model"
    );
}

// ============================================================================
// Single initialization under concurrency
// ============================================================================

#[tokio::test]
async fn model_loads_at_most_once_under_concurrent_first_calls() {
    let catalog = Arc::new(food_vocab_catalog("a1_minimal.csv", 8));
    let constructions = Arc::new(AtomicUsize::new(0));
    let retriever = Arc::new(VocabRetriever::new(
        catalog,
        &RetrievalConfig::default(),
        counting_factory(8, Arc::clone(&constructions)),
    ));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let retriever = Arc::clone(&retriever);
            tokio::spawn(async move { retriever.fetch_vocab("Essen", "A1", 3).await })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(constructions.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn index_handle_resolved_once_per_level() {
    let catalog = Arc::new(CountingCatalog::new(food_vocab_catalog("a1_minimal.csv", 8)));
    let retriever = VocabRetriever::with_provider(
        Arc::clone(&catalog) as Arc<dyn IndexCatalog>,
        &RetrievalConfig::default(),
        Arc::new(MockEmbeddingProvider::new(8)),
    );

    for _ in 0..4 {
        retriever.fetch_vocab("Essen", "A1", 3).await.unwrap();
    }

    // One listing plus at most the attempts of the first resolution.
    assert_eq!(catalog.list_calls.load(Ordering::SeqCst), 1);
    assert!(
        catalog.open_calls.load(Ordering::SeqCst) <= 2,
        "later calls must reuse the cached handle"
    );
}

// ============================================================================
// Name resolution fallback
// ============================================================================

#[tokio::test]
async fn resolution_falls_back_when_listing_and_open_disagree() {
    let catalog = Arc::new(MismatchedCatalog {
        openable: food_vocab_catalog("a1_minimal.csv", 8),
    });
    let registry = IndexRegistry::new(
        catalog,
        vec![
            NamingConvention::new(NamingConvention::UPPER_VOCABULARY),
            NamingConvention::new(NamingConvention::LOWER_CSV),
        ],
    );

    let handle = registry.resolve(Level::A1).await.unwrap();
    let hits = handle.search(&[0.0; 8], 1).await.unwrap();
    assert_eq!(hits.len(), 1);
}

// ============================================================================
// End-to-end retrieval
// ============================================================================

#[tokio::test]
async fn fetch_vocab_returns_terms_ordered_by_distance() {
    let dimension = 8;
    let provider = MockEmbeddingProvider::new(dimension);
    let catalog = Arc::new(food_vocab_catalog("a1_minimal.csv", dimension));
    let retriever = VocabRetriever::with_provider(
        Arc::clone(&catalog) as Arc<dyn IndexCatalog>,
        &RetrievalConfig::default(),
        Arc::new(MockEmbeddingProvider::new(dimension)),
    );

    let terms = retriever.fetch_vocab("Essen", "A1", 3).await.unwrap();
    assert_eq!(terms.len(), 3);

    // No repeats.
    let mut unique = terms.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 3);

    // Order matches ascending distance from the query embedding,
    // recomputed independently here.
    let query = provider.embed("Essen").await.unwrap();
    let mut expected: Vec<(f32, String)> = ["Brot", "Milch", "Apfel", "Kaffee", "Bahnhof"]
        .iter()
        .map(|term| {
            let embedding = futures::executor::block_on(provider.embed(term)).unwrap();
            (l2(&query, &embedding), term.to_string())
        })
        .collect();
    expected.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    let expected: Vec<String> = expected.into_iter().take(3).map(|(_, t)| t).collect();

    assert_eq!(terms, expected);
}

#[tokio::test]
async fn fetch_vocab_returns_fewer_terms_than_n_when_index_is_small() {
    let provider = MockEmbeddingProvider::new(4);
    let records = vec![
        MemoryRecord::record(
            "r1",
            Payload::record([("german_term", "Brot")]),
            futures::executor::block_on(provider.embed("Brot")).unwrap(),
        ),
        MemoryRecord::record(
            "r2",
            Payload::record([("german_term", "Milch")]),
            futures::executor::block_on(provider.embed("Milch")).unwrap(),
        ),
    ];
    let catalog = Arc::new(MemoryCatalog::new().with_table("a1_minimal.csv", records));
    let retriever = VocabRetriever::with_provider(
        catalog,
        &RetrievalConfig::default(),
        Arc::new(MockEmbeddingProvider::new(4)),
    );

    let terms = retriever.fetch_vocab("Essen", "A1", 10).await.unwrap();
    assert_eq!(terms.len(), 2, "never pads, never errors");
}

#[tokio::test]
async fn fetch_vocab_skips_malformed_hits_without_failing() {
    let records = vec![
        MemoryRecord::record("r1", Payload::record([("german_term", "Brot")]), vec![0.0; 4]),
        MemoryRecord::record(
            "r2",
            Payload::record([("unrelated_field", serde_json::json!({"x": 1}))]),
            vec![0.1; 4],
        ),
        MemoryRecord::record("r3", Payload::record([("german_term", "Bus")]), vec![0.2; 4]),
    ];
    let catalog = Arc::new(MemoryCatalog::new().with_table("a1_minimal.csv", records));

    let mut config = RetrievalConfig::default();
    config.term_fields = vec!["german_term".to_string()];
    let retriever = VocabRetriever::with_provider(
        catalog,
        &config,
        Arc::new(MockEmbeddingProvider::new(4)),
    );

    let terms = retriever.fetch_for_level("Essen", Level::A1, 10).await.unwrap();
    assert_eq!(terms, vec!["Brot", "Bus"]);
}

#[tokio::test]
async fn missing_index_surfaces_diagnostics() {
    let catalog = Arc::new(MemoryCatalog::new().with_table("b2_minimal.csv", vec![]));
    let retriever = VocabRetriever::with_provider(
        catalog,
        &RetrievalConfig::default(),
        Arc::new(MockEmbeddingProvider::new(4)),
    );

    let err = retriever.fetch_vocab("Essen", "A1", 3).await.unwrap_err();
    match err {
        Error::IndexNotFound {
            attempted,
            existing,
            db_path,
        } => {
            assert!(attempted.contains(&"A1_MINIMAL_vocabulary".to_string()));
            assert!(attempted.contains(&"a1_minimal.csv".to_string()));
            assert_eq!(existing, Some(vec!["b2_minimal.csv".to_string()]));
            assert_eq!(db_path, ":memory:");
        }
        other => panic!("expected IndexNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn embedding_is_deterministic_across_calls() {
    let provider = MockEmbeddingProvider::new(384);
    let e1 = provider.embed("Wie spät ist es?").await.unwrap();
    let e2 = provider.embed("Wie spät ist es?").await.unwrap();
    assert_eq!(e1, e2);
    assert_eq!(e1.len(), 384);
}
