//! CEFR-scoped vocabulary retrieval.
//!
//! This crate fetches the `n` vocabulary terms most semantically similar
//! to a free-text query from a pre-populated per-level vector index. It
//! provides pluggable embedding providers and index backends; the LanceDB
//! and fastembed implementations are feature-gated, with in-memory
//! fallbacks always available for tests.
//!
//! # Features
//!
//! - `vector-lancedb`: LanceDB index backend and the offline seed loader
//! - `vector-fastembed`: local embedding generation via fastembed
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    wortschatz-retrieval                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider trait                                     │
//! │  ├── MockEmbeddingProvider (always available)                │
//! │  └── FastEmbedProvider (feature: vector-fastembed)           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  IndexCatalog / VectorIndex traits                           │
//! │  ├── MemoryCatalog (in-memory fallback)                      │
//! │  └── LancedbCatalog (feature: vector-lancedb)                │
//! ├──────────────────────────────────────────────────────────────┤
//! │  IndexRegistry (per-level name resolution + handle cache)    │
//! │  search (single k-NN query execution)                        │
//! │  extract (heterogeneous hit → term normalization)            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  VocabRetriever (lazy model slot + fetch_vocab entry point)  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wortschatz_retrieval::{
//!     LancedbCatalog, RetrievalConfig, VocabRetriever,
//! };
//!
//! let config = RetrievalConfig::default();
//! let catalog = Arc::new(LancedbCatalog::connect(&config.db_path).await?);
//! let retriever = VocabRetriever::with_fastembed(catalog, &config);
//!
//! let terms = retriever.fetch_vocab("Essen", "A1", 10).await?;
//! ```

// Core modules (always available)
pub mod catalog;
pub mod embedding;
pub mod types;

// Retrieval pipeline (always available)
pub mod extract;
pub mod registry;
pub mod search;
pub mod service;

// Feature-gated backend modules
#[cfg(feature = "vector-fastembed")]
pub mod fastembed;

#[cfg(feature = "vector-lancedb")]
pub mod lancedb;

#[cfg(feature = "vector-lancedb")]
pub mod seed;

// Re-exports — core types
pub use types::{NamingConvention, Payload, RetrievalConfig, SearchHit, DEFAULT_TERM_FIELDS};

// Re-exports — traits and fallbacks
pub use catalog::{IndexCatalog, MemoryCatalog, MemoryIndex, MemoryRecord, VectorIndex};
pub use embedding::{EmbeddingProvider, MockEmbeddingProvider};

// Re-exports — pipeline
pub use extract::extract_terms;
pub use registry::IndexRegistry;
pub use service::{ProviderFactory, VocabRetriever};

// Feature-gated re-exports
#[cfg(feature = "vector-fastembed")]
pub use fastembed::FastEmbedProvider;

#[cfg(feature = "vector-lancedb")]
pub use lancedb::{LancedbCatalog, LancedbIndex};

#[cfg(feature = "vector-lancedb")]
pub use seed::{seed_directory, seed_table, SeedRecord};
