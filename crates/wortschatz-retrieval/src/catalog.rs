//! Index backend traits and the in-memory implementation.
//!
//! Two seams separate the retrieval logic from any concrete vector
//! database:
//!
//! - [`IndexCatalog`]: a connection to the backend, able to enumerate and
//!   open tables. Table enumeration is an explicit capability
//!   ([`IndexCatalog::supports_listing`]) resolved once at registry
//!   construction, because not every backend can list what it stores.
//! - [`VectorIndex`]: an open, reusable handle to one per-level table,
//!   safe for concurrent read-only queries.
//!
//! `MemoryCatalog` is the always-available implementation used by tests
//! and local development; the LanceDB implementation lives in the
//! feature-gated [`crate::lancedb`] module.

use crate::types::{Payload, SearchHit};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use wortschatz_core::{Error, Result};

// ============================================================================
// Traits
// ============================================================================

/// An open handle to one per-level vector index.
///
/// Handles are opened once by the registry and reused for the life of
/// the process. No method mutates the underlying index.
#[async_trait]
pub trait VectorIndex: Send + Sync + std::fmt::Debug {
    /// Execute a k-nearest-neighbor query.
    ///
    /// Returns at most `limit` hits, pre-sorted by ascending distance.
    /// Backend execution failures surface as [`Error::SearchFailed`].
    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchHit>>;
}

/// A connection to a vector index backend.
#[async_trait]
pub trait IndexCatalog: Send + Sync {
    /// Whether this backend can enumerate its table names.
    fn supports_listing(&self) -> bool;

    /// Enumerate existing table names.
    ///
    /// Only called when [`supports_listing`](Self::supports_listing)
    /// returned true.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Open an existing table. Never creates one.
    async fn open_table(&self, name: &str) -> Result<Arc<dyn VectorIndex>>;

    /// Storage location, for diagnostics.
    fn storage_path(&self) -> &str;
}

// ============================================================================
// In-memory implementation
// ============================================================================

/// A stored record in the in-memory backend.
#[derive(Debug, Clone)]
pub struct MemoryRecord {
    /// Stable identifier.
    pub id: String,
    /// Primary payload.
    pub payload: Payload,
    /// Optional metadata side-channel.
    pub metadata: Option<Payload>,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

impl MemoryRecord {
    /// Create a record with a flat text payload.
    pub fn text(id: impl Into<String>, term: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            payload: Payload::Text(term.into()),
            metadata: None,
            embedding,
        }
    }

    /// Create a record with a structured payload.
    pub fn record(id: impl Into<String>, payload: Payload, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            payload,
            metadata: None,
            embedding,
        }
    }

    /// Attach a metadata side-channel.
    pub fn with_metadata(mut self, metadata: Payload) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// In-memory index catalog.
///
/// Holds named tables of records; supports listing.
#[derive(Default)]
pub struct MemoryCatalog {
    tables: HashMap<String, Arc<MemoryIndex>>,
    path: String,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            path: ":memory:".to_string(),
        }
    }

    /// Add a table of records.
    pub fn with_table(mut self, name: impl Into<String>, records: Vec<MemoryRecord>) -> Self {
        self.tables
            .insert(name.into(), Arc::new(MemoryIndex { records }));
        self
    }
}

#[async_trait]
impl IndexCatalog for MemoryCatalog {
    fn supports_listing(&self) -> bool {
        true
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn open_table(&self, name: &str) -> Result<Arc<dyn VectorIndex>> {
        match self.tables.get(name) {
            Some(index) => Ok(Arc::clone(index) as Arc<dyn VectorIndex>),
            None => Err(Error::not_found(format!("table '{name}'"))),
        }
    }

    fn storage_path(&self) -> &str {
        &self.path
    }
}

/// In-memory index over a fixed set of records.
#[derive(Debug)]
pub struct MemoryIndex {
    records: Vec<MemoryRecord>,
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchHit>> {
        let mut hits: Vec<SearchHit> = self
            .records
            .iter()
            .map(|record| {
                let mut hit = SearchHit::new(
                    record.id.clone(),
                    record.payload.clone(),
                    l2_distance(query, &record.embedding),
                );
                if let Some(metadata) = &record.metadata {
                    hit = hit.with_metadata(metadata.clone());
                }
                hit
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(limit);
        Ok(hits)
    }
}

/// Euclidean distance between two vectors.
///
/// Dimension mismatches compare only the shared prefix; the registry and
/// seeding paths keep dimensions consistent in practice.
fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(dim: usize, hot: usize) -> Vec<f32> {
        let mut v = vec![0.0; dim];
        v[hot] = 1.0;
        v
    }

    #[test]
    fn test_l2_distance() {
        assert_eq!(l2_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(l2_distance(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_memory_catalog_listing() {
        let catalog = MemoryCatalog::new()
            .with_table("b1_minimal.csv", vec![])
            .with_table("a1_minimal.csv", vec![]);

        assert!(catalog.supports_listing());
        let names = catalog.list_tables().await.unwrap();
        assert_eq!(names, vec!["a1_minimal.csv", "b1_minimal.csv"]);
    }

    #[tokio::test]
    async fn test_memory_catalog_open_missing() {
        let catalog = MemoryCatalog::new();
        let err = catalog.open_table("nope").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_memory_index_search_orders_by_distance() {
        let records = vec![
            MemoryRecord::text("far", "Bahnhof", unit(4, 2)),
            MemoryRecord::text("near", "Brot", unit(4, 0)),
            MemoryRecord::text("mid", "Bus", vec![0.8, 0.6, 0.0, 0.0]),
        ];
        let catalog = MemoryCatalog::new().with_table("t", records);
        let index = catalog.open_table("t").await.unwrap();

        let hits = index.search(&unit(4, 0), 10).await.unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert!(hits[0].distance <= hits[1].distance);
        assert!(hits[1].distance <= hits[2].distance);
    }

    #[tokio::test]
    async fn test_memory_index_search_respects_limit() {
        let records = (0..5)
            .map(|i| MemoryRecord::text(format!("r{i}"), format!("w{i}"), vec![i as f32; 2]))
            .collect();
        let catalog = MemoryCatalog::new().with_table("t", records);
        let index = catalog.open_table("t").await.unwrap();

        let hits = index.search(&[0.0, 0.0], 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "r0");
    }

    #[tokio::test]
    async fn test_memory_index_carries_metadata() {
        let record = MemoryRecord::record("r1", Payload::Record(vec![]), vec![0.0])
            .with_metadata(Payload::record([("german_term", "Apfel")]));
        let catalog = MemoryCatalog::new().with_table("t", vec![record]);
        let index = catalog.open_table("t").await.unwrap();

        let hits = index.search(&[0.0], 1).await.unwrap();
        assert!(hits[0].metadata.is_some());
    }
}
