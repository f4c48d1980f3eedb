//! LanceDB vector backend.
//!
//! Provides approximate nearest neighbor (ANN) search via LanceDB, an
//! embedded vector database built on Apache Arrow and Lance format.
//!
//! # Schema
//!
//! The seeded table schema (see [`crate::seed`]):
//!
//! | Column | Type | Purpose |
//! |--------|------|---------|
//! | `id` | Utf8 | Stable record identifier |
//! | `contents` | Utf8 | Flat vocabulary payload |
//! | `metadata` | Utf8 | JSON-serialized metadata side-channel |
//! | `vector` | FixedSizeList<Float32> | Embedding vector |
//!
//! Search results are parsed without assuming this exact schema: every
//! scalar column becomes a field of the hit's structured payload, so
//! tables seeded by older loader revisions (different column names) still
//! extract through the field-priority list.
//!
//! # Feature Gate
//!
//! This module requires the `vector-lancedb` feature.

use crate::catalog::{IndexCatalog, VectorIndex};
use crate::types::{Payload, SearchHit};
use arrow_array::{Array, Float32Array, Int64Array, RecordBatch, StringArray};
use async_trait::async_trait;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use std::sync::Arc;
use wortschatz_core::{Error, Result};

/// LanceDB-backed index catalog.
pub struct LancedbCatalog {
    connection: lancedb::Connection,
    db_path: String,
}

impl LancedbCatalog {
    /// Connect to a LanceDB database directory.
    pub async fn connect(db_path: &str) -> Result<Self> {
        let connection = lancedb::connect(db_path)
            .execute()
            .await
            .map_err(|e| Error::config(format!("failed to connect to LanceDB: {e}")))?;

        Ok(Self {
            connection,
            db_path: db_path.to_string(),
        })
    }
}

#[async_trait]
impl IndexCatalog for LancedbCatalog {
    fn supports_listing(&self) -> bool {
        true
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        self.connection
            .table_names()
            .execute()
            .await
            .map_err(|e| Error::config(format!("failed to list LanceDB tables: {e}")))
    }

    async fn open_table(&self, name: &str) -> Result<Arc<dyn VectorIndex>> {
        let table = self
            .connection
            .open_table(name)
            .execute()
            .await
            .map_err(|e| Error::not_found(format!("table '{name}': {e}")))?;

        Ok(Arc::new(LancedbIndex { table }))
    }

    fn storage_path(&self) -> &str {
        &self.db_path
    }
}

impl std::fmt::Debug for LancedbCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LancedbCatalog")
            .field("db_path", &self.db_path)
            .finish()
    }
}

/// An open LanceDB table handle.
#[derive(Debug)]
pub struct LancedbIndex {
    table: lancedb::Table,
}

#[async_trait]
impl VectorIndex for LancedbIndex {
    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchHit>> {
        let results = self
            .table
            .vector_search(query.to_vec())
            .map_err(|e| Error::search_failed(format!("failed to create vector search: {e}")))?
            .limit(limit)
            .execute()
            .await
            .map_err(|e| Error::search_failed(format!("vector search failed: {e}")))?;

        let batches: Vec<RecordBatch> = results
            .try_collect()
            .await
            .map_err(|e| Error::search_failed(format!("failed to collect results: {e}")))?;

        // LanceDB returns rows pre-sorted by ascending _distance; keep
        // that order through batch concatenation.
        let mut hits = Vec::new();
        for batch in &batches {
            hits.extend(hits_from_batch(batch)?);
        }
        Ok(hits)
    }
}

// ============================================================================
// Result batch parsing
// ============================================================================

/// Columns that never contribute to a hit's structured payload.
const RESERVED_COLUMNS: [&str; 4] = ["id", "vector", "metadata", "_distance"];

/// Parse one Arrow RecordBatch into search hits.
fn hits_from_batch(batch: &RecordBatch) -> Result<Vec<SearchHit>> {
    let id_col = batch
        .column_by_name("id")
        .ok_or_else(|| Error::search_failed("missing 'id' column in results"))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| Error::search_failed("'id' column is not StringArray"))?;

    let distance_col = batch
        .column_by_name("_distance")
        .and_then(|c| c.as_any().downcast_ref::<Float32Array>());

    let metadata_col = batch
        .column_by_name("metadata")
        .and_then(|c| c.as_any().downcast_ref::<StringArray>());

    let schema = batch.schema();
    let mut hits = Vec::with_capacity(batch.num_rows());

    for row in 0..batch.num_rows() {
        let mut pairs: Vec<(String, serde_json::Value)> = Vec::new();
        for (idx, field) in schema.fields().iter().enumerate() {
            if RESERVED_COLUMNS.contains(&field.name().as_str()) {
                continue;
            }
            if let Some(value) = scalar_value(batch.column(idx).as_ref(), row) {
                pairs.push((field.name().clone(), value));
            }
        }

        let metadata = metadata_col.and_then(|col| {
            if col.is_null(row) {
                return None;
            }
            parse_metadata(col.value(row))
        });

        let mut hit = SearchHit::new(
            id_col.value(row).to_string(),
            Payload::Record(pairs),
            distance_col.map(|c| c.value(row)).unwrap_or(0.0),
        );
        if let Some(metadata) = metadata {
            hit = hit.with_metadata(metadata);
        }
        hits.push(hit);
    }

    Ok(hits)
}

/// Read a scalar cell as a JSON value; non-scalar columns are skipped.
fn scalar_value(column: &dyn Array, row: usize) -> Option<serde_json::Value> {
    if column.is_null(row) {
        return None;
    }
    if let Some(strings) = column.as_any().downcast_ref::<StringArray>() {
        return Some(serde_json::Value::String(strings.value(row).to_string()));
    }
    if let Some(floats) = column.as_any().downcast_ref::<Float32Array>() {
        return serde_json::Number::from_f64(floats.value(row) as f64).map(serde_json::Value::Number);
    }
    if let Some(ints) = column.as_any().downcast_ref::<Int64Array>() {
        return Some(serde_json::Value::Number(ints.value(row).into()));
    }
    None
}

/// Parse the JSON metadata side-channel into an ordered-pair payload.
fn parse_metadata(raw: &str) -> Option<Payload> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;
    if object.is_empty() {
        return None;
    }
    Some(Payload::Record(
        object.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
    ))
}

// ============================================================================
// Tests
// ============================================================================
