//! One-shot seed loader for per-level LanceDB tables.
//!
//! Loads pre-embedded records from `records_*.json` files (id, contents,
//! metadata, 384-dim embedding) and creates or overwrites the matching
//! LanceDB table. This is the offline loading side of the retrieval
//! contract; the query path never creates tables.
//!
//! Table names are inferred from filenames the way the historical loader
//! did: `records_a1_minimal.json` becomes `a1_minimal.csv` (the `.csv`
//! suffix is a legacy of CSV-derived table names, kept so existing
//! databases keep resolving).
//!
//! # Feature Gate
//!
//! This module requires the `vector-lancedb` feature.

use arrow_array::{FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray};
use arrow_schema::{DataType, Field, Schema};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use wortschatz_core::{Error, Result};

/// One pre-embedded vocabulary record, as stored in the dataset JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedRecord {
    /// Stable record identifier.
    pub id: String,

    /// Flat vocabulary payload.
    pub contents: String,

    /// Metadata side-channel (level, translations, source, ...).
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,

    /// Pre-computed embedding; must match the configured dimension.
    pub embedding: Vec<f32>,
}

/// Infer the table name from a dataset filename.
///
/// `records_a1_minimal.json` → `a1_minimal.csv`.
pub fn table_name_for_file(path: &Path) -> Result<String> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::config(format!("dataset path has no file name: {path:?}")))?;

    if !file_name.ends_with(".json") {
        return Err(Error::config(format!(
            "dataset file is not JSON: '{file_name}'"
        )));
    }

    Ok(file_name
        .trim_start_matches("records_")
        .trim_end_matches(".json")
        .to_string()
        + ".csv")
}

/// Create (or overwrite) one table from pre-embedded records.
///
/// Returns the number of records written.
pub async fn seed_table(
    db_path: &str,
    table_name: &str,
    records: &[SeedRecord],
    dimension: usize,
) -> Result<usize> {
    for record in records {
        if record.embedding.len() != dimension {
            return Err(Error::config(format!(
                "record '{}' has a {}-dim embedding, expected {}",
                record.id,
                record.embedding.len(),
                dimension
            )));
        }
    }

    let connection = lancedb::connect(db_path)
        .execute()
        .await
        .map_err(|e| Error::config(format!("failed to connect to LanceDB: {e}")))?;

    if records.is_empty() {
        log::warn!("no records for table '{table_name}', nothing seeded");
        return Ok(0);
    }

    let batch = build_record_batch(records, dimension as i32)?;
    let schema = batch.schema();
    let batches = RecordBatchIterator::new(vec![Ok(batch)], schema);

    connection
        .create_table(
            table_name,
            Box::new(batches) as Box<dyn arrow_array::RecordBatchReader + Send>,
        )
        .mode(lancedb::database::CreateTableMode::Overwrite)
        .execute()
        .await
        .map_err(|e| Error::config(format!("failed to create LanceDB table: {e}")))?;

    log::info!("seeded {} record(s) into table '{table_name}'", records.len());
    Ok(records.len())
}

/// Seed every `records_*.json` file in a dataset directory.
///
/// Returns `(table_name, record_count)` per seeded file.
pub async fn seed_directory(
    db_path: &str,
    dataset_dir: &Path,
    dimension: usize,
) -> Result<Vec<(String, usize)>> {
    let mut seeded = Vec::new();
    let mut entries: Vec<_> = std::fs::read_dir(dataset_dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|e| e.path())
        .filter(|p| {
            p.extension().is_some_and(|ext| ext == "json")
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("records_"))
        })
        .collect();
    entries.sort();

    for path in entries {
        let table_name = table_name_for_file(&path)?;
        let raw = std::fs::read_to_string(&path)?;
        let records: Vec<SeedRecord> = serde_json::from_str(&raw)
            .map_err(|e| Error::serialization(format!("{}: {e}", path.display())))?;

        let count = seed_table(db_path, &table_name, &records, dimension).await?;
        seeded.push((table_name, count));
    }

    Ok(seeded)
}

// ============================================================================
// Arrow schema and batch construction
// ============================================================================

/// Create the Arrow schema for a vocabulary table.
fn make_schema(dimension: i32) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("contents", DataType::Utf8, false),
        Field::new("metadata", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                dimension,
            ),
            false,
        ),
    ]))
}

/// Build an Arrow RecordBatch from seed records.
fn build_record_batch(records: &[SeedRecord], dimension: i32) -> Result<RecordBatch> {
    let schema = make_schema(dimension);

    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    let contents: Vec<&str> = records.iter().map(|r| r.contents.as_str()).collect();
    let metadata_strings: Vec<String> = records
        .iter()
        .map(|r| {
            serde_json::to_string(&r.metadata).unwrap_or_else(|_| "{}".to_string())
        })
        .collect();
    let metadata_refs: Vec<&str> = metadata_strings.iter().map(|s| s.as_str()).collect();

    // Flatten embeddings into a single Vec<f32>
    let all_values: Vec<f32> = records
        .iter()
        .flat_map(|r| r.embedding.iter().copied())
        .collect();

    let values_array = Float32Array::from(all_values);
    let vector_array = FixedSizeListArray::try_new(
        Arc::new(Field::new("item", DataType::Float32, true)),
        dimension,
        Arc::new(values_array),
        None,
    )
    .map_err(|e| Error::serialization(format!("failed to create vector array: {e}")))?;

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(contents)),
            Arc::new(StringArray::from(metadata_refs)),
            Arc::new(vector_array),
        ],
    )
    .map_err(|e| Error::serialization(format!("failed to create RecordBatch: {e}")))
}

// ============================================================================
// Tests
// ============================================================================
