//! Similarity search execution.
//!
//! Stateless with respect to the index: exactly one k-nearest-neighbor
//! query per call, no retries, no pagination. Backend failures propagate
//! unchanged as `SearchFailed` (the backend implementations produce that
//! variant).

use crate::catalog::VectorIndex;
use crate::types::SearchHit;
use wortschatz_core::Result;

/// Execute one nearest-neighbor query against a resolved handle.
///
/// `limit` must be a positive integer; it is passed to the backend
/// unvalidated, which is the documented caller contract. The returned
/// hits are at most `limit` long and pre-sorted by ascending distance.
pub async fn execute(
    index: &dyn VectorIndex,
    query_vector: &[f32],
    limit: usize,
) -> Result<Vec<SearchHit>> {
    let hits = index.search(query_vector, limit).await?;
    log::debug!("similarity search returned {} hit(s)", hits.len());
    Ok(hits)
}
