//! Vocabulary term extraction from heterogeneous search hits.
//!
//! There is no fixed schema contract with the loading component, so a
//! hit's payload may be a flat string or a structured record with any of
//! several historical field names. Extraction resolves one term per hit:
//!
//! 1. A plain-text payload is used directly.
//! 2. A structured payload is probed with the configured field-priority
//!    list; the first present, stringifiable field wins.
//! 3. With no candidate field present, the record's first value is taken
//!    as a last resort (logged, never silent).
//! 4. An empty primary payload falls back to the metadata side-channel,
//!    probed the same way.
//! 5. A hit yielding nothing usable is skipped; it never aborts
//!    extraction of the remaining hits.
//!
//! Rank order is preserved throughout.

use crate::types::{Payload, SearchHit};
use serde_json::Value;

/// Extract vocabulary terms from hits, preserving rank order.
///
/// The output length is at most the number of hits; malformed hits are
/// skipped rather than surfaced as errors.
pub fn extract_terms(hits: &[SearchHit], term_fields: &[String]) -> Vec<String> {
    let mut terms = Vec::with_capacity(hits.len());
    for hit in hits {
        let term = if !hit.payload.is_empty() {
            resolve_term(&hit.id, &hit.payload, term_fields)
        } else if let Some(metadata) = &hit.metadata {
            resolve_term(&hit.id, metadata, term_fields)
        } else {
            None
        };

        match term {
            Some(term) => terms.push(term),
            None => log::warn!("skipping hit '{}': no usable vocabulary term", hit.id),
        }
    }
    terms
}

/// Resolve a single term from one payload, or `None` if nothing usable.
fn resolve_term(hit_id: &str, payload: &Payload, term_fields: &[String]) -> Option<String> {
    match payload {
        Payload::Text(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Payload::Record(pairs) => {
            for field in term_fields {
                if let Some(value) = payload.field(field) {
                    if let Some(term) = value_to_string(value) {
                        return Some(term);
                    }
                }
            }
            // Last resort: first value regardless of field name.
            let (field, value) = pairs.first()?;
            log::warn!(
                "hit '{hit_id}' has no recognized term field; using first field '{field}'"
            );
            value_to_string(value)
        }
    }
}

/// Convert a scalar JSON value to a term string.
///
/// Nested structures and empty strings are not usable terms.
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
