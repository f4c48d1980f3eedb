//! Per-level index registry.
//!
//! The registry resolves the table name for a CEFR level, opens the
//! table, and caches the handle for the life of the process. Name
//! resolution has to tolerate ambiguity: the index was populated by a
//! separate loading component whose naming convention changed over time,
//! and what the backend reports as present does not always match what it
//! will actually open.
//!
//! # Resolution algorithm (per configured convention, in order)
//!
//! 1. Expand the convention's template for the level.
//! 2. If the backend supports listing, reconcile against its inventory:
//!    a verbatim match wins, then a case-insensitive match, then the
//!    expanded name unchanged.
//! 3. Open the resolved name. If opening fails *and* the name came from
//!    the inventory (the backend claimed it exists), retry once with the
//!    raw expanded name. That single bounded retry is the only retry in
//!    the subsystem.
//! 4. If every convention is exhausted, fail with `IndexNotFound`
//!    carrying all attempted names, the reported inventory, and the
//!    storage path.
//!
//! The registry only opens tables that already exist; absence is a hard
//! failure, never an auto-create.

use crate::catalog::{IndexCatalog, VectorIndex};
use crate::types::NamingConvention;
use std::sync::Arc;
use tokio::sync::OnceCell;
use wortschatz_core::{Error, Level, Result};

/// Resolves and caches one open index handle per level.
pub struct IndexRegistry {
    catalog: Arc<dyn IndexCatalog>,
    conventions: Vec<NamingConvention>,
    // Listing capability, resolved once at construction.
    can_list: bool,
    // One initialization slot per level; concurrent first callers await
    // the same open instead of racing into duplicates.
    handles: [OnceCell<Arc<dyn VectorIndex>>; 4],
}

impl IndexRegistry {
    /// Create a registry over a catalog with the given naming
    /// conventions, primary convention first.
    pub fn new(catalog: Arc<dyn IndexCatalog>, conventions: Vec<NamingConvention>) -> Self {
        let can_list = catalog.supports_listing();
        Self {
            catalog,
            conventions,
            can_list,
            handles: std::array::from_fn(|_| OnceCell::new()),
        }
    }

    fn slot(&self, level: Level) -> &OnceCell<Arc<dyn VectorIndex>> {
        match level {
            Level::A1 => &self.handles[0],
            Level::A2 => &self.handles[1],
            Level::B1 => &self.handles[2],
            Level::B2 => &self.handles[3],
        }
    }

    /// Resolve the index handle for a level, opening it on first use.
    ///
    /// Idempotent and cached: later calls for the same level reuse the
    /// open handle without touching the backend again.
    pub async fn resolve(&self, level: Level) -> Result<Arc<dyn VectorIndex>> {
        self.slot(level)
            .get_or_try_init(|| self.open_uncached(level))
            .await
            .cloned()
    }

    async fn open_uncached(&self, level: Level) -> Result<Arc<dyn VectorIndex>> {
        let existing = if self.can_list {
            match self.catalog.list_tables().await {
                Ok(names) => Some(names),
                Err(err) => {
                    log::warn!("table listing failed, resolving by convention only: {err}");
                    None
                }
            }
        } else {
            None
        };

        let mut attempted = Vec::new();

        for convention in &self.conventions {
            let canonical = convention.table_name(level);
            let (resolved, from_listing) = reconcile(&canonical, existing.as_deref());

            attempted.push(resolved.clone());
            match self.catalog.open_table(&resolved).await {
                Ok(handle) => {
                    log::debug!("opened index '{resolved}' for level {level}");
                    return Ok(handle);
                }
                Err(err) => {
                    log::warn!("failed to open index '{resolved}' for level {level}: {err}");
                }
            }

            // The inventory claimed a name the backend then refused to
            // open; retry once with the raw expanded name.
            if from_listing && resolved != canonical {
                attempted.push(canonical.clone());
                match self.catalog.open_table(&canonical).await {
                    Ok(handle) => {
                        log::debug!("opened index '{canonical}' for level {level} via fallback");
                        return Ok(handle);
                    }
                    Err(err) => {
                        log::warn!("fallback open of '{canonical}' failed: {err}");
                    }
                }
            }
        }

        Err(Error::IndexNotFound {
            attempted,
            existing,
            db_path: self.catalog.storage_path().to_string(),
        })
    }
}

/// Reconcile a candidate name against the backend's reported inventory.
///
/// Returns the name to open and whether it was confirmed by the listing.
fn reconcile(canonical: &str, existing: Option<&[String]>) -> (String, bool) {
    let Some(names) = existing else {
        return (canonical.to_string(), false);
    };

    if names.iter().any(|n| n == canonical) {
        return (canonical.to_string(), true);
    }
    if let Some(matched) = names.iter().find(|n| n.eq_ignore_ascii_case(canonical)) {
        return (matched.clone(), true);
    }
    (canonical.to_string(), false)
}

// ============================================================================
// Tests
// ============================================================================
