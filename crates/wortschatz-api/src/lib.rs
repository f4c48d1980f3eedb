//! HTTP API for Wortschatz.
//!
//! Routes:
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | `/health` | Liveness check |
//! | GET | `/vocab` | Level-scoped vocabulary retrieval |
//! | POST | `/generate/listening` | Generate a listening-item batch |
//!
//! Levels are validated at the edge: an invalid CEFR level is rejected
//! with 400 before any model or index work happens. See [`error::ApiError`]
//! for the full error → status mapping.

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use routes::{router, AppState};
pub use server::serve;
