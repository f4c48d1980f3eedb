//! Route definitions and request handlers.

use crate::error::ApiError;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use wortschatz_core::Level;
use wortschatz_gen::{GeneratedContent, ListeningGenerator};
use wortschatz_retrieval::VocabRetriever;

/// Shared server state.
pub struct AppState {
    /// Vocabulary retriever, shared with the generator.
    pub retriever: Arc<VocabRetriever>,
    /// Listening-item generator.
    pub generator: ListeningGenerator,
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/vocab", get(vocab))
        .route("/generate/listening", post(generate_listening))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Query parameters for `GET /vocab`.
#[derive(Debug, Deserialize)]
struct VocabParams {
    /// Free-text similarity query.
    query: String,

    /// CEFR level (A1, A2, B1, B2).
    #[serde(default = "default_level")]
    level: String,

    /// Number of terms to return; defaults to the configured limit.
    n: Option<usize>,
}

/// Response body for `GET /vocab`.
#[derive(Debug, Serialize)]
struct VocabResponse {
    level: String,
    query: String,
    terms: Vec<String>,
}

async fn vocab(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VocabParams>,
) -> Result<Json<VocabResponse>, ApiError> {
    let n = params.n.unwrap_or_else(|| state.retriever.default_limit());
    let level = Level::parse(&params.level)?;
    let terms = state
        .retriever
        .fetch_for_level(&params.query, level, n)
        .await?;

    Ok(Json(VocabResponse {
        level: level.as_str().to_string(),
        query: params.query,
        terms,
    }))
}

/// Query parameters for `POST /generate/listening`.
#[derive(Debug, Deserialize)]
struct GenerateParams {
    /// Topic the items should revolve around.
    topic: String,

    /// CEFR level (A1, A2, B1, B2).
    #[serde(default = "default_level")]
    level: String,
}

async fn generate_listening(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GenerateParams>,
) -> Result<Response, ApiError> {
    let level = Level::parse(&params.level)?;
    let content = state.generator.generate(&params.topic, level).await?;

    // A well-formed batch comes back as JSON; a malformed model response
    // is passed through as plain text rather than dropped.
    let response = match content {
        GeneratedContent::Json(value) => Json(value).into_response(),
        GeneratedContent::Text(text) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            text,
        )
            .into_response(),
    };
    Ok(response)
}

fn default_level() -> String {
    "A1".to_string()
}

// ============================================================================
// Tests
// ============================================================================
