//! Listening-item generation flow.
//!
//! Ties the retrieval subsystem and the LLM provider together: retrieve
//! the topic's vocabulary for the level, render the generation prompt,
//! complete it, and parse the response.

use crate::llm::{CompletionRequest, LlmProvider, Message};
use crate::prompt::{ItemType, ListeningPrompt};
use std::sync::Arc;
use wortschatz_core::{Level, Result};
use wortschatz_retrieval::VocabRetriever;

/// Output of one generation run.
///
/// The model is instructed to return a bare JSON array, but responses are
/// not always well formed; a response that fails to parse is preserved as
/// text instead of being discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedContent {
    /// The response parsed as JSON.
    Json(serde_json::Value),
    /// The raw response, returned when JSON parsing fails.
    Text(String),
}

impl GeneratedContent {
    /// Whether the content parsed as JSON.
    pub fn is_json(&self) -> bool {
        matches!(self, GeneratedContent::Json(_))
    }
}

/// Generates listening-comprehension item batches.
pub struct ListeningGenerator {
    retriever: Arc<VocabRetriever>,
    provider: Arc<dyn LlmProvider>,
}

impl ListeningGenerator {
    /// Create a generator over a retriever and an LLM provider.
    pub fn new(retriever: Arc<VocabRetriever>, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            retriever,
            provider,
        }
    }

    /// Generate one batch of listening items for a topic and level.
    ///
    /// # Errors
    ///
    /// Retrieval errors (`InvalidLevel`, `IndexNotFound`, ...) and
    /// provider errors (`Llm`) propagate unchanged. A syntactically
    /// malformed model response is not an error; it comes back as
    /// [`GeneratedContent::Text`].
    pub async fn generate(&self, topic: &str, level: Level) -> Result<GeneratedContent> {
        self.generate_with(topic, level, 1, ItemType::MultipleChoice)
            .await
    }

    /// Generate with explicit item numbering and preferred type.
    pub async fn generate_with(
        &self,
        topic: &str,
        level: Level,
        start_id: u32,
        prefer_type: ItemType,
    ) -> Result<GeneratedContent> {
        let vocab = self
            .retriever
            .fetch_for_level(topic, level, self.retriever.default_limit())
            .await?;

        let prompt = ListeningPrompt::new(topic, level)
            .with_start_id(start_id)
            .with_prefer_type(prefer_type)
            .render(&vocab);

        let request = CompletionRequest::new(vec![Message::user(prompt)]);
        let response = self.provider.complete(request).await?;

        log::info!(
            "generated listening batch for topic '{topic}' level {level} ({} tokens)",
            response.tokens_used.total()
        );

        match serde_json::from_str::<serde_json::Value>(&response.content) {
            Ok(value) => Ok(GeneratedContent::Json(value)),
            Err(err) => {
                log::warn!("model response is not valid JSON ({err}), returning as text");
                Ok(GeneratedContent::Text(response.content))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmProvider;
    use wortschatz_retrieval::{
        MemoryCatalog, MemoryRecord, MockEmbeddingProvider, Payload, RetrievalConfig,
    };

    fn test_retriever() -> Arc<VocabRetriever> {
        let records = vec![
            MemoryRecord::record(
                "r1",
                Payload::record([("german_term", "Brot")]),
                vec![0.0; 8],
            ),
            MemoryRecord::record(
                "r2",
                Payload::record([("german_term", "Milch")]),
                vec![0.1; 8],
            ),
        ];
        let catalog = Arc::new(MemoryCatalog::new().with_table("a1_minimal.csv", records));
        Arc::new(VocabRetriever::with_provider(
            catalog,
            &RetrievalConfig::default(),
            Arc::new(MockEmbeddingProvider::new(8)),
        ))
    }

    #[tokio::test]
    async fn test_generate_parses_json_response() {
        let provider = Arc::new(MockLlmProvider::with_response(r#"[{"id": 1}]"#));
        let generator = ListeningGenerator::new(test_retriever(), provider);

        let content = generator.generate("Essen", Level::A1).await.unwrap();
        match content {
            GeneratedContent::Json(value) => {
                assert_eq!(value[0]["id"], 1);
            }
            other => panic!("expected JSON content, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_falls_back_to_text() {
        let provider = Arc::new(MockLlmProvider::with_response("Hier sind die Aufgaben: ..."));
        let generator = ListeningGenerator::new(test_retriever(), provider);

        let content = generator.generate("Essen", Level::A1).await.unwrap();
        assert_eq!(
            content,
            GeneratedContent::Text("Hier sind die Aufgaben: ...".to_string())
        );
        assert!(!content.is_json());
    }

    #[tokio::test]
    async fn test_generate_propagates_retrieval_errors() {
        let catalog = Arc::new(MemoryCatalog::new());
        let retriever = Arc::new(VocabRetriever::with_provider(
            catalog,
            &RetrievalConfig::default(),
            Arc::new(MockEmbeddingProvider::new(8)),
        ));
        let provider = Arc::new(MockLlmProvider::with_response("[]"));
        let generator = ListeningGenerator::new(retriever, provider);

        let err = generator.generate("Essen", Level::A1).await.unwrap_err();
        assert!(matches!(
            err,
            wortschatz_core::Error::IndexNotFound { .. }
        ));
    }
}
