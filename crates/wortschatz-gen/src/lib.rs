//! Listening-item generation for Wortschatz.
//!
//! Combines level-scoped vocabulary retrieval with an LLM provider to
//! generate batches of German listening-comprehension items:
//!
//! 1. Retrieve the vocabulary most similar to the topic
//!    ([`wortschatz_retrieval::VocabRetriever`])
//! 2. Render the generation prompt with the vocabulary embedded
//!    ([`prompt::ListeningPrompt`])
//! 3. Complete it via an [`llm::LlmProvider`] (OpenRouter in production,
//!    a mock in tests)
//! 4. Parse the response as JSON, falling back to raw text

pub mod listening;
pub mod llm;
pub mod prompt;

pub use listening::{GeneratedContent, ListeningGenerator};
pub use llm::{
    CompletionRequest, CompletionResponse, LlmProvider, Message, MockLlmProvider,
    OpenRouterProvider, Role, StopReason, TokenUsage,
};
pub use prompt::{ItemType, ListeningPrompt, ITEM_COUNT};
