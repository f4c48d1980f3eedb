//! Mock LLM provider for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::provider::{
    CompletionRequest, CompletionResponse, LlmProvider, StopReason, TokenUsage,
};
use wortschatz_core::Result;

/// Mock LLM provider that returns canned responses.
///
/// Useful for testing without making actual API calls.
#[derive(Clone)]
pub struct MockLlmProvider {
    responses: Arc<Mutex<MockResponses>>,
}

struct MockResponses {
    canned: Vec<String>,
    index: usize,
}

impl MockLlmProvider {
    /// Creates a new mock provider with canned responses.
    ///
    /// Responses are returned in order. After all responses are used,
    /// the provider cycles back to the first response.
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(MockResponses {
                canned: responses,
                index: 0,
            })),
        }
    }

    /// Creates a mock provider with a single response.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self::new(vec![response.into()])
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
        let mut responses = self.responses.lock().await;

        let content = responses.canned[responses.index].clone();
        responses.index = (responses.index + 1) % responses.canned.len();

        Ok(CompletionResponse {
            content,
            tokens_used: TokenUsage {
                input: 10, // Mock values
                output: 20,
            },
            stop_reason: StopReason::EndTurn,
        })
    }
}
