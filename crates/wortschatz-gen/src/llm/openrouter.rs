//! OpenRouter API provider implementation.
//!
//! Speaks the OpenAI-compatible `/chat/completions` API that OpenRouter
//! exposes, which makes this provider usable against any OpenAI-style
//! endpoint by overriding the base URL.

use async_trait::async_trait;

use super::provider::{
    CompletionRequest, CompletionResponse, LlmProvider, StopReason, TokenUsage,
};
use wortschatz_core::{Error, Result};

/// Default OpenRouter API base URL.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// LLM provider using OpenRouter's OpenAI-compatible API.
pub struct OpenRouterProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    /// Creates a new OpenRouter provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenRouter API key
    /// * `model` - Model ID (e.g., "meta-llama/llama-3.3-8b-instruct:free")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENROUTER_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Override the API base URL (for OpenAI-compatible endpoints).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        // The chat/completions API carries the system prompt as the
        // first message rather than a separate field.
        let mut messages: Vec<serde_json::Value> = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system_prompt {
            messages.push(serde_json::json!({ "role": "system", "content": system }));
        }
        for message in &request.messages {
            messages.push(serde_json::json!({
                "role": message.role,
                "content": message.content,
            }));
        }

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": request.max_tokens,
        });

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::llm(format!("Failed to call OpenRouter API: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::llm(format!(
                "OpenRouter API error {status}: {error_text}"
            )));
        }

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse OpenRouter response: {e}")))?;

        parse_completion(&response_body)
    }
}

/// Extract content, usage, and stop reason from a chat/completions body.
fn parse_completion(body: &serde_json::Value) -> Result<CompletionResponse> {
    let choice = body["choices"]
        .get(0)
        .ok_or_else(|| Error::llm("No response choices returned from the model"))?;

    let content = choice["message"]["content"]
        .as_str()
        .ok_or_else(|| Error::llm("Empty content in response message"))?
        .to_string();

    // Usage is optional on some OpenAI-compatible endpoints.
    let input = body["usage"]["prompt_tokens"].as_u64().unwrap_or(0);
    let output = body["usage"]["completion_tokens"].as_u64().unwrap_or(0);

    let stop_reason = match choice["finish_reason"].as_str() {
        Some("stop") => StopReason::EndTurn,
        Some("length") => StopReason::MaxTokens,
        _ => StopReason::Other,
    };

    Ok(CompletionResponse {
        content,
        tokens_used: TokenUsage { input, output },
        stop_reason,
    })
}
