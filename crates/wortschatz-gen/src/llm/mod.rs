//! LLM provider abstractions and implementations.

mod mock;
mod openrouter;
mod provider;

pub use mock::MockLlmProvider;
pub use openrouter::{OpenRouterProvider, OPENROUTER_BASE_URL};
pub use provider::{
    CompletionRequest, CompletionResponse, LlmProvider, Message, Role, StopReason, TokenUsage,
};
