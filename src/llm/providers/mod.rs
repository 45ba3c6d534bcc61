use crate::errors::ProviderError;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod anthropic;
pub mod deepseek;
pub mod ollama;
pub mod openai;

/// One completion call: the rendered prompt plus the sampling parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Capability contract every AI completion backend satisfies
#[async_trait]
pub trait LlmProvider: Debug + Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}
