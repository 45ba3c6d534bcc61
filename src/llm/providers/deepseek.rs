use super::openai::chat_completion;
use super::{CompletionRequest, LlmProvider};
use crate::errors::{ConfigError, ProviderError};
use async_trait::async_trait;
use reqwest::Client;

const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";

/// Provider implementation for DeepSeek's OpenAI-compatible API
#[derive(Debug)]
pub struct DeepSeekProvider {
    /// API key loaded from environment
    api_key: String,
    /// Base URL of the API, without trailing slash
    base_url: String,
    client: Client,
}

impl DeepSeekProvider {
    /// Creates a new DeepSeek provider instance
    ///
    /// # Returns
    /// * `Result<Self, ConfigError>` - Provider instance or error if API key not found
    pub fn new() -> Result<Self, ConfigError> {
        let api_key = std::env::var("DEEPSEEK_API_KEY")
            .map_err(|_| ConfigError::MissingCredential("DEEPSEEK_API_KEY"))?;
        Ok(Self::with_base_url(api_key, DEEPSEEK_BASE_URL))
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Self {
        DeepSeekProvider {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for DeepSeekProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        chat_completion(
            &self.client,
            &format!("{}/chat/completions", self.base_url),
            &self.api_key,
            "DeepSeek",
            request,
        )
        .await
    }
}
