use super::{CompletionRequest, LlmProvider};
use crate::errors::{ConfigError, ProviderError};
use crate::llm::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Provider implementation for OpenAI's API
#[derive(Debug)]
pub struct OpenAiProvider {
    /// OpenAI API key loaded from environment
    api_key: String,
    /// Base URL of the API, without trailing slash
    base_url: String,
    client: Client,
}

impl OpenAiProvider {
    /// Creates a new OpenAI provider instance
    ///
    /// # Returns
    /// * `Result<Self, ConfigError>` - Provider instance or error if API key not found
    pub fn new() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::MissingCredential("OPENAI_API_KEY"))?;
        Ok(Self::with_base_url(api_key, OPENAI_BASE_URL))
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Self {
        OpenAiProvider {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        chat_completion(
            &self.client,
            &format!("{}/chat/completions", self.base_url),
            &self.api_key,
            "OpenAI",
            request,
        )
        .await
    }
}

/// Calls an OpenAI-compatible `/chat/completions` endpoint with the prompt as a single user turn
///
/// # Arguments
/// * `endpoint` - Full URL of the chat completions endpoint
/// * `provider` - Display name used in error messages
/// * `request` - Prompt and sampling parameters
pub(crate) async fn chat_completion(
    client: &Client,
    endpoint: &str,
    api_key: &str,
    provider: &'static str,
    request: &CompletionRequest,
) -> Result<String, ProviderError> {
    let request_body = json!({
        "model": request.model,
        "messages": [ChatMessage::user(&request.prompt)],
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
        "n": 1
    });

    let res = client
        .post(endpoint)
        .bearer_auth(api_key)
        .json(&request_body)
        .send()
        .await?;

    if !res.status().is_success() {
        let message = res.text().await?;
        return Err(ProviderError::Api { provider, message });
    }

    let json_resp: serde_json::Value = res.json().await?;
    json_resp["choices"][0]["message"]["content"]
        .as_str()
        .map(|content| content.trim().to_string())
        .ok_or(ProviderError::EmptyResponse(provider))
}
