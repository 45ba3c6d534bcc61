use super::{CompletionRequest, LlmProvider};
use crate::errors::{ConfigError, ProviderError};
use crate::llm::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Provider implementation for Anthropic's API
#[derive(Debug)]
pub struct AnthropicProvider {
    /// Anthropic API key loaded from environment
    api_key: String,
    /// Base URL of the API, without trailing slash
    base_url: String,
    client: Client,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider instance
    ///
    /// # Returns
    /// * `Result<Self, ConfigError>` - Provider instance or error if API key not found
    pub fn new() -> Result<Self, ConfigError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| ConfigError::MissingCredential("ANTHROPIC_API_KEY"))?;
        Ok(Self::with_base_url(api_key, ANTHROPIC_BASE_URL))
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Self {
        AnthropicProvider {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    /// Calls Anthropic's messages API
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let request_body = json!({
            "model": request.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": [ChatMessage::user(&request.prompt)]
        });

        let res = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request_body)
            .send()
            .await?;

        if !res.status().is_success() {
            let message = res.text().await?;
            return Err(ProviderError::Api {
                provider: "Anthropic",
                message,
            });
        }

        let json_resp: serde_json::Value = res.json().await?;
        if let Some(content) = json_resp["content"][0]["text"].as_str() {
            debug!("Anthropic response: {}", content);
            Ok(content.trim().to_string())
        } else {
            Err(ProviderError::EmptyResponse("Anthropic"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CompletionRequest {
        CompletionRequest {
            prompt: "Reorder the tasks".to_string(),
            model: "claude-3-5-haiku-latest".to_string(),
            temperature: 0.4,
            max_tokens: 100,
        }
    }

    #[tokio::test]
    async fn sends_key_headers_and_reads_first_text_block() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("x-api-key", "ak-test"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({
                "model": "claude-3-5-haiku-latest",
                "max_tokens": 100,
                "messages": [{"role": "user", "content": "Reorder the tasks"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": "1. Pack blanket\n2. Buy food\n"}]
            })))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::with_base_url("ak-test", &server.uri());
        let content = provider.complete(&request()).await.unwrap();
        assert_eq!(content, "1. Pack blanket\n2. Buy food");
    }

    #[tokio::test]
    async fn overloaded_status_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::with_base_url("ak-test", &server.uri());
        match provider.complete(&request()).await {
            Err(ProviderError::Api { provider, message }) => {
                assert_eq!(provider, "Anthropic");
                assert_eq!(message, "overloaded");
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }
}
