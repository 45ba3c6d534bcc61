use super::{CompletionRequest, LlmProvider};
use crate::errors::ProviderError;
use crate::llm::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

/// Provider implementation for Ollama's local API
#[derive(Debug)]
pub struct OllamaProvider {
    /// Base URL of the Ollama server (e.g. "http://localhost:11434")
    host: String,
    client: Client,
}

impl OllamaProvider {
    pub fn new(host: &str) -> Self {
        OllamaProvider {
            host: host.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    /// Calls Ollama's chat API without streaming
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let request_body = json!({
            "model": request.model,
            "stream": false,
            "messages": [ChatMessage::user(&request.prompt)],
            "options": {
                "temperature": request.temperature,
                "num_predict": request.max_tokens
            }
        });

        let res = self
            .client
            .post(format!("{}/api/chat", self.host))
            .json(&request_body)
            .send()
            .await?;

        if !res.status().is_success() {
            let message = res.text().await?;
            return Err(ProviderError::Api {
                provider: "Ollama",
                message,
            });
        }

        let json_resp: serde_json::Value = res.json().await?;
        json_resp["message"]["content"]
            .as_str()
            .map(|content| content.trim().to_string())
            .ok_or(ProviderError::EmptyResponse("Ollama"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn maps_max_tokens_to_num_predict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({
                "model": "llama3",
                "stream": false,
                "options": {"num_predict": 2000}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": {"role": "assistant", "content": "Items: blanket, food, drinks"},
                "done": true
            })))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(&format!("{}/", server.uri()));
        let content = provider
            .complete(&CompletionRequest {
                prompt: "Plan a picnic".to_string(),
                model: "llama3".to_string(),
                temperature: 0.4,
                max_tokens: 2000,
            })
            .await
            .unwrap();
        assert_eq!(content, "Items: blanket, food, drinks");
    }
}
