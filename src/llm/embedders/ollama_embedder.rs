use super::Embedder;
use crate::errors::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

/// Embedder backed by a local Ollama server's `/api/embeddings` endpoint
#[derive(Debug)]
pub struct OllamaEmbedder {
    host: String,
    model: String,
    client: Client,
}

impl OllamaEmbedder {
    pub fn new(host: &str, model: &str) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let res = self
            .client
            .post(format!("{}/api/embeddings", self.host))
            .json(&json!({ "model": self.model, "prompt": text }))
            .send()
            .await?;

        if !res.status().is_success() {
            let message = res.text().await?;
            return Err(ProviderError::Api {
                provider: "Ollama embeddings",
                message,
            });
        }

        let json_resp: serde_json::Value = res.json().await?;
        let arr = json_resp["embedding"]
            .as_array()
            .ok_or(ProviderError::EmptyResponse("Ollama embeddings"))?;
        Ok(arr
            .iter()
            .filter_map(|x| x.as_f64())
            .map(|x| x as f32)
            .collect())
    }
}
