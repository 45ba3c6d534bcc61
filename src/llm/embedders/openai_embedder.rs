use super::Embedder;
use crate::errors::{ConfigError, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const OPENAI_EMBEDDINGS_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";

/// OpenAI embedder implementation that uses OpenAI's API to generate text embeddings
#[derive(Debug)]
pub struct OpenAIEmbedder {
    /// OpenAI API key used for authentication
    api_key: String,
    /// Name of the OpenAI model to use for embeddings
    model: String,
    endpoint: String,
    client: Client,
}

impl OpenAIEmbedder {
    /// Creates a new OpenAIEmbedder instance
    ///
    /// # Arguments
    ///
    /// * `model` - Name of the OpenAI model to use
    ///
    /// # Returns
    ///
    /// A Result containing either:
    /// * A new OpenAIEmbedder instance
    /// * An error if the OPENAI_API_KEY environment variable is not set
    pub fn new(model: &str) -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::MissingCredential("OPENAI_API_KEY"))?;
        Ok(Self::with_endpoint(api_key, model, OPENAI_EMBEDDINGS_ENDPOINT))
    }

    pub fn with_endpoint(api_key: impl Into<String>, model: &str, endpoint: &str) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.to_string(),
            endpoint: endpoint.to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        // single-line input
        let body = json!({
            "input": text.replace('\n', " "),
            "model": self.model
        });

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let message = res.text().await?;
            return Err(ProviderError::Api {
                provider: "OpenAI embeddings",
                message,
            });
        }

        let json_resp: serde_json::Value = res.json().await?;
        let arr = json_resp["data"][0]["embedding"]
            .as_array()
            .ok_or(ProviderError::EmptyResponse("OpenAI embeddings"))?;
        let embedding: Vec<f32> = arr
            .iter()
            .filter_map(|x| x.as_f64())
            .map(|x| x as f32)
            .collect();
        Ok(embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn flattens_newlines_and_reads_first_vector() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "input": "Items: blanket food",
                "model": "text-embedding-3-small"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"embedding": [0.25, -0.5, 1.0]}]
            })))
            .mount(&server)
            .await;

        let embedder = OpenAIEmbedder::with_endpoint(
            "sk-test",
            "text-embedding-3-small",
            &format!("{}/v1/embeddings", server.uri()),
        );
        let vector = embedder.embed_text("Items: blanket\nfood").await.unwrap();
        assert_eq!(vector, vec![0.25, -0.5, 1.0]);
    }
}
