use super::{StoredMemory, VectorStore};
use crate::errors::{ConfigError, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

/// Vector store backed by a Pinecone serverless index
#[derive(Debug)]
pub struct PineconeStore {
    api_key: String,
    /// Index host, e.g. "https://tasks-abc123.svc.us-east-1.pinecone.io"
    index_host: String,
    namespace: String,
    client: Client,
}

impl PineconeStore {
    /// Reads `PINECONE_API_KEY`, `PINECONE_INDEX_HOST` and the optional `PINECONE_NAMESPACE`
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("PINECONE_API_KEY")
            .map_err(|_| ConfigError::MissingCredential("PINECONE_API_KEY"))?;
        let index_host = std::env::var("PINECONE_INDEX_HOST")
            .map_err(|_| ConfigError::Missing("PINECONE_INDEX_HOST"))?;
        let namespace = std::env::var("PINECONE_NAMESPACE").unwrap_or_default();
        Ok(Self::new(api_key, &index_host, namespace))
    }

    pub fn new(api_key: impl Into<String>, index_host: &str, namespace: impl Into<String>) -> Self {
        PineconeStore {
            api_key: api_key.into(),
            index_host: index_host.trim_end_matches('/').to_string(),
            namespace: namespace.into(),
            client: Client::new(),
        }
    }

    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        let res = self
            .client
            .post(format!("{}{}", self.index_host, path))
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let message = res.text().await?;
            return Err(ProviderError::Api {
                provider: "Pinecone",
                message,
            });
        }
        Ok(res.json().await?)
    }
}

#[async_trait]
impl VectorStore for PineconeStore {
    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<String, ProviderError> {
        let response = self
            .post(
                "/query",
                json!({
                    "vector": embedding,
                    "topK": top_k,
                    "includeMetadata": true,
                    "namespace": self.namespace
                }),
            )
            .await?;

        let mut matches: Vec<(f64, String)> = response["matches"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|m| {
                        let text = m["metadata"]["result"].as_str()?;
                        Some((m["score"].as_f64().unwrap_or(0.0), text.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();
        matches.sort_by(|a, b| b.0.total_cmp(&a.0));
        debug!("Pinecone returned {} matches", matches.len());

        Ok(matches
            .into_iter()
            .take(top_k)
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    async fn store(&self, memory: StoredMemory) -> Result<(), ProviderError> {
        self.post(
            "/vectors/upsert",
            json!({
                "vectors": [{
                    "id": memory.id,
                    "values": memory.embedding,
                    "metadata": {
                        "task_id": memory.source_task.id,
                        "task": memory.source_task.name,
                        "result": memory.text
                    }
                }],
                "namespace": self.namespace
            }),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Task;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn upserts_result_with_task_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/vectors/upsert"))
            .and(header("Api-Key", "pc-test"))
            .and(body_partial_json(json!({
                "vectors": [{
                    "id": "result_1",
                    "metadata": {"task_id": "1", "task": "List needed items", "result": "blanket"}
                }],
                "namespace": "picnic"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"upsertedCount": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let store = PineconeStore::new("pc-test", &server.uri(), "picnic");
        store
            .store(StoredMemory {
                id: "result_1".to_string(),
                embedding: vec![0.5, 0.5],
                text: "blanket".to_string(),
                source_task: Task::new(1, "List needed items"),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn query_joins_results_by_score() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(body_partial_json(json!({"topK": 2, "includeMetadata": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "matches": [
                    {"id": "result_2", "score": 0.4, "metadata": {"result": "drinks"}},
                    {"id": "result_1", "score": 0.9, "metadata": {"result": "blanket"}}
                ]
            })))
            .mount(&server)
            .await;

        let store = PineconeStore::new("pc-test", &server.uri(), "");
        let context = store.query(&[0.5, 0.5], 2).await.unwrap();
        assert_eq!(context, "blanket\ndrinks");
    }
}
