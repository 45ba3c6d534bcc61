use crate::errors::ProviderError;
use crate::llm::Embedder;
use crate::vectordb::VectorStore;
use std::sync::Arc;
use tracing::debug;

/// Pulls previously stored results relevant to a query
#[derive(Debug, Clone)]
pub struct ContextRetriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl ContextRetriever {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        ContextRetriever { embedder, store }
    }

    /// Embeds `query` and returns the `top_k` closest stored results as one blob.
    ///
    /// Provider failures are returned as-is, without retrying.
    pub async fn retrieve_context(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<String, ProviderError> {
        let embedding = self.embedder.embed_text(query).await?;
        let context = self.store.query(&embedding, top_k).await?;
        debug!("Retrieved {} bytes of context for '{}'", context.len(), query);
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Task;
    use crate::test_support::{FailingEmbedder, KeywordEmbedder};
    use crate::vectordb::{InMemoryVectorStore, StoredMemory};

    #[tokio::test]
    async fn stored_result_comes_back_for_matching_query() {
        let embedder = Arc::new(KeywordEmbedder);
        let store = Arc::new(InMemoryVectorStore::new());
        let embedding = embedder.embed_text("picnic blanket").await.unwrap();
        store
            .store(StoredMemory {
                id: "result_1".to_string(),
                embedding,
                text: "T".to_string(),
                source_task: Task::new(1, "List needed items"),
            })
            .await
            .unwrap();

        let retriever = ContextRetriever::new(embedder, store);
        let context = retriever.retrieve_context("picnic blanket", 1).await.unwrap();
        assert!(context.contains('T'));
    }

    #[tokio::test]
    async fn embedding_failure_propagates() {
        let retriever = ContextRetriever::new(
            Arc::new(FailingEmbedder),
            Arc::new(InMemoryVectorStore::new()),
        );
        assert!(retriever.retrieve_context("anything", 5).await.is_err());
    }
}
