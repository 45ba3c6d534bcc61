use super::{StoredMemory, VectorStore};
use crate::errors::ProviderError;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory implementation of a vector store
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    /// Stored results with their embeddings
    memories: RwLock<Vec<StoredMemory>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.memories.read().await.len()
    }

    /// Fetches a stored entry by id
    #[cfg(test)]
    pub async fn get(&self, id: &str) -> Option<StoredMemory> {
        self.memories
            .read()
            .await
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }
}

/// Calculates cosine similarity between two vectors
///
/// # Returns
/// * `f32` - Similarity in [-1, 1], or 0 when either vector has no magnitude
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<String, ProviderError> {
        let memories = self.memories.read().await;
        let mut scored: Vec<(f32, &StoredMemory)> = memories
            .iter()
            .map(|m| (cosine_similarity(embedding, &m.embedding), m))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        debug!("Scored {} stored results, keeping {}", scored.len(), top_k);

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(_, m)| m.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    async fn store(&self, memory: StoredMemory) -> Result<(), ProviderError> {
        let mut memories = self.memories.write().await;
        if let Some(pos) = memories.iter().position(|m| m.id == memory.id) {
            memories[pos] = memory;
        } else {
            memories.push(memory);
        }
        Ok(())
    }
}
