//! Vector storage for executed task results

mod memory;
mod pinecone;

pub use memory::*;
pub use pinecone::*;

use crate::core::Task;
use crate::errors::{ConfigError, ProviderError};
use async_trait::async_trait;
use std::fmt::Debug;
use tracing::info;

/// A task result together with its embedding, as persisted in the store
#[derive(Clone, Debug, PartialEq)]
pub struct StoredMemory {
    /// Deterministic key, `result_<task id>`
    pub id: String,
    pub embedding: Vec<f32>,
    pub text: String,
    /// Task that produced the result
    pub source_task: Task,
}

/// Capability contract for storing results and retrieving the most similar ones
#[async_trait]
pub trait VectorStore: Debug + Send + Sync {
    /// Returns the texts of at most `top_k` stored entries, most similar first,
    /// joined into a single blob
    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<String, ProviderError>;

    /// Inserts the memory, replacing any entry with the same id
    async fn store(&self, memory: StoredMemory) -> Result<(), ProviderError>;
}

/// Binds the vector store registered under `name`
///
/// # Arguments
/// * `name` - "memory" or "pinecone"
pub fn vector_store_for(name: &str) -> Result<Box<dyn VectorStore>, ConfigError> {
    let store: Box<dyn VectorStore> = match name {
        "memory" => Box::new(InMemoryVectorStore::new()),
        "pinecone" => Box::new(PineconeStore::from_env()?),
        _ => {
            return Err(ConfigError::UnknownProvider {
                kind: "vector store",
                name: name.to_string(),
            })
        }
    };
    info!("Bound vector store '{}'", name);
    Ok(store)
}
