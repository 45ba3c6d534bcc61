/// Module for OpenAI embedder implementation
pub mod openai_embedder;
pub mod ollama_embedder;

use crate::errors::{ConfigError, ProviderError};
use async_trait::async_trait;
use std::fmt::Debug;
use tracing::info;

pub use ollama_embedder::*;
pub use openai_embedder::*;

/// Trait defining interface for text embedding functionality
#[async_trait]
pub trait Embedder: Debug + Send + Sync {
    /// Embeds the given text into a vector of floating point numbers
    ///
    /// # Arguments
    ///
    /// * `text` - The text to embed
    ///
    /// # Returns
    ///
    /// A Result containing either:
    /// * A vector of f32 values representing the embedding
    /// * A ProviderError if the backend call fails
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, ProviderError>;
}

/// Binds the embedding provider registered under `name`
///
/// # Arguments
/// * `name` - "openai" or "ollama"
/// * `model` - Embedding model passed to the backend
/// * `ollama_host` - Base URL used when the ollama embedder is selected
pub fn embedder_for(
    name: &str,
    model: &str,
    ollama_host: &str,
) -> Result<Box<dyn Embedder>, ConfigError> {
    let embedder: Box<dyn Embedder> = match name {
        "openai" => Box::new(OpenAIEmbedder::new(model)?),
        "ollama" => Box::new(OllamaEmbedder::new(ollama_host, model)),
        _ => {
            return Err(ConfigError::UnknownProvider {
                kind: "embedding",
                name: name.to_string(),
            })
        }
    };
    info!("Bound embedding provider '{}' ({})", name, model);
    Ok(embedder)
}
