use crate::errors::{ConfigError, ProviderError};
use crate::llm::providers::{
    anthropic::AnthropicProvider, deepseek::DeepSeekProvider, ollama::OllamaProvider,
    openai::OpenAiProvider, CompletionRequest, LlmProvider,
};
use tracing::{debug, info};

/// Generic LLM client that delegates work to a concrete provider.
#[derive(Debug)]
pub struct LlmClient {
    provider: Box<dyn LlmProvider>,
}

impl LlmClient {
    /// Binds the completion provider registered under `provider_name`.
    ///
    /// # Arguments
    /// * `provider_name` - "openai", "anthropic", "ollama" or "deepseek"
    /// * `ollama_host` - Base URL used when the ollama provider is selected
    ///
    /// # Returns
    /// * `Result<LlmClient, ConfigError>` - Client, or an error for unknown names and missing keys
    pub fn new(provider_name: &str, ollama_host: &str) -> Result<Self, ConfigError> {
        let provider: Box<dyn LlmProvider> = match provider_name {
            "openai" => Box::new(OpenAiProvider::new()?),
            "anthropic" => Box::new(AnthropicProvider::new()?),
            "ollama" => Box::new(OllamaProvider::new(ollama_host)),
            "deepseek" => Box::new(DeepSeekProvider::new()?),
            _ => {
                return Err(ConfigError::UnknownProvider {
                    kind: "AI",
                    name: provider_name.to_string(),
                })
            }
        };

        info!("Bound AI provider '{}'", provider_name);
        Ok(LlmClient { provider })
    }

    /// Wraps an already constructed provider
    #[cfg(test)]
    pub fn from_provider(provider: Box<dyn LlmProvider>) -> Self {
        LlmClient { provider }
    }

    /// Sends a single completion request and returns the raw response text
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        debug!("Prompt ({}): {}", request.model, request.prompt);
        let response = self.provider.complete(request).await?;
        debug!("LLM response: {}", response);
        Ok(response)
    }
}
