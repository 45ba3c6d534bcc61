//! Test-only fakes for the provider capabilities.

use crate::errors::ProviderError;
use crate::llm::providers::LlmProvider;
use crate::llm::{CompletionRequest, Embedder, LlmClient, RetryPolicy, RetryingCaller};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Completion provider replaying a fixed script of responses and errors
#[derive(Debug)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<&'static str, &'static str>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<&'static str, &'static str>>) -> Self {
        ScriptedProvider {
            script: Mutex::new(script.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every request received so far, shared with the provider
    pub fn calls(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(request.clone());
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text.to_string()),
            Some(Err(message)) => Err(ProviderError::Api {
                provider: "Scripted",
                message: message.to_string(),
            }),
            None => Err(ProviderError::EmptyResponse("Scripted")),
        }
    }
}

/// Caller over `provider` that gives up after the first failure
pub fn caller_with(provider: ScriptedProvider) -> RetryingCaller {
    RetryingCaller::new(
        LlmClient::from_provider(Box::new(provider)),
        "gpt-3.5-turbo",
        0.4,
        100,
        RetryPolicy {
            max_attempts: Some(1),
            delay: Duration::from_millis(1),
            backoff: 1.0,
        },
    )
}

/// Deterministic embedder: hashes each lowercase word into one of 16 buckets
#[derive(Debug, Default)]
pub struct KeywordEmbedder;

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let mut vector = vec![0.0; 16];
        for word in text.split_whitespace() {
            let bucket = word
                .to_lowercase()
                .bytes()
                .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
            vector[bucket % 16] += 1.0;
        }
        Ok(vector)
    }
}

#[derive(Debug, Default)]
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed_text(&self, _text: &str) -> Result<Vec<f32>, ProviderError> {
        Err(ProviderError::Api {
            provider: "Failing",
            message: "embedding service unavailable".to_string(),
        })
    }
}
