use super::parse_module_request;
use crate::constants::{DEFAULT_CONTEXT_TOP_K, DEFAULT_EXECUTION_MAX_TOKENS, MODULE_USAGE_HINT};
use crate::core::{ContextRetriever, ExecutePromptParams, PromptLibrary, Task};
use crate::errors::AgentError;
use crate::llm::RetryingCaller;
use crate::modules::ModulesManager;
use std::sync::Arc;
use tracing::debug;

/// Agent producing the result text for one task
#[derive(Debug, Clone)]
pub struct ExecutionAgent {
    caller: Arc<RetryingCaller>,
    prompts: Arc<PromptLibrary>,
    retriever: ContextRetriever,
    /// Stored results pulled in as context
    context_top_k: usize,
    max_tokens: u32,
    /// Present only when code execution is enabled
    modules: Option<Arc<ModulesManager>>,
}

impl ExecutionAgent {
    pub fn new(
        caller: Arc<RetryingCaller>,
        prompts: Arc<PromptLibrary>,
        retriever: ContextRetriever,
    ) -> Self {
        ExecutionAgent {
            caller,
            prompts,
            retriever,
            context_top_k: DEFAULT_CONTEXT_TOP_K,
            max_tokens: DEFAULT_EXECUTION_MAX_TOKENS,
            modules: None,
        }
    }

    pub fn with_context_top_k(mut self, top_k: usize) -> Self {
        self.context_top_k = top_k;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_modules(mut self, modules: Arc<ModulesManager>) -> Self {
        self.modules = Some(modules);
        self
    }

    /// Executes `task` with context retrieved for the objective.
    ///
    /// With modules enabled, a single `MODULE_REQUEST:` line in the response is
    /// dispatched and the module output is appended to the returned text.
    pub async fn execute(&self, objective: &str, task: &Task) -> Result<String, AgentError> {
        let context = self
            .retriever
            .retrieve_context(objective, self.context_top_k)
            .await?;

        let mut prompt = self.prompts.render(&ExecutePromptParams {
            objective,
            task: &task.name,
            context: &context,
        });
        if let Some(modules) = &self.modules {
            prompt.push_str("\n\n");
            prompt.push_str(&modules.describe());
            prompt.push_str(MODULE_USAGE_HINT);
        }

        let response = self
            .caller
            .call_with_max_tokens(&prompt, self.max_tokens)
            .await?;

        let Some(modules) = &self.modules else {
            return Ok(response);
        };
        match parse_module_request(&response) {
            Some(request) => {
                let output = modules
                    .dispatch(&request.module, &request.action, &request.params)
                    .await;
                debug!("Module '{}' returned {} bytes", request.module, output.len());
                Ok(format!(
                    "{}\n\nModule '{}' provided a result:\n{}",
                    response, request.module, output
                ))
            }
            None => Ok(response),
        }
    }
}
