use super::response_lines;
use crate::core::{NewTask, PromptLibrary, TaskPromptParams};
use crate::errors::RetryError;
use crate::llm::RetryingCaller;
use std::sync::Arc;
use tracing::debug;

/// Agent deriving follow-up tasks from the objective and the latest result
#[derive(Debug, Clone)]
pub struct TaskCreationAgent {
    caller: Arc<RetryingCaller>,
    prompts: Arc<PromptLibrary>,
}

impl TaskCreationAgent {
    pub fn new(caller: Arc<RetryingCaller>, prompts: Arc<PromptLibrary>) -> Self {
        TaskCreationAgent { caller, prompts }
    }

    /// Asks the model for new tasks.
    ///
    /// # Arguments
    /// * `objective` - The overall goal of the run
    /// * `last_result` - Result text of the task that just finished
    /// * `completed_task_name` - Name of that task
    /// * `pending_task_names` - Names still waiting in the queue
    ///
    /// # Returns
    /// * `Result<Vec<NewTask>, RetryError>` - Unnumbered task names, in response order
    pub async fn create_tasks(
        &self,
        objective: &str,
        last_result: &str,
        completed_task_name: &str,
        pending_task_names: &[String],
    ) -> Result<Vec<NewTask>, RetryError> {
        let prompt = self.prompts.render(&TaskPromptParams {
            objective,
            result: last_result,
            task_description: completed_task_name,
            tasks: pending_task_names,
        });
        let response = self.caller.call(&prompt).await?;
        let tasks = parse_new_tasks(&response);
        debug!("Creation agent proposed {} tasks", tasks.len());
        Ok(tasks)
    }
}

/// One task per line of the response, kept verbatim.
///
/// Only empty lines are skipped; anything else, however malformed, becomes a
/// task name.
pub fn parse_new_tasks(response: &str) -> Vec<NewTask> {
    response_lines(response)
        .into_iter()
        .filter(|line| !line.is_empty())
        .map(|line| NewTask {
            name: line.to_string(),
        })
        .collect()
}
