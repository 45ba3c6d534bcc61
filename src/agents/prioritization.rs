use super::response_lines;
use crate::core::{PriorityPromptParams, PromptLibrary, Task, TaskQueue};
use crate::errors::RetryError;
use crate::llm::RetryingCaller;
use std::sync::Arc;
use tracing::debug;

/// Agent that reorders and renumbers the pending queue
#[derive(Debug, Clone)]
pub struct PrioritizationAgent {
    caller: Arc<RetryingCaller>,
    prompts: Arc<PromptLibrary>,
}

impl PrioritizationAgent {
    pub fn new(caller: Arc<RetryingCaller>, prompts: Arc<PromptLibrary>) -> Self {
        PrioritizationAgent { caller, prompts }
    }

    /// Replaces the whole queue with the model's numbered list.
    ///
    /// `current_task_id + 1` is only a hint for where the numbering should
    /// start; the rebuilt queue carries whatever ids the model wrote. Lines
    /// without a `<id>. <name>` shape are dropped, so tasks can disappear here.
    pub async fn reprioritize(
        &self,
        objective: &str,
        current_task_id: u64,
        queue: &mut TaskQueue,
    ) -> Result<(), RetryError> {
        let task_names = queue.names_in_order();
        let prompt = self.prompts.render(&PriorityPromptParams {
            objective,
            next_task_id: current_task_id.saturating_add(1),
            task_names: &task_names,
        });
        let response = self.caller.call(&prompt).await?;

        let tasks = parse_prioritized_tasks(&response);
        debug!(
            "Prioritization kept {} of {} tasks",
            tasks.len(),
            task_names.len()
        );
        queue.replace_all(tasks);
        Ok(())
    }
}

/// Parses `<id>. <name>` lines, splitting on the first period only
pub fn parse_prioritized_tasks(response: &str) -> Vec<Task> {
    response_lines(response)
        .into_iter()
        .filter_map(|line| {
            let (id, name) = line.trim().split_once('.')?;
            Some(Task::new(id.trim(), name.trim()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{caller_with, ScriptedProvider};

    #[test]
    fn malformed_lines_are_dropped() {
        let tasks = parse_prioritized_tasks("1. Research X\nnot-a-task\n2. Write Y");
        assert_eq!(
            tasks,
            vec![Task::new("1", "Research X"), Task::new("2", "Write Y")]
        );
    }

    #[test]
    fn splits_on_first_period_only() {
        let tasks = parse_prioritized_tasks("  3. Read v1.2 notes. Then summarize  ");
        assert_eq!(tasks, vec![Task::new("3", "Read v1.2 notes. Then summarize")]);
    }

    #[test]
    fn non_numeric_labels_become_ids() {
        let tasks = parse_prioritized_tasks("Step one. Buy food\n. Pack blanket");
        assert_eq!(
            tasks,
            vec![Task::new("Step one", "Buy food"), Task::new("", "Pack blanket")]
        );
    }

    #[tokio::test]
    async fn replaces_queue_and_hints_next_id() {
        let provider = ScriptedProvider::new(vec![Ok("1. Pack blanket\n2. Buy food")]);
        let calls = provider.calls();
        let agent = PrioritizationAgent::new(
            Arc::new(caller_with(provider)),
            Arc::new(PromptLibrary::builtin()),
        );

        let mut queue = TaskQueue::new();
        queue.append(Task::new(2, "Buy food"));
        queue.append(Task::new(3, "Pack blanket"));
        agent
            .reprioritize("Plan a picnic", 1, &mut queue)
            .await
            .unwrap();

        assert_eq!(
            queue.iter().cloned().collect::<Vec<_>>(),
            vec![Task::new("1", "Pack blanket"), Task::new("2", "Buy food")]
        );
        let calls = calls.lock().unwrap();
        assert!(calls[0].prompt.contains("following tasks: Buy food, Pack blanket."));
        assert!(calls[0].prompt.contains("Start the task list with number 2."));
    }

    #[tokio::test]
    async fn unparseable_response_empties_queue() {
        let provider = ScriptedProvider::new(vec![Ok("Sorry, I cannot help with that")]);
        let agent = PrioritizationAgent::new(
            Arc::new(caller_with(provider)),
            Arc::new(PromptLibrary::builtin()),
        );

        let mut queue = TaskQueue::new();
        queue.append(Task::new(2, "Buy food"));
        agent
            .reprioritize("Plan a picnic", 1, &mut queue)
            .await
            .unwrap();
        assert!(queue.is_empty());
    }
}
