use crate::agents::{ExecutionAgent, PrioritizationAgent, TaskCreationAgent};
use crate::constants::{
    DEFAULT_CONTEXT_TOP_K, DEFAULT_EXECUTION_MAX_TOKENS, DEFAULT_LOOP_INTERVAL,
};
use crate::core::{ContextRetriever, ExecutionResult, PromptLibrary, Task, TaskQueue};
use crate::errors::AgentError;
use crate::llm::{Embedder, RetryingCaller};
use crate::modules::ModulesManager;
use crate::utils::display;
use crate::vectordb::{StoredMemory, VectorStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Where the loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Queue found empty on the last tick
    Idle,
    /// Working on the head task
    HasWork,
    /// Waiting for the next tick
    Sleeping,
}

/// Provider capabilities bound at startup
pub struct Bindings {
    pub caller: RetryingCaller,
    pub embedder: Arc<dyn Embedder>,
    pub store: Arc<dyn VectorStore>,
    pub prompts: PromptLibrary,
}

/// Tunables of the loop that have sensible defaults
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    pub loop_interval: Duration,
    pub context_top_k: usize,
    pub execution_max_tokens: u32,
    /// Code-execution modules, when enabled
    pub modules: Option<Arc<ModulesManager>>,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        OrchestratorOptions {
            loop_interval: DEFAULT_LOOP_INTERVAL,
            context_top_k: DEFAULT_CONTEXT_TOP_K,
            execution_max_tokens: DEFAULT_EXECUTION_MAX_TOKENS,
            modules: None,
        }
    }
}

/// Owns the queue, the id counter and the agents, and drives the
/// execute / store / create / reprioritize cycle.
pub struct Orchestrator {
    objective: String,
    queue: TaskQueue,
    /// Last id handed out; never reset, even when the queue is replaced
    task_id_counter: u64,
    state: LoopState,
    loop_interval: Duration,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    execution: ExecutionAgent,
    creation: TaskCreationAgent,
    prioritization: PrioritizationAgent,
}

impl Orchestrator {
    /// Creates the loop with a queue holding only the bootstrap task (id 1)
    pub fn new(
        objective: &str,
        initial_task: &str,
        bindings: Bindings,
        options: OrchestratorOptions,
    ) -> Self {
        let caller = Arc::new(bindings.caller);
        let prompts = Arc::new(bindings.prompts);
        let retriever =
            ContextRetriever::new(Arc::clone(&bindings.embedder), Arc::clone(&bindings.store));

        let mut execution =
            ExecutionAgent::new(Arc::clone(&caller), Arc::clone(&prompts), retriever)
                .with_context_top_k(options.context_top_k)
                .with_max_tokens(options.execution_max_tokens);
        if let Some(modules) = options.modules {
            execution = execution.with_modules(modules);
        }

        let mut queue = TaskQueue::new();
        queue.append(Task::new(1, initial_task));

        Orchestrator {
            objective: objective.to_string(),
            queue,
            task_id_counter: 1,
            state: LoopState::Idle,
            loop_interval: options.loop_interval,
            embedder: bindings.embedder,
            store: bindings.store,
            execution,
            creation: TaskCreationAgent::new(Arc::clone(&caller), Arc::clone(&prompts)),
            prioritization: PrioritizationAgent::new(caller, prompts),
        }
    }

    #[cfg(test)]
    pub fn queue(&self) -> &TaskQueue {
        &self.queue
    }

    #[cfg(test)]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[cfg(test)]
    pub fn task_id_counter(&self) -> u64 {
        self.task_id_counter
    }

    /// Runs until the process is terminated or an iteration fails
    pub async fn run(&mut self) -> Result<(), AgentError> {
        display::print_objective(&self.objective);
        if let Some(task) = self.queue.iter().next() {
            display::print_initial_task(&task.name);
        }

        loop {
            self.step().await?;
            if self.state == LoopState::Idle {
                debug!(
                    "Nothing to do, polling again in {}",
                    humantime::format_duration(self.loop_interval)
                );
            }
            self.state = LoopState::Sleeping;
            sleep(self.loop_interval).await;
        }
    }

    /// One tick of the loop: does nothing on an empty queue, otherwise
    /// executes the head task, stores its result, appends new tasks and
    /// reprioritizes the queue.
    ///
    /// # Returns
    /// * `Result<Option<ExecutionResult>, AgentError>` - The executed task's result,
    ///   if there was one
    pub async fn step(&mut self) -> Result<Option<ExecutionResult>, AgentError> {
        if self.queue.is_empty() {
            debug!("Task queue empty, waiting");
            self.state = LoopState::Idle;
            return Ok(None);
        }
        self.state = LoopState::HasWork;

        display::print_task_list(&self.queue);
        let task = self.queue.pop_front()?;
        display::print_next_task(&task);

        let text = self.execution.execute(&self.objective, &task).await?;
        display::print_task_result(&text);
        let result = ExecutionResult { task, text };

        let embedding = self.embedder.embed_text(&result.text).await?;
        self.store
            .store(StoredMemory {
                id: result.memory_id(),
                embedding,
                text: result.text.clone(),
                source_task: result.task.clone(),
            })
            .await?;

        let pending = self.queue.names_in_order();
        let new_tasks = self
            .creation
            .create_tasks(&self.objective, &result.text, &result.task.name, &pending)
            .await?;
        for new_task in new_tasks {
            self.task_id_counter += 1;
            self.queue.append(Task::new(self.task_id_counter, new_task.name));
        }
        info!("Queue holds {} tasks before prioritization", self.queue.len());

        let current_task_id = self.numeric_id(&result.task);
        self.prioritization
            .reprioritize(&self.objective, current_task_id, &mut self.queue)
            .await?;

        Ok(Some(result))
    }

    /// Numeric id of `task`; reprioritized ids can be arbitrary labels, in
    /// which case the counter stands in.
    fn numeric_id(&self, task: &Task) -> u64 {
        task.id.number().unwrap_or_else(|| {
            warn!(
                "Task id '{}' is not numeric, using counter {} as prioritization hint",
                task.id, self.task_id_counter
            );
            self.task_id_counter
        })
    }
}
