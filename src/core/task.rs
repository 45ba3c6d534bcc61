use serde::Serialize;
use std::fmt;

/// Identifier of a queued task.
///
/// The orchestrator hands out numeric ids from its counter, but a
/// reprioritized queue carries whatever label the model put before the
/// first period of each line, so the id is kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Numeric value of the id, if it has one
    pub fn number(&self) -> Option<u64> {
        self.0.trim().parse().ok()
    }
}

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        TaskId(id.to_string())
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        TaskId(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        TaskId(id)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A unit of work waiting in, or taken from, the task queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    #[serde(rename = "task_id")]
    pub id: TaskId,
    #[serde(rename = "task_name")]
    pub name: String,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, name: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A task name proposed by the creation agent, before the orchestrator numbers it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
}

/// Raw text produced for one executed task
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub task: Task,
    pub text: String,
}

impl ExecutionResult {
    /// Key the result is stored under in the vector store
    pub fn memory_id(&self) -> String {
        format!("result_{}", self.task.id)
    }
}
