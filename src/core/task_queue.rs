use super::task::Task;
use crate::errors::QueueError;
use std::collections::VecDeque;

/// Ordered queue of pending tasks; execution always takes the front
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQueue {
    tasks: VecDeque<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    /// Removes the head of the queue
    ///
    /// # Returns
    /// * `Result<Task, QueueError>` - The head task, or `QueueError::Empty`
    pub fn pop_front(&mut self) -> Result<Task, QueueError> {
        self.tasks.pop_front().ok_or(QueueError::Empty)
    }

    /// Discards the current contents and takes `tasks` in the given order
    pub fn replace_all(&mut self, tasks: impl IntoIterator<Item = Task>) {
        self.tasks = tasks.into_iter().collect();
    }

    pub fn names_in_order(&self) -> Vec<String> {
        self.tasks.iter().map(|t| t.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
