//! Core of the task loop
//!
//! This module contains:
//! - The task model and the pending-task queue
//! - Prompt templates and their parameters
//! - Context retrieval from stored results
//! - The orchestrator driving each iteration

mod context;
mod orchestrator;
mod prompt;
mod task;
mod task_queue;

pub use context::*;
pub use orchestrator::*;
pub use prompt::*;
pub use task::*;
pub use task_queue::*;
