//! Operator console output, kept apart from tracing logs.

use crate::core::{Task, TaskQueue};
use colored::*;

/// Separator line used for visual formatting
const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

fn header(title: ColoredString) {
    println!("\n{}\n{}\n{}", SEPARATOR, title, SEPARATOR);
}

pub fn print_objective(objective: &str) {
    header("OBJECTIVE".blue().bold());
    println!("{}", objective);
}

pub fn print_initial_task(name: &str) {
    println!("{} {}", "Initial task:".yellow().bold(), name);
}

pub fn print_task_list(queue: &TaskQueue) {
    header("TASK LIST".magenta().bold());
    print!("{}", format_task_list(queue));
}

pub fn print_next_task(task: &Task) {
    header("NEXT TASK".green().bold());
    println!("{}", format_task(task));
}

pub fn print_task_result(result: &str) {
    header("TASK RESULT".yellow().bold());
    println!("{}", result);
}

/// `<id>: <name>`
fn format_task(task: &Task) -> String {
    format!("{}: {}", task.id, task.name)
}

fn format_task_list(queue: &TaskQueue) -> String {
    queue
        .iter()
        .map(|task| format!("{}\n", format_task(task)))
        .collect()
}
