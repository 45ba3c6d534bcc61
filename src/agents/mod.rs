//! The three model-driven agents of the task loop
//!
//! - creation: proposes follow-up tasks from the latest result
//! - prioritization: rebuilds and renumbers the pending queue
//! - execution: produces the result for the head task

mod creation;
mod execution;
mod prioritization;

pub use creation::*;
pub use execution::*;
pub use prioritization::*;

use crate::constants::MODULE_REQUEST_MARKER;
use tracing::info;

/// A `MODULE_REQUEST: <module> <action> <params...>` line found in a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRequest {
    pub module: String,
    pub action: String,
    pub params: Vec<String>,
}

/// Returns the first well-formed module request in `resp`, if any
pub fn parse_module_request(resp: &str) -> Option<ModuleRequest> {
    for line in resp.lines() {
        if let Some(pos) = line.find(MODULE_REQUEST_MARKER) {
            let parts: Vec<String> = line[pos + MODULE_REQUEST_MARKER.len()..]
                .split_whitespace()
                .map(|s| s.to_string())
                .collect();
            if parts.len() >= 2 {
                let request = ModuleRequest {
                    module: parts[0].clone(),
                    action: parts[1].clone(),
                    params: parts[2..].to_vec(),
                };
                info!(
                    "executing module request: {} {} {:?}",
                    request.module, request.action, request.params
                );
                return Some(request);
            }
        }
    }
    None
}

/// Model output split into lines; a response without a newline is a single line
fn response_lines(response: &str) -> Vec<&str> {
    response.split('\n').collect()
}
