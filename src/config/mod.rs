mod parser;

use crate::llm::RetryPolicy;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub use parser::{load_dotenv_files, load_settings_file};

/// Settings as read from a config file and the environment, before defaults
/// are applied. Every field is optional; later layers overwrite earlier ones.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    /// Completion provider name
    pub ai_provider: Option<String>,
    pub ai_model: Option<String>,
    /// Embedding provider name
    pub embedding: Option<String>,
    pub embedding_model: Option<String>,
    pub vectordb_provider: Option<String>,
    pub objective: Option<String>,
    pub initial_task: Option<String>,
    pub ai_temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub execution_max_tokens: Option<u32>,
    pub context_top_k: Option<usize>,
    /// Humantime duration, e.g. "10s"
    pub retry_delay: Option<String>,
    pub retry_max_attempts: Option<u32>,
    pub retry_backoff: Option<f64>,
    /// Humantime duration, e.g. "1s"
    pub loop_interval: Option<String>,
    pub prompts_dir: Option<String>,
    pub strict_templates: Option<bool>,
    pub enable_code_execution: Option<bool>,
    pub working_directory: Option<String>,
    pub ollama_host: Option<String>,
    /// Extra dotenv files, space separated
    pub dotenv_extensions: Option<String>,
}

/// Fully resolved run configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub ai_provider: String,
    pub ai_model: String,
    pub embedding_provider: String,
    pub embedding_model: String,
    pub vectordb_provider: String,
    pub objective: String,
    pub initial_task: String,
    pub temperature: f32,
    /// Budget for creation and prioritization calls
    pub max_tokens: u32,
    pub execution_max_tokens: u32,
    pub context_top_k: usize,
    pub retry: RetryPolicy,
    pub loop_interval: Duration,
    pub prompts_dir: PathBuf,
    pub strict_templates: bool,
    pub enable_code_execution: bool,
    pub working_directory: PathBuf,
    pub ollama_host: String,
}
