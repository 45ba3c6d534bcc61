use std::time::Duration;

pub const DEFAULT_AI_PROVIDER: &str = "openai";
pub const DEFAULT_AI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "openai";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_OLLAMA_EMBEDDING_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_VECTORDB_PROVIDER: &str = "memory";

pub const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Token budget for task-list style calls (creation, prioritization)
pub const DEFAULT_MAX_TOKENS: u32 = 100;

/// Token budget for execution calls, which produce longer prose
pub const DEFAULT_EXECUTION_MAX_TOKENS: u32 = 2000;

/// Number of stored results pulled in as execution context
pub const DEFAULT_CONTEXT_TOP_K: usize = 5;

pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);
pub const DEFAULT_LOOP_INTERVAL: Duration = Duration::from_secs(1);

pub const DEFAULT_PROMPTS_DIR: &str = "prompts";
pub const DEFAULT_WORKING_DIRECTORY: &str = "auto_gpt_workspace";
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// Image used when python files are run in an isolated container
pub const PYTHON_SANDBOX_IMAGE: &str = "python:3.10";

/// Marker the execution response uses to ask for a code-execution module
pub const MODULE_REQUEST_MARKER: &str = "MODULE_REQUEST:";

/// Appended to the execute prompt when code execution is enabled
pub const MODULE_USAGE_HINT: &str = "If running code would help you complete the task, \
answer with a single line:\nMODULE_REQUEST: <module_name> <action> <params...>\n\
The module output will be attached to your result.";
