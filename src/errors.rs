use crate::core::PromptKind;

/// Errors raised while resolving settings or binding providers at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is missing from .env")]
    Missing(&'static str),
    #[error("Unknown {kind} provider '{name}'")]
    UnknownProvider { kind: &'static str, name: String },
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("{0} environment variable not set")]
    MissingCredential(&'static str),
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Failure of a completion, embedding or vector-store call
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{provider} API error: {message}")]
    Api {
        provider: &'static str,
        message: String,
    },
    #[error("No content in {0} response")]
    EmptyResponse(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum RetryError {
    #[error("Provider still failing after {attempts} attempts: {last_error}")]
    Exhausted {
        attempts: u32,
        last_error: ProviderError,
    },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("Task queue is empty")]
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Failed to read prompt template {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Prompt '{kind}' has unknown placeholders {unknown:?}, missing {missing:?}")]
    Placeholders {
        kind: PromptKind,
        unknown: Vec<String>,
        missing: Vec<String>,
    },
}

/// Anything that can abort an orchestrator iteration
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Retry(#[from] RetryError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Queue(#[from] QueueError),
}
