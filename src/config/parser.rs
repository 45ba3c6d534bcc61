use super::{RawSettings, Settings};
use crate::constants::*;
use crate::errors::ConfigError;
use crate::llm::RetryPolicy;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Loads and parses a settings file
///
/// # Arguments
///
/// * `file_path` - Path to the YAML settings file
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds unknown or mistyped keys
pub fn load_settings_file(file_path: &str) -> Result<RawSettings, ConfigError> {
    let yaml_str = fs::read_to_string(file_path).map_err(|source| ConfigError::Io {
        path: file_path.to_string(),
        source,
    })?;
    let settings: RawSettings = serde_yaml::from_str(&yaml_str)?;
    info!("Loaded settings from {}", file_path);
    Ok(settings)
}

/// Loads `.env`, then each extension file in order.
///
/// Variables already present in the environment are never overwritten.
pub fn load_dotenv_files(extensions: &[String]) {
    if let Err(e) = dotenvy::dotenv() {
        warn!("Failed to load .env file: {}", e);
    }
    for file in extensions {
        match dotenvy::from_filename(file) {
            Ok(_) => info!("Loaded dotenv extension {}", file),
            Err(e) => warn!("Failed to load dotenv extension {}: {}", file, e),
        }
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::InvalidValue {
        key,
        reason: e.to_string(),
        value,
    })
}

fn parse_duration(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|e| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Blank text counts as unset, whichever layer supplied it
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn default_embedding_model(provider: &str) -> &'static str {
    match provider {
        "ollama" => DEFAULT_OLLAMA_EMBEDDING_MODEL,
        _ => DEFAULT_EMBEDDING_MODEL,
    }
}

impl RawSettings {
    /// Overwrites fields with the variables `lookup` knows about.
    ///
    /// Empty variables count as unset. `FIRST_TASK` is accepted when
    /// `INITIAL_TASK` is absent.
    pub fn overlay_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |key: &str| non_blank(lookup(key));

        macro_rules! text {
            ($field:ident, $key:literal) => {
                if let Some(v) = get($key) {
                    self.$field = Some(v);
                }
            };
        }
        macro_rules! parsed {
            ($field:ident, $key:literal) => {
                if let Some(v) = get($key) {
                    self.$field = Some(parse_value($key, v)?);
                }
            };
        }

        text!(ai_provider, "AI_PROVIDER");
        text!(ai_model, "AI_MODEL");
        text!(embedding, "EMBEDDING");
        text!(embedding_model, "EMBEDDING_MODEL");
        text!(vectordb_provider, "VECTORDB_PROVIDER");
        text!(objective, "OBJECTIVE");
        if let Some(v) = get("INITIAL_TASK").or_else(|| get("FIRST_TASK")) {
            self.initial_task = Some(v);
        }
        parsed!(ai_temperature, "AI_TEMPERATURE");
        parsed!(max_tokens, "MAX_TOKENS");
        parsed!(execution_max_tokens, "EXECUTION_MAX_TOKENS");
        parsed!(context_top_k, "CONTEXT_TOP_K");
        text!(retry_delay, "RETRY_DELAY");
        parsed!(retry_max_attempts, "RETRY_MAX_ATTEMPTS");
        parsed!(retry_backoff, "RETRY_BACKOFF");
        text!(loop_interval, "LOOP_INTERVAL");
        text!(prompts_dir, "PROMPTS_DIR");
        parsed!(strict_templates, "STRICT_TEMPLATES");
        parsed!(enable_code_execution, "ENABLE_CODE_EXECUTION");
        text!(working_directory, "WORKING_DIRECTORY");
        text!(ollama_host, "OLLAMA_HOST");
        text!(dotenv_extensions, "DOTENV_EXTENSIONS");
        Ok(())
    }

    /// Dotenv extension files named by `DOTENV_EXTENSIONS`
    pub fn dotenv_files(&self) -> Vec<String> {
        self.dotenv_extensions
            .as_deref()
            .map(|list| list.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Applies defaults and checks values.
    ///
    /// # Errors
    ///
    /// Fails when the objective or initial task is missing, or a value is out of range
    pub fn resolve(self) -> Result<Settings, ConfigError> {
        let objective = non_blank(self.objective).ok_or(ConfigError::Missing("OBJECTIVE"))?;
        let initial_task =
            non_blank(self.initial_task).ok_or(ConfigError::Missing("INITIAL_TASK"))?;

        let temperature = self.ai_temperature.unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidValue {
                key: "AI_TEMPERATURE",
                value: temperature.to_string(),
                reason: "must be between 0 and 2".to_string(),
            });
        }

        if self.retry_max_attempts == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "RETRY_MAX_ATTEMPTS",
                value: "0".to_string(),
                reason: "at least one attempt is required".to_string(),
            });
        }
        let backoff = self.retry_backoff.unwrap_or(1.0);
        if !backoff.is_finite() || backoff < 1.0 {
            return Err(ConfigError::InvalidValue {
                key: "RETRY_BACKOFF",
                value: backoff.to_string(),
                reason: "must be a multiplier of at least 1.0".to_string(),
            });
        }
        let retry = RetryPolicy {
            max_attempts: self.retry_max_attempts,
            delay: match &self.retry_delay {
                Some(v) => parse_duration("RETRY_DELAY", v)?,
                None => DEFAULT_RETRY_DELAY,
            },
            backoff,
        };

        let loop_interval = match &self.loop_interval {
            Some(v) => parse_duration("LOOP_INTERVAL", v)?,
            None => DEFAULT_LOOP_INTERVAL,
        };

        let embedding_provider = self
            .embedding
            .unwrap_or_else(|| DEFAULT_EMBEDDING_PROVIDER.to_string())
            .to_lowercase();
        let embedding_model = self
            .embedding_model
            .unwrap_or_else(|| default_embedding_model(&embedding_provider).to_string());

        Ok(Settings {
            ai_provider: self
                .ai_provider
                .unwrap_or_else(|| DEFAULT_AI_PROVIDER.to_string())
                .to_lowercase(),
            ai_model: self
                .ai_model
                .unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            embedding_provider,
            embedding_model,
            vectordb_provider: self
                .vectordb_provider
                .unwrap_or_else(|| DEFAULT_VECTORDB_PROVIDER.to_string())
                .to_lowercase(),
            objective,
            initial_task,
            temperature,
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            execution_max_tokens: self
                .execution_max_tokens
                .unwrap_or(DEFAULT_EXECUTION_MAX_TOKENS),
            context_top_k: self.context_top_k.unwrap_or(DEFAULT_CONTEXT_TOP_K),
            retry,
            loop_interval,
            prompts_dir: PathBuf::from(
                self.prompts_dir
                    .unwrap_or_else(|| DEFAULT_PROMPTS_DIR.to_string()),
            ),
            strict_templates: self.strict_templates.unwrap_or(false),
            enable_code_execution: self.enable_code_execution.unwrap_or(false),
            working_directory: PathBuf::from(
                self.working_directory
                    .unwrap_or_else(|| DEFAULT_WORKING_DIRECTORY.to_string()),
            ),
            ollama_host: self
                .ollama_host
                .unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string()),
        })
    }
}
