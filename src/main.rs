//! Main entry point for the application.
//!
//! Resolves settings from a config file, the environment and the command
//! line, binds the configured providers, and runs the task loop until the
//! process is stopped.

mod agents;
mod cli;
mod config;
mod constants;
mod core;
mod errors;
mod llm;
mod modules;
#[cfg(test)]
mod test_support;
mod utils;
mod vectordb;

use clap::Parser;
use config::{RawSettings, Settings};
use crate::core::{Bindings, Orchestrator, OrchestratorOptions, PromptLibrary};
use errors::ConfigError;
use llm::{embedder_for, LlmClient, RetryingCaller};
use modules::ModulesManager;
use std::process;
use std::sync::Arc;
use tracing::{error, info};

/// Layers the config file, the environment and the command line
fn resolve_settings(cli: &cli::Cli) -> Result<Settings, ConfigError> {
    let mut raw = match &cli.config {
        Some(path) => config::load_settings_file(path)?,
        None => RawSettings::default(),
    };
    raw.overlay_env(|key| std::env::var(key).ok())?;

    let mut extensions = raw.dotenv_files();
    extensions.extend(cli.dotenv_extensions.iter().cloned());
    if !extensions.is_empty() {
        config::load_dotenv_files(&extensions);
        raw.overlay_env(|key| std::env::var(key).ok())?;
    }

    cli.apply(&mut raw);
    raw.resolve()
}

/// Binds every provider named in `settings`
fn build_orchestrator(settings: &Settings) -> Result<Orchestrator, ConfigError> {
    let client = LlmClient::new(&settings.ai_provider, &settings.ollama_host)?;
    let caller = RetryingCaller::new(
        client,
        &settings.ai_model,
        settings.temperature,
        settings.max_tokens,
        settings.retry.clone(),
    );
    let embedder = embedder_for(
        &settings.embedding_provider,
        &settings.embedding_model,
        &settings.ollama_host,
    )?;
    let store = vectordb::vector_store_for(&settings.vectordb_provider)?;
    let prompts = PromptLibrary::load(
        &settings.prompts_dir,
        &settings.ai_provider,
        &settings.ai_model,
        settings.strict_templates,
    )?;

    let modules = settings.enable_code_execution.then(|| {
        info!(
            "Code execution enabled in {}",
            settings.working_directory.display()
        );
        Arc::new(ModulesManager::new(&settings.working_directory))
    });

    Ok(Orchestrator::new(
        &settings.objective,
        &settings.initial_task,
        Bindings {
            caller,
            embedder: Arc::from(embedder),
            store: Arc::from(store),
            prompts,
        },
        OrchestratorOptions {
            loop_interval: settings.loop_interval,
            context_top_k: settings.context_top_k,
            execution_max_tokens: settings.execution_max_tokens,
            modules,
        },
    ))
}

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    utils::init_logging(&cli.logging_level, cli.log_file);
    config::load_dotenv_files(&[]);

    let settings = match resolve_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };
    info!(
        "Using {} / {} with {} embeddings and the {} vector store",
        settings.ai_provider,
        settings.ai_model,
        settings.embedding_provider,
        settings.vectordb_provider
    );

    let mut orchestrator = match build_orchestrator(&settings) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            eprintln!("Failed to bind providers: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = orchestrator.run().await {
        error!("Task loop stopped: {}", e);
        eprintln!("Task loop stopped: {}", e);
        process::exit(1);
    }
}
