use crate::config::RawSettings;
use clap::Parser;

/// Objective-driven task loop: executes, creates and reprioritizes tasks
/// until the process is stopped
#[derive(Parser, Debug)]
#[command(name = "taskloop", version)]
pub struct Cli {
    /// YAML settings file, read before the environment
    #[arg(short, long)]
    pub config: Option<String>,

    /// Overrides OBJECTIVE
    #[arg(short, long)]
    pub objective: Option<String>,

    /// Overrides INITIAL_TASK
    #[arg(short = 't', long)]
    pub initial_task: Option<String>,

    /// Overrides AI_MODEL
    #[arg(short, long)]
    pub model: Option<String>,

    /// Additional dotenv files loaded after .env
    #[arg(long, num_args = 1..)]
    pub dotenv_extensions: Vec<String>,

    /// Sets the logging verbosity level for the application
    /// Possible values: "error", "warn", "info", "debug", "trace"
    /// Default: "info"
    #[arg(long, default_value_t = String::from("info"))]
    pub logging_level: String,

    /// Also write logs to logs/taskloop.log
    #[arg(long)]
    pub log_file: bool,
}

impl Cli {
    /// Applies the command-line overrides, the last configuration layer
    pub fn apply(&self, raw: &mut RawSettings) {
        if let Some(objective) = &self.objective {
            raw.objective = Some(objective.clone());
        }
        if let Some(task) = &self.initial_task {
            raw.initial_task = Some(task.clone());
        }
        if let Some(model) = &self.model {
            raw.ai_model = Some(model.clone());
        }
    }
}
