use crate::constants::PYTHON_SANDBOX_IMAGE;
use crate::modules::{Module, ModuleAction};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::{info, warn};

/// Module for running python files from the workspace directory
#[derive(Debug)]
pub struct PythonModule {
    working_directory: PathBuf,
}

impl PythonModule {
    pub fn new(working_directory: &Path) -> Self {
        PythonModule {
            working_directory: working_directory.to_path_buf(),
        }
    }

    /// Runs a `.py` file located inside the workspace.
    ///
    /// Uses a throwaway docker container with the workspace mounted read-only,
    /// unless we already run inside a container or docker is not installed,
    /// in which case the file runs with the host interpreter.
    ///
    /// # Returns
    /// * `String` - The program's stdout, or a message starting with "Error:"
    pub async fn run_python_file(&self, file: &str) -> String {
        info!(
            "Executing file '{}' in workspace '{}'",
            file,
            self.working_directory.display()
        );

        let (workspace, script) = match self.resolve(file) {
            Ok(paths) => paths,
            Err(message) => return message,
        };

        if running_in_container() {
            return render_output(run_on_host(&script, &workspace).await);
        }

        match run_in_container(&script, &workspace).await {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("docker not available, running '{}' on the host", file);
                render_output(run_on_host(&script, &workspace).await)
            }
            other => render_output(other),
        }
    }

    /// Canonical workspace and script paths, or the error text to return
    fn resolve(&self, file: &str) -> Result<(PathBuf, PathBuf), String> {
        if !file.ends_with(".py") {
            return Err("Error: Invalid file type. Only .py files are allowed.".to_string());
        }

        let candidate = self.working_directory.join(file);
        if !candidate.is_file() {
            return Err(format!("Error: File '{}' does not exist.", file));
        }

        let workspace = self
            .working_directory
            .canonicalize()
            .map_err(|e| format!("Error: {}", e))?;
        let script = candidate
            .canonicalize()
            .map_err(|e| format!("Error: {}", e))?;
        if !script.starts_with(&workspace) {
            return Err(format!(
                "Error: File '{}' is outside the working directory.",
                file
            ));
        }
        Ok((workspace, script))
    }
}

fn running_in_container() -> bool {
    Path::new("/.dockerenv").exists()
}

async fn run_on_host(script: &Path, workspace: &Path) -> std::io::Result<Output> {
    Command::new("python3")
        .arg(script)
        .current_dir(workspace)
        .output()
        .await
}

async fn run_in_container(script: &Path, workspace: &Path) -> std::io::Result<Output> {
    let relative = script.strip_prefix(workspace).unwrap_or(script);
    Command::new("docker")
        .arg("run")
        .arg("--rm")
        .arg("-v")
        .arg(format!("{}:/workspace:ro", workspace.display()))
        .arg("-w")
        .arg("/workspace")
        .arg(PYTHON_SANDBOX_IMAGE)
        .arg("python")
        .arg(relative)
        .output()
        .await
}

fn render_output(output: std::io::Result<Output>) -> String {
    match output {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).to_string()
        }
        Ok(output) => format!("Error: {}", String::from_utf8_lossy(&output.stderr)),
        Err(e) => format!("Error: {}", e),
    }
}

#[async_trait::async_trait]
impl Module for PythonModule {
    fn name(&self) -> &str {
        "python"
    }

    async fn handle_action(&self, action: &str, params: &[String]) -> Result<String, String> {
        match action {
            "run" => match params.first() {
                Some(file) => Ok(self.run_python_file(file).await),
                None => Err("Missing python file to run".into()),
            },
            _ => Err(format!("Unknown action '{}'", action)),
        }
    }

    fn get_actions(&self) -> Vec<ModuleAction> {
        vec![ModuleAction {
            name: "run".into(),
            arg_count: 1,
            description: "Run a .py file from the workspace and return its output. \
                          Usage: python run <file.py>"
                .into(),
        }]
    }
}
