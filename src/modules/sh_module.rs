use crate::modules::{Module, ModuleAction};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Module for running shell command lines inside the workspace directory
#[derive(Debug)]
pub struct ShModule {
    working_directory: PathBuf,
}

impl ShModule {
    pub fn new(working_directory: &Path) -> Self {
        ShModule {
            working_directory: working_directory.to_path_buf(),
        }
    }

    /// Runs `command_line` through `sh -c` with the workspace as working directory.
    ///
    /// The child gets its own working directory; the agent's cwd is never touched.
    ///
    /// # Returns
    /// * `Result<String, String>` - Combined "STDOUT:/STDERR:" text,
    ///   or an error if the shell could not start
    pub async fn run_shell_command(&self, command_line: &str) -> Result<String, String> {
        tokio::fs::create_dir_all(&self.working_directory)
            .await
            .map_err(|e| e.to_string())?;

        info!(
            "Executing command '{}' in working directory '{}'",
            command_line,
            self.working_directory.display()
        );

        let output = Command::new("sh")
            .arg("-c")
            .arg(command_line)
            .current_dir(&self.working_directory)
            .output()
            .await
            .map_err(|e| e.to_string())?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("Command exited with {}", output.status);
        Ok(format!("STDOUT:\n{}\nSTDERR:\n{}", stdout, stderr))
    }
}

#[async_trait::async_trait]
impl Module for ShModule {
    /// Returns the name of this module
    fn name(&self) -> &str {
        "sh"
    }

    async fn handle_action(&self, action: &str, params: &[String]) -> Result<String, String> {
        match action {
            "run" => {
                if params.is_empty() {
                    return Err("Missing command to run".into());
                }
                self.run_shell_command(&params.join(" ")).await
            }
            _ => Err(format!("Unknown action '{}'", action)),
        }
    }

    fn get_actions(&self) -> Vec<ModuleAction> {
        vec![ModuleAction {
            name: "run".into(),
            arg_count: 1,
            description: format!(
                "Run a shell command line in the workspace '{}'. Usage: sh run <command line>",
                self.working_directory.display()
            ),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn runs_inside_workspace_and_captures_both_streams() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "").unwrap();
        let cwd_before = std::env::current_dir().unwrap();

        let module = ShModule::new(dir.path());
        let output = module
            .run_shell_command("ls; echo oops 1>&2")
            .await
            .unwrap();

        assert!(output.starts_with("STDOUT:\n"));
        assert!(output.contains("marker.txt"));
        assert!(output.contains("STDERR:\noops"));
        assert_eq!(std::env::current_dir().unwrap(), cwd_before);
    }

    #[tokio::test]
    async fn creates_missing_workspace() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path().join("workspace");
        let module = ShModule::new(&workspace);

        module
            .handle_action("run", &["touch".to_string(), "made.txt".to_string()])
            .await
            .unwrap();
        assert!(workspace.join("made.txt").is_file());
    }

    #[tokio::test]
    async fn run_requires_a_command() {
        let dir = TempDir::new().unwrap();
        let module = ShModule::new(dir.path());
        assert_eq!(
            module.handle_action("run", &[]).await,
            Err("Missing command to run".to_string())
        );
    }
}
