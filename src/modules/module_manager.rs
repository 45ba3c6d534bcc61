use crate::modules::{Module, PythonModule, ShModule};
use std::path::Path;
use tracing::debug;

/// Holds the code-execution modules bound to one workspace directory
#[derive(Debug)]
pub struct ModulesManager {
    /// Vector containing the loaded module instances
    pub modules: Vec<Box<dyn Module>>,
}

impl ModulesManager {
    /// Creates the python and shell modules, both confined to `working_directory`
    pub fn new(working_directory: &Path) -> Self {
        let modules = vec![
            Box::new(PythonModule::new(working_directory)) as Box<dyn Module>,
            Box::new(ShModule::new(working_directory)) as Box<dyn Module>,
        ];
        debug!("Loaded modules: {:?}", modules);
        ModulesManager { modules }
    }

    /// Retrieves a reference to a loaded module by its name
    pub fn get_module(&self, name: &str) -> Option<&dyn Module> {
        self.modules.iter().find(|m| m.name() == name).map(|m| &**m)
    }

    /// Lists every module and action in the form shown to the model
    pub fn describe(&self) -> String {
        let mut description =
            String::from("You have access to the following modules and their actions:\n");
        for m in self.modules.iter() {
            description.push_str(&format!("Module '{}':\n", m.name()));
            for act in m.get_actions() {
                description.push_str(&format!("- {}\n", act));
            }
        }
        description
    }

    /// Runs `action` on the named module, turning every failure into text for the result
    pub async fn dispatch(&self, module_name: &str, action: &str, params: &[String]) -> String {
        match self.get_module(module_name) {
            Some(module) => match module.handle_action(action, params).await {
                Ok(output) => output,
                Err(e) => {
                    let available = module
                        .get_actions()
                        .iter()
                        .map(|a| a.to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!(
                        "Error: module {} action '{}' failed: {}. Available actions: {}",
                        module_name, action, e, available
                    )
                }
            },
            None => format!(
                "Error: module '{}' not found. Available modules: {}",
                module_name,
                self.modules
                    .iter()
                    .map(|m| m.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn describes_python_and_shell_actions() {
        let dir = TempDir::new().unwrap();
        let manager = ModulesManager::new(dir.path());
        let description = manager.describe();
        assert!(description.contains("Module 'python':"));
        assert!(description.contains("Module 'sh':"));
        assert!(description.contains("- run (1 args)"));
    }

    #[tokio::test]
    async fn unknown_module_is_reported_as_text() {
        let dir = TempDir::new().unwrap();
        let manager = ModulesManager::new(dir.path());
        let output = manager.dispatch("ssh", "connect", &[]).await;
        assert_eq!(
            output,
            "Error: module 'ssh' not found. Available modules: python, sh"
        );
    }

    #[tokio::test]
    async fn unknown_action_lists_alternatives() {
        let dir = TempDir::new().unwrap();
        let manager = ModulesManager::new(dir.path());
        let output = manager.dispatch("sh", "exec", &["ls".to_string()]).await;
        assert!(output.starts_with("Error: module sh action 'exec' failed: Unknown action 'exec'"));
        assert!(output.contains("Available actions: run"));
    }
}
