//! Code-execution modules the execution agent may call on the model's request

mod module_manager;
mod python_module;
mod sh_module;

pub use module_manager::*;
pub use python_module::*;
pub use sh_module::*;

pub struct ModuleAction {
    pub name: String,
    pub arg_count: usize,
    pub description: String,
}

impl std::fmt::Display for ModuleAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} args) - {}", self.name, self.arg_count, self.description)
    }
}

#[async_trait::async_trait]
pub trait Module: std::fmt::Debug + Send + Sync {
    fn name(&self) -> &str;
    async fn handle_action(&self, action: &str, params: &[String]) -> Result<String, String>;
    fn get_actions(&self) -> Vec<ModuleAction>;
}
