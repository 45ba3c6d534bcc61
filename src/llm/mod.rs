mod embedders;
mod llm_client;
mod message;
pub mod providers;
mod retry;

pub use embedders::*;
pub use llm_client::*;
pub use message::*;
pub use providers::CompletionRequest;
pub use retry::*;
