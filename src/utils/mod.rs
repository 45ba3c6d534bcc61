pub mod display;
mod logging;

pub use logging::init_logging;
