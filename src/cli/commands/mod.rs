pub mod config;
pub mod demo;

pub use config::{ConfigCommands, handle_config_command};
pub use demo::{DemoCommands, handle_demo_command};
