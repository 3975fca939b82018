pub mod handler;
pub mod pages;

use clap::{Args, ValueEnum};

pub use handler::handle_demo_command;

#[derive(Args)]
pub struct DemoCommands {
    /// Output format for the recorded transitions
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain, help = "Output format")]
    pub format: OutputFormat,

    /// Override the simulated transition delay
    #[arg(long, help = "Transition delay in milliseconds")]
    pub delay_ms: Option<u64>,

    /// Disable analytics for the run
    #[arg(long, help = "Run without recording transitions")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable, one transition per line (default)
    Plain,
    /// One JSON object per line
    Json,
}
