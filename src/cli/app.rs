use super::commands::{ConfigCommands, DemoCommands};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mvvm-nav")]
#[command(about = "Drive a view/view-model navigation coordinator from the command line")]
pub struct Cli {
    /// Read configuration from this file instead of the user config directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scripted navigation session and print its transitions
    Demo(DemoCommands),
    /// Show the effective configuration
    Config(ConfigCommands),
}
