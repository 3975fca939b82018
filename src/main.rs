use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use mvvm_navigation::config::NavigationConfig;

mod cli;

use cli::{Cli, Commands};
use cli::commands::{handle_config_command, handle_demo_command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => NavigationConfig::load_from(path)?,
        None => NavigationConfig::load()?,
    };

    let mut logger = env_logger::Builder::from_default_env();
    if let Some(log_path) = &config.log_file {
        // Truncated on each run
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)
            .with_context(|| format!("Failed to open log file: {:?}", log_path))?;
        logger.target(env_logger::Target::Pipe(Box::new(log_file)));
    }
    logger.init();

    info!("Starting mvvm-nav");

    match cli.command {
        Commands::Demo(args) => handle_demo_command(args, config).await,
        Commands::Config(args) => handle_config_command(args, &config),
    }
}
