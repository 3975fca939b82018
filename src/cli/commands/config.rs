use anyhow::Result;
use clap::Args;

use mvvm_navigation::config::NavigationConfig;

#[derive(Args)]
pub struct ConfigCommands {
    /// Print the config file location instead of its contents
    #[arg(long)]
    pub path: bool,
}

pub fn handle_config_command(args: ConfigCommands, config: &NavigationConfig) -> Result<()> {
    if args.path {
        println!("{}", NavigationConfig::get_config_path()?.display());
        return Ok(());
    }

    print!("{}", config.to_toml()?);
    Ok(())
}
