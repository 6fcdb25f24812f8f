use crate::config::{CONFIG_ENV_VAR, ConfigLoader};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (merged)
    Show,
    /// Show configuration and pid file paths
    Path,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(),
        ConfigCommands::Path => show_paths(),
    }
}

fn show_config() -> Result<()> {
    let config = ConfigLoader::load()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{}", toml_str);
    Ok(())
}

fn show_paths() -> Result<()> {
    println!("User config:     {}", ConfigLoader::user_config_path().display());
    match ConfigLoader::override_config_path() {
        Some(path) => println!("Override config: {}", path.display()),
        None => println!("Override config: ({} not set)", CONFIG_ENV_VAR),
    }
    let guard = ConfigLoader::load_guard()?;
    println!("Pid file:        {}", guard.pid_file.display());
    Ok(())
}
