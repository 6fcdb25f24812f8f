use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "idlelock",
    about = "Keep one idle-triggered screen locker running in the background"
)]
#[command(version, propagate_version = true, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the idle locker, replacing any running instance
    Start,
    /// Stop the idle locker
    Stop,
    /// Report whether the idle locker is running
    Status,
    /// Inspect configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start => commands::start::run(),
        Commands::Stop => commands::stop::run(),
        Commands::Status => commands::status::run(),
        Commands::Config(args) => commands::config::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_lifecycle_subcommands() {
        for (arg, expected) in [("start", "start"), ("stop", "stop"), ("status", "status")] {
            let cli = Cli::try_parse_from(["idlelock", arg]).unwrap();
            let name = match cli.command {
                Commands::Start => "start",
                Commands::Stop => "stop",
                Commands::Status => "status",
                Commands::Config(_) => "config",
            };
            assert_eq!(name, expected);
        }
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["idlelock"]).is_err());
    }

    #[test]
    fn test_unknown_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["idlelock", "restart"]).is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["idlelock", "status", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
