//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for nivex using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Nivex - snow raster export orchestration
#[derive(Parser, Debug)]
#[command(name = "nivex")]
#[command(version, about, long_about = None)]
#[command(author = "Nivex Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "nivex.toml", env = "NIVEX_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "NIVEX_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the export: reconcile, submit and track remote jobs
    Export(commands::export::ExportArgs),

    /// Compute and print the export plan without submitting anything
    Plan(commands::plan::PlanArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["nivex", "export"]);
        assert_eq!(cli.config, "nivex.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["nivex", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["nivex", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_plan() {
        let cli = Cli::parse_from(["nivex", "plan"]);
        assert!(matches!(cli.command, Commands::Plan(_)));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["nivex", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["nivex", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_cli_parse_export_overrides() {
        let cli = Cli::parse_from([
            "nivex",
            "export",
            "--yes",
            "--periods",
            "2024-01-01,2024-02-01",
            "--destinations",
            "gee",
        ]);
        match cli.command {
            Commands::Export(args) => {
                assert!(args.yes);
                assert_eq!(args.periods.as_deref(), Some("2024-01-01,2024-02-01"));
                assert_eq!(args.destinations.as_deref(), Some("gee"));
            }
            _ => panic!("expected export command"),
        }
    }
}
