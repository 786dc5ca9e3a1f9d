//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Intune detection and remediation utilities for winget.
///
/// Every subcommand exits 0 when compliant or successful and 1 otherwise.
#[derive(Debug, Parser)]
#[command(name = "intune-winget")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (default: intune-winget.yml next to the executable)
    #[arg(short, long, global = true, env = "INTUNE_WINGET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check or provision winget itself
    #[command(subcommand)]
    Winget(WingetCommand),

    /// Copy Winget-AutoUpdate logs into the Intune log directory
    #[command(subcommand)]
    Logs(LogsCommand),

    /// Per-application detection scripts
    #[command(subcommand)]
    App(AppCommand),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// `winget` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum WingetCommand {
    /// Exit 0 if winget is runnable and at least the minimum version
    Detect(WingetArgs),

    /// Provision the latest winget release for all users, then detect again
    Remediate(WingetArgs),
}

/// Arguments shared by the `winget` subcommands.
#[derive(Debug, Clone, Default, Args)]
pub struct WingetArgs {
    /// Minimum acceptable version (overrides winget.min_version)
    #[arg(long, value_name = "VERSION")]
    pub min_version: Option<String>,
}

/// `logs` subcommands.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum LogsCommand {
    /// Exit 1 if any monitored log has a missing or outdated copy
    Detect,

    /// Copy the monitored logs into the destination directory
    Remediate,
}

/// `app` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum AppCommand {
    /// Write Detect-<name>.ps1 for a catalog identifier
    Generate(GenerateArgs),

    /// Exit 0 if a package with this exact identifier is installed
    Detect(AppDetectArgs),
}

/// Arguments for `app generate`.
#[derive(Debug, Clone, Default, Args)]
pub struct GenerateArgs {
    /// winget catalog identifier, e.g. 7zip.7zip (prompted if omitted)
    pub id: Option<String>,

    /// Directory for the generated script (default: next to the executable)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for `app detect`.
#[derive(Debug, Clone, Args)]
pub struct AppDetectArgs {
    /// winget catalog identifier to look for
    pub id: String,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_winget_detect_with_min_version() {
        let cli = Cli::try_parse_from(["intune-winget", "winget", "detect", "--min-version", "1.8"])
            .unwrap();
        match cli.command {
            Commands::Winget(WingetCommand::Detect(args)) => {
                assert_eq!(args.min_version.as_deref(), Some("1.8"))
            }
            other => panic!("Expected winget detect, got {:?}", other),
        }
    }

    #[test]
    fn parses_logs_remediate() {
        let cli = Cli::try_parse_from(["intune-winget", "logs", "remediate"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Logs(LogsCommand::Remediate)
        ));
    }

    #[test]
    fn app_generate_id_is_optional() {
        let cli = Cli::try_parse_from(["intune-winget", "app", "generate"]).unwrap();
        match cli.command {
            Commands::App(AppCommand::Generate(args)) => assert!(args.id.is_none()),
            other => panic!("Expected app generate, got {:?}", other),
        }
    }

    #[test]
    fn app_detect_requires_id() {
        assert!(Cli::try_parse_from(["intune-winget", "app", "detect"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "intune-winget",
            "logs",
            "detect",
            "--quiet",
            "--config",
            "custom.yml",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("custom.yml")));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["intune-winget"]).is_err());
    }
}
