//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{AppCommand, Cli, Commands, LogsCommand, WingetCommand};
use crate::config::Config;
use crate::error::Result;
use crate::shell::{SystemRunner, ToolRunner};
use crate::ui::UserInterface;

use super::app::{AppDetectCommand, AppGenerateCommand};
use super::completions::CompletionsCommand;
use super::logs::{LogsDetectCommand, LogsRemediateCommand};
use super::winget::{WingetDetectCommand, WingetRemediateCommand};

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// Expected negative outcomes (non-compliance, package not found) come
    /// back as a failed [`CommandResult`]; `Err` is for unexpected failures.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Success or failure with exit code 1.
    pub fn from_bool(ok: bool) -> Self {
        if ok {
            Self::success()
        } else {
            Self::failure(1)
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    config: Config,
    runner: Box<dyn ToolRunner>,
}

impl CommandDispatcher {
    /// Create a dispatcher that runs real processes.
    pub fn new(config: Config) -> Self {
        Self::with_runner(config, Box::new(SystemRunner))
    }

    /// Create a dispatcher with a custom process runner.
    pub fn with_runner(config: Config, runner: Box<dyn ToolRunner>) -> Self {
        Self { config, runner }
    }

    /// The loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let runner = self.runner.as_ref();
        match &cli.command {
            Commands::Winget(WingetCommand::Detect(args)) => {
                WingetDetectCommand::new(&self.config.winget, args.clone(), runner).execute(ui)
            }
            Commands::Winget(WingetCommand::Remediate(args)) => {
                WingetRemediateCommand::new(&self.config.winget, args.clone(), runner).execute(ui)
            }
            Commands::Logs(LogsCommand::Detect) => {
                LogsDetectCommand::new(&self.config.logs).execute(ui)
            }
            Commands::Logs(LogsCommand::Remediate) => {
                LogsRemediateCommand::new(&self.config.logs).execute(ui)
            }
            Commands::App(AppCommand::Generate(args)) => {
                AppGenerateCommand::new(&self.config, args.clone(), runner).execute(ui)
            }
            Commands::App(AppCommand::Detect(args)) => {
                AppDetectCommand::new(&self.config.winget, args.clone(), runner).execute(ui)
            }
            Commands::Completions(args) => CompletionsCommand::new(args.clone()).execute(ui),
        }
    }
}
