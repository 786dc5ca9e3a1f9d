//! Command-line interface for intune-winget.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    AppCommand, AppDetectArgs, Cli, Commands, CompletionsArgs, GenerateArgs, LogsCommand,
    WingetArgs, WingetCommand,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
