//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations and hands each one the part of the
//! loaded configuration it needs.

pub mod app;
pub mod completions;
pub mod dispatcher;
pub mod logs;
pub mod winget;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
