//! intune-winget - Intune detection and remediation utilities for winget.
//!
//! One binary replaces the loose PowerShell scripts usually deployed next to
//! Winget-AutoUpdate: a winget presence/version check with its provisioning
//! remediation, a log synchroniser that feeds Intune log collection, and a
//! generator for per-application detection scripts.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, defaults and validation
//! - [`error`] - Error types and result aliases
//! - [`generator`] - Detection script generation
//! - [`logging`] - Console tracing and rotating log files
//! - [`logsync`] - Log synchronisation detection and remediation
//! - [`shell`] - External process execution
//! - [`ui`] - Prompts, spinners, and terminal output
//! - [`winget`] - Locating, checking and provisioning winget
//!
//! # Example
//!
//! ```
//! use intune_winget::winget::Version;
//!
//! let found = Version::from_tool_output("v1.8.1911\r\n").unwrap();
//! let required: Version = "1.7.11132".parse().unwrap();
//! assert!(found >= required);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod logsync;
pub mod shell;
pub mod ui;
pub mod winget;

pub use error::{IntuneError, Result};
