//! External process execution and platform detection.

pub mod command;
pub mod platform;

pub use command::{
    display_command, execute, powershell_path, CommandResult, SystemRunner, ToolRunner,
};
pub use platform::{groups_indicate_elevation, is_ci, is_elevated};
