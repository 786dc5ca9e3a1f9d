//! Console output and prompts.
//!
//! This module provides:
//! - [`UserInterface`] trait so commands never write to the terminal directly
//! - [`TerminalUI`] for an operator at a console
//! - [`NonInteractiveUI`] for Intune agent runs, CI and piped output
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use intune_winget::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.detail("searched C:\\Program Files\\WindowsApps");
//! ui.success("Done");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI};
pub use non_interactive::{NonInteractiveUI, PROMPT_ENV_PREFIX};
pub use output::OutputMode;
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, Theme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Shown in every mode.
    fn error(&mut self, msg: &str);

    /// Display a detail line (paths searched, commands run). Verbose only.
    fn detail(&mut self, msg: &str);

    /// Ask for a line of text.
    fn prompt(&mut self, prompt: &Prompt) -> Result<String>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);
}

/// A text prompt to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key, also used for the `INTUNE_WINGET_PROMPT_<KEY>` override.
    pub key: String,
    /// The question to display.
    pub question: String,
}

impl Prompt {
    /// Free-form text prompt.
    pub fn input(key: &str, question: &str) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
        }
    }
}
