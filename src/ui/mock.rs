//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use intune_winget::ui::{MockUI, Prompt, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("app_id", "7zip.7zip");
//!
//! let answer = ui.prompt(&Prompt::input("app_id", "Identifier")).unwrap();
//! ui.success("Generated");
//!
//! assert_eq!(answer, "7zip.7zip");
//! assert!(ui.successes().contains(&"Generated".to_string()));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{IntuneError, Result};

use super::{OutputMode, Prompt, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    details: Vec<String>,
    spinners: Rc<RefCell<Vec<String>>>,
    prompt_responses: HashMap<String, String>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set a response for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warnings.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured errors.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get captured detail lines (recorded in verbose mode only).
    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// Spinner start and finish messages, in order.
    pub fn spinner_messages(&self) -> Vec<String> {
        self.spinners.borrow().clone()
    }

    /// Keys of prompts that were shown.
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    /// Check if any error contains `text`.
    pub fn has_error(&self, text: &str) -> bool {
        self.errors.iter().any(|e| e.contains(text))
    }
}

impl UserInterface for MockUI {
    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn detail(&mut self, msg: &str) {
        if self.mode.shows_details() {
            self.details.push(msg.to_string());
        }
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<String> {
        self.prompts_shown.push(prompt.key.clone());

        self.prompt_responses
            .get(&prompt.key)
            .cloned()
            .ok_or_else(|| IntuneError::ConfigValidationError {
                message: format!("No mock response for prompt '{}'", prompt.key),
            })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.borrow_mut().push(message.to_string());
        Box::new(MockSpinner {
            log: Rc::clone(&self.spinners),
        })
    }
}

/// Spinner that records its final message into the owning [`MockUI`].
pub struct MockSpinner {
    log: Rc<RefCell<Vec<String>>>,
}

impl SpinnerHandle for MockSpinner {
    fn finish_success(&mut self, msg: &str) {
        self.log.borrow_mut().push(format!("✓ {}", msg));
    }

    fn finish_error(&mut self, msg: &str) {
        self.log.borrow_mut().push(format!("✗ {}", msg));
    }
}
