//! Non-interactive UI for agent, CI and piped runs.

use std::collections::HashMap;

use crate::error::{IntuneError, Result};

use super::{OutputMode, Prompt, SpinnerHandle, UserInterface};

/// Environment variable prefix that answers prompts without a terminal.
///
/// `INTUNE_WINGET_PROMPT_APP_ID=7zip.7zip` answers the `app_id` prompt.
pub const PROMPT_ENV_PREFIX: &str = "INTUNE_WINGET_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Output is plain text. Prompts are answered from environment overrides and
/// fail otherwise.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI reading overrides from the environment.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn detail(&mut self, msg: &str) {
        if self.mode.shows_details() {
            println!("  {}", msg);
        }
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<String> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        self.env_overrides
            .get(&env_key)
            .cloned()
            .ok_or_else(|| IntuneError::ConfigValidationError {
                message: format!(
                    "Cannot prompt for '{}' in non-interactive mode (set {})",
                    prompt.key, env_key
                ),
            })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(LineSpinner { mode: self.mode })
    }
}

/// Spinner stand-in that prints the final state as a line.
struct LineSpinner {
    mode: OutputMode,
}

impl SpinnerHandle for LineSpinner {
    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ui_with(pairs: &[(&str, &str)]) -> NonInteractiveUI {
        let overrides = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NonInteractiveUI::with_overrides(OutputMode::Quiet, overrides)
    }

    #[test]
    fn env_override_answers_input() {
        let mut ui = ui_with(&[("INTUNE_WINGET_PROMPT_APP_ID", "7zip.7zip")]);
        let result = ui.prompt(&Prompt::input("app_id", "Identifier")).unwrap();
        assert_eq!(result, "7zip.7zip");
    }

    #[test]
    fn missing_answer_fails() {
        let mut ui = ui_with(&[]);
        let err = ui
            .prompt(&Prompt::input("app_id", "Identifier"))
            .unwrap_err();
        assert!(err.to_string().contains("INTUNE_WINGET_PROMPT_APP_ID"));
    }
}
