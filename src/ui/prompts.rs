//! Interactive prompts.

use console::Term;
use dialoguer::Input;

use crate::error::{IntuneError, Result};

use super::Prompt;

fn map_dialoguer_err(e: dialoguer::Error) -> IntuneError {
    IntuneError::Io(e.into())
}

/// Prompt the user on `term` for a line of text.
///
/// Empty answers are returned as-is; callers decide whether empty is valid.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<String> {
    Input::<String>::new()
        .with_prompt(&prompt.question)
        .allow_empty(true)
        .interact_on(term)
        .map_err(map_dialoguer_err)
}
