//! `${name}` placeholders in embedded templates.
//!
//! # Syntax
//!
//! - `${name}` - replaced with the value of `name`
//! - `$${name}` - literal `${name}` in output
//! - any other `$` is literal text
//!
//! Parsing is strict: an unterminated `${` or an empty or malformed name is
//! an error rather than literal text, so a broken template is caught before
//! anything is written.

use crate::error::{IntuneError, Result};

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Variable reference: ${name}
    Variable(String),
}

fn template_error(message: impl Into<String>) -> IntuneError {
    IntuneError::TemplateError {
        message: message.into(),
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse a template into literal and variable segments.
pub fn parse(input: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        literal.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(escaped) = after.strip_prefix("${") {
            literal.push_str("${");
            rest = escaped;
        } else if let Some(open) = after.strip_prefix('{') {
            let end = open.find('}').ok_or_else(|| {
                template_error(format!("Unterminated '${{' at byte {}", input.len() - rest.len() + pos))
            })?;
            let name = &open[..end];
            if !is_valid_name(name) {
                return Err(template_error(format!("Invalid variable name '{}'", name)));
            }
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Variable(name.to_string()));
            rest = &open[end + 1..];
        } else {
            literal.push('$');
            rest = after;
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Variable names referenced by parsed segments, in order of appearance.
pub fn variables(segments: &[Segment]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for segment in segments {
        if let Segment::Variable(name) = segment {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
    }
    names
}

/// Render segments, resolving each variable with `resolve`.
///
/// A variable `resolve` does not know is an error.
pub fn render<F>(segments: &[Segment], resolve: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Variable(name) => {
                let value = resolve(name)
                    .ok_or_else(|| template_error(format!("Unknown variable '{}'", name)))?;
                out.push_str(&value);
            }
        }
    }
    Ok(out)
}
