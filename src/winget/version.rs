//! Dotted numeric version strings.
//!
//! winget reports versions like `v1.7.11132`. Versions are compared segment
//! by segment as integers; a missing trailing segment counts as zero, so
//! `1.7` equals `1.7.0`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{IntuneError, Result};

/// A parsed dotted numeric version.
#[derive(Debug, Clone, Eq)]
pub struct Version {
    segments: Vec<u64>,
}

impl Version {
    /// Parse a version string such as `1.7.11132`.
    ///
    /// Rejects empty input, empty segments (`1..2`) and non-numeric
    /// segments (`1.x`).
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid(input, "empty version"));
        }

        let mut segments = Vec::new();
        for part in trimmed.split('.') {
            if part.is_empty() {
                return Err(invalid(input, "empty segment"));
            }
            let value = part
                .parse::<u64>()
                .map_err(|_| invalid(input, &format!("segment '{}' is not numeric", part)))?;
            segments.push(value);
        }

        Ok(Self { segments })
    }

    /// Parse the output of `winget --version`.
    ///
    /// Strips surrounding whitespace and the leading `v` prefix.
    pub fn from_tool_output(output: &str) -> Result<Self> {
        let trimmed = output.trim();
        let without_prefix = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        Self::parse(without_prefix)
    }

    /// The numeric segments of this version.
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    fn segment(&self, index: usize) -> u64 {
        self.segments.get(index).copied().unwrap_or(0)
    }
}

fn invalid(input: &str, message: &str) -> IntuneError {
    IntuneError::InvalidVersion {
        input: input.to_string(),
        message: message.to_string(),
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| self.segment(i).cmp(&other.segment(i)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl FromStr for Version {
    type Err = IntuneError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.segments.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}
