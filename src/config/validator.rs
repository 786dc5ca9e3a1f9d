//! Configuration validation.

use crate::config::schema::Config;
use crate::error::{IntuneError, Result};
use crate::winget::Version;

fn invalid(message: impl Into<String>) -> IntuneError {
    IntuneError::ConfigValidationError {
        message: message.into(),
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}

/// Validate a loaded configuration.
///
/// Checks that values the components rely on are usable: a parseable minimum
/// version, at least one search path and monitored file, and plain file names
/// (no directory separators) wherever a name is joined onto a directory.
pub fn validate(config: &Config) -> Result<()> {
    Version::parse(&config.winget.min_version)
        .map_err(|e| invalid(format!("winget.min_version: {}", e)))?;

    if config.winget.search_paths.is_empty() {
        return Err(invalid("winget.search_paths must not be empty"));
    }

    if config.logs.files.is_empty() {
        return Err(invalid("logs.files must list at least one file"));
    }

    for name in &config.logs.files {
        if !is_plain_file_name(name) {
            return Err(invalid(format!(
                "logs.files entry '{}' must be a plain file name",
                name
            )));
        }
    }

    if config.logs.prefix.is_empty() {
        return Err(invalid(
            "logs.prefix must not be empty (copies would overwrite unrelated logs)",
        ));
    }

    if !is_plain_file_name(&config.logs.collector_log) {
        return Err(invalid("logs.collector_log must be a plain file name"));
    }

    if config.logs.max_log_bytes == 0 || config.winget.max_log_bytes == 0 {
        return Err(invalid("max_log_bytes must be greater than zero"));
    }

    Ok(())
}
