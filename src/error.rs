//! Error types for intune-winget operations.
//!
//! This module defines [`IntuneError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Expected negative outcomes (tool missing, log out of date) are not
//!   errors; they are reported through compliance results and exit codes
//! - Use `IntuneError` for failures that need distinct handling
//! - Use `anyhow::Error` (via `IntuneError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for intune-winget operations.
#[derive(Debug, Error)]
pub enum IntuneError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A version string could not be parsed.
    #[error("Invalid version '{input}': {message}")]
    InvalidVersion { input: String, message: String },

    /// The winget executable could not be located.
    #[error("winget executable not found (searched: {searched})")]
    ToolNotFound { searched: String },

    /// External command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// External command could not be started at all.
    #[error("Failed to start {command}: {source}")]
    CommandSpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The source log directory is missing during remediation.
    #[error("Source log directory does not exist: {path}")]
    SourceDirMissing { path: PathBuf },

    /// A catalog identifier was not present in winget output.
    #[error("Package '{id}' not found in catalog")]
    PackageNotFound { id: String },

    /// Detection script template could not be rendered.
    #[error("Template error: {message}")]
    TemplateError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for intune-winget operations.
pub type Result<T> = std::result::Result<T, IntuneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_displays_path() {
        let err = IntuneError::ConfigNotFound {
            path: PathBuf::from("/foo/intune-winget.yml"),
        };
        assert!(err.to_string().contains("/foo/intune-winget.yml"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = IntuneError::ConfigParseError {
            path: PathBuf::from("/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn invalid_version_displays_input() {
        let err = IntuneError::InvalidVersion {
            input: "1.x".into(),
            message: "segment 'x' is not numeric".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("1.x"));
        assert!(msg.contains("not numeric"));
    }

    #[test]
    fn tool_not_found_lists_search_locations() {
        let err = IntuneError::ToolNotFound {
            searched: "C:\\a\\winget.exe, C:\\b\\winget.exe".into(),
        };
        assert!(err.to_string().contains("C:\\b\\winget.exe"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = IntuneError::CommandFailed {
            command: "winget --version".into(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("winget --version"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn command_spawn_failed_keeps_os_message() {
        let err = IntuneError::CommandSpawnFailed {
            command: "winget --version".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("winget --version"));
        assert!(msg.contains("Permission denied"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn source_dir_missing_displays_path() {
        let err = IntuneError::SourceDirMissing {
            path: PathBuf::from("/logs"),
        };
        assert!(err.to_string().contains("/logs"));
    }

    #[test]
    fn package_not_found_displays_id() {
        let err = IntuneError::PackageNotFound {
            id: "7zip.7zip".into(),
        };
        assert!(err.to_string().contains("7zip.7zip"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: IntuneError = io_err.into();
        assert!(matches!(err, IntuneError::Io(_)));
    }

    #[test]
    fn anyhow_error_converts() {
        let err: IntuneError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, IntuneError::Other(_)));
        assert_eq!(err.to_string(), "boom");
    }
}
