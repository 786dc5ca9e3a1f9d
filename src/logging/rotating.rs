//! Size-capped, timestamped plain-text log files.
//!
//! These are the files Intune log collection picks up, so entries are plain
//! lines (`2024-05-01 13:37:00 - message`) rather than structured events.
//! Each entry is also emitted through `tracing` so it shows up on the console
//! during an interactive run.
//!
//! Appending is a fixed sequence: check the size, clear the file if it is over
//! the threshold and record a rotation notice, then write the entry. The notice
//! is written directly and never re-enters the size check.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;

/// Timestamp format for log lines.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Severity shown on the console mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// An append-only log file that is cleared once it exceeds `max_bytes`.
#[derive(Debug, Clone)]
pub struct RotatingLog {
    path: PathBuf,
    max_bytes: u64,
}

impl RotatingLog {
    /// Create a log writing to `path`, rotated above `max_bytes`.
    pub fn new(path: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            path: path.into(),
            max_bytes,
        }
    }

    /// Get the log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an entry, rotating first if the file is over the threshold.
    ///
    /// Returns whether a rotation happened.
    pub fn append(&self, message: &str) -> Result<bool> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let rotated = self.rotate_if_oversized()?;
        if rotated {
            self.write_line(&format!(
                "Log file exceeded {} bytes and was cleared",
                self.max_bytes
            ))?;
        }
        self.write_line(message)?;
        Ok(rotated)
    }

    /// Log at info level.
    pub fn info(&self, message: &str) {
        self.record(Level::Info, message);
    }

    /// Log at warn level.
    pub fn warn(&self, message: &str) {
        self.record(Level::Warn, message);
    }

    /// Log at error level.
    pub fn error(&self, message: &str) {
        self.record(Level::Error, message);
    }

    /// Mirror to tracing and append to the file.
    ///
    /// A failure to write the file is reported through tracing only; losing a
    /// log line must not change the outcome of the operation being logged.
    pub fn record(&self, level: Level, message: &str) {
        match level {
            Level::Info => tracing::info!("{}", message),
            Level::Warn => tracing::warn!("{}", message),
            Level::Error => tracing::error!("{}", message),
        }

        let line = match level {
            Level::Info => message.to_string(),
            Level::Warn => format!("WARNING: {}", message),
            Level::Error => format!("ERROR: {}", message),
        };

        if let Err(e) = self.append(&line) {
            tracing::warn!("Could not write to {}: {}", self.path.display(), e);
        }
    }

    fn rotate_if_oversized(&self) -> Result<bool> {
        let size = match fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(_) => return Ok(false),
        };
        if size <= self.max_bytes {
            return Ok(false);
        }
        File::create(&self.path)?;
        Ok(true)
    }

    fn write_line(&self, message: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", format_line(message))?;
        Ok(())
    }
}

/// Format one log line with the current local time.
pub fn format_line(message: &str) -> String {
    format!("{} - {}", Local::now().format(TIMESTAMP_FORMAT), message)
}
