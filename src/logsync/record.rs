//! Per-file state of a monitored log.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::LogSyncSettings;
use crate::error::Result;

/// A monitored log file and its copy in the destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileRecord {
    /// Monitored file name, e.g. `install.log`.
    pub name: String,
    /// Path in the source directory.
    pub source: PathBuf,
    /// Prefixed path in the destination directory.
    pub destination: PathBuf,
    /// Modification time of the source file.
    pub source_modified: SystemTime,
    /// Modification time of the destination copy, if it exists.
    pub destination_modified: Option<SystemTime>,
}

impl LogFileRecord {
    /// Read the current state of `name`.
    ///
    /// Returns `Ok(None)` when the source file does not exist. Only metadata
    /// is read; nothing is created or opened for writing.
    pub fn inspect(settings: &LogSyncSettings, name: &str) -> Result<Option<Self>> {
        let source = settings.source_dir.join(name);
        let Some(source_modified) = modified(&source)? else {
            return Ok(None);
        };

        let destination = destination_path(settings, name);
        let destination_modified = modified(&destination)?;

        Ok(Some(Self {
            name: name.to_string(),
            source,
            destination,
            source_modified,
            destination_modified,
        }))
    }

    /// Whether the destination copy is missing or older than the source.
    pub fn needs_remediation(&self) -> bool {
        match self.destination_modified {
            None => true,
            Some(dest) => self.source_modified > dest,
        }
    }
}

/// `<destination_dir>/<prefix><name>`
pub fn destination_path(settings: &LogSyncSettings, name: &str) -> PathBuf {
    settings
        .destination_dir
        .join(format!("{}{}", settings.prefix, name))
}

fn modified(path: &Path) -> Result<Option<SystemTime>> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(Some(meta.modified()?)),
        Ok(_) => Ok(None),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
