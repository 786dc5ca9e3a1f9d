//! Remediation half of the log synchronisation.
//!
//! Copies each monitored log to `<destination>/<prefix><name>`, overwriting
//! the previous copy. Every step goes to the activity log in the destination
//! directory.

use std::fs;

use crate::config::LogSyncSettings;
use crate::error::{IntuneError, Result};
use crate::logging::RotatingLog;
use crate::logsync::record::destination_path;

/// What a remediation run did, per file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Files copied.
    pub copied: Vec<String>,
    /// Files absent from the source directory.
    pub skipped: Vec<String>,
    /// Files whose copy failed, with the error text.
    pub failed: Vec<(String, String)>,
}

impl SyncReport {
    /// Whether every present file was copied.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Copy the monitored logs into the destination directory.
///
/// A missing source directory is an error: detection reports compliant in
/// that case, so remediation should never have been triggered. A single
/// failed copy does not stop the remaining files; it is recorded in the
/// report instead.
pub fn remediate(settings: &LogSyncSettings, log: &RotatingLog) -> Result<SyncReport> {
    if !settings.source_dir.is_dir() {
        log.error(&format!(
            "Source directory {} does not exist; detection should not have requested remediation",
            settings.source_dir.display()
        ));
        return Err(IntuneError::SourceDirMissing {
            path: settings.source_dir.clone(),
        });
    }

    if !settings.destination_dir.is_dir() {
        fs::create_dir_all(&settings.destination_dir)?;
        log.info(&format!(
            "Created destination directory {}",
            settings.destination_dir.display()
        ));
    }

    let mut report = SyncReport::default();

    for name in &settings.files {
        let source = settings.source_dir.join(name);
        if !source.is_file() {
            log.info(&format!("{} not found in source directory, skipping", name));
            report.skipped.push(name.clone());
            continue;
        }

        let destination = destination_path(settings, name);
        match fs::copy(&source, &destination) {
            Ok(bytes) => {
                log.info(&format!(
                    "Copied {} to {} ({} bytes)",
                    source.display(),
                    destination.display(),
                    bytes
                ));
                report.copied.push(name.clone());
            }
            Err(e) => {
                log.error(&format!(
                    "Failed to copy {} to {}: {}",
                    source.display(),
                    destination.display(),
                    e
                ));
                report.failed.push((name.clone(), e.to_string()));
            }
        }
    }

    Ok(report)
}
