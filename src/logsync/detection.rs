//! Detection half of the log synchronisation.
//!
//! Only reads metadata. Nothing here creates, opens for writing or removes a
//! file, including the activity log.

use crate::config::LogSyncSettings;
use crate::error::Result;
use crate::logsync::record::LogFileRecord;

/// Outcome of checking the monitored logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// The source directory does not exist; there is nothing to collect.
    SourceMissing,
    /// Every monitored file that exists has an up-to-date copy.
    InSync,
    /// The first file found whose copy is missing or stale.
    Stale(LogFileRecord),
}

impl SyncStatus {
    /// Whether detection passes (exit 0).
    pub fn is_compliant(&self) -> bool {
        !matches!(self, SyncStatus::Stale(_))
    }
}

/// Check whether any monitored log needs copying.
pub fn detect(settings: &LogSyncSettings) -> Result<SyncStatus> {
    if !settings.source_dir.is_dir() {
        tracing::debug!(
            "Source directory {} does not exist",
            settings.source_dir.display()
        );
        return Ok(SyncStatus::SourceMissing);
    }

    for name in &settings.files {
        let Some(record) = LogFileRecord::inspect(settings, name)? else {
            tracing::debug!("{} not present in source, skipping", name);
            continue;
        };
        if record.needs_remediation() {
            return Ok(SyncStatus::Stale(record));
        }
    }

    Ok(SyncStatus::InSync)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_source_dir_is_compliant() {
        let temp = TempDir::new().unwrap();
        let settings = LogSyncSettings {
            source_dir: temp.path().join("absent"),
            destination_dir: temp.path().join("dst"),
            ..Default::default()
        };

        let status = detect(&settings).unwrap();

        assert_eq!(status, SyncStatus::SourceMissing);
        assert!(status.is_compliant());
        assert!(!settings.destination_dir.exists());
    }

    #[test]
    fn empty_source_dir_is_in_sync() {
        let temp = TempDir::new().unwrap();
        let settings = LogSyncSettings {
            source_dir: temp.path().to_path_buf(),
            destination_dir: temp.path().join("dst"),
            ..Default::default()
        };
        assert_eq!(detect(&settings).unwrap(), SyncStatus::InSync);
    }

    #[test]
    fn first_stale_file_is_reported() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("install.log"), "a").unwrap();
        fs::write(src.join("updates.log"), "b").unwrap();
        let settings = LogSyncSettings {
            source_dir: src,
            destination_dir: temp.path().join("dst"),
            ..Default::default()
        };

        match detect(&settings).unwrap() {
            SyncStatus::Stale(record) => assert_eq!(record.name, "install.log"),
            other => panic!("Expected Stale, got {:?}", other),
        }
    }
}
