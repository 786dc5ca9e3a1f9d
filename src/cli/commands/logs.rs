//! `logs detect` and `logs remediate`.

use crate::config::LogSyncSettings;
use crate::error::{IntuneError, Result};
use crate::logging::RotatingLog;
use crate::logsync::{detect, remediate, SyncStatus};
use crate::shell::is_elevated;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Read-only check of the monitored logs.
pub struct LogsDetectCommand<'a> {
    settings: &'a LogSyncSettings,
}

impl<'a> LogsDetectCommand<'a> {
    /// Create the command.
    pub fn new(settings: &'a LogSyncSettings) -> Self {
        Self { settings }
    }
}

impl Command for LogsDetectCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let status = detect(self.settings)?;
        match &status {
            SyncStatus::SourceMissing => ui.message(&format!(
                "{} does not exist; nothing to collect",
                self.settings.source_dir.display()
            )),
            SyncStatus::InSync => ui.success("Log copies are up to date"),
            SyncStatus::Stale(record) => ui.message(&format!(
                "{} needs to be copied to {}",
                record.source.display(),
                record.destination.display()
            )),
        }
        Ok(CommandResult::from_bool(status.is_compliant()))
    }
}

/// Copy the monitored logs, recording each step in the activity log.
pub struct LogsRemediateCommand<'a> {
    settings: &'a LogSyncSettings,
}

impl<'a> LogsRemediateCommand<'a> {
    /// Create the command.
    pub fn new(settings: &'a LogSyncSettings) -> Self {
        Self { settings }
    }
}

impl Command for LogsRemediateCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if !is_elevated() {
            ui.warning("Not running elevated; writing to the Intune log directory may fail");
        }

        let log = RotatingLog::new(
            self.settings.collector_log_path(),
            self.settings.max_log_bytes,
        );

        let report = match remediate(self.settings, &log) {
            Ok(report) => report,
            // Already recorded in the activity log.
            Err(IntuneError::SourceDirMissing { .. }) => return Ok(CommandResult::failure(1)),
            Err(e) => {
                log.error(&format!("Log collection failed: {}", e));
                return Ok(CommandResult::failure(1));
            }
        };

        for name in &report.copied {
            ui.detail(&format!("Copied {}", name));
        }
        for name in &report.skipped {
            ui.detail(&format!("Skipped {} (not present)", name));
        }
        for (name, error) in &report.failed {
            ui.detail(&format!("Failed {}: {}", name, error));
        }

        if report.is_success() {
            log.info(&format!(
                "Log collection completed: {} copied, {} skipped",
                report.copied.len(),
                report.skipped.len()
            ));
            Ok(CommandResult::success())
        } else {
            log.error(&format!(
                "Log collection finished with {} failed copies",
                report.failed.len()
            ));
            Ok(CommandResult::failure(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{MockUI, OutputMode};
    use std::fs;
    use tempfile::TempDir;

    fn settings(temp: &TempDir) -> LogSyncSettings {
        LogSyncSettings {
            source_dir: temp.path().join("src"),
            destination_dir: temp.path().join("dst"),
            ..Default::default()
        }
    }

    #[test]
    fn detect_then_remediate_then_detect() {
        let temp = TempDir::new().unwrap();
        let settings = settings(&temp);
        fs::create_dir_all(&settings.source_dir).unwrap();
        fs::write(settings.source_dir.join("install.log"), "x").unwrap();
        let mut ui = MockUI::new();

        let first = LogsDetectCommand::new(&settings).execute(&mut ui).unwrap();
        let fix = LogsRemediateCommand::new(&settings).execute(&mut ui).unwrap();
        let second = LogsDetectCommand::new(&settings).execute(&mut ui).unwrap();

        assert_eq!(first.exit_code, 1);
        assert_eq!(fix.exit_code, 0);
        assert_eq!(second.exit_code, 0);
        let activity = fs::read_to_string(settings.collector_log_path()).unwrap();
        assert!(activity.contains("1 copied, 1 skipped"));
    }

    #[test]
    fn source_missing_exit_codes_differ() {
        let temp = TempDir::new().unwrap();
        let settings = settings(&temp);
        let mut ui = MockUI::new();

        let detect = LogsDetectCommand::new(&settings).execute(&mut ui).unwrap();
        let remediate = LogsRemediateCommand::new(&settings).execute(&mut ui).unwrap();

        assert_eq!(detect.exit_code, 0);
        assert_eq!(remediate.exit_code, 1);
    }

    #[test]
    fn remediation_details_each_file() {
        let temp = TempDir::new().unwrap();
        let settings = settings(&temp);
        fs::create_dir_all(&settings.source_dir).unwrap();
        fs::write(settings.source_dir.join("install.log"), "x").unwrap();
        let mut ui = MockUI::with_mode(OutputMode::Verbose);

        LogsRemediateCommand::new(&settings).execute(&mut ui).unwrap();

        assert_eq!(
            ui.details(),
            ["Copied install.log", "Skipped updates.log (not present)"]
        );
    }
}
