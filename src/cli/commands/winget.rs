//! `winget detect` and `winget remediate`.

use std::time::Duration;

use tempfile::TempDir;

use crate::cli::args::WingetArgs;
use crate::config::WingetSettings;
use crate::error::Result;
use crate::logging::RotatingLog;
use crate::shell::{is_elevated, powershell_path, ToolRunner};
use crate::ui::UserInterface;
use crate::winget::{
    provision, select_assets, ReleaseClient, Version, WingetDetector, WingetLocator,
    WingetStatus,
};

use super::dispatcher::{Command, CommandResult};

/// Download timeout for release metadata and assets.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Parse the minimum version, recording a bad value in the detection log.
fn required_version(
    settings: &WingetSettings,
    args: &WingetArgs,
    log: &RotatingLog,
) -> Result<Version> {
    let raw = args
        .min_version
        .as_deref()
        .unwrap_or(&settings.min_version);
    Version::parse(raw).map_err(|e| {
        log.error(&format!("Cannot check winget: {}", e));
        e
    })
}

fn detection_log(settings: &WingetSettings) -> RotatingLog {
    RotatingLog::new(&settings.detection_log, settings.max_log_bytes)
}

fn run_detection(
    settings: &WingetSettings,
    required: &Version,
    runner: &dyn ToolRunner,
    ui: &mut dyn UserInterface,
) -> WingetStatus {
    let locator = WingetLocator::from_env(&settings.search_paths);
    ui.detail(&format!("Searching for winget in: {}", locator.searched()));
    ui.detail(&format!("Minimum version: {}", required));
    WingetDetector::new(&locator, required.clone(), runner).detect()
}

fn report(status: &WingetStatus, log: &RotatingLog, ui: &mut dyn UserInterface) {
    match status {
        WingetStatus::Compliant { path, version } => {
            ui.success(&format!("winget {} at {}", version, path.display()));
        }
        other => {
            if let Some(diagnostic) = other.diagnostic() {
                log.error(&diagnostic);
            }
        }
    }
}

/// Exit 0 when winget is runnable and recent enough.
pub struct WingetDetectCommand<'a> {
    settings: &'a WingetSettings,
    args: WingetArgs,
    runner: &'a dyn ToolRunner,
}

impl<'a> WingetDetectCommand<'a> {
    /// Create the command.
    pub fn new(settings: &'a WingetSettings, args: WingetArgs, runner: &'a dyn ToolRunner) -> Self {
        Self {
            settings,
            args,
            runner,
        }
    }
}

impl Command for WingetDetectCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let log = detection_log(self.settings);
        let required = required_version(self.settings, &self.args, &log)?;
        let status = run_detection(self.settings, &required, self.runner, ui);
        report(&status, &log, ui);
        Ok(CommandResult::from_bool(status.is_compliant()))
    }
}

/// Provision winget machine-wide when detection fails.
pub struct WingetRemediateCommand<'a> {
    settings: &'a WingetSettings,
    args: WingetArgs,
    runner: &'a dyn ToolRunner,
}

impl<'a> WingetRemediateCommand<'a> {
    /// Create the command.
    pub fn new(settings: &'a WingetSettings, args: WingetArgs, runner: &'a dyn ToolRunner) -> Self {
        Self {
            settings,
            args,
            runner,
        }
    }

    fn install_latest(&self, ui: &mut dyn UserInterface) -> Result<()> {
        let client = ReleaseClient::new(&self.settings.release_api_url, DOWNLOAD_TIMEOUT)?;

        let mut spinner = ui.start_spinner("Fetching latest winget release");
        let release = match client.fetch_latest() {
            Ok(release) => release,
            Err(e) => {
                spinner.finish_error("Could not fetch release information");
                return Err(e);
            }
        };
        let assets = select_assets(&release)?;
        spinner.finish_success(&format!("Found winget {}", release.tag_name));
        ui.detail(&format!("Bundle: {}", assets.bundle.browser_download_url));
        if let Some(license) = &assets.license {
            ui.detail(&format!("License: {}", license.browser_download_url));
        }

        let scratch = TempDir::new()?;
        let mut spinner = ui.start_spinner(&format!("Downloading {}", assets.bundle.name));
        let bundle = match client.download(&assets.bundle, scratch.path()) {
            Ok(path) => path,
            Err(e) => {
                spinner.finish_error("Download failed");
                return Err(e);
            }
        };
        let license = match &assets.license {
            Some(asset) => Some(client.download(asset, scratch.path())?),
            None => None,
        };
        spinner.finish_success("Downloaded");

        let mut spinner = ui.start_spinner("Provisioning App Installer for all users");
        match provision(self.runner, &powershell_path(), &bundle, license.as_deref()) {
            Ok(()) => spinner.finish_success("Provisioned"),
            Err(e) => {
                spinner.finish_error("Provisioning failed");
                return Err(e);
            }
        }
        Ok(())
    }
}

impl Command for WingetRemediateCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let log = detection_log(self.settings);
        let required = required_version(self.settings, &self.args, &log)?;

        if !is_elevated() {
            ui.warning("Not running elevated; provisioning for all users will likely fail");
        }

        let before = run_detection(self.settings, &required, self.runner, ui);
        if before.is_compliant() {
            report(&before, &log, ui);
            return Ok(CommandResult::success());
        }
        if let Some(diagnostic) = before.diagnostic() {
            log.warn(&format!("{}; provisioning latest release", diagnostic));
        }

        if let Err(e) = self.install_latest(ui) {
            log.error(&format!("winget provisioning failed: {}", e));
            return Ok(CommandResult::failure(1));
        }
        log.info("winget provisioned from the latest release");

        let after = run_detection(self.settings, &required, self.runner, ui);
        report(&after, &log, ui);
        Ok(CommandResult::from_bool(after.is_compliant()))
    }
}
