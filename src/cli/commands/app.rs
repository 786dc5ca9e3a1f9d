//! `app generate` and `app detect`.

use std::path::PathBuf;

use tempfile::TempDir;

use crate::cli::args::{AppDetectArgs, GenerateArgs};
use crate::config::{executable_dir, Config, WingetSettings};
use crate::error::Result;
use crate::generator::{DetectionTemplate, Generator};
use crate::shell::ToolRunner;
use crate::ui::{Prompt, UserInterface};
use crate::winget::{export_installed, find_package, TabularSearchParser, WingetLocator};

use super::dispatcher::{Command, CommandResult};

fn locate_winget(settings: &WingetSettings, ui: &mut dyn UserInterface) -> Option<PathBuf> {
    let locator = WingetLocator::from_env(&settings.search_paths);
    ui.detail(&format!("Searching for winget in: {}", locator.searched()));
    let found = locator.locate();
    if let Some(path) = &found {
        ui.detail(&format!("Using {}", path.display()));
    } else {
        ui.error(&format!(
            "winget executable not found (searched: {})",
            locator.searched()
        ));
    }
    found
}

/// Generate `Detect-<name>.ps1` for a catalog identifier.
pub struct AppGenerateCommand<'a> {
    config: &'a Config,
    args: GenerateArgs,
    runner: &'a dyn ToolRunner,
}

impl<'a> AppGenerateCommand<'a> {
    /// Create the command.
    pub fn new(config: &'a Config, args: GenerateArgs, runner: &'a dyn ToolRunner) -> Self {
        Self {
            config,
            args,
            runner,
        }
    }

    fn output_dir(&self) -> PathBuf {
        self.args
            .output_dir
            .clone()
            .or_else(|| self.config.generator.output_dir.clone())
            .or_else(executable_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn app_id(&self, ui: &mut dyn UserInterface) -> Option<String> {
        let supplied = self
            .args
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from);
        if supplied.is_some() {
            return supplied;
        }

        let answer = match ui.prompt(&Prompt::input("app_id", "winget package identifier")) {
            Ok(answer) => answer,
            Err(e) => {
                ui.error(&format!("No package identifier supplied: {}", e));
                return None;
            }
        };
        let answer = answer.trim().to_string();
        if answer.is_empty() {
            ui.error("No package identifier supplied");
            return None;
        }
        Some(answer)
    }
}

impl Command for AppGenerateCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(winget) = locate_winget(&self.config.winget, ui) else {
            return Ok(CommandResult::failure(1));
        };
        let Some(app_id) = self.app_id(ui) else {
            return Ok(CommandResult::failure(1));
        };

        let template = match DetectionTemplate::embedded() {
            Ok(template) => template,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
        };
        let parser = TabularSearchParser;
        let generator = Generator::new(
            self.runner,
            &parser,
            template,
            self.config.generator.script_prefix.clone(),
        );

        let output_dir = self.output_dir();
        ui.detail(&format!(
            "Running {} search --id {} --exact",
            winget.display(),
            app_id
        ));
        ui.detail(&format!("Writing to {}", output_dir.display()));

        let mut spinner = ui.start_spinner(&format!("Searching the catalog for {}", app_id));
        match generator.generate(&winget, &app_id, &output_dir) {
            Ok(script) => {
                spinner.finish_success(&format!(
                    "{} ({}) -> {}",
                    script.display_name,
                    script.app_id,
                    script.path.display()
                ));
                Ok(CommandResult::success())
            }
            Err(e) => {
                tracing::debug!("Generation for {} failed: {:?}", app_id, e);
                spinner.finish_error("Generation failed");
                // Hidden spinners print nothing, so the cause goes through the UI.
                ui.error(&format!("Could not generate a script for {}: {}", app_id, e));
                Ok(CommandResult::failure(1))
            }
        }
    }
}

/// Native equivalent of a generated detection script.
pub struct AppDetectCommand<'a> {
    settings: &'a WingetSettings,
    args: AppDetectArgs,
    runner: &'a dyn ToolRunner,
}

impl<'a> AppDetectCommand<'a> {
    /// Create the command.
    pub fn new(settings: &'a WingetSettings, args: AppDetectArgs, runner: &'a dyn ToolRunner) -> Self {
        Self {
            settings,
            args,
            runner,
        }
    }
}

impl Command for AppDetectCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(winget) = locate_winget(self.settings, ui) else {
            return Ok(CommandResult::failure(1));
        };

        // Removed on drop, whichever way this returns.
        let scratch = TempDir::new()?;
        let records = match export_installed(self.runner, &winget, scratch.path()) {
            Ok(records) => records,
            Err(e) => {
                ui.error(&format!("winget export failed: {}", e));
                return Ok(CommandResult::failure(1));
            }
        };

        match find_package(&records, &self.args.id) {
            Some(record) => {
                let version = record.version.as_deref().unwrap_or("unknown version");
                ui.success(&format!("{} is installed ({})", record.identifier, version));
                Ok(CommandResult::success())
            }
            None => {
                ui.message(&format!("{} is not installed", self.args.id));
                Ok(CommandResult::failure(1))
            }
        }
    }
}
