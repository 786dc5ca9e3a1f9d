//! Per-application detection script generation.
//!
//! Turns a winget catalog identifier into a standalone `Detect-<name>.ps1`
//! that an Intune Win32 app can use as its detection rule. The display name
//! comes from `winget search`; the script body comes from the embedded
//! template in `templates/detect-app.ps1`.
//!
//! Everything that can fail (search, name extraction, rendering) happens
//! before the output file is created, and the file is staged next to its
//! final path, so a failed run leaves nothing behind.

pub mod interpolation;
pub mod template;

pub use template::{validate_app_id, DetectionTemplate};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{IntuneError, Result};
use crate::shell::ToolRunner;
use crate::winget::{sanitize_file_name, search_exact, SearchOutputParser};

/// A script written by [`Generator::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    /// Catalog identifier embedded in the script.
    pub app_id: String,
    /// Sanitised display name used in the file name.
    pub display_name: String,
    /// Where the script was written.
    pub path: PathBuf,
}

/// Generates detection scripts from catalog identifiers.
pub struct Generator<'a> {
    runner: &'a dyn ToolRunner,
    parser: &'a dyn SearchOutputParser,
    template: DetectionTemplate,
    script_prefix: String,
}

impl<'a> Generator<'a> {
    /// Create a generator.
    pub fn new(
        runner: &'a dyn ToolRunner,
        parser: &'a dyn SearchOutputParser,
        template: DetectionTemplate,
        script_prefix: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            parser,
            template,
            script_prefix: script_prefix.into(),
        }
    }

    /// File name for a sanitised display name.
    pub fn script_file_name(&self, display_name: &str) -> String {
        format!("{}{}.ps1", self.script_prefix, display_name)
    }

    /// Look up the display name for `app_id` in the catalog.
    pub fn resolve_display_name(&self, winget: &Path, app_id: &str) -> Result<String> {
        let output = search_exact(self.runner, winget, app_id)?;
        let raw = self
            .parser
            .display_name(&output, app_id)
            .ok_or_else(|| IntuneError::PackageNotFound {
                id: app_id.to_string(),
            })?;

        let name = sanitize_file_name(&raw);
        if name.is_empty() {
            return Err(anyhow::anyhow!(
                "Could not extract a display name for '{}' from winget search output",
                app_id
            )
            .into());
        }
        Ok(name)
    }

    /// Search, render and write the script for `app_id` into `output_dir`.
    pub fn generate(&self, winget: &Path, app_id: &str, output_dir: &Path) -> Result<GeneratedScript> {
        let app_id = app_id.trim();
        validate_app_id(app_id)?;

        let display_name = self.resolve_display_name(winget, app_id)?;
        tracing::debug!("Display name for {} is '{}'", app_id, display_name);

        let script = self.template.render(app_id)?;

        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(self.script_file_name(&display_name));

        // Renamed into place only once fully written.
        let mut staged = NamedTempFile::new_in(output_dir)?;
        staged.write_all(script.as_bytes())?;
        staged.persist(&path).map_err(|e| e.error)?;

        Ok(GeneratedScript {
            app_id: app_id.to_string(),
            display_name,
            path,
        })
    }
}
