//! Reading package information out of winget.
//!
//! Two winget outputs are consumed:
//!
//! - `winget export` writes a JSON document listing installed packages; it is
//!   versioned and parsed with serde into [`PackageRecord`]s.
//! - `winget search` prints a human-oriented table with no stable format.
//!   Extracting a display name from it is best effort and lives behind
//!   [`SearchOutputParser`] so the heuristic can be replaced without touching
//!   callers.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{IntuneError, Result};
use crate::shell::{display_command, ToolRunner};

/// File name used for the export inside a scratch directory.
pub const EXPORT_FILE_NAME: &str = "winget-export.json";

/// One installed package from `winget export`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    /// Catalog identifier, e.g. `7zip.7zip`.
    pub identifier: String,
    /// Display name. `winget export` does not include names, so this is only
    /// set by parsers that have one.
    pub display_name: Option<String>,
    /// Installed version, when exported with `--include-versions`.
    pub version: Option<String>,
    /// Source the package was installed from (e.g. `winget`, `msstore`).
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ExportDocument {
    #[serde(default)]
    sources: Vec<ExportSource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ExportSource {
    #[serde(default)]
    packages: Vec<ExportPackage>,
    source_details: Option<ExportSourceDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ExportPackage {
    package_identifier: String,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ExportSourceDetails {
    name: Option<String>,
}

/// Parse the JSON written by `winget export`.
pub fn parse_export(content: &str) -> Result<Vec<PackageRecord>> {
    let content = content.trim_start_matches('\u{feff}');
    let doc: ExportDocument = serde_json::from_str(content)
        .map_err(|e| anyhow::anyhow!("Failed to parse winget export: {}", e))?;

    let mut records = Vec::new();
    for source in doc.sources {
        let source_name = source.source_details.and_then(|d| d.name);
        for pkg in source.packages {
            records.push(PackageRecord {
                identifier: pkg.package_identifier,
                display_name: None,
                version: pkg.version,
                source: source_name.clone(),
            });
        }
    }
    Ok(records)
}

/// Find a package whose identifier equals `id` exactly (case-sensitive).
pub fn find_package<'a>(records: &'a [PackageRecord], id: &str) -> Option<&'a PackageRecord> {
    records.iter().find(|r| r.identifier == id)
}

/// Run `winget export` into `scratch_dir` and parse the result.
///
/// winget exits non-zero when some installed packages have no catalog
/// source, yet still writes the file; a written file is therefore parsed
/// regardless of the exit code.
pub fn export_installed(
    runner: &dyn ToolRunner,
    winget: &Path,
    scratch_dir: &Path,
) -> Result<Vec<PackageRecord>> {
    let export_path: PathBuf = scratch_dir.join(EXPORT_FILE_NAME);
    let export_arg = export_path.to_string_lossy().to_string();
    let args = [
        "export",
        "-o",
        export_arg.as_str(),
        "--accept-source-agreements",
        "--include-versions",
    ];

    let result = runner.run(winget, &args)?;

    if !export_path.is_file() {
        tracing::debug!("winget export output: {}", result.error_text());
        return Err(IntuneError::CommandFailed {
            command: display_command(winget, &args),
            code: result.exit_code,
        });
    }
    if !result.success {
        tracing::debug!(
            "winget export exited with {:?} but wrote {}",
            result.exit_code,
            export_path.display()
        );
    }

    let content = fs::read_to_string(&export_path)?;
    parse_export(&content)
}

/// Run an exact-identifier catalog search and return its raw output.
///
/// A search with no hits exits non-zero; that is a normal answer, so the
/// output is returned either way and interpreted by a [`SearchOutputParser`].
pub fn search_exact(runner: &dyn ToolRunner, winget: &Path, id: &str) -> Result<String> {
    let result = runner.run(
        winget,
        &["search", "--id", id, "--exact", "--accept-source-agreements"],
    )?;
    if !result.success {
        tracing::debug!("winget search exited with {:?}", result.exit_code);
    }
    Ok(result.stdout)
}

/// Extracts a display name for an identifier from `winget search` output.
pub trait SearchOutputParser {
    /// Returns the raw name text for the first line referencing `id`, or
    /// `None` when no line contains the identifier.
    fn display_name(&self, output: &str, id: &str) -> Option<String>;
}

/// Column-position heuristic over winget's table output.
///
/// The name is everything before the first occurrence of the identifier on
/// the first line that contains it. A display name that itself contains the
/// identifier text yields a truncated name.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabularSearchParser;

impl SearchOutputParser for TabularSearchParser {
    fn display_name(&self, output: &str, id: &str) -> Option<String> {
        if id.is_empty() {
            return None;
        }
        visible_lines(output)
            .into_iter()
            .find_map(|line| line.find(id).map(|pos| line[..pos].trim().to_string()))
    }
}

/// Lines as they appear on a terminal.
///
/// winget redraws its progress spinner with carriage returns; only the text
/// after the last `\r` of each line is what remains visible.
fn visible_lines(output: &str) -> Vec<String> {
    output
        .split('\n')
        .map(|line| {
            line.rsplit('\r')
                .find(|part| !part.trim().is_empty())
                .unwrap_or("")
                .to_string()
        })
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Remove characters that are not allowed in Windows file names.
pub fn sanitize_file_name(name: &str) -> String {
    const ILLEGAL: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];
    name.chars()
        .filter(|c| !ILLEGAL.contains(c) && !c.is_control())
        .collect::<String>()
        .trim()
        .trim_end_matches('.')
        .trim()
        .to_string()
}
