//! Configuration schema definitions.
//!
//! Every field has a default matching the standard Intune / Winget-AutoUpdate
//! layout on a Windows device, so running without a config file is the normal
//! case. A YAML file only needs the keys it overrides.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default minimum winget version accepted by the detector.
pub const DEFAULT_MIN_VERSION: &str = "1.7.11132";

/// Default rotation threshold for log files written by this tool (1 MiB).
pub const DEFAULT_MAX_LOG_BYTES: u64 = 1024 * 1024;

/// Root configuration structure for intune-winget.yml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// winget presence/version detection and provisioning
    pub winget: WingetSettings,

    /// Log synchronisation into the Intune log directory
    pub logs: LogSyncSettings,

    /// Detection script generation
    pub generator: GeneratorSettings,
}

/// Settings for locating, checking and provisioning winget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WingetSettings {
    /// Minimum acceptable `winget --version`
    pub min_version: String,

    /// Candidate executable locations, tried in order. Segments may contain
    /// `*`/`?` wildcards and `%VAR%` environment references.
    pub search_paths: Vec<String>,

    /// Diagnostic log written by `winget detect` on non-compliance
    pub detection_log: PathBuf,

    /// GitHub API endpoint for the latest winget-cli release
    pub release_api_url: String,

    /// Rotation threshold for the detection log
    pub max_log_bytes: u64,
}

impl Default for WingetSettings {
    fn default() -> Self {
        Self {
            min_version: DEFAULT_MIN_VERSION.to_string(),
            search_paths: vec![
                r"C:\Program Files\WindowsApps\Microsoft.DesktopAppInstaller_*_x64__8wekyb3d8bbwe\winget.exe".to_string(),
                r"%LOCALAPPDATA%\Microsoft\WindowsApps\winget.exe".to_string(),
            ],
            detection_log: PathBuf::from(
                r"C:\ProgramData\Microsoft\IntuneManagementExtension\Logs\WinGet-Detection.log",
            ),
            release_api_url: "https://api.github.com/repos/microsoft/winget-cli/releases/latest"
                .to_string(),
            max_log_bytes: DEFAULT_MAX_LOG_BYTES,
        }
    }
}

/// Settings shared by the log synchronisation detection and remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSyncSettings {
    /// Directory the monitored logs are written to
    pub source_dir: PathBuf,

    /// Directory collected by the Intune Management Extension
    pub destination_dir: PathBuf,

    /// File names to monitor inside `source_dir`
    pub files: Vec<String>,

    /// Prefix prepended to each file name in `destination_dir`
    pub prefix: String,

    /// Name of the activity log kept in `destination_dir`
    pub collector_log: String,

    /// Rotation threshold for the activity log
    pub max_log_bytes: u64,
}

impl Default for LogSyncSettings {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(r"C:\Program Files\Winget-AutoUpdate\logs"),
            destination_dir: PathBuf::from(
                r"C:\ProgramData\Microsoft\IntuneManagementExtension\Logs",
            ),
            files: vec!["install.log".to_string(), "updates.log".to_string()],
            prefix: "WAU-".to_string(),
            collector_log: "WAU-LogCollector.log".to_string(),
            max_log_bytes: DEFAULT_MAX_LOG_BYTES,
        }
    }
}

impl LogSyncSettings {
    /// Full path of the activity log.
    pub fn collector_log_path(&self) -> PathBuf {
        self.destination_dir.join(&self.collector_log)
    }
}

/// Settings for `app generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Where generated scripts are written (default: next to the executable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// File name prefix for generated scripts
    pub script_prefix: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            output_dir: None,
            script_prefix: "Detect-".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_intune_layout() {
        let config = Config::default();
        assert_eq!(config.winget.min_version, DEFAULT_MIN_VERSION);
        assert_eq!(config.logs.files, vec!["install.log", "updates.log"]);
        assert_eq!(config.logs.prefix, "WAU-");
        assert_eq!(config.logs.max_log_bytes, 1_048_576);
        assert_eq!(config.generator.script_prefix, "Detect-");
    }

    #[test]
    fn system_location_is_searched_before_user_location() {
        let paths = WingetSettings::default().search_paths;
        assert!(paths[0].contains("WindowsApps\\Microsoft.DesktopAppInstaller_*"));
        assert!(paths[1].starts_with("%LOCALAPPDATA%"));
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = "logs:\n  prefix: IME-\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.logs.prefix, "IME-");
        assert_eq!(config.logs.files, vec!["install.log", "updates.log"]);
        assert_eq!(config.winget, WingetSettings::default());
    }

    #[test]
    fn empty_yaml_is_default() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn collector_log_path_is_in_destination() {
        let settings = LogSyncSettings {
            destination_dir: PathBuf::from("/dest"),
            ..Default::default()
        };
        assert_eq!(
            settings.collector_log_path(),
            PathBuf::from("/dest/WAU-LogCollector.log")
        );
    }

    #[test]
    fn output_dir_not_serialized_when_unset() {
        let yaml = serde_yaml::to_string(&GeneratorSettings::default()).unwrap();
        assert!(!yaml.contains("output_dir"));
    }
}
