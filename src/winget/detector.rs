//! winget presence and version detection.
//!
//! The detector answers one question for an Intune detection rule: is a
//! runnable winget at or above the required version available to this
//! account? Every outcome maps to exactly one [`WingetStatus`]; only
//! [`WingetStatus::Compliant`] exits 0.

use std::path::PathBuf;

use crate::shell::ToolRunner;
use crate::winget::locate::WingetLocator;
use crate::winget::version::Version;

/// Result of checking winget.
#[derive(Debug, Clone, PartialEq)]
pub enum WingetStatus {
    /// winget runs and reports a version at or above the minimum.
    Compliant { path: PathBuf, version: Version },

    /// No executable matched any search location.
    NotFound { searched: String },

    /// The executable could not be run or exited non-zero (commonly a
    /// missing VCLibs/UI.Xaml dependency under the System account).
    InvocationFailed { path: PathBuf, error: String },

    /// `--version` output did not parse as a version.
    UnparsableVersion { path: PathBuf, raw: String },

    /// winget runs but is older than required.
    Outdated {
        path: PathBuf,
        found: Version,
        required: Version,
    },
}

impl WingetStatus {
    /// Whether the check passed.
    pub fn is_compliant(&self) -> bool {
        matches!(self, WingetStatus::Compliant { .. })
    }

    /// Diagnostic line for the detection log; `None` when compliant.
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            WingetStatus::Compliant { .. } => None,
            WingetStatus::NotFound { searched } => {
                Some(format!("winget not found (searched: {})", searched))
            }
            WingetStatus::InvocationFailed { path, error } => Some(format!(
                "winget at {} failed to run: {}",
                path.display(),
                error
            )),
            WingetStatus::UnparsableVersion { path, raw } => Some(format!(
                "winget at {} returned an unrecognised version: '{}'",
                path.display(),
                raw.trim()
            )),
            WingetStatus::Outdated {
                path,
                found,
                required,
            } => Some(format!(
                "winget at {} is version {}, minimum required is {}",
                path.display(),
                found,
                required
            )),
        }
    }
}

/// Checks that winget is present, runnable and recent enough.
pub struct WingetDetector<'a> {
    locator: &'a WingetLocator,
    required: Version,
    runner: &'a dyn ToolRunner,
}

impl<'a> WingetDetector<'a> {
    /// Create a new detector.
    pub fn new(locator: &'a WingetLocator, required: Version, runner: &'a dyn ToolRunner) -> Self {
        Self {
            locator,
            required,
            runner,
        }
    }

    /// The minimum version this detector accepts.
    pub fn required(&self) -> &Version {
        &self.required
    }

    /// Run the check.
    pub fn detect(&self) -> WingetStatus {
        let Some(path) = self.locator.locate() else {
            return WingetStatus::NotFound {
                searched: self.locator.searched(),
            };
        };

        let result = match self.runner.run(&path, &["--version"]) {
            Ok(result) => result,
            Err(e) => {
                return WingetStatus::InvocationFailed {
                    path,
                    error: e.to_string(),
                }
            }
        };

        if !result.success {
            return WingetStatus::InvocationFailed {
                path,
                error: result.error_text(),
            };
        }

        let found = match Version::from_tool_output(&result.stdout) {
            Ok(v) => v,
            Err(_) => {
                return WingetStatus::UnparsableVersion {
                    path,
                    raw: result.stdout,
                }
            }
        };

        if found >= self.required {
            WingetStatus::Compliant {
                path,
                version: found,
            }
        } else {
            WingetStatus::Outdated {
                path,
                found,
                required: self.required.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::command::fake::FakeRunner;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        exe: PathBuf,
        locator: WingetLocator,
    }

    fn installed() -> Fixture {
        let temp = TempDir::new().unwrap();
        let exe = temp.path().join("App_1.0.0_x64").join("winget.exe");
        fs::create_dir_all(exe.parent().unwrap()).unwrap();
        fs::write(&exe, "").unwrap();
        let pattern = temp.path().join("App_*_x64").join("winget.exe");
        let locator = WingetLocator::new(vec![pattern.to_string_lossy().to_string()]);
        Fixture {
            _temp: temp,
            exe,
            locator,
        }
    }

    fn required(v: &str) -> Version {
        Version::parse(v).unwrap()
    }

    #[test]
    fn newer_version_is_compliant() {
        let fx = installed();
        let runner = FakeRunner::new().stdout("v1.8.1911\r\n");
        let detector = WingetDetector::new(&fx.locator, required("1.7.11132"), &runner);

        let status = detector.detect();

        assert!(status.is_compliant());
        assert!(status.diagnostic().is_none());
        assert_eq!(runner.calls()[0].0, fx.exe);
        assert_eq!(runner.calls()[0].1, vec!["--version".to_string()]);
    }

    #[test]
    fn equal_version_is_compliant() {
        let fx = installed();
        let runner = FakeRunner::new().stdout("v1.7.11132");
        let detector = WingetDetector::new(&fx.locator, required("1.7.11132"), &runner);
        assert!(detector.detect().is_compliant());
    }

    #[test]
    fn older_version_is_outdated() {
        let fx = installed();
        let runner = FakeRunner::new().stdout("v1.6.3482");
        let detector = WingetDetector::new(&fx.locator, required("1.7.11132"), &runner);

        let status = detector.detect();

        assert!(matches!(status, WingetStatus::Outdated { .. }));
        let diag = status.diagnostic().unwrap();
        assert!(diag.contains("1.6.3482"));
        assert!(diag.contains("1.7.11132"));
    }

    #[test]
    fn version_ordering_drives_compliance() {
        let pairs = [
            ("1.7.11132", "1.7.11132", true),
            ("1.10.0", "1.9.9", true),
            ("2.0", "1.99.99999", true),
            ("1.9.9", "1.10.0", false),
            ("1.7", "1.7.1", false),
        ];
        for (found, min, expected) in pairs {
            let fx = installed();
            let runner = FakeRunner::new().stdout(found);
            let detector = WingetDetector::new(&fx.locator, required(min), &runner);
            assert_eq!(
                detector.detect().is_compliant(),
                expected,
                "{} against minimum {}",
                found,
                min
            );
        }
    }

    #[test]
    fn missing_executable_is_not_found() {
        let locator = WingetLocator::new(vec!["/no/such/App_*/winget.exe".to_string()]);
        let runner = FakeRunner::new();
        let detector = WingetDetector::new(&locator, required("1.0"), &runner);

        let status = detector.detect();

        assert!(matches!(status, WingetStatus::NotFound { .. }));
        assert!(status.diagnostic().unwrap().contains("not found"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn non_zero_exit_is_invocation_failure() {
        let fx = installed();
        let runner = FakeRunner::new().fails(-1073741515, "");
        let detector = WingetDetector::new(&fx.locator, required("1.0"), &runner);

        let status = detector.detect();

        match &status {
            WingetStatus::InvocationFailed { error, .. } => {
                assert!(error.contains("-1073741515"))
            }
            other => panic!("Expected InvocationFailed, got {:?}", other),
        }
    }

    #[test]
    fn spawn_error_is_invocation_failure() {
        let fx = installed();
        let runner = FakeRunner::new()
            .spawn_error(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let detector = WingetDetector::new(&fx.locator, required("1.0"), &runner);

        let status = detector.detect();

        assert!(matches!(status, WingetStatus::InvocationFailed { .. }));
        assert!(status.diagnostic().unwrap().contains("Permission denied"));
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_winget_reports_os_error() {
        use crate::shell::SystemRunner;
        use std::os::unix::fs::PermissionsExt;

        let fx = installed();
        fs::set_permissions(&fx.exe, fs::Permissions::from_mode(0o644)).unwrap();
        let detector = WingetDetector::new(&fx.locator, required("1.0"), &SystemRunner);

        let diag = detector.detect().diagnostic().unwrap();

        assert!(diag.contains("failed to run"));
        assert!(diag.contains("ermission denied"), "{}", diag);
    }

    #[test]
    fn garbage_output_is_unparsable() {
        let fx = installed();
        let runner = FakeRunner::new().stdout("No applicable update found.\n");
        let detector = WingetDetector::new(&fx.locator, required("1.0"), &runner);

        let status = detector.detect();

        match &status {
            WingetStatus::UnparsableVersion { raw, .. } => {
                assert!(raw.contains("No applicable update"))
            }
            other => panic!("Expected UnparsableVersion, got {:?}", other),
        }
        assert!(status.diagnostic().unwrap().contains("No applicable update"));
    }
}
