//! External process execution.
//!
//! Every external tool (winget, PowerShell, whoami) is run through the
//! [`ToolRunner`] trait so components can be exercised in tests with a
//! scripted fake instead of a real Windows installation.

use crate::error::{IntuneError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Best available error text: stderr, else stdout, else the exit code.
    pub fn error_text(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs an external program with arguments and captures its output.
pub trait ToolRunner {
    /// Run `program` with `args`, capturing stdout and stderr.
    ///
    /// A non-zero exit is reported through [`CommandResult::success`], not as
    /// an error. `Err` means the process could not be started at all.
    fn run(&self, program: &Path, args: &[&str]) -> Result<CommandResult>;
}

/// Runs real processes via `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Result<CommandResult> {
        execute(program, args)
    }
}

/// Render a program invocation for log messages.
pub fn display_command(program: &Path, args: &[&str]) -> String {
    let mut parts = vec![program.display().to_string()];
    parts.extend(args.iter().map(|a| a.to_string()));
    parts.join(" ")
}

/// Execute a program directly (no shell), capturing output.
pub fn execute(program: &Path, args: &[&str]) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::debug!("Executing: {}", display_command(program, args));

    let output = cmd.output().map_err(|e| {
        tracing::debug!("Failed to start {}: {}", program.display(), e);
        IntuneError::CommandSpawnFailed {
            command: display_command(program, args),
            source: e,
        }
    })?;

    let duration = start.elapsed();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Location of Windows PowerShell, used for provisioning.
pub fn powershell_path() -> PathBuf {
    std::env::var("SystemRoot")
        .map(|root| {
            PathBuf::from(root)
                .join("System32")
                .join("WindowsPowerShell")
                .join("v1.0")
                .join("powershell.exe")
        })
        .unwrap_or_else(|_| PathBuf::from("powershell.exe"))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_text_prefers_stderr() {
        let result = CommandResult::failure(
            Some(2),
            "out".to_string(),
            "err\n".to_string(),
            Duration::ZERO,
        );
        assert_eq!(result.error_text(), "err");
    }

    #[test]
    fn error_text_falls_back_to_stdout_then_code() {
        let result =
            CommandResult::failure(Some(3), "out".to_string(), String::new(), Duration::ZERO);
        assert_eq!(result.error_text(), "out");

        let result = CommandResult::failure(Some(3), String::new(), String::new(), Duration::ZERO);
        assert_eq!(result.error_text(), "exit code 3");
    }

    #[test]
    fn display_command_joins_args() {
        let rendered = display_command(Path::new("winget"), &["--version"]);
        assert_eq!(rendered, "winget --version");
    }

    #[test]
    fn execute_missing_program_is_error() {
        let result = execute(Path::new("/definitely/not/a/real/program"), &[]);
        match result {
            Err(IntuneError::CommandSpawnFailed { command, source }) => {
                assert!(command.contains("/definitely/not/a/real/program"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected spawn failure, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn execute_captures_stdout() {
        let result = execute(Path::new("/bin/sh"), &["-c", "echo hello"]).unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn execute_reports_non_zero_exit() {
        let result = execute(Path::new("/bin/sh"), &["-c", "echo nope >&2; exit 3"]).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert!(result.stderr.contains("nope"));
    }

    #[cfg(unix)]
    #[test]
    fn execute_keeps_os_error_for_non_executable_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().unwrap();
        let exe = temp.path().join("winget.exe");
        std::fs::write(&exe, "").unwrap();
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o644)).unwrap();

        let err = execute(&exe, &["--version"]).unwrap_err();
        assert!(matches!(err, IntuneError::CommandSpawnFailed { .. }));
        assert!(err.to_string().contains("ermission denied"));
    }

    #[test]
    fn command_result_tracks_duration() {
        let result = CommandResult::success(String::new(), String::new(), Duration::from_millis(5));
        assert!(result.duration.as_millis() < 5000);
    }

    #[test]
    fn fake_runner_replays_in_order() {
        use fake::FakeRunner;

        let runner = FakeRunner::new().stdout("first").fails(1, "second");
        let a = runner.run(Path::new("x"), &["1"]).unwrap();
        let b = runner.run(Path::new("x"), &["2"]).unwrap();
        assert!(a.success);
        assert!(!b.success);
        assert!(runner.run(Path::new("x"), &[]).is_err());
        assert_eq!(runner.calls().len(), 3);
    }
}
