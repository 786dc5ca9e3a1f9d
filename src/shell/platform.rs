//! Platform and execution-context detection.

/// Mandatory-label SIDs that `whoami /groups` reports for elevated tokens
/// (High) and for the System account.
const ELEVATED_LABELS: &[&str] = &["S-1-16-12288", "S-1-16-16384"];

/// Check if running in a CI environment.
///
/// Used to force non-interactive mode in `main()`.
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `TF_BUILD`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("TF_BUILD").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Whether `whoami /groups` output shows a high-integrity or System token.
pub fn groups_indicate_elevation(whoami_groups: &str) -> bool {
    ELEVATED_LABELS
        .iter()
        .any(|label| whoami_groups.contains(label))
}

/// Check if running as root/admin (or the Windows System account).
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(windows)]
    {
        use super::command::{SystemRunner, ToolRunner};
        SystemRunner
            .run(std::path::Path::new("whoami"), &["/groups"])
            .map(|r| r.success && groups_indicate_elevation(&r.stdout))
            .unwrap_or(false)
    }

    #[cfg(not(any(unix, windows)))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_integrity_label_is_elevated() {
        let output = "Mandatory Label\\High Mandatory Level Label S-1-16-12288";
        assert!(groups_indicate_elevation(output));
    }

    #[test]
    fn system_label_is_elevated() {
        let output = "Mandatory Label\\System Mandatory Level Label S-1-16-16384";
        assert!(groups_indicate_elevation(output));
    }

    #[test]
    fn medium_integrity_is_not_elevated() {
        let output = "Mandatory Label\\Medium Mandatory Level Label S-1-16-8192";
        assert!(!groups_indicate_elevation(output));
    }

    #[test]
    fn is_ci_detects_environment() {
        // Just ensure function doesn't panic
        let _ = is_ci();
    }

    #[test]
    fn is_elevated_does_not_panic() {
        let _ = is_elevated();
    }
}
