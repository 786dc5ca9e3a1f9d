//! Copying Winget-AutoUpdate logs into the Intune log directory.
//!
//! Intune log collection only picks up files from the Management Extension
//! log directory. The two halves here form a detection/remediation pair:
//! [`detect`] reports whether any monitored log has a missing or stale copy,
//! and [`remediate`] brings the copies up to date.
//!
//! When the source directory is absent the halves deliberately disagree:
//! detection is compliant (nothing to collect) and remediation fails.

pub mod detection;
pub mod record;
pub mod remediation;

pub use detection::{detect, SyncStatus};
pub use record::{destination_path, LogFileRecord};
pub use remediation::{remediate, SyncReport};
