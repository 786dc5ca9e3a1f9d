//! Everything that talks to winget itself.
//!
//! - [`locate`] finds the executable
//! - [`version`] parses and orders `winget --version` output
//! - [`detector`] turns both into a compliance verdict
//! - [`catalog`] reads `winget export` and `winget search` output
//! - [`provision`] installs winget machine-wide from the GitHub release

pub mod catalog;
pub mod detector;
pub mod locate;
pub mod provision;
pub mod version;

pub use catalog::{
    export_installed, find_package, parse_export, sanitize_file_name, search_exact,
    PackageRecord, SearchOutputParser, TabularSearchParser, EXPORT_FILE_NAME,
};
pub use detector::{WingetDetector, WingetStatus};
pub use locate::{expand_env, expand_pattern, version_aware_cmp, WingetLocator};
pub use provision::{
    provision, provision_command, select_assets, ProvisioningAssets, Release, ReleaseAsset,
    ReleaseClient,
};
pub use version::Version;
