//! Provisioning winget for all users of the device.
//!
//! Under the System account winget is only usable once the App Installer
//! bundle is provisioned machine-wide. This module downloads the latest
//! `microsoft/winget-cli` release bundle and registers it with
//! `Add-AppxProvisionedPackage`. Framework dependencies (VCLibs, UI.Xaml) are
//! expected to be present already.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::error::{IntuneError, Result};
use crate::shell::ToolRunner;

/// A GitHub release as returned by the releases API.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Release tag, e.g. `v1.7.11132`.
    pub tag_name: String,
    /// Downloadable files.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// One downloadable release file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    /// File name.
    pub name: String,
    /// Direct download URL.
    pub browser_download_url: String,
}

/// The files needed to provision winget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningAssets {
    /// `Microsoft.DesktopAppInstaller_*.msixbundle`
    pub bundle: ReleaseAsset,
    /// `*_License1.xml`, when the release ships one.
    pub license: Option<ReleaseAsset>,
}

/// Pick the App Installer bundle and its license file from a release.
pub fn select_assets(release: &Release) -> Result<ProvisioningAssets> {
    let bundle = release
        .assets
        .iter()
        .find(|a| a.name.to_lowercase().ends_with(".msixbundle"))
        .cloned()
        .ok_or_else(|| {
            anyhow!(
                "Release {} has no .msixbundle asset",
                release.tag_name
            )
        })?;

    let license = release
        .assets
        .iter()
        .find(|a| a.name.to_lowercase().ends_with("_license1.xml"))
        .cloned();

    Ok(ProvisioningAssets { bundle, license })
}

/// Fetches release metadata and assets over HTTPS.
pub struct ReleaseClient {
    api_url: String,
    client: reqwest::blocking::Client,
}

impl ReleaseClient {
    /// Create a client for the given "latest release" API URL.
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("intune-winget/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            api_url: api_url.to_string(),
            client,
        })
    }

    /// Fetch the latest release metadata.
    pub fn fetch_latest(&self) -> Result<Release> {
        let response = self
            .client
            .get(&self.api_url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .with_context(|| format!("Failed to fetch {}", self.api_url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP {} fetching {}", response.status(), self.api_url).into());
        }

        let release = response
            .json::<Release>()
            .context("Failed to parse GitHub release response")?;
        Ok(release)
    }

    /// Download an asset into `dir`, returning the file path.
    pub fn download(&self, asset: &ReleaseAsset, dir: &Path) -> Result<PathBuf> {
        let target = dir.join(&asset.name);
        let mut response = self
            .client
            .get(&asset.browser_download_url)
            .send()
            .with_context(|| format!("Failed to download {}", asset.browser_download_url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP {} downloading {}",
                response.status(),
                asset.browser_download_url
            )
            .into());
        }

        let mut file = File::create(&target)?;
        response
            .copy_to(&mut file)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        Ok(target)
    }
}

/// Quote a value as a PowerShell single-quoted string literal.
pub fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// The PowerShell command that provisions the bundle machine-wide.
pub fn provision_command(bundle: &Path, license: Option<&Path>) -> String {
    let license_arg = match license {
        Some(path) => format!("-LicensePath {}", ps_quote(&path.to_string_lossy())),
        None => "-SkipLicense".to_string(),
    };
    format!(
        "Add-AppxProvisionedPackage -Online -PackagePath {} {} -ErrorAction Stop | Out-Null",
        ps_quote(&bundle.to_string_lossy()),
        license_arg
    )
}

/// Run the provisioning command through PowerShell.
pub fn provision(
    runner: &dyn ToolRunner,
    powershell: &Path,
    bundle: &Path,
    license: Option<&Path>,
) -> Result<()> {
    let command = provision_command(bundle, license);
    let result = runner.run(
        powershell,
        &[
            "-NoProfile",
            "-NonInteractive",
            "-ExecutionPolicy",
            "Bypass",
            "-Command",
            &command,
        ],
    )?;

    if result.success {
        Ok(())
    } else {
        tracing::debug!("Provisioning output: {}", result.error_text());
        Err(IntuneError::CommandFailed {
            command,
            code: result.exit_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::command::fake::FakeRunner;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    fn asset(name: &str) -> ReleaseAsset {
        ReleaseAsset {
            name: name.to_string(),
            browser_download_url: format!("https://example.invalid/{}", name),
        }
    }

    fn release(names: &[&str]) -> Release {
        Release {
            tag_name: "v1.7.11132".to_string(),
            assets: names.iter().map(|n| asset(n)).collect(),
        }
    }

    #[test]
    fn select_assets_finds_bundle_and_license() {
        let rel = release(&[
            "DesktopAppInstaller_Dependencies.zip",
            "Microsoft.DesktopAppInstaller_8wekyb3d8bbwe.msixbundle",
            "e53e159d00e04f729cc2180cffd1c02e_License1.xml",
        ]);

        let assets = select_assets(&rel).unwrap();

        assert!(assets.bundle.name.ends_with(".msixbundle"));
        assert!(assets.license.unwrap().name.ends_with("_License1.xml"));
    }

    #[test]
    fn select_assets_without_license_is_allowed() {
        let rel = release(&["Microsoft.DesktopAppInstaller_8wekyb3d8bbwe.msixbundle"]);
        assert!(select_assets(&rel).unwrap().license.is_none());
    }

    #[test]
    fn select_assets_without_bundle_fails() {
        let rel = release(&["source.zip"]);
        let err = select_assets(&rel).unwrap_err();
        assert!(err.to_string().contains("v1.7.11132"));
    }

    #[test]
    fn ps_quote_escapes_single_quotes() {
        assert_eq!(ps_quote("C:\\it's"), "'C:\\it''s'");
    }

    #[test]
    fn provision_command_uses_license_when_present() {
        let cmd = provision_command(Path::new("b.msixbundle"), Some(Path::new("l.xml")));
        assert!(cmd.contains("-PackagePath 'b.msixbundle'"));
        assert!(cmd.contains("-LicensePath 'l.xml'"));
        assert!(!cmd.contains("-SkipLicense"));
    }

    #[test]
    fn provision_command_skips_license_when_absent() {
        let cmd = provision_command(Path::new("b.msixbundle"), None);
        assert!(cmd.contains("-SkipLicense"));
    }

    #[test]
    fn provision_reports_failure() {
        let runner = FakeRunner::new().fails(1, "Add-AppxProvisionedPackage : failed");
        let result = provision(
            &runner,
            Path::new("powershell.exe"),
            Path::new("b.msixbundle"),
            None,
        );
        assert!(matches!(result, Err(IntuneError::CommandFailed { .. })));
        assert_eq!(runner.calls()[0].1[0], "-NoProfile");
    }

    #[test]
    fn provision_succeeds_on_zero_exit() {
        let runner = FakeRunner::new().stdout("");
        assert!(provision(
            &runner,
            Path::new("powershell.exe"),
            Path::new("b.msixbundle"),
            None
        )
        .is_ok());
    }

    #[test]
    fn fetch_latest_parses_release() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/releases/latest");
            then.status(200).body(
                r#"{"tag_name":"v1.7.11132","assets":[{"name":"Microsoft.DesktopAppInstaller_8wekyb3d8bbwe.msixbundle","browser_download_url":"https://example.invalid/b"}]}"#,
            );
        });

        let client =
            ReleaseClient::new(&server.url("/releases/latest"), Duration::from_secs(5)).unwrap();
        let rel = client.fetch_latest().unwrap();

        assert_eq!(rel.tag_name, "v1.7.11132");
        assert_eq!(rel.assets.len(), 1);
    }

    #[test]
    fn fetch_latest_returns_error_on_500() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/releases/latest");
            then.status(500).body("Internal Server Error");
        });

        let client =
            ReleaseClient::new(&server.url("/releases/latest"), Duration::from_secs(5)).unwrap();
        let err = client.fetch_latest().unwrap_err().to_string();
        assert!(err.contains("500"), "Error should mention 500: {}", err);
    }

    #[test]
    fn download_writes_asset_to_directory() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/assets/bundle.msixbundle");
            then.status(200).body("BUNDLE");
        });

        let temp = TempDir::new().unwrap();
        let client = ReleaseClient::new(&server.url("/unused"), Duration::from_secs(5)).unwrap();
        let target = client
            .download(
                &ReleaseAsset {
                    name: "bundle.msixbundle".to_string(),
                    browser_download_url: server.url("/assets/bundle.msixbundle"),
                },
                temp.path(),
            )
            .unwrap();

        assert_eq!(std::fs::read_to_string(target).unwrap(), "BUNDLE");
    }
}
