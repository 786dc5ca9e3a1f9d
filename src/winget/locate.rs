//! Locating the winget executable.
//!
//! winget ships inside the `Microsoft.DesktopAppInstaller` MSIX package, whose
//! install directory name embeds the package version:
//!
//! ```text
//! C:\Program Files\WindowsApps\Microsoft.DesktopAppInstaller_1.22.10582.0_x64__8wekyb3d8bbwe\winget.exe
//! ```
//!
//! The System account cannot use the per-user `WindowsApps` alias, so the
//! executable is found by expanding a wildcard pattern over that directory.
//! Several versions can be installed side by side; the newest (last after a
//! version-aware sort) wins.
//!
//! # Example
//!
//! ```no_run
//! use intune_winget::winget::WingetLocator;
//!
//! let locator = WingetLocator::new(vec![
//!     r"C:\Program Files\WindowsApps\Microsoft.DesktopAppInstaller_*_x64__8wekyb3d8bbwe\winget.exe".to_string(),
//!     r"%LOCALAPPDATA%\Microsoft\WindowsApps\winget.exe".to_string(),
//! ]);
//! if let Some(path) = locator.locate() {
//!     println!("winget at {}", path.display());
//! }
//! ```

use std::cmp::Ordering;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// `%NAME%` environment references in configured paths.
static ENV_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([A-Za-z0-9_()]+)%").expect("ENV_REF must compile"));

/// Ordered list of candidate locations for the winget executable.
#[derive(Debug, Clone)]
pub struct WingetLocator {
    patterns: Vec<String>,
}

impl WingetLocator {
    /// Create a locator from already-expanded path patterns, tried in order.
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// Create a locator, expanding `%VAR%` references with `env_fn`.
    ///
    /// This allows testing without modifying actual environment variables.
    pub fn with_env<F>(patterns: &[String], env_fn: F) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        Self {
            patterns: patterns.iter().map(|p| expand_env(p, &env_fn)).collect(),
        }
    }

    /// Create a locator using the process environment.
    pub fn from_env(patterns: &[String]) -> Self {
        Self::with_env(patterns, |key: &str| std::env::var(key))
    }

    /// The candidate patterns in search order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Human-readable list of searched locations, for error messages.
    pub fn searched(&self) -> String {
        self.patterns.join(", ")
    }

    /// Find the executable.
    ///
    /// Patterns are tried in order; the first one with any match returns
    /// its last match after a version-aware sort.
    pub fn locate(&self) -> Option<PathBuf> {
        for pattern in &self.patterns {
            let matches = expand_pattern(Path::new(pattern));
            if let Some(found) = matches.into_iter().last() {
                tracing::debug!("Found winget via '{}': {}", pattern, found.display());
                return Some(found);
            }
            tracing::debug!("No match for '{}'", pattern);
        }
        None
    }
}

/// Replace `%NAME%` references using `env_fn`; unknown names are left as-is.
pub fn expand_env<F>(input: &str, env_fn: &F) -> String
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    ENV_REF
        .replace_all(input, |caps: &regex::Captures<'_>| {
            env_fn(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .to_string()
}

fn has_wildcard(segment: &str) -> bool {
    segment.contains('*') || segment.contains('?')
}

/// Translate a single path segment glob (`*`, `?`) into an anchored regex.
///
/// Matching is case-insensitive, as on NTFS.
fn segment_regex(segment: &str) -> Option<Regex> {
    let mut pattern = String::from("(?i)^");
    for c in segment.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern.push('$');
    Regex::new(&pattern).ok()
}

/// Expand a path pattern whose segments may contain `*` or `?`.
///
/// Only existing files are returned, sorted with [`version_aware_cmp`].
pub fn expand_pattern(pattern: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::new()];

    for component in pattern.components() {
        let segment = match component {
            Component::Normal(s) => s.to_string_lossy().to_string(),
            other => {
                for c in &mut candidates {
                    c.push(other.as_os_str());
                }
                continue;
            }
        };

        if !has_wildcard(&segment) {
            for c in &mut candidates {
                c.push(&segment);
            }
            continue;
        }

        let Some(re) = segment_regex(&segment) else {
            return Vec::new();
        };

        let mut next = Vec::new();
        for dir in &candidates {
            let lookup = if dir.as_os_str().is_empty() {
                Path::new(".")
            } else {
                dir.as_path()
            };
            let Ok(entries) = fs::read_dir(lookup) else {
                continue;
            };
            for entry in entries.flatten() {
                let name = entry.file_name().to_string_lossy().to_string();
                if re.is_match(&name) {
                    next.push(dir.join(name));
                }
            }
        }
        candidates = next;
    }

    let mut found: Vec<PathBuf> = candidates.into_iter().filter(|p| p.is_file()).collect();
    found.sort_by(|a, b| version_aware_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
    found
}

/// Compare strings so that embedded numbers order numerically.
///
/// `App_1.9.0` sorts before `App_1.10.0`. Non-numeric runs compare
/// case-insensitively.
pub fn version_aware_cmp(a: &str, b: &str) -> Ordering {
    let left = split_runs(a);
    let right = split_runs(b);

    for (l, r) in left.iter().zip(right.iter()) {
        let ord = match (l.parse::<u128>(), r.parse::<u128>()) {
            (Ok(ln), Ok(rn)) => ln.cmp(&rn),
            _ => l.to_lowercase().cmp(&r.to_lowercase()),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len()).then_with(|| a.cmp(b))
}

fn split_runs(s: &str) -> Vec<String> {
    let mut runs: Vec<String> = Vec::new();
    let mut prev_digit: Option<bool> = None;
    for c in s.chars() {
        let is_digit = c.is_ascii_digit();
        match (prev_digit, runs.last_mut()) {
            (Some(p), Some(last)) if p == is_digit => last.push(c),
            _ => runs.push(c.to_string()),
        }
        prev_digit = Some(is_digit);
    }
    runs
}
