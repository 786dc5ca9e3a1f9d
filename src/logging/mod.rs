//! Console tracing setup and persistent log files.
//!
//! - [`init_tracing`] installs the stderr subscriber used for live output
//! - [`RotatingLog`] writes the timestamped files picked up by Intune

pub mod rotating;

pub use rotating::{format_line, Level, RotatingLog};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for console logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO, or WARN with `--quiet`
pub fn init_tracing(debug: bool, quiet: bool) {
    let filter = if debug {
        EnvFilter::new("intune_winget=debug")
    } else {
        let fallback = if quiet {
            "intune_winget=warn"
        } else {
            "intune_winget=info"
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    };

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();
}
