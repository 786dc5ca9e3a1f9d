//! Configuration loading and validation.
//!
//! All paths and names the components use are carried in an explicit
//! [`Config`] value that is loaded once in `main` and handed to each
//! command. Defaults match a standard Windows device, so a config file is
//! only needed to override them.
//!
//! # Example
//!
//! ```
//! use intune_winget::config::{parse_config, validate};
//! use std::path::Path;
//!
//! let config = parse_config("logs:\n  prefix: IME-\n", Path::new("inline.yml")).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.logs.prefix, "IME-");
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    executable_dir, find_config_in, load_config, load_config_file, parse_config,
    CONFIG_FILE_NAME,
};
pub use schema::{
    Config, GeneratorSettings, LogSyncSettings, WingetSettings, DEFAULT_MAX_LOG_BYTES,
    DEFAULT_MIN_VERSION,
};
pub use validator::validate;
