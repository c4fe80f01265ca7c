//! ResultSink Configuration
//!
//! Resolves where test results should be reported and how the client talks
//! to the sink:
//! - LUCI context file (JSON, path taken from `LUCI_CONTEXT`)
//! - Client settings (optional TOML file plus `RESULTSINK_*` overrides)
//!
//! # Resolution
//!
//! Reporting is best-effort infrastructure. A missing or malformed context
//! file is not an error for callers of [`resolve`]; it yields `None`, and a
//! client built from it does nothing.
//!
//! # Example
//!
//! ```no_run
//! use resultsink_config::{resolve, ClientSettings};
//!
//! let settings = ClientSettings::from_env().unwrap();
//! match resolve(settings.context_var()) {
//!     Some(endpoint) => println!("reporting to {}", endpoint.address()),
//!     None => println!("no sink configured"),
//! }
//! ```

pub mod context;
pub mod settings;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid JSON in {file}: {error}")]
    JsonParseError {
        file: PathBuf,
        error: serde_json::Error,
    },

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Environment variable {0} is not set")]
    EnvNotSet(String),

    #[error("Missing required field '{field}' in {file}")]
    MissingField { field: String, file: PathBuf },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use context::{resolve, resolve_from_file, LuciContext, SinkEndpoint, LUCI_CONTEXT_VAR};
pub use settings::ClientSettings;
