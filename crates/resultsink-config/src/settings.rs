//! Client Settings
//!
//! Optional knobs for the reporting client, merged with the following
//! precedence (later overrides earlier):
//! 1. Defaults
//! 2. Settings file (TOML)
//! 3. Environment variables (RESULTSINK_*)
//! 4. CLI flags (handled by caller)

use crate::context::LUCI_CONTEXT_VAR;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Overrides the request timeout in seconds
pub const TIMEOUT_ENV: &str = "RESULTSINK_TIMEOUT_SECS";

/// Overrides the variable naming the context file
pub const CONTEXT_VAR_ENV: &str = "RESULTSINK_CONTEXT_VAR";

/// Reporting client settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ClientSettings {
    /// Request timeout; the transport default applies when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Environment variable holding the context file path (default: LUCI_CONTEXT)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_var: Option<String>,
}

impl ClientSettings {
    /// Load settings from a TOML file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let settings: Self =
            toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
                file: path.to_path_buf(),
                error: e,
            })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> ConfigResult<Self> {
        Self::default().apply_env_overrides()
    }

    /// Load an optional settings file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let settings = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env_overrides()
    }

    /// Validate setting values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if let Some(var) = &self.context_var {
            if var.is_empty() || var.contains('=') {
                return Err(ConfigError::InvalidValue {
                    field: "context_var".to_string(),
                    reason: format!("'{}' is not a valid environment variable name", var),
                });
            }
        }
        Ok(())
    }

    fn apply_env_overrides(mut self) -> ConfigResult<Self> {
        if let Ok(timeout) = env::var(TIMEOUT_ENV) {
            let secs = timeout
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: TIMEOUT_ENV.to_string(),
                    reason: e.to_string(),
                })?;
            self.timeout_secs = Some(secs);
        }

        if let Ok(var) = env::var(CONTEXT_VAR_ENV) {
            self.context_var = Some(var);
        }

        self.validate()?;
        Ok(self)
    }

    /// Explicit request timeout, if any
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Effective context variable name
    pub fn context_var(&self) -> &str {
        self.context_var.as_deref().unwrap_or(LUCI_CONTEXT_VAR)
    }
}
