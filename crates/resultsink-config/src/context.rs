//! LUCI Context Resolution
//!
//! The LUCI context is a JSON file whose path is published through the
//! `LUCI_CONTEXT` environment variable. Only the `result_sink` section is
//! read here; other sections are ignored.

use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming the LUCI context file
pub const LUCI_CONTEXT_VAR: &str = "LUCI_CONTEXT";

/// Parsed LUCI context file
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct LuciContext {
    /// ResultSink section, absent when the sink is not running
    #[serde(default)]
    pub result_sink: Option<ResultSinkSection>,
}

/// `result_sink` section of the LUCI context
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct ResultSinkSection {
    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub auth_token: Option<String>,
}

/// Resolved sink endpoint
///
/// Immutable once resolved. The auth token is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SinkEndpoint {
    address: String,
    auth_token: String,
}

impl SinkEndpoint {
    pub fn new(address: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            auth_token: auth_token.into(),
        }
    }

    /// host:port of the local sink
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }
}

impl fmt::Debug for SinkEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkEndpoint")
            .field("address", &self.address)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

impl FromStr for LuciContext {
    type Err = serde_json::Error;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(content)
    }
}

impl LuciContext {
    /// Load a LUCI context from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        content.parse::<Self>().map_err(|e| ConfigError::JsonParseError {
            file: path.to_path_buf(),
            error: e,
        })
    }

    /// Extract the sink endpoint, requiring both address and auth token
    pub fn sink_endpoint(&self, file: &Path) -> ConfigResult<SinkEndpoint> {
        let section = self
            .result_sink
            .as_ref()
            .ok_or_else(|| ConfigError::MissingField {
                field: "result_sink".to_string(),
                file: file.to_path_buf(),
            })?;

        let address = section
            .address
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField {
                field: "result_sink.address".to_string(),
                file: file.to_path_buf(),
            })?;

        if address.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "result_sink.address".to_string(),
                reason: "address is empty".to_string(),
            });
        }

        let auth_token = section
            .auth_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField {
                field: "result_sink.auth_token".to_string(),
                file: file.to_path_buf(),
            })?;

        Ok(SinkEndpoint::new(address, auth_token))
    }
}

/// Path of the context file named by `var`
pub fn context_path(var: &str) -> ConfigResult<PathBuf> {
    env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| ConfigError::EnvNotSet(var.to_string()))
}

/// Resolve the sink endpoint from the context file at `path`
pub fn resolve_from_file(path: &Path) -> ConfigResult<SinkEndpoint> {
    LuciContext::load_from_file(path)?.sink_endpoint(path)
}

/// Fallible resolution through the environment variable `var`
pub fn try_resolve(var: &str) -> ConfigResult<SinkEndpoint> {
    let path = context_path(var)?;
    resolve_from_file(&path)
}

/// Resolve the sink endpoint, or `None` when no sink is configured
///
/// Never fails: every configuration problem is logged and absorbed.
pub fn resolve(var: &str) -> Option<SinkEndpoint> {
    match try_resolve(var) {
        Ok(endpoint) => {
            log::debug!("ResultSink resolved at {}", endpoint.address());
            Some(endpoint)
        }
        Err(e) => {
            log::debug!("ResultSink not configured: {}", e);
            None
        }
    }
}
