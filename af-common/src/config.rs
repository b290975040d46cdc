//! Configuration loading for Album Finder services
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Command-line and environment values reach this module together as
//! [`ConfigOverrides`], since the binary reads both through clap. A missing
//! default TOML file is not an error: the service starts on compiled defaults.
//! Loading happens before logging is initialized, so where the TOML tier came
//! from is returned as [`ConfigSource`] for the binary to log afterwards.
//!
//! Credentials are never validated here. Empty credentials are passed through
//! and surface later as an authentication failure from the identity endpoint.

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default listen address (the port the browser form calls)
pub const DEFAULT_BIND: &str = "127.0.0.1:4000";
/// Default identity endpoint for the client-credentials exchange
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
/// Default catalog API base
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";
/// Default outbound request timeout
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
/// Default log level when neither RUST_LOG nor config sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";

const CONFIG_DIR_NAME: &str = "album-finder";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Service identity and secret for the client-credentials exchange
///
/// Passed explicitly to the credential exchanger so tests can supply fake
/// credentials. `Debug` never prints the secret.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ServiceCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ServiceCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Both identity and secret are non-empty
    pub fn is_complete(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }
}

impl fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Upstream endpoints the search proxy talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEndpoints {
    /// Identity endpoint (client-credentials token exchange)
    pub token_url: String,
    /// Catalog API base; `/search` and `/albums/{id}/tracks` hang off it
    pub api_base_url: String,
}

impl Default for CatalogEndpoints {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

/// Bootstrap configuration loaded from TOML file
///
/// Every key is optional. No `Debug` impl: the file may carry the client secret.
#[derive(Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Listen address, e.g. "127.0.0.1:4000"
    #[serde(default)]
    pub bind: Option<String>,

    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default)]
    pub token_url: Option<String>,

    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Outbound HTTP timeout in seconds
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load the config file
    ///
    /// An explicitly requested path must exist. The platform default path
    /// (see [`default_config_path`]) is optional.
    pub fn load(explicit_path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Ok((Self::read(path)?, ConfigSource::File(path.to_path_buf())));
        }

        match default_config_path() {
            Some(path) if path.exists() => Ok((Self::read(&path)?, ConfigSource::File(path))),
            Some(path) => Ok((Self::default(), ConfigSource::NotFound(path))),
            None => Ok((Self::default(), ConfigSource::NoConfigDir)),
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Where the TOML tier of a [`ServiceConfig`] came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Values read from this file
    File(PathBuf),
    /// No file at the default location; defaults used
    NotFound(PathBuf),
    /// Platform config directory could not be determined; defaults used
    NoConfigDir,
    /// Resolved in code from an in-memory [`TomlConfig`]
    Inline,
}

/// Platform config file location: `<config_dir>/album-finder/config.toml`
///
/// Linux: `~/.config/album-finder/config.toml` (honors XDG_CONFIG_HOME)
/// macOS: `~/Library/Application Support/album-finder/config.toml`
/// Windows: `%APPDATA%\album-finder\config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Values from the command line or environment (tiers 1 and 2)
#[derive(Clone, Default)]
pub struct ConfigOverrides {
    pub bind: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub token_url: Option<String>,
    pub api_base_url: Option<String>,
    pub http_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind: SocketAddr,
    pub credentials: ServiceCredentials,
    pub endpoints: CatalogEndpoints,
    pub http_timeout: Duration,
    pub log_level: String,
    pub source: ConfigSource,
}

impl ServiceConfig {
    /// Merge overrides over TOML values over compiled defaults
    pub fn resolve(overrides: ConfigOverrides, toml: TomlConfig) -> Result<Self> {
        let bind_str = overrides
            .bind
            .or(toml.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_str.parse::<SocketAddr>().map_err(|e| {
            Error::Config(format!("Invalid bind address '{}': {}", bind_str, e))
        })?;

        let http_timeout_secs = overrides
            .http_timeout_secs
            .or(toml.http_timeout_secs)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        if http_timeout_secs == 0 {
            return Err(Error::Config(
                "http_timeout_secs must be greater than zero".to_string(),
            ));
        }

        let defaults = CatalogEndpoints::default();
        let endpoints = CatalogEndpoints {
            token_url: overrides
                .token_url
                .or(toml.token_url)
                .unwrap_or(defaults.token_url),
            api_base_url: overrides
                .api_base_url
                .or(toml.api_base_url)
                .unwrap_or(defaults.api_base_url),
        };

        let credentials = ServiceCredentials {
            client_id: overrides.client_id.or(toml.client_id).unwrap_or_default(),
            client_secret: overrides
                .client_secret
                .or(toml.client_secret)
                .unwrap_or_default(),
        };

        let log_level = overrides.log_level.unwrap_or(toml.logging.level);

        Ok(Self {
            bind,
            credentials,
            endpoints,
            http_timeout: Duration::from_secs(http_timeout_secs),
            log_level,
            source: ConfigSource::Inline,
        })
    }

    /// Load the TOML tier and resolve against the overrides
    pub fn load(overrides: ConfigOverrides, config_path: Option<&Path>) -> Result<Self> {
        let (toml, source) = TomlConfig::load(config_path)?;
        let mut config = Self::resolve(overrides, toml)?;
        config.source = source;
        Ok(config)
    }
}
