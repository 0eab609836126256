//! Gateway configuration.
//!
//! Values are resolved in increasing precedence: built-in defaults, an
//! optional TOML file, then `GATEPASS_*` environment variables.
//!
//! # Example
//!
//! ```toml
//! [gateway]
//! base_url = "https://estate.example.com/api"
//! security_path = "/security"
//! auth_token = "officer-session-token"
//! timeout_secs = 15
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Default backend root when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Default prefix of the security endpoints under the base URL.
pub const DEFAULT_SECURITY_PATH: &str = "/security";

pub const ENV_CONFIG_FILE: &str = "GATEPASS_CONFIG";
pub const ENV_API_URL: &str = "GATEPASS_API_URL";
pub const ENV_SECURITY_PATH: &str = "GATEPASS_SECURITY_PATH";
pub const ENV_AUTH_TOKEN: &str = "GATEPASS_AUTH_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "GATEPASS_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

/// The three remote operations, as routes under the security path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Validate,
    ValidateQr,
    RecentValidations,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Validate => "/validate",
            Endpoint::ValidateQr => "/validate-qr",
            Endpoint::RecentValidations => "/recent-validations",
        }
    }
}

/// Where and how the gateway talks to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub security_path: String,
    /// Pre-issued session token, forwarded as a bearer token.
    pub auth_token: Option<String>,
    /// Global request timeout. `None` waits for the transport to resolve.
    pub timeout: Option<Duration>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            security_path: DEFAULT_SECURITY_PATH.to_string(),
            auth_token: None,
            timeout: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    gateway: GatewaySection,
}

#[derive(Debug, Default, Deserialize)]
struct GatewaySection {
    base_url: Option<String>,
    security_path: Option<String>,
    auth_token: Option<String>,
    timeout_secs: Option<u64>,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        GatewayConfig {
            base_url: base_url.into(),
            ..GatewayConfig::default()
        }
    }

    /// Resolve configuration from an optional file and the process environment.
    ///
    /// When `file` is `None`, the path in `GATEPASS_CONFIG` is used if set.
    pub fn resolve(file: Option<&Path>) -> Result<Self, ConfigError> {
        let env_file = std::env::var(ENV_CONFIG_FILE).ok().map(PathBuf::from);
        let mut config = match file.or(env_file.as_deref()) {
            Some(path) => Self::from_file(path)?,
            None => GatewayConfig::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a TOML config file on top of the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let section = parsed.gateway;
        let mut config = GatewayConfig::default();
        if let Some(url) = section.base_url {
            config.set_base_url(&url)?;
        }
        if let Some(prefix) = section.security_path {
            config.security_path = prefix;
        }
        config.auth_token = section.auth_token.filter(|t| !t.is_empty());
        config.timeout = section.timeout_secs.map(Duration::from_secs);
        Ok(config)
    }

    /// Overlay values from an environment lookup. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.set_base_url(&url)?;
        }
        if let Some(prefix) = get(ENV_SECURITY_PATH) {
            self.security_path = prefix;
        }
        if let Some(token) = get(ENV_AUTH_TOKEN) {
            self.auth_token = Some(token);
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_TIMEOUT_SECS.to_string(),
                    value: raw.clone(),
                })?;
            self.timeout = Some(Duration::from_secs(secs));
        }
        Ok(())
    }

    /// Replace the base URL, rejecting anything that is not http(s).
    pub fn set_base_url(&mut self, url: &str) -> Result<(), ConfigError> {
        let trimmed = url.trim();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "base_url".to_string(),
                value: url.to_string(),
            });
        }
        self.base_url = trimmed.trim_end_matches('/').to_string();
        Ok(())
    }

    /// Full URL of an endpoint: `{base_url}{security_path}{endpoint}`.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.security_path.trim_matches('/');
        if prefix.is_empty() {
            format!("{}{}", base, endpoint.path())
        } else {
            format!("{}/{}{}", base, prefix, endpoint.path())
        }
    }
}
