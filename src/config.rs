//! Configuration management for code-compass
//!
//! Settings are read once into an immutable [`CompassConfig`] snapshot which is
//! handed to the backend client. A configuration change means building a new
//! snapshot; nothing reads the environment after that.
//!
//! # Environment Variables
//!
//! - `COMPASS_SERVER_URL`: Backend URL - default: "https://www.code-compass.com:443"
//! - `COMPASS_PROXY`: Proxy URL for backend requests - default: none
//! - `COMPASS_USER_KEY`: Anonymous user identity - default: persisted random UUID
//! - `COMPASS_REQUEST_TIMEOUT`: Timeout in seconds - default: "10"
//! - `COMPASS_LOG_LEVEL`: Logging level - default: "info"

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const DEFAULT_SERVER_URL: &str = "https://www.code-compass.com:443";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_KEY_FILE: &str = "user_key";
const CONFIG_DIR_NAME: &str = "code-compass";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid server URL '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("Invalid proxy URL '{0}'")]
    InvalidProxy(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to persist user key at {path}: {source}")]
    UserKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct CompassConfig {
    /// Backend base URL, always in `scheme://host:port` form
    pub server_url: String,
    pub proxy: Option<String>,
    /// Anonymous identity sent with every request; `None` until resolved
    pub user_key: Option<String>,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl Default for CompassConfig {
    fn default() -> Self {
        let server_url = env::var("COMPASS_SERVER_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .and_then(|raw| match normalize_server_url(&raw) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!("{}, using default server", e);
                    None
                }
            })
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let proxy = env::var("COMPASS_PROXY")
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let user_key = env::var("COMPASS_USER_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let request_timeout_secs = env::var("COMPASS_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let log_level = env::var("COMPASS_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            server_url,
            proxy,
            user_key,
            request_timeout_secs,
            log_level,
        }
    }
}

impl CompassConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        normalize_server_url(&self.server_url)?;

        if let Some(proxy) = &self.proxy {
            reqwest::Url::parse(proxy).map_err(|_| ConfigError::InvalidProxy(proxy.clone()))?;
        }

        Ok(())
    }

    /// Overrides the server URL, normalizing it the same way the environment is.
    pub fn with_server_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.server_url = normalize_server_url(raw)?;
        Ok(self)
    }

    /// Fills in the user key from `dir/user_key`, creating it on first use.
    pub fn with_user_key_from(mut self, dir: &Path) -> Result<Self, ConfigError> {
        if self.user_key.is_none() {
            self.user_key = Some(load_or_create_user_key(dir)?);
        }
        Ok(self)
    }

    /// Fills in the user key from the per-user configuration directory.
    ///
    /// Falls back to an ephemeral key when no configuration directory exists.
    pub fn with_persisted_user_key(self) -> Result<Self, ConfigError> {
        match dirs::config_dir() {
            Some(base) => self.with_user_key_from(&base.join(CONFIG_DIR_NAME)),
            None => {
                warn!("No configuration directory available, using an ephemeral user key");
                let mut config = self;
                config.user_key.get_or_insert_with(generate_user_key);
                Ok(config)
            }
        }
    }

    /// Value of the client identity header for this build.
    pub fn client_key(&self) -> String {
        format!("compass-cli-version-{}", crate::VERSION)
    }
}

impl fmt::Display for CompassConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Compass Configuration:")?;
        writeln!(f, "  Backend URL: {}", self.server_url)?;
        writeln!(
            f,
            "  Proxy: {}",
            self.proxy.as_deref().unwrap_or("no proxy")
        )?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        write!(f, "  Log Level: {}", self.log_level)
    }
}

/// Reduces a URL to `scheme://host:port`, filling in the scheme's default port.
pub fn normalize_server_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidServerUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = reqwest::Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(invalid("scheme must be http or https"));
    }
    let host = url.host_str().ok_or_else(|| invalid("missing host"))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| invalid("missing port"))?;

    Ok(format!("{}://{}:{}", scheme, host, port))
}

fn generate_user_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn load_or_create_user_key(dir: &Path) -> Result<String, ConfigError> {
    let path = dir.join(USER_KEY_FILE);
    let io_err = |source| ConfigError::UserKey {
        path: path.clone(),
        source,
    };

    if let Ok(existing) = fs::read_to_string(&path) {
        let key = existing.trim();
        if !key.is_empty() {
            debug!(path = %path.display(), "Loaded user key");
            return Ok(key.to_string());
        }
    }

    let key = generate_user_key();
    fs::create_dir_all(dir).map_err(io_err)?;
    fs::write(&path, &key).map_err(io_err)?;
    debug!(path = %path.display(), "Generated user key");
    Ok(key)
}
