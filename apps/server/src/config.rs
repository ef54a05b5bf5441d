use std::{path::Path, time::Duration};

use tcsi_invest_api::{ClientSettings, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use thiserror::Error;

pub const DEFAULT_HTTP_ADDR: &str = ":9115";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `host:port` handed to the listener; host names are resolved at bind time.
    pub listen_addr: String,
    pub token: String,
    pub api_url: String,
    pub api_timeout: Duration,
}

/// Load a `.env` file from the working directory (or a parent) into the
/// process environment. Variables already set are left untouched.
///
/// Must run before tracing is initialised so `RUST_LOG` and
/// `TCSI_LOG_FORMAT` from the file take effect.
pub fn load_env() {
    dotenvy::dotenv().ok();
}

/// Load a specific env file; returns whether it was read.
pub fn load_env_file(path: &Path) -> bool {
    dotenvy::from_path(path).is_ok()
}

impl Config {
    /// Read configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        load_env();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = parse_listen_addr(
            &lookup("HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string()),
        )?;

        let token = lookup("COLLECTOR_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::Missing("COLLECTOR_TOKEN"))?;

        let api_url = lookup("COLLECTOR_API_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "COLLECTOR_API_URL",
                reason: format!("'{}' is not an http(s) URL", api_url),
            });
        }

        let timeout_secs = match lookup("COLLECTOR_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "COLLECTOR_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            listen_addr,
            token,
            api_url,
            api_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api_url.clone(),
            token: self.token.clone(),
            timeout: self.api_timeout,
        }
    }
}

/// Normalise a listen address; a bare `:port` binds every interface.
fn parse_listen_addr(raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    let invalid = |reason: String| ConfigError::Invalid {
        name: "HTTP_ADDR",
        reason: format!("'{}': {}", raw, reason),
    };

    let (host, port) = raw
        .rsplit_once(':')
        .ok_or_else(|| invalid("expected host:port or :port".to_string()))?;
    port.parse::<u16>().map_err(|e| invalid(e.to_string()))?;

    if host.is_empty() {
        Ok(format!("0.0.0.0:{}", port))
    } else {
        Ok(raw.to_string())
    }
}
