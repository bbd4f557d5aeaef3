//! Shared configuration for Outlet tools.
//!
//! TOML file plus `OUTLET_*` environment overrides, and translation to
//! `outlet_core::SessionConfig`. The CLI layers its own flag overrides on
//! top of what this crate resolves.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use outlet_api::TransportConfig;
use outlet_api::discovery::{DEFAULT_SERVICE_DOMAIN, DEFAULT_SERVICE_TYPE};
use outlet_core::config::{DEFAULT_HOST, DEFAULT_PORT};
use outlet_core::{EndpointMode, SessionConfig};

/// Prefix for environment overrides. Nested keys are joined with `__`,
/// e.g. `OUTLET_CONNECTION__HOST`.
pub const ENV_PREFIX: &str = "OUTLET_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionSettings,

    #[serde(default)]
    pub defaults: Defaults,
}

/// How to find and talk to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// `"network"` browses for the service, `"fixed"` uses `host`/`port`.
    pub mode: String,
    pub host: String,
    pub port: u16,
    pub service_type: String,
    pub domain: String,
    pub discovery_timeout_secs: u64,
    pub retry_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub signal_buffer: usize,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        let session = SessionConfig::default();
        let transport = TransportConfig::default();
        Self {
            mode: "network".into(),
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            service_type: DEFAULT_SERVICE_TYPE.into(),
            domain: DEFAULT_SERVICE_DOMAIN.into(),
            discovery_timeout_secs: session.discovery_timeout.as_secs(),
            retry_interval_secs: session.retry_interval.as_secs(),
            request_timeout_secs: transport.timeout.as_secs(),
            connect_timeout_secs: transport.connect_timeout.as_secs(),
            signal_buffer: session.signal_buffer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "outlet", "outlet").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("outlet");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Resolution ──────────────────────────────────────────────────────

impl ConnectionSettings {
    /// Validate and translate into the endpoint the session should use.
    pub fn endpoint(&self) -> Result<EndpointMode, ConfigError> {
        match self.mode.as_str() {
            "fixed" => {
                if self.host.trim().is_empty() {
                    return Err(invalid("connection.host", "must not be empty in fixed mode"));
                }
                if self.port == 0 {
                    return Err(invalid("connection.port", "must not be 0 in fixed mode"));
                }
                Ok(EndpointMode::Fixed {
                    host: self.host.trim().to_owned(),
                    port: self.port,
                })
            }
            "network" => {
                if self.service_type.trim().is_empty() {
                    return Err(invalid("connection.service_type", "must not be empty"));
                }
                Ok(EndpointMode::Network {
                    service_type: self.service_type.clone(),
                    domain: self.domain.clone(),
                })
            }
            other => Err(invalid(
                "connection.mode",
                format!("expected 'network' or 'fixed', got '{other}'"),
            )),
        }
    }
}

/// Build a `SessionConfig` from loaded config, validating as it goes.
pub fn to_session_config(cfg: &Config) -> Result<SessionConfig, ConfigError> {
    let conn = &cfg.connection;
    let endpoint = conn.endpoint()?;

    if conn.retry_interval_secs == 0 {
        return Err(invalid("connection.retry_interval_secs", "must be at least 1"));
    }
    if conn.discovery_timeout_secs == 0 {
        return Err(invalid("connection.discovery_timeout_secs", "must be at least 1"));
    }
    if conn.signal_buffer == 0 {
        return Err(invalid("connection.signal_buffer", "must be at least 1"));
    }

    Ok(SessionConfig {
        endpoint,
        discovery_timeout: Duration::from_secs(conn.discovery_timeout_secs),
        retry_interval: Duration::from_secs(conn.retry_interval_secs),
        transport: TransportConfig {
            timeout: Duration::from_secs(conn.request_timeout_secs),
            connect_timeout: Duration::from_secs(conn.connect_timeout_secs),
        },
        signal_buffer: conn.signal_buffer,
    })
}
