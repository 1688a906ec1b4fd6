//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::*;
use super::validation::{self, ValidationError};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Bot configuration: one entry per logical network.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Networks to connect to, in file order.
    #[serde(rename = "network", default)]
    pub networks: Vec<NetworkConfig>,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        validation::validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

/// Per-network session configuration.
///
/// Every optional field has its default in [`super::defaults`]; the value is
/// immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Network name, used in logs and events (e.g., "libera").
    pub name: String,
    /// Administrative switch; a disabled network never connects.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Nickname template. Each `?` is replaced with a random digit.
    pub nick: String,
    /// Username (ident) sent in USER.
    #[serde(default = "default_user")]
    pub user: String,
    /// Real name / GECOS sent in USER.
    #[serde(default = "default_realname")]
    pub realname: String,
    /// Request user mode `+i` during registration.
    #[serde(default)]
    pub invisible: bool,
    /// Text encoding label for the wire (any WHATWG label).
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// Network-wide PASS, used when the selected server has none.
    #[serde(default)]
    pub password: Option<String>,
    /// Reason sent with QUIT when none is given.
    #[serde(default = "default_quit_message")]
    pub quit_message: String,
    /// Connection attempts before timeouts stop disabling servers.
    #[serde(default = "default_max_connection_attempts")]
    pub max_connection_attempts: u32,
    /// Base reconnect delay in seconds.
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
    /// Base auto-disable interval in seconds.
    #[serde(default = "default_auto_disable_secs")]
    pub auto_disable_secs: u64,
    /// Keepalive probe interval in seconds.
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,
    /// Parameter for the keepalive PONG; defaults to the current host.
    #[serde(default)]
    pub keepalive_param: Option<String>,
    /// Seconds to wait for a transport to connect.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Candidate servers, in selection order.
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
}

impl NetworkConfig {
    /// A network with every optional field at its default.
    pub fn new(name: impl Into<String>, nick: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: default_true(),
            nick: nick.into(),
            user: default_user(),
            realname: default_realname(),
            invisible: false,
            encoding: default_encoding(),
            password: None,
            quit_message: default_quit_message(),
            max_connection_attempts: default_max_connection_attempts(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
            auto_disable_secs: default_auto_disable_secs(),
            keepalive_secs: default_keepalive_secs(),
            keepalive_param: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            servers: Vec::new(),
        }
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }

    pub fn auto_disable_interval(&self) -> Duration {
        Duration::from_secs(self.auto_disable_secs)
    }

    pub fn keepalive_interval(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// A candidate server for a network.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Hostname or IP address.
    pub host: String,
    /// Port (default: 6667).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Whether to negotiate TLS.
    #[serde(default)]
    pub tls: bool,
    /// Server password (PASS); overrides the network password.
    #[serde(default)]
    pub password: Option<String>,
    /// Whether to verify the server certificate (only applies when tls = true).
    #[serde(default = "default_true")]
    pub verify_cert: bool,
    /// SHA-256 certificate fingerprint for pinning.
    /// Format: "01:23:45:67:89:AB:CD:EF:..." (64 hex chars with colons)
    #[serde(default)]
    pub cert_fingerprint: Option<String>,
}

impl ServerConfig {
    /// A plain-text server entry with defaults.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            tls: false,
            password: None,
            verify_cert: true,
            cert_fingerprint: None,
        }
    }
}
