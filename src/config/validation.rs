//! Configuration validation.
//!
//! Validates configuration once at load time to catch common errors early.

use std::collections::HashSet;

use super::Config;
use thiserror::Error;

/// Longest configurable interval: one week.
pub const MAX_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("at least one [[network]] is required")]
    NoNetworks,
    #[error("network.name is required")]
    MissingNetworkName,
    #[error("duplicate network name: {0}")]
    DuplicateNetwork(String),
    #[error("network {0}: nick is required")]
    MissingNick(String),
    #[error("network {0}: at least one server is required")]
    NoServers(String),
    #[error("network {0}: server host is required")]
    MissingHost(String),
    #[error("network {0}: server {1} has port 0")]
    InvalidPort(String, String),
    #[error("network {0}: unknown encoding '{1}'")]
    UnknownEncoding(String, String),
    #[error("network {0}: {1} must be greater than zero")]
    ZeroInterval(String, &'static str),
    #[error("network {0}: {1} must be at most {MAX_INTERVAL_SECS} seconds")]
    IntervalTooLong(String, &'static str),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    if config.networks.is_empty() {
        errors.push(ValidationError::NoNetworks);
    }

    for net in &config.networks {
        let name = net.name.clone();
        if name.is_empty() {
            errors.push(ValidationError::MissingNetworkName);
        } else if !seen.insert(net.name.as_str()) {
            errors.push(ValidationError::DuplicateNetwork(name.clone()));
        }

        if net.nick.is_empty() {
            errors.push(ValidationError::MissingNick(name.clone()));
        }

        if encoding_rs::Encoding::for_label(net.encoding.as_bytes()).is_none() {
            errors.push(ValidationError::UnknownEncoding(
                name.clone(),
                net.encoding.clone(),
            ));
        }

        for (field, value) in [
            ("reconnect_delay_secs", net.reconnect_delay_secs),
            ("auto_disable_secs", net.auto_disable_secs),
            ("keepalive_secs", net.keepalive_secs),
            ("connect_timeout_secs", net.connect_timeout_secs),
        ] {
            if value == 0 {
                errors.push(ValidationError::ZeroInterval(name.clone(), field));
            } else if value > MAX_INTERVAL_SECS {
                errors.push(ValidationError::IntervalTooLong(name.clone(), field));
            }
        }

        if net.servers.is_empty() {
            errors.push(ValidationError::NoServers(name.clone()));
        }
        for server in &net.servers {
            if server.host.is_empty() {
                errors.push(ValidationError::MissingHost(name.clone()));
            } else if server.port == 0 {
                errors.push(ValidationError::InvalidPort(
                    name.clone(),
                    server.host.clone(),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
