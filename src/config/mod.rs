//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config structs and loading (Config, NetworkConfig, ServerConfig)
//! - [`defaults`]: serde default values
//! - [`validation`]: load-time checks (ValidationError)

pub mod defaults;
mod types;
pub mod validation;

pub use types::{Config, ConfigError, NetworkConfig, ServerConfig};
pub use validation::{ValidationError, validate};
