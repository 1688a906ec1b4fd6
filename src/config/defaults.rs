//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

// =============================================================================
// Identity Defaults
// =============================================================================

pub fn default_user() -> String {
    "slircbot".to_string()
}

pub fn default_realname() -> String {
    "slircbot".to_string()
}

pub fn default_encoding() -> String {
    "utf-8".to_string()
}

pub fn default_quit_message() -> String {
    "slircbot shutting down".to_string()
}

pub fn default_port() -> u16 {
    6667
}

// =============================================================================
// Reconnect / Liveness Defaults
// =============================================================================

pub fn default_max_connection_attempts() -> u32 {
    3
}

pub fn default_reconnect_delay_secs() -> u64 {
    5
}

pub fn default_auto_disable_secs() -> u64 {
    60
}

pub fn default_keepalive_secs() -> u64 {
    120
}

pub fn default_connect_timeout_secs() -> u64 {
    30
}
