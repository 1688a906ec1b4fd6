//! Candidate servers for one network, with round-robin failover.
//!
//! Servers are selected in insertion order. A failing server is disabled by
//! the connection's error handling; once every server is disabled the pool
//! reports exhaustion and arms an escalating auto-disable timer which
//! re-enables the whole pool when it fires.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::timer::{Timer, TimerMode};

/// One candidate endpoint and its runtime health.
#[derive(Debug, Clone)]
pub struct Server {
    pub host: String,
    pub port: u16,
    pub tls: bool,
    pub password: Option<String>,
    pub verify_cert: bool,
    pub cert_fingerprint: Option<String>,
    enabled: bool,
    failures: u32,
}

impl Server {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Consecutive failures since the last successful registration.
    pub fn failures(&self) -> u32 {
        self.failures
    }
}

impl From<&ServerConfig> for Server {
    fn from(config: &ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            tls: config.tls,
            password: config.password.clone(),
            verify_cert: config.verify_cert,
            cert_fingerprint: config.cert_fingerprint.clone(),
            enabled: true,
            failures: 0,
        }
    }
}

/// Ordered servers, a round-robin cursor and the auto-disable backoff.
#[derive(Debug)]
pub struct ServerPool {
    servers: Vec<Server>,
    cursor: usize,
    /// Times auto-disable engaged since the last registration.
    times: u32,
    base: Duration,
    auto_disable: Timer,
}

impl ServerPool {
    pub fn new(servers: &[ServerConfig], auto_disable_base: Duration) -> Self {
        Self {
            servers: servers.iter().map(Server::from).collect(),
            // The first selection advances the cursor onto index 0.
            cursor: servers.len().saturating_sub(1),
            times: 0,
            base: auto_disable_base,
            auto_disable: Timer::new("auto-disable", auto_disable_base, TimerMode::OneShot),
        }
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn get(&self, index: usize) -> Option<&Server> {
        self.servers.get(index)
    }

    /// Pick the next server to try.
    ///
    /// Advances the cursor on every call. When the server at the cursor is
    /// disabled, the scan continues from there (wrapping) to the first enabled
    /// server and the cursor lands on it. Returns `None` and engages
    /// auto-disable when no server is enabled.
    pub fn next(&mut self) -> Option<usize> {
        let len = self.servers.len();
        if len == 0 {
            return None;
        }
        self.cursor = (self.cursor + 1) % len;
        let found = (0..len)
            .map(|offset| (self.cursor + offset) % len)
            .find(|&index| self.servers[index].enabled);
        match found {
            Some(index) => {
                self.cursor = index;
                Some(index)
            }
            None => {
                self.engage_auto_disable();
                None
            }
        }
    }

    fn engage_auto_disable(&mut self) {
        self.times += 1;
        let interval = self.base.saturating_mul(self.times);
        self.auto_disable.set_interval(interval);
        self.auto_disable.start();
        warn!(
            times = self.times,
            interval_secs = interval.as_secs(),
            "All servers disabled; auto-disable engaged"
        );
    }

    /// Mark a server as failed and take it out of rotation.
    pub fn disable(&mut self, index: usize) {
        if let Some(server) = self.servers.get_mut(index) {
            server.enabled = false;
            server.failures += 1;
            info!(
                host = %server.host,
                port = server.port,
                failures = server.failures,
                "Server disabled"
            );
        }
    }

    pub fn enable_all(&mut self) {
        for server in &mut self.servers {
            server.enabled = true;
        }
        debug!("All servers re-enabled");
    }

    /// Registration succeeded on `index`: clear escalation and its failures.
    pub fn reset(&mut self, index: usize) {
        self.times = 0;
        self.auto_disable.stop();
        self.auto_disable.set_interval(self.base);
        if let Some(server) = self.servers.get_mut(index) {
            server.failures = 0;
        }
    }

    pub fn stop_auto_disable(&mut self) {
        self.auto_disable.stop();
    }

    pub fn auto_disable_armed(&self) -> bool {
        self.auto_disable.is_armed()
    }

    pub fn auto_disable_interval(&self) -> Duration {
        self.auto_disable.interval()
    }

    /// Resolve when the auto-disable timer fires, re-enabling every server.
    ///
    /// Cancel safe.
    pub async fn auto_disable_expired(&mut self) {
        self.auto_disable.expired().await;
        self.enable_all();
    }
}
