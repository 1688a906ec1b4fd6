//! Periodic liveness probe.
//!
//! Every tick produces a `PONG` line regardless of traffic; nothing checks
//! for a reply.

use std::time::Duration;

use slircbot_proto::Command;

use crate::timer::{Timer, TimerMode};

#[derive(Debug)]
pub struct KeepAlive {
    timer: Timer,
    param: Option<String>,
}

impl KeepAlive {
    pub fn new(interval: Duration, param: Option<String>) -> Self {
        Self {
            timer: Timer::new("keepalive", interval, TimerMode::Repeating),
            param,
        }
    }

    pub fn start(&mut self) {
        self.timer.start();
    }

    pub fn stop(&mut self) {
        self.timer.stop();
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_armed()
    }

    /// The probe line for the given server host.
    pub fn probe(&self, host: &str) -> Command {
        Command::Pong(self.param.clone().unwrap_or_else(|| host.to_owned()))
    }

    /// Resolve on the next tick. Cancel safe.
    pub async fn tick(&mut self) {
        self.timer.expired().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn test_probe_defaults_to_host() {
        let keepalive = KeepAlive::new(Duration::from_secs(120), None);
        assert_eq!(
            keepalive.probe("irc.example.net").to_string(),
            "PONG irc.example.net"
        );
    }

    #[test]
    fn test_probe_uses_configured_param() {
        let keepalive = KeepAlive::new(Duration::from_secs(120), Some("alive".into()));
        assert_eq!(keepalive.probe("irc.example.net").to_string(), "PONG alive");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_repeat_until_stopped() {
        let mut keepalive = KeepAlive::new(Duration::from_secs(120), None);
        keepalive.start();
        let started = Instant::now();
        keepalive.tick().await;
        keepalive.tick().await;
        assert_eq!(started.elapsed(), Duration::from_secs(240));
        keepalive.stop();
        assert!(!keepalive.is_running());
    }
}
