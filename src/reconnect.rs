//! Reconnect scheduling with linear backoff.

use std::time::Duration;
use tracing::info;

use crate::timer::{Timer, TimerMode};

/// Single-shot reconnect timer whose delay grows with each attempt.
///
/// The k-th schedule since the last [`reset`](Self::reset) waits
/// `base × k`. Scheduling while armed updates the pending delay in place
/// rather than stacking a second timer.
#[derive(Debug)]
pub struct ReconnectScheduler {
    base: Duration,
    attempts: u32,
    timer: Timer,
}

impl ReconnectScheduler {
    pub fn new(base: Duration) -> Self {
        Self {
            base,
            attempts: 0,
            timer: Timer::new("reconnect", base, TimerMode::OneShot),
        }
    }

    /// Arm (or re-arm) the timer with the next backoff delay.
    pub fn schedule(&mut self) -> Duration {
        self.attempts += 1;
        let delay = self.base.saturating_mul(self.attempts);
        self.timer.set_interval(delay);
        self.timer.start();
        info!(
            attempt = self.attempts,
            delay_secs = delay.as_secs(),
            "Reconnect scheduled"
        );
        delay
    }

    /// Back to the base delay; called once registration completes.
    pub fn reset(&mut self) {
        self.attempts = 0;
        self.timer.stop();
        self.timer.set_interval(self.base);
    }

    pub fn stop(&mut self) {
        self.timer.stop();
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Delay of the most recent schedule.
    pub fn delay(&self) -> Duration {
        self.timer.interval()
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.timer.remaining()
    }

    /// Resolve when the pending reconnect is due. Cancel safe.
    pub async fn expired(&mut self) {
        self.timer.expired().await;
    }
}
