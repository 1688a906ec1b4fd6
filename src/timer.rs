//! Re-armable timers on the tokio clock.
//!
//! A [`Timer`] is a plain value owned by the connection actor. It does not
//! spawn anything: the owner awaits [`Timer::expired`] inside its event
//! loop, so an unarmed timer costs nothing and stopping one is just clearing
//! its deadline.

use std::future::pending;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Deadline used when an interval would overflow the clock.
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86400 * 365 * 30)
}

fn deadline_after(from: Instant, interval: Duration) -> Instant {
    from.checked_add(interval).unwrap_or_else(far_future)
}

/// Whether a timer disarms or re-arms itself after firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    OneShot,
    Repeating,
}

/// A single timer with `start`, `stop`, `set_interval` and `remaining`.
#[derive(Debug)]
pub struct Timer {
    label: &'static str,
    interval: Duration,
    mode: TimerMode,
    deadline: Option<Instant>,
}

impl Timer {
    pub fn new(label: &'static str, interval: Duration, mode: TimerMode) -> Self {
        Self {
            label,
            interval,
            mode,
            deadline: None,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Arm the timer one interval from now. Restarts an armed timer.
    pub fn start(&mut self) {
        self.deadline = Some(deadline_after(Instant::now(), self.interval));
    }

    pub fn stop(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the interval. An armed timer is re-armed with the new interval
    /// counted from now; an idle timer stays idle.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
        if self.is_armed() {
            self.start();
        }
    }

    /// Time left before the timer fires, if armed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Resolve when the timer fires. Never resolves while unarmed.
    ///
    /// Cancel safe: dropping the future before it resolves leaves the
    /// deadline untouched.
    pub async fn expired(&mut self) {
        let Some(deadline) = self.deadline else {
            return pending().await;
        };
        sleep_until(deadline).await;
        self.deadline = match self.mode {
            TimerMode::OneShot => None,
            TimerMode::Repeating => Some(deadline_after(deadline, self.interval)),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, timeout};

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_fires_once() {
        let mut timer = Timer::new("test", Duration::from_secs(5), TimerMode::OneShot);
        timer.start();
        timer.expired().await;
        assert!(!timer.is_armed());
        assert!(
            timeout(Duration::from_secs(60), timer.expired())
                .await
                .is_err()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeating_rearms() {
        let mut timer = Timer::new("test", Duration::from_secs(10), TimerMode::Repeating);
        timer.start();
        let started = Instant::now();
        timer.expired().await;
        timer.expired().await;
        assert_eq!(started.elapsed(), Duration::from_secs(20));
        assert!(timer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unarmed_never_fires() {
        let mut timer = Timer::new("test", Duration::from_secs(1), TimerMode::OneShot);
        assert!(timer.remaining().is_none());
        assert!(timeout(Duration::from_secs(10), timer.expired()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_interval_rearms_in_place() {
        let mut timer = Timer::new("test", Duration::from_secs(5), TimerMode::OneShot);
        timer.start();
        advance(Duration::from_secs(3)).await;
        timer.set_interval(Duration::from_secs(10));
        assert_eq!(timer.remaining(), Some(Duration::from_secs(10)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_interval_on_idle_timer_stays_idle() {
        let mut timer = Timer::new("test", Duration::from_secs(5), TimerMode::OneShot);
        timer.set_interval(Duration::from_secs(10));
        assert!(!timer.is_armed());
        assert_eq!(timer.interval(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overflowing_interval_stays_armed() {
        let mut timer = Timer::new("test", Duration::MAX, TimerMode::OneShot);
        timer.start();
        assert!(timer.is_armed());
        assert!(timeout(Duration::from_secs(60), timer.expired()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_wait_keeps_deadline() {
        let mut timer = Timer::new("test", Duration::from_secs(5), TimerMode::OneShot);
        timer.start();
        assert!(timeout(Duration::from_secs(2), timer.expired()).await.is_err());
        assert_eq!(timer.remaining(), Some(Duration::from_secs(3)));
    }
}
