//! Minimum-interval pacing of registry requests.

use super::clock::Clock;
use chrono::{DateTime, Local, TimeDelta};
use core::time::Duration;
use std::sync::Arc;

const LOG_TARGET: &str = " throttler";

/// Spaces out successive requests by a minimum interval.
///
/// Call [`Throttler::acquire`] before each request. The first call returns immediately; each
/// later call waits until at least `interval` has passed since the previous call returned.
/// Time comes from the injected [`Clock`], so tests can observe the waits without sleeping.
#[derive(Debug)]
pub struct Throttler {
    interval: Duration,
    clock: Arc<dyn Clock>,
    last: Option<DateTime<Local>>,
}

impl Throttler {
    #[must_use]
    pub fn new(interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            interval,
            clock,
            last: None,
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next request may be issued.
    pub async fn acquire(&mut self) {
        if let Some(wait) = self.remaining_wait() {
            log::trace!(target: LOG_TARGET, "Throttling for {}ms", wait.as_millis());
            self.clock.sleep(wait).await;
        }

        self.last = Some(self.clock.now());
    }

    fn remaining_wait(&self) -> Option<Duration> {
        let last = self.last?;
        let interval = TimeDelta::from_std(self.interval).ok()?;
        let ready_at = last.checked_add_signed(interval)?;

        (ready_at - self.clock.now()).to_std().ok().filter(|wait| !wait.is_zero())
    }
}
