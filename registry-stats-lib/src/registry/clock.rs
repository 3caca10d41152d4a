//! Wall-clock time and sleeping behind a trait, so pacing and scheduling can run on virtual time.

use chrono::{DateTime, Local};
use core::time::Duration;
use futures::future::BoxFuture;

/// Source of the current time and of timed waits.
pub trait Clock: Send + Sync + core::fmt::Debug {
    /// Current local wall-clock time.
    fn now(&self) -> DateTime<Local>;

    /// Wait until `duration` has elapsed.
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// The real clock: chrono local time and tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

#[cfg(any(debug_assertions, test))]
pub use manual::ManualClock;

#[cfg(any(debug_assertions, test))]
mod manual {
    use super::Clock;
    use chrono::{DateTime, Local, TimeDelta};
    use core::time::Duration;
    use futures::future::BoxFuture;
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    struct ManualState {
        now: DateTime<Local>,
        sleeps: Vec<Duration>,
    }

    /// A virtual clock for tests.
    ///
    /// Sleeping advances the virtual time by the requested amount immediately and records the
    /// duration. The returned future yields once so that competing futures (such as a shutdown
    /// signal in a `select!`) still get polled.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        state: Arc<Mutex<ManualState>>,
    }

    impl ManualClock {
        #[must_use]
        pub fn new(start: DateTime<Local>) -> Self {
            Self {
                state: Arc::new(Mutex::new(ManualState {
                    now: start,
                    sleeps: Vec::new(),
                })),
            }
        }

        /// Move virtual time forward without recording a sleep.
        pub fn advance(&self, duration: Duration) {
            let mut state = self.state.lock().expect("lock poisoned");
            state.now = add(state.now, duration);
        }

        /// Every duration passed to [`Clock::sleep`], in call order.
        #[must_use]
        pub fn sleeps(&self) -> Vec<Duration> {
            self.state.lock().expect("lock poisoned").sleeps.clone()
        }

        #[must_use]
        pub fn total_slept(&self) -> Duration {
            self.state.lock().expect("lock poisoned").sleeps.iter().sum()
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Local> {
            self.state.lock().expect("lock poisoned").now
        }

        fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
            {
                let mut state = self.state.lock().expect("lock poisoned");
                state.now = add(state.now, duration);
                state.sleeps.push(duration);
            }

            Box::pin(tokio::task::yield_now())
        }
    }

    fn add(time: DateTime<Local>, duration: Duration) -> DateTime<Local> {
        TimeDelta::from_std(duration)
            .ok()
            .and_then(|delta| time.checked_add_signed(delta))
            .unwrap_or(time)
    }
}
