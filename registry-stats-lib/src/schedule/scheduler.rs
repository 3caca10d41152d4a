use super::trigger::DailyTrigger;
use crate::registry::Clock;
use chrono::{DateTime, Local};
use core::time::Duration;
use std::sync::Arc;

const LOG_TARGET: &str = " scheduler";

/// Lifecycle of a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for the registered trigger.
    Idle,

    /// Executing one job cycle.
    Running,

    /// Shut down. Terminal.
    Stopped,
}

/// Runs a job immediately and then once per day, until shut down.
///
/// Cycles never overlap. A cycle that outlasts the poll interval just delays the next check.
#[derive(Debug)]
pub struct Scheduler {
    clock: Arc<dyn Clock>,
    trigger: DailyTrigger,
    poll_interval: Duration,
    state: SchedulerState,
    next_run: Option<DateTime<Local>>,
}

impl Scheduler {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, trigger: DailyTrigger, poll_interval: Duration) -> Self {
        Self {
            clock,
            trigger,
            poll_interval,
            state: SchedulerState::Idle,
            next_run: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    /// When the registered trigger is due, if one is registered.
    #[must_use]
    pub const fn next_run(&self) -> Option<DateTime<Local>> {
        self.next_run
    }

    /// Run `job` now and at every following trigger, until `shutdown` completes.
    ///
    /// Shutdown takes effect at the next await point, even in the middle of a cycle.
    pub async fn run<F, Fut, S>(&mut self, mut job: F, shutdown: S)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
        S: Future<Output = ()>,
    {
        tokio::select! {
            biased;

            () = shutdown => {}
            () = self.drive(&mut job) => {}
        }

        self.state = SchedulerState::Stopped;
        self.next_run = None;
        log::info!(target: LOG_TARGET, "Scheduler stopped");
    }

    async fn drive<F, Fut>(&mut self, job: &mut F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        self.run_cycle(job).await;

        loop {
            self.clock.sleep(self.poll_interval).await;

            if self.is_due() {
                self.run_cycle(job).await;
            }
        }
    }

    async fn run_cycle<F, Fut>(&mut self, job: &mut F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        self.state = SchedulerState::Running;
        job().await;

        let next = self.trigger.next_after(self.clock.now());
        log::info!(target: LOG_TARGET, "Next run scheduled for {}", next.format("%Y-%m-%d %H:%M:%S"));

        self.next_run = Some(next);
        self.state = SchedulerState::Idle;
    }

    fn is_due(&self) -> bool {
        self.next_run.is_some_and(|next| self.clock.now() >= next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ManualClock;
    use chrono::{NaiveTime, TimeZone};
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    /// Completes once `counter` reaches `target`, yielding to the scheduler until then.
    async fn after_runs(counter: Arc<AtomicUsize>, target: usize) {
        while counter.load(Ordering::SeqCst) < target {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_runs_immediately_then_at_each_midnight() {
        let clock = ManualClock::new(local(2024, 1, 15, 10));
        let mut scheduler = Scheduler::new(Arc::new(clock.clone()), DailyTrigger::new(NaiveTime::MIN), Duration::from_secs(60));

        let run_times = Arc::new(Mutex::new(Vec::new()));
        let counter = Arc::new(AtomicUsize::new(0));

        let job = {
            let run_times = Arc::clone(&run_times);
            let counter = Arc::clone(&counter);
            let clock = clock.clone();
            move || {
                let run_times = Arc::clone(&run_times);
                let counter = Arc::clone(&counter);
                let now = clock.now();
                async move {
                    run_times.lock().unwrap().push(now);
                    let _ = counter.fetch_add(1, Ordering::SeqCst);
                }
            }
        };

        scheduler.run(job, after_runs(Arc::clone(&counter), 3)).await;

        assert_eq!(
            *run_times.lock().unwrap(),
            vec![local(2024, 1, 15, 10), local(2024, 1, 16, 0), local(2024, 1, 17, 0)]
        );
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert_eq!(scheduler.next_run(), None);
        assert!(clock.sleeps().iter().all(|d| *d == Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn test_first_poll_follows_first_run() {
        let clock = ManualClock::new(local(2024, 1, 15, 10));
        let mut scheduler = Scheduler::new(Arc::new(clock.clone()), DailyTrigger::new(NaiveTime::MIN), Duration::from_secs(60));

        let observed = Arc::new(Mutex::new(None));
        let counter = Arc::new(AtomicUsize::new(0));

        let job = {
            let counter = Arc::clone(&counter);
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    let _ = counter.fetch_add(1, Ordering::SeqCst);
                }
            }
        };

        let shutdown = {
            let observed = Arc::clone(&observed);
            let clock = clock.clone();
            let counter = Arc::clone(&counter);
            async move {
                after_runs(counter, 1).await;
                while clock.sleeps().is_empty() {
                    tokio::task::yield_now().await;
                }
                *observed.lock().unwrap() = Some(clock.now());
            }
        };

        scheduler.run(job, shutdown).await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(*observed.lock().unwrap(), Some(local(2024, 1, 15, 10) + chrono::TimeDelta::seconds(60)));
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(60)]);
    }

    #[tokio::test]
    async fn test_shutdown_before_start_skips_the_job() {
        let clock = ManualClock::new(local(2024, 1, 15, 10));
        let mut scheduler = Scheduler::new(Arc::new(clock.clone()), DailyTrigger::new(NaiveTime::MIN), Duration::from_secs(60));
        let counter = Arc::new(AtomicUsize::new(0));

        let job = {
            let counter = Arc::clone(&counter);
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    let _ = counter.fetch_add(1, Ordering::SeqCst);
                }
            }
        };

        scheduler.run(job, core::future::ready(())).await;

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_during_a_cycle_stops() {
        let clock = ManualClock::new(local(2024, 1, 15, 10));
        let mut scheduler = Scheduler::new(Arc::new(clock.clone()), DailyTrigger::new(NaiveTime::MIN), Duration::from_secs(60));
        let started = Arc::new(AtomicUsize::new(0));

        let job = {
            let started = Arc::clone(&started);
            move || {
                let started = Arc::clone(&started);
                async move {
                    let _ = started.fetch_add(1, Ordering::SeqCst);
                    core::future::pending::<()>().await;
                }
            }
        };

        scheduler.run(job, after_runs(Arc::clone(&started), 1)).await;

        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert_eq!(scheduler.next_run(), None);
    }

    #[test]
    fn test_new_scheduler_is_idle() {
        let clock = ManualClock::new(local(2024, 1, 15, 10));
        let scheduler = Scheduler::new(Arc::new(clock), DailyTrigger::new(NaiveTime::MIN), Duration::from_secs(60));

        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.next_run(), None);
    }
}
