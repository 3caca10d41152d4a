//! Recurring execution of the daily report
//!
//! The [`Scheduler`] runs a job once immediately, then once per day at the wall-clock time
//! of its [`DailyTrigger`]. Between runs it wakes every poll interval to check whether the
//! trigger is due. Time comes from an injected [`Clock`](crate::registry::Clock), so tests
//! drive whole days of scheduling on virtual time.
//!
//! A shutdown future passed to [`Scheduler::run`] stops the scheduler from any state.

mod scheduler;
mod trigger;

pub use scheduler::{Scheduler, SchedulerState};
pub use trigger::DailyTrigger;
