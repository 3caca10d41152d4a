use chrono::{DateTime, Days, Local, LocalResult, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};

/// A wall-clock time of day at which a daily job becomes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTrigger {
    at: NaiveTime,
}

impl DailyTrigger {
    #[must_use]
    pub const fn new(at: NaiveTime) -> Self {
        Self { at }
    }

    #[must_use]
    pub const fn at(&self) -> NaiveTime {
        self.at
    }

    /// The next occurrence of the trigger time strictly after `now`.
    ///
    /// An ambiguous local time (clocks turned back) resolves to its earlier instant. A local
    /// time skipped by a forward transition resolves to one hour later.
    #[must_use]
    pub fn next_after(&self, now: DateTime<Local>) -> DateTime<Local> {
        let today = now.date_naive();

        let candidate = resolve_local(today.and_time(self.at));
        if candidate > now {
            return candidate;
        }

        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        resolve_local(tomorrow.and_time(self.at))
    }
}

fn resolve_local(naive: NaiveDateTime) -> DateTime<Local> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(time) | LocalResult::Ambiguous(time, _) => time,
        LocalResult::None => {
            let shifted = naive + TimeDelta::hours(1);
            Local
                .from_local_datetime(&shifted)
                .earliest()
                .unwrap_or_else(|| Local.from_utc_datetime(&naive))
        }
    }
}
