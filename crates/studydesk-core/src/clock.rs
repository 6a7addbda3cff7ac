//! Source of "now" for the whole library.
//!
//! Everything that depends on the current date (rollover, overdue checks,
//! task ids) reads it through a [`Clock`] so tests can pin the calendar.

use chrono::{Local, NaiveDate};

pub trait Clock {
    /// Current local calendar date.
    fn today(&self) -> NaiveDate;

    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// Wall clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// A clock frozen at a given date and instant. Tests move it by hand.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub date: NaiveDate,
    pub epoch_ms: u64,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        let epoch_ms = date
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis().max(0) as u64)
            .unwrap_or(0);
        Self { date, epoch_ms }
    }

    /// Move to the next calendar day.
    pub fn advance_day(&mut self) {
        if let Some(next) = self.date.succ_opt() {
            self.date = next;
        }
        self.epoch_ms += 86_400_000;
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }

    fn now_ms(&self) -> u64 {
        self.epoch_ms
    }
}
