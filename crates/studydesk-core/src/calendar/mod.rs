//! Date-keyed event log.
//!
//! Each calendar date maps to the events of that day, kept sorted by
//! `HH:MM` time. A date whose last event is removed disappears from the log.

mod grid;

pub use grid::{DayCell, MonthCursor, MonthGrid};

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::state::{Slice, StateStore};

/// One entry on a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Zero-padded `HH:MM`
    pub time: String,
    pub title: String,
    #[serde(default)]
    pub desc: String,
}

/// The events slice.
pub type EventLog = BTreeMap<NaiveDate, Vec<CalendarEvent>>;

/// CRUD over the events slice.
pub struct Calendar<'a> {
    state: &'a mut StateStore,
}

impl<'a> Calendar<'a> {
    pub fn new(state: &'a mut StateStore) -> Self {
        Self { state }
    }

    /// Add an event and re-sort the day. Blank time or title is ignored and
    /// reported as `false`.
    pub fn add_event(
        &mut self,
        date: NaiveDate,
        time: &str,
        title: &str,
        desc: &str,
    ) -> Result<bool, StorageError> {
        let (time, title) = (time.trim(), title.trim());
        if time.is_empty() || title.is_empty() {
            return Ok(false);
        }

        let day = self.state.events.entry(date).or_default();
        day.push(CalendarEvent {
            time: time.to_string(),
            title: title.to_string(),
            desc: desc.trim().to_string(),
        });
        sort_day(day);

        self.state.save(Slice::Events)?;
        tracing::debug!(%date, time, "event added");
        Ok(true)
    }

    /// Remove the event at `index` of the day's sorted list.
    pub fn delete_event(&mut self, date: NaiveDate, index: usize) -> Result<bool, StorageError> {
        let Some(day) = self.state.events.get_mut(&date) else {
            return Ok(false);
        };
        if index >= day.len() {
            return Ok(false);
        }
        day.remove(index);
        if day.is_empty() {
            self.state.events.remove(&date);
        }

        self.state.save(Slice::Events)?;
        tracing::debug!(%date, index, "event deleted");
        Ok(true)
    }

    pub fn events_on(&self, date: NaiveDate) -> &[CalendarEvent] {
        events_on(&self.state.events, date)
    }
}

// Lexical order is chronological for zero-padded HH:MM. Stable, so equal
// times keep insertion order.
fn sort_day(day: &mut [CalendarEvent]) {
    day.sort_by(|a, b| a.time.cmp(&b.time));
}

/// Bring a log read from outside (storage, an import) in line with what
/// [`Calendar`] maintains: every day sorted by time, no empty days.
pub(crate) fn normalize_events(log: &mut EventLog) {
    log.retain(|_, day| !day.is_empty());
    for day in log.values_mut() {
        sort_day(day);
    }
}

/// Sorted events of a day; empty when the day has none.
pub fn events_on(log: &EventLog, date: NaiveDate) -> &[CalendarEvent] {
    log.get(&date).map(Vec::as_slice).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::{KvStore, MemoryStore};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn state() -> StateStore {
        let clock = FixedClock::new(date(2026, 2, 1));
        StateStore::load(Box::new(MemoryStore::new()), &clock).unwrap()
    }

    #[test]
    fn first_event_creates_the_day() {
        let mut state = state();
        let day = date(2026, 2, 3);
        assert!(Calendar::new(&mut state)
            .add_event(day, "09:00", "Lab", "bring goggles")
            .unwrap());
        assert_eq!(state.events().len(), 1);
        assert_eq!(state.events()[&day].len(), 1);
    }

    #[test]
    fn events_are_sorted_by_time() {
        let mut state = state();
        let day = date(2026, 2, 3);
        let mut cal = Calendar::new(&mut state);
        cal.add_event(day, "14:30", "Tutoring", "").unwrap();
        cal.add_event(day, "08:05", "Quiz", "").unwrap();
        cal.add_event(day, "10:00", "Office hours", "").unwrap();

        let times: Vec<&str> = cal.events_on(day).iter().map(|e| e.time.as_str()).collect();
        assert_eq!(times, vec!["08:05", "10:00", "14:30"]);
    }

    #[test]
    fn blank_time_or_title_is_ignored() {
        let mut state = state();
        let day = date(2026, 2, 3);
        let mut cal = Calendar::new(&mut state);
        assert!(!cal.add_event(day, "", "Lab", "").unwrap());
        assert!(!cal.add_event(day, "09:00", "  ", "").unwrap());
        assert!(state.events().is_empty());
        assert!(state.backend().get(Slice::Events.key()).unwrap().is_none());
    }

    #[test]
    fn deleting_last_event_removes_the_day() {
        let mut state = state();
        let day = date(2026, 2, 3);
        let mut cal = Calendar::new(&mut state);
        cal.add_event(day, "09:00", "Lab", "").unwrap();
        cal.add_event(day, "11:00", "Seminar", "").unwrap();

        assert!(cal.delete_event(day, 0).unwrap());
        assert_eq!(cal.events_on(day)[0].title, "Seminar");
        assert!(cal.delete_event(day, 0).unwrap());

        assert!(!state.events().contains_key(&day));
        let stored = state.backend().get(Slice::Events.key()).unwrap().unwrap();
        assert_eq!(stored, "{}");
    }

    #[test]
    fn delete_out_of_range_is_noop() {
        let mut state = state();
        let day = date(2026, 2, 3);
        let mut cal = Calendar::new(&mut state);
        cal.add_event(day, "09:00", "Lab", "").unwrap();
        assert!(!cal.delete_event(day, 3).unwrap());
        assert!(!cal.delete_event(date(2026, 2, 4), 0).unwrap());
        assert_eq!(cal.events_on(day).len(), 1);
    }

    #[test]
    fn unknown_day_has_no_events() {
        let log = EventLog::new();
        assert!(events_on(&log, date(2026, 1, 1)).is_empty());
    }
}
