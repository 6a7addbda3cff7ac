//! Study resources (video links, tips) and the weekly class schedule.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::state::{Slice, StateStore};

/// The resources slice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// One class in the weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSlot {
    pub time: String,
    pub subject: String,
}

/// The schedule slice: weekday name to classes, in insertion order.
pub type Schedule = IndexMap<String, Vec<ClassSlot>>;

/// The week a fresh install starts with.
pub fn default_schedule() -> Schedule {
    fn day(classes: &[(&str, &str)]) -> Vec<ClassSlot> {
        classes
            .iter()
            .map(|(time, subject)| ClassSlot {
                time: time.to_string(),
                subject: subject.to_string(),
            })
            .collect()
    }

    let mut week = Schedule::new();
    week.insert(
        "monday".into(),
        day(&[
            ("07:00", "Advanced Mathematics"),
            ("08:30", "Physics"),
            ("10:00", "Theory of Knowledge"),
            ("11:30", "English"),
        ]),
    );
    week.insert(
        "tuesday".into(),
        day(&[
            ("07:00", "History"),
            ("08:30", "Chemistry"),
            ("10:00", "Personal Project"),
            ("11:30", "Spanish"),
        ]),
    );
    week.insert(
        "wednesday".into(),
        day(&[
            ("07:00", "Biology"),
            ("08:30", "Economics"),
            ("10:00", "Philosophy"),
            ("11:30", "Art"),
        ]),
    );
    week.insert(
        "thursday".into(),
        day(&[
            ("07:00", "Literature"),
            ("08:30", "Computer Science"),
            ("10:00", "Debate"),
            ("11:30", "Physical Education"),
        ]),
    );
    week.insert(
        "friday".into(),
        day(&[
            ("07:00", "Weekly Review"),
            ("09:00", "Mentoring"),
            ("11:00", "Extracurricular Activities"),
        ]),
    );
    week.insert("saturday".into(), day(&[("09:00", "Creative Workshop")]));
    week.insert("sunday".into(), Vec::new());
    week
}

/// Edits to the resources and schedule slices.
///
/// Blank input is ignored; out-of-range indexes do nothing.
pub struct ResourceLibrary<'a> {
    state: &'a mut StateStore,
}

impl<'a> ResourceLibrary<'a> {
    pub fn new(state: &'a mut StateStore) -> Self {
        Self { state }
    }

    pub fn add_video(&mut self, url: &str) -> Result<bool, StorageError> {
        let url = url.trim();
        if url.is_empty() {
            return Ok(false);
        }
        self.state.resources.videos.push(url.to_string());
        self.state.save(Slice::Resources)?;
        Ok(true)
    }

    pub fn delete_video(&mut self, index: usize) -> Result<bool, StorageError> {
        if index >= self.state.resources.videos.len() {
            return Ok(false);
        }
        self.state.resources.videos.remove(index);
        self.state.save(Slice::Resources)?;
        Ok(true)
    }

    pub fn add_tip(&mut self, text: &str) -> Result<bool, StorageError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        self.state.resources.tips.push(text.to_string());
        self.state.save(Slice::Resources)?;
        Ok(true)
    }

    pub fn delete_tip(&mut self, index: usize) -> Result<bool, StorageError> {
        if index >= self.state.resources.tips.len() {
            return Ok(false);
        }
        self.state.resources.tips.remove(index);
        self.state.save(Slice::Resources)?;
        Ok(true)
    }

    /// Append a class to a day, creating the day if needed. Day names and
    /// time order are taken as given.
    pub fn add_schedule_entry(&mut self, day: &str, time: &str, subject: &str) -> Result<bool, StorageError> {
        let (day, time, subject) = (day.trim(), time.trim(), subject.trim());
        if day.is_empty() || time.is_empty() || subject.is_empty() {
            return Ok(false);
        }
        self.state
            .schedule
            .entry(day.to_string())
            .or_default()
            .push(ClassSlot {
                time: time.to_string(),
                subject: subject.to_string(),
            });
        self.state.save(Slice::Schedule)?;
        tracing::debug!(day, time, "schedule entry added");
        Ok(true)
    }
}
