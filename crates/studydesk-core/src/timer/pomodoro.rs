use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Longest work or break interval, in minutes.
pub const MAX_INTERVAL_MINUTES: u32 = 24 * 60;

/// Pomodoro durations and the daily study goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PomodoroConfig {
    /// Work interval in minutes
    #[serde(default = "default_work")]
    pub work: u32,
    /// Break interval in minutes
    #[serde(rename = "break", default = "default_break")]
    pub break_minutes: u32,
    /// Daily goal in hours
    #[serde(default = "default_goal")]
    pub goal: f64,
}

fn default_work() -> u32 {
    25
}
fn default_break() -> u32 {
    5
}
fn default_goal() -> f64 {
    1.5
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work: default_work(),
            break_minutes: default_break(),
            goal: default_goal(),
        }
    }
}

impl PomodoroConfig {
    /// # Errors
    /// Returns an error for intervals outside one minute to one day, or a
    /// negative or non-finite goal.
    pub fn new(work: u32, break_minutes: u32, goal: f64) -> Result<Self, ValidationError> {
        let config = Self {
            work,
            break_minutes,
            goal,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check a config that did not come through [`new`](Self::new), such as
    /// one read back from storage.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_interval("work", self.work)?;
        check_interval("break", self.break_minutes)?;
        if !self.goal.is_finite() || self.goal < 0.0 {
            return Err(ValidationError::invalid("goal", "must be a non-negative number of hours"));
        }
        Ok(())
    }

    pub fn phase_secs(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work.saturating_mul(60),
            Phase::Break => self.break_minutes.saturating_mul(60),
        }
    }

    /// Hours credited for one finished work phase.
    pub fn work_hours(&self) -> f64 {
        self.work as f64 / 60.0
    }
}

fn check_interval(field: &str, minutes: u32) -> Result<(), ValidationError> {
    if minutes == 0 {
        return Err(ValidationError::invalid(field, "must be at least one minute"));
    }
    if minutes > MAX_INTERVAL_MINUTES {
        return Err(ValidationError::invalid(
            field,
            format!("must be at most {MAX_INTERVAL_MINUTES} minutes"),
        ));
    }
    Ok(())
}

/// One of the two alternating intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    pub fn other(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Phase::Work => "work",
            Phase::Break => "break",
        })
    }
}
