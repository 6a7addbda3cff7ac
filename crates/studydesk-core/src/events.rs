use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, Rollover};

/// Every state change of the pomodoro engine produces an Event.
/// Front ends render them; phase-end sounds and notifications hang off
/// `PhaseCompleted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        time_left_secs: u32,
        /// True when continuing a partially elapsed phase
        resumed: bool,
        rollover: Option<Rollover>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    PhaseCompleted {
        finished: Phase,
        next: Phase,
        /// Hours credited to today, zero for a break
        hours_credited: f64,
        daily_hours: f64,
        rollover: Option<Rollover>,
        at: DateTime<Utc>,
    },
    ZenStarted {
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    ZenStopped {
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    /// The zen countdown ran out. Credits nothing.
    ZenCompleted {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        time_left_secs: u32,
        is_paused: bool,
        daily_hours: f64,
        goal_hours: f64,
        goal_pct: f64,
        streak: u32,
        at: DateTime<Utc>,
    },
}
