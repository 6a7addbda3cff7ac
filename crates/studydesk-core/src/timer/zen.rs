//! Zen mode: a fixed 25-minute focus countdown.
//!
//! Runs on the same [`Ticker`] as the pomodoro engine but owns no state
//! slice. Finishing it credits no hours and leaves the streak alone.

use chrono::Utc;

use super::ticker::{Tick, TickGuard, Ticker};
use crate::events::Event;

/// Length of a zen session in seconds.
pub const ZEN_SECS: u32 = 25 * 60;

#[derive(Default)]
pub struct ZenCountdown {
    time_left: u32,
    tick_task: Option<Box<dyn TickGuard>>,
}

impl std::fmt::Debug for ZenCountdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZenCountdown")
            .field("time_left", &self.time_left)
            .field("running", &self.tick_task.is_some())
            .finish()
    }
}

impl ZenCountdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_running(&self) -> bool {
        self.tick_task.is_some()
    }

    pub fn accepts(&self, tick: Tick) -> bool {
        self.tick_task
            .as_ref()
            .is_some_and(|task| task.generation() == tick.generation)
    }

    /// `M:SS`, as the zen overlay shows it.
    pub fn format_time_left(&self) -> String {
        format!("{}:{:02}", self.time_left / 60, self.time_left % 60)
    }

    /// Start a full session. A session already running starts over.
    pub fn start(&mut self, ticker: &mut dyn Ticker) -> Event {
        self.stop_ticking();
        self.time_left = ZEN_SECS;
        self.tick_task = Some(ticker.every_second());
        tracing::debug!("zen started");
        Event::ZenStarted {
            time_left_secs: self.time_left,
            at: Utc::now(),
        }
    }

    /// Leave zen mode early.
    pub fn stop(&mut self) -> Event {
        self.stop_ticking();
        tracing::debug!(time_left = self.time_left, "zen stopped");
        Event::ZenStopped {
            time_left_secs: self.time_left,
            at: Utc::now(),
        }
    }

    /// Advance one second. Returns `Some(Event::ZenCompleted)` once, when
    /// the countdown reaches zero; the tick task is stopped then.
    pub fn tick(&mut self) -> Option<Event> {
        if self.tick_task.is_none() {
            return None;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left > 0 {
            return None;
        }
        self.stop_ticking();
        tracing::info!("zen completed");
        Some(Event::ZenCompleted { at: Utc::now() })
    }

    fn stop_ticking(&mut self) {
        if let Some(mut task) = self.tick_task.take() {
            task.cancel();
        }
    }
}
