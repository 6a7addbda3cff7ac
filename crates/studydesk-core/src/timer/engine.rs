//! Pomodoro engine.
//!
//! A caller-driven state machine: the engine owns the transient timer state
//! and the guard of the single tick task, and the caller feeds it ticks.
//!
//! ## State Transitions
//!
//! ```text
//! Paused/Idle --start--> Running(work) --0s--> Running(break) --0s--> Running(work) ...
//!      ^                      |                      |
//!      +-------pause----------+----------------------+
//! reset: pause, then back to a full work phase
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = PomodoroEngine::new();
//! engine.start(&mut state, &clock, &mut ticker)?;
//! // For every tick the ticker delivers:
//! if engine.accepts(tick) {
//!     engine.tick(&mut state, &clock)?; // Some(Event::PhaseCompleted) at phase end
//! }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::pomodoro::{Phase, PomodoroConfig};
use super::ticker::{Tick, TickGuard, Ticker};
use crate::clock::Clock;
use crate::error::{Result, StorageError};
use crate::events::Event;
use crate::state::{Slice, StateStore};

/// Transient timer fields. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Seconds left in the current phase; zero before the first start
    pub time_left: u32,
    pub is_working: bool,
    pub is_paused: bool,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            time_left: 0,
            is_working: true,
            is_paused: true,
        }
    }
}

/// Core pomodoro engine.
#[derive(Default)]
pub struct PomodoroEngine {
    timer: TimerState,
    /// Some of the current phase has already ticked away
    phase_elapsed: bool,
    tick_task: Option<Box<dyn TickGuard>>,
}

impl std::fmt::Debug for PomodoroEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PomodoroEngine")
            .field("timer", &self.timer)
            .field("phase_elapsed", &self.phase_elapsed)
            .field(
                "tick_generation",
                &self.tick_task.as_ref().map(|t| t.generation()),
            )
            .finish()
    }
}

impl PomodoroEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timer(&self) -> TimerState {
        self.timer
    }

    pub fn phase(&self) -> Phase {
        if self.timer.is_working {
            Phase::Work
        } else {
            Phase::Break
        }
    }

    pub fn is_running(&self) -> bool {
        self.tick_task.is_some()
    }

    /// Whether a tick came from the task currently scheduled.
    pub fn accepts(&self, tick: Tick) -> bool {
        self.tick_task
            .as_ref()
            .is_some_and(|task| task.generation() == tick.generation)
    }

    /// `MM:SS` of the time left.
    pub fn format_time_left(&self) -> String {
        format!("{:02}:{:02}", self.timer.time_left / 60, self.timer.time_left % 60)
    }

    /// Build a full state snapshot event. Callers wanting fresh progress run
    /// [`StateStore::refresh_progress`] first.
    pub fn snapshot(&self, state: &StateStore) -> Event {
        let goal = state.pomodoro().goal;
        let progress = state.progress();
        Event::StateSnapshot {
            phase: self.phase(),
            time_left_secs: self.timer.time_left,
            is_paused: self.timer.is_paused,
            daily_hours: progress.daily.hours,
            goal_hours: goal,
            goal_pct: progress.goal_percentage(goal),
            streak: progress.streak,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume the current phase.
    ///
    /// A phase that has already ticked resumes where it stopped; otherwise
    /// the phase starts at its full configured duration. Any tick task
    /// already running is cancelled before the new one is scheduled.
    pub fn start(
        &mut self,
        state: &mut StateStore,
        clock: &dyn Clock,
        ticker: &mut dyn Ticker,
    ) -> Result<Event, StorageError> {
        let rollover = state.refresh_progress(clock.today())?;
        self.cancel_tick_task();

        let resumed = self.phase_elapsed && self.timer.time_left > 0;
        if !resumed {
            self.timer.time_left = state.pomodoro().phase_secs(self.phase());
        }
        self.timer.is_paused = false;
        self.tick_task = Some(ticker.every_second());

        tracing::debug!(phase = %self.phase(), time_left = self.timer.time_left, resumed, "timer started");
        Ok(Event::TimerStarted {
            phase: self.phase(),
            time_left_secs: self.timer.time_left,
            resumed,
            rollover,
            at: Utc::now(),
        })
    }

    /// Stop ticking. Resume with [`start`](Self::start).
    pub fn pause(&mut self) -> Event {
        self.cancel_tick_task();
        self.timer.is_paused = true;
        tracing::debug!(time_left = self.timer.time_left, "timer paused");
        Event::TimerPaused {
            time_left_secs: self.timer.time_left,
            at: Utc::now(),
        }
    }

    /// Pause, then return to a full work phase whatever phase was active.
    pub fn reset(&mut self, state: &StateStore) -> Event {
        self.pause();
        self.timer.is_working = true;
        self.timer.time_left = state.pomodoro().phase_secs(Phase::Work);
        self.phase_elapsed = false;
        tracing::debug!("timer reset");
        Event::TimerReset {
            time_left_secs: self.timer.time_left,
            at: Utc::now(),
        }
    }

    /// Advance one second. Returns `Some(Event::PhaseCompleted)` when the
    /// phase runs out. Ticks while paused are ignored.
    ///
    /// A finished work phase credits `work / 60` hours to today and writes
    /// the progress slice immediately.
    pub fn tick(&mut self, state: &mut StateStore, clock: &dyn Clock) -> Result<Option<Event>, StorageError> {
        if self.timer.is_paused {
            return Ok(None);
        }

        self.timer.time_left = self.timer.time_left.saturating_sub(1);
        if self.timer.time_left > 0 {
            self.phase_elapsed = true;
            return Ok(None);
        }

        let finished = self.phase();
        let config = *state.pomodoro();
        let hours_credited = match finished {
            Phase::Work => {
                let hours = config.work_hours();
                state.progress.add_hours(hours);
                state.save(Slice::Progress)?;
                hours
            }
            Phase::Break => 0.0,
        };

        self.timer.is_working = !self.timer.is_working;
        self.timer.time_left = config.phase_secs(self.phase());
        self.phase_elapsed = false;
        let rollover = state.refresh_progress(clock.today())?;

        tracing::info!(%finished, hours_credited, "phase completed");
        Ok(Some(Event::PhaseCompleted {
            finished,
            next: self.phase(),
            hours_credited,
            daily_hours: state.progress().daily.hours,
            rollover,
            at: Utc::now(),
        }))
    }

    /// Save new durations and goal. The running phase keeps its time left.
    ///
    /// # Errors
    /// Returns a validation error for zero-length intervals or a bad goal,
    /// without touching the stored configuration.
    pub fn configure(
        &self,
        state: &mut StateStore,
        work: u32,
        break_minutes: u32,
        goal: f64,
    ) -> Result<PomodoroConfig> {
        let config = PomodoroConfig::new(work, break_minutes, goal)?;
        state.pomodoro = config;
        state.save(Slice::Pomodoro)?;
        tracing::debug!(work, break_minutes, goal, "pomodoro configured");
        Ok(config)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn cancel_tick_task(&mut self) {
        if let Some(mut task) = self.tick_task.take() {
            task.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts live tick tasks.
    #[derive(Default)]
    struct ManualTicker {
        active: Rc<Cell<usize>>,
        issued: u64,
    }

    struct ManualGuard {
        generation: u64,
        active: Rc<Cell<usize>>,
        cancelled: bool,
    }

    impl TickGuard for ManualGuard {
        fn generation(&self) -> u64 {
            self.generation
        }

        fn cancel(&mut self) {
            if !self.cancelled {
                self.cancelled = true;
                self.active.set(self.active.get() - 1);
            }
        }
    }

    impl Ticker for ManualTicker {
        fn every_second(&mut self) -> Box<dyn TickGuard> {
            self.issued += 1;
            self.active.set(self.active.get() + 1);
            Box::new(ManualGuard {
                generation: self.issued,
                active: Rc::clone(&self.active),
                cancelled: false,
            })
        }
    }

    fn fixture() -> (StateStore, FixedClock) {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());
        let state = StateStore::load(Box::new(MemoryStore::new()), &clock).unwrap();
        (state, clock)
    }

    #[test]
    fn full_work_phase_credits_hours_and_flips_to_break() {
        let (mut state, clock) = fixture();
        let mut ticker = ManualTicker::default();
        let mut engine = PomodoroEngine::new();
        engine.start(&mut state, &clock, &mut ticker).unwrap();
        assert_eq!(engine.timer().time_left, 1500);

        let mut completed = Vec::new();
        for _ in 0..1500 {
            if let Some(event) = engine.tick(&mut state, &clock).unwrap() {
                completed.push(event);
            }
        }

        assert_eq!(completed.len(), 1);
        assert_eq!(state.progress().daily.hours, 25.0 / 60.0);
        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.timer().time_left, 300);
    }

    #[test]
    fn break_phase_credits_nothing() {
        let (mut state, clock) = fixture();
        let mut ticker = ManualTicker::default();
        let mut engine = PomodoroEngine::new();
        engine.start(&mut state, &clock, &mut ticker).unwrap();
        for _ in 0..1500 + 300 {
            engine.tick(&mut state, &clock).unwrap();
        }
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.timer().time_left, 1500);
        assert_eq!(state.progress().daily.hours, 25.0 / 60.0);
    }

    #[test]
    fn starting_twice_keeps_one_tick_task() {
        let (mut state, clock) = fixture();
        let mut ticker = ManualTicker::default();
        let active = Rc::clone(&ticker.active);
        let mut engine = PomodoroEngine::new();

        engine.start(&mut state, &clock, &mut ticker).unwrap();
        engine.start(&mut state, &clock, &mut ticker).unwrap();
        assert_eq!(active.get(), 1);
        assert!(engine.accepts(Tick { generation: 2 }));
        assert!(!engine.accepts(Tick { generation: 1 }));

        engine.pause();
        assert_eq!(active.get(), 0);
        assert!(!engine.accepts(Tick { generation: 2 }));
    }

    #[test]
    fn pause_then_start_resumes() {
        let (mut state, clock) = fixture();
        let mut ticker = ManualTicker::default();
        let mut engine = PomodoroEngine::new();
        engine.start(&mut state, &clock, &mut ticker).unwrap();
        for _ in 0..100 {
            engine.tick(&mut state, &clock).unwrap();
        }
        engine.pause();
        engine.tick(&mut state, &clock).unwrap();
        assert_eq!(engine.timer().time_left, 1400);

        match engine.start(&mut state, &clock, &mut ticker).unwrap() {
            Event::TimerStarted { resumed, time_left_secs, .. } => {
                assert!(resumed);
                assert_eq!(time_left_secs, 1400);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn reset_returns_to_work_from_break() {
        let (mut state, clock) = fixture();
        let mut ticker = ManualTicker::default();
        let mut engine = PomodoroEngine::new();
        engine.start(&mut state, &clock, &mut ticker).unwrap();
        for _ in 0..1510 {
            engine.tick(&mut state, &clock).unwrap();
        }
        assert_eq!(engine.phase(), Phase::Break);

        engine.reset(&state);
        assert!(!engine.is_running());
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.timer().time_left, 1500);
        assert!(engine.timer().is_paused);
    }

    #[test]
    fn start_after_reset_is_a_fresh_start() {
        let (mut state, clock) = fixture();
        let mut ticker = ManualTicker::default();
        let mut engine = PomodoroEngine::new();
        engine.reset(&state);

        match engine.start(&mut state, &clock, &mut ticker).unwrap() {
            Event::TimerStarted { resumed, time_left_secs, .. } => {
                assert!(!resumed);
                assert_eq!(time_left_secs, 1500);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn untouched_phase_picks_up_new_durations() {
        let (mut state, clock) = fixture();
        let mut ticker = ManualTicker::default();
        let mut engine = PomodoroEngine::new();
        engine.reset(&state);
        engine.configure(&mut state, 50, 10, 1.5).unwrap();

        engine.start(&mut state, &clock, &mut ticker).unwrap();
        assert_eq!(engine.timer().time_left, 3000);
    }

    #[test]
    fn start_rolls_over_a_stale_day() {
        let (mut state, mut clock) = fixture();
        state.progress.daily.hours = 2.0;
        clock.advance_day();

        let mut ticker = ManualTicker::default();
        let event = PomodoroEngine::new()
            .start(&mut state, &clock, &mut ticker)
            .unwrap();
        match event {
            Event::TimerStarted { rollover: Some(r), .. } => {
                assert!(r.goal_met);
                assert_eq!(r.finished_hours, 2.0);
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(state.progress().streak, 1);
        assert_eq!(state.progress().daily.hours, 0.0);
    }

    #[test]
    fn configure_validates_before_saving() {
        let (mut state, _clock) = fixture();
        let engine = PomodoroEngine::new();
        assert!(engine.configure(&mut state, 0, 5, 1.0).is_err());
        assert_eq!(*state.pomodoro(), PomodoroConfig::default());

        engine.configure(&mut state, 50, 10, 3.0).unwrap();
        assert_eq!(state.pomodoro().work, 50);
    }

    #[test]
    fn time_left_formats_as_minutes_and_seconds() {
        let (mut state, clock) = fixture();
        let mut ticker = ManualTicker::default();
        let mut engine = PomodoroEngine::new();
        assert_eq!(engine.format_time_left(), "00:00");
        engine.start(&mut state, &clock, &mut ticker).unwrap();
        engine.tick(&mut state, &clock).unwrap();
        assert_eq!(engine.format_time_left(), "24:59");
    }
}
