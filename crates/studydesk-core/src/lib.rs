//! # Studydesk Core Library
//!
//! Business logic for the studydesk student dashboard: a task board, a
//! calendar, a pomodoro timer with daily goal tracking, a resource library
//! and the weekly class schedule. The `studydesk` CLI is a thin layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **State**: six JSON slices held by [`StateStore`], each written through
//!   a [`KvStore`] (SQLite [`Database`] in production, [`MemoryStore`] in tests)
//! - **Timer Engine**: a caller-driven state machine fed one-second ticks
//! - **Config**: TOML file for presentation and logging preferences
//!
//! ## Key Components
//!
//! - [`PomodoroEngine`]: Pomodoro state machine
//! - [`TaskBoard`], [`Calendar`], [`ResourceLibrary`]: slice editors
//! - [`Summary`]: dashboard numbers

pub mod calendar;
pub mod clock;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod resources;
pub mod state;
pub mod storage;
pub mod task;
pub mod timer;

pub use calendar::{Calendar, CalendarEvent, EventLog, MonthCursor, MonthGrid};
pub use clock::{Clock, FixedClock, SystemClock};
pub use dashboard::Summary;
pub use error::{ConfigError, CoreError, ImportError, StorageError, ValidationError};
pub use events::Event;
pub use resources::{ClassSlot, ResourceLibrary, Resources, Schedule};
pub use state::{Slice, Snapshot, StateStore};
pub use storage::{Config, Database, KvStore, MemoryStore};
pub use task::{Priority, Task, TaskBoard, TaskFilter, TaskStatus};
pub use timer::{IntervalTicker, Phase, PomodoroConfig, PomodoroEngine, Progress, TimerState, ZenCountdown};
