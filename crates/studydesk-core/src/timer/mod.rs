mod engine;
mod pomodoro;
mod progress;
mod ticker;
mod zen;

pub use engine::{PomodoroEngine, TimerState};
pub use pomodoro::{Phase, PomodoroConfig, MAX_INTERVAL_MINUTES};
pub use progress::{goal_percentage, weekly_slot, DailyProgress, Progress, Rollover};
pub use ticker::{IntervalTicker, Tick, TickGuard, Ticker};
pub use zen::{ZenCountdown, ZEN_SECS};
