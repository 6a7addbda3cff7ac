//! Read-only summary for the dashboard view.

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::events_on;
use crate::error::StorageError;
use crate::state::StateStore;
use crate::task::BoardCounts;
use crate::timer::Rollover;

/// Today's numbers at a glance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub date: NaiveDate,
    pub daily_hours: f64,
    pub goal_hours: f64,
    pub goal_pct: f64,
    pub streak: u32,
    /// Monday first
    pub weekly: [f64; 7],
    pub weekly_total: f64,
    pub weekly_max: f64,
    pub tasks: BoardCounts,
    pub overdue_tasks: usize,
    pub events_today: usize,
}

impl Summary {
    /// Build the summary from whatever is loaded, without rolling over.
    pub fn compute(state: &StateStore, today: NaiveDate) -> Self {
        let progress = state.progress();
        let goal = state.pomodoro().goal;
        Self {
            date: today,
            daily_hours: progress.daily.hours,
            goal_hours: goal,
            goal_pct: progress.goal_percentage(goal),
            streak: progress.streak,
            weekly: progress.weekly,
            weekly_total: progress.weekly_total(),
            weekly_max: progress.weekly_max(),
            tasks: BoardCounts::of(state.tasks()),
            overdue_tasks: state.tasks().iter().filter(|t| t.is_overdue(today)).count(),
            events_today: events_on(state.events(), today).len(),
        }
    }

    /// Roll the day over if needed, then compute.
    pub fn refresh(state: &mut StateStore, today: NaiveDate) -> Result<(Self, Option<Rollover>), StorageError> {
        let rollover = state.refresh_progress(today)?;
        Ok((Self::compute(state, today), rollover))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Calendar;
    use crate::clock::{Clock, FixedClock};
    use crate::storage::MemoryStore;
    use crate::task::{Priority, TaskBoard};

    #[test]
    fn summary_counts_tasks_and_events() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());
        let today = clock.today();
        let mut state = StateStore::load(Box::new(MemoryStore::new()), &clock).unwrap();

        let mut board = TaskBoard::new(&mut state);
        let late = board
            .add("Lab report", today.pred_opt(), Priority::High, "chemistry", &clock)
            .unwrap()
            .unwrap();
        let done = board.add("Flashcards", None, Priority::Low, "", &clock).unwrap().unwrap();
        board.toggle_completion(done).unwrap();
        assert!(board.get(late).is_some());

        let mut calendar = Calendar::new(&mut state);
        calendar.add_event(today, "09:00", "Exam", "").unwrap();
        calendar.add_event(today.succ_opt().unwrap(), "09:00", "Tutoring", "").unwrap();

        state.progress.daily.hours = 0.75;
        let summary = Summary::compute(&state, today);
        assert_eq!(summary.tasks.total, 2);
        assert_eq!(summary.tasks.completed, 1);
        assert_eq!(summary.tasks.pending, 1);
        assert_eq!(summary.overdue_tasks, 1);
        assert_eq!(summary.events_today, 1);
        assert_eq!(summary.goal_pct, 50.0);
        assert_eq!(summary.weekly_max, 1.0);
    }

    #[test]
    fn refresh_rolls_over_first() {
        let mut clock = FixedClock::new(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());
        let mut state = StateStore::load(Box::new(MemoryStore::new()), &clock).unwrap();
        state.progress.daily.hours = 1.5;
        clock.advance_day();

        let (summary, rollover) = Summary::refresh(&mut state, clock.today()).unwrap();
        assert_eq!(rollover.map(|r| r.slot), Some(1));
        assert_eq!(summary.daily_hours, 0.0);
        assert_eq!(summary.streak, 1);
        assert_eq!(summary.weekly[1], 1.5);
    }
}
