//! Daily hours, the rolling week and the goal streak.
//!
//! ## Rollover
//!
//! ```text
//! daily.date != today
//!   -> streak = hours >= goal ? streak + 1 : 0
//!   -> days skipped in between: streak = 0 (unless goal <= 0)
//!   -> weekly[slot(daily.date)] += hours
//!   -> daily = { today, 0 }
//! ```
//!
//! The week slot is taken from the day that just ended, Monday = 0 through
//! Sunday = 6. A skipped day had zero hours, so it only keeps the streak
//! alive when the goal is zero.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Hours studied on one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub hours: f64,
}

/// The progress slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub daily: DailyProgress,
    /// Hours per weekday, Monday first
    pub weekly: [f64; 7],
    /// Consecutive days the goal was met
    pub streak: u32,
}

/// What a rollover did, for the caller to report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rollover {
    pub finished_date: NaiveDate,
    pub finished_hours: f64,
    pub goal_met: bool,
    pub slot: usize,
    pub streak: u32,
}

/// Week slot of a date: Monday = 0 ... Sunday = 6.
pub fn weekly_slot(date: NaiveDate) -> usize {
    match date.weekday() {
        Weekday::Sun => 6,
        other => other.num_days_from_monday() as usize,
    }
}

/// Share of the goal reached, in percent, saturated at 100.
///
/// A goal of zero (or less) counts as met, so it reports 100.
pub fn goal_percentage(hours: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        return 100.0;
    }
    (hours / goal * 100.0).clamp(0.0, 100.0)
}

impl Progress {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            daily: DailyProgress {
                date: today,
                hours: 0.0,
            },
            weekly: [0.0; 7],
            streak: 0,
        }
    }

    /// Close out the stored day if it is not `today`.
    ///
    /// Returns `None` when the stored day is already today.
    pub fn check_daily_reset(&mut self, today: NaiveDate, goal: f64) -> Option<Rollover> {
        if self.daily.date == today {
            return None;
        }

        let finished = self.daily;
        let goal_met = finished.hours >= goal;
        self.streak = if goal_met { self.streak + 1 } else { 0 };

        let skipped = today
            .signed_duration_since(finished.date)
            .num_days()
            .saturating_sub(1)
            .max(0);
        if skipped > 0 {
            self.streak = if goal <= 0.0 {
                self.streak.saturating_add(u32::try_from(skipped).unwrap_or(u32::MAX))
            } else {
                0
            };
        }

        let slot = weekly_slot(finished.date);
        self.weekly[slot] += finished.hours;

        self.daily = DailyProgress {
            date: today,
            hours: 0.0,
        };

        Some(Rollover {
            finished_date: finished.date,
            finished_hours: finished.hours,
            goal_met,
            slot,
            streak: self.streak,
        })
    }

    pub fn add_hours(&mut self, hours: f64) {
        self.daily.hours += hours;
    }

    pub fn goal_percentage(&self, goal: f64) -> f64 {
        goal_percentage(self.daily.hours, goal)
    }

    pub fn weekly_total(&self) -> f64 {
        self.weekly.iter().sum()
    }

    /// Largest slot, never below 1.0 so bar charts can divide by it.
    pub fn weekly_max(&self) -> f64 {
        self.weekly.iter().copied().fold(1.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn slots_are_monday_first() {
        assert_eq!(weekly_slot(date(2026, 3, 2)), 0); // Monday
        assert_eq!(weekly_slot(date(2026, 3, 6)), 4); // Friday
        assert_eq!(weekly_slot(date(2026, 3, 8)), 6); // Sunday
    }

    #[test]
    fn met_goal_extends_streak_and_fills_slot() {
        // Tuesday -> Wednesday
        let mut p = Progress::new(date(2026, 3, 3));
        p.daily.hours = 1.5;
        p.streak = 2;

        let r = p.check_daily_reset(date(2026, 3, 4), 1.5).unwrap();
        assert!(r.goal_met);
        assert_eq!(r.slot, 1);
        assert_eq!(p.streak, 3);
        assert_eq!(p.weekly[1], 1.5);
        assert_eq!(p.daily, DailyProgress { date: date(2026, 3, 4), hours: 0.0 });
    }

    #[test]
    fn sunday_rollover_lands_in_last_slot() {
        let mut p = Progress::new(date(2026, 3, 8));
        p.daily.hours = 1.5;

        let r = p.check_daily_reset(date(2026, 3, 9), 1.5).unwrap();
        assert_eq!(r.slot, 6);
        assert_eq!(p.weekly, [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.5]);
        assert_eq!(p.streak, 1);
    }

    #[test]
    fn missed_goal_resets_streak() {
        let mut p = Progress::new(date(2026, 3, 3));
        p.daily.hours = 1.0;
        p.streak = 7;

        let r = p.check_daily_reset(date(2026, 3, 4), 1.5).unwrap();
        assert!(!r.goal_met);
        assert_eq!(p.streak, 0);
        assert_eq!(p.weekly[1], 1.0);
    }

    #[test]
    fn skipped_days_break_the_streak() {
        // Monday goal met, next open on Thursday
        let mut p = Progress::new(date(2026, 3, 2));
        p.daily.hours = 2.0;
        p.streak = 4;

        let r = p.check_daily_reset(date(2026, 3, 5), 1.5).unwrap();
        assert!(r.goal_met);
        assert_eq!(r.slot, 0);
        assert_eq!(r.streak, 0);
        assert_eq!(p.streak, 0);
        assert_eq!(p.weekly[0], 2.0);
    }

    #[test]
    fn skipped_days_count_as_met_with_zero_goal() {
        let mut p = Progress::new(date(2026, 3, 2));
        p.streak = 1;

        p.check_daily_reset(date(2026, 3, 5), 0.0).unwrap();
        // Monday itself plus Tuesday and Wednesday
        assert_eq!(p.streak, 4);
    }

    #[test]
    fn same_day_is_untouched() {
        let mut p = Progress::new(date(2026, 3, 3));
        p.daily.hours = 0.5;
        assert!(p.check_daily_reset(date(2026, 3, 3), 1.5).is_none());
        assert_eq!(p.daily.hours, 0.5);
    }

    #[test]
    fn percentage_guards_zero_goal() {
        assert_eq!(goal_percentage(0.0, 0.0), 100.0);
        assert_eq!(goal_percentage(0.75, 1.5), 50.0);
        assert_eq!(goal_percentage(4.0, 1.5), 100.0);
    }

    #[test]
    fn weekly_max_has_floor_of_one() {
        let mut p = Progress::new(date(2026, 3, 3));
        assert_eq!(p.weekly_max(), 1.0);
        p.weekly[2] = 2.5;
        p.weekly[4] = 0.5;
        assert_eq!(p.weekly_max(), 2.5);
        assert_eq!(p.weekly_total(), 3.0);
    }
}
