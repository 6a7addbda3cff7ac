//! Month grid with Monday-first weeks.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::EventLog;
use crate::error::ValidationError;

/// Layout of one month: blank cells before day 1, then the days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    /// 0-based month (January = 0)
    pub month0: u32,
    /// Blank cells before day 1 (Monday-first week)
    pub leading_blanks: u32,
    pub days_in_month: u32,
}

/// One day cell of a rendered month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub has_events: bool,
    pub is_today: bool,
}

impl MonthGrid {
    /// # Errors
    /// Returns an error if `month0` is not in `0..12` or the year is outside
    /// chrono's range.
    pub fn new(year: i32, month0: u32) -> Result<Self, ValidationError> {
        let first = first_of_month(year, month0)?;
        let next = if month0 == 11 {
            first_of_month(year + 1, 0)?
        } else {
            first_of_month(year, month0 + 1)?
        };

        Ok(Self {
            year,
            month0,
            leading_blanks: first.weekday().num_days_from_monday(),
            days_in_month: (next - first).num_days() as u32,
        })
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1).unwrap_or_default()
    }

    /// Day cells in order, flagged with event presence and today.
    pub fn cells(&self, events: &EventLog, today: NaiveDate) -> Vec<DayCell> {
        self.first_day()
            .iter_days()
            .take(self.days_in_month as usize)
            .map(|date| DayCell {
                date,
                has_events: events.get(&date).is_some_and(|day| !day.is_empty()),
                is_today: date == today,
            })
            .collect()
    }

    /// Number of week rows needed to draw the month.
    pub fn weeks(&self) -> u32 {
        (self.leading_blanks + self.days_in_month).div_ceil(7)
    }
}

fn first_of_month(year: i32, month0: u32) -> Result<NaiveDate, ValidationError> {
    if month0 > 11 {
        return Err(ValidationError::invalid(
            "month",
            format!("{month0} is not a 0-based month"),
        ));
    }
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .ok_or_else(|| ValidationError::invalid("year", format!("{year} is out of range")))
}

/// The month currently shown, with previous/next navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    pub year: i32,
    pub month0: u32,
}

impl MonthCursor {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    pub fn prev(self) -> Self {
        if self.month0 == 0 {
            Self {
                year: self.year - 1,
                month0: 11,
            }
        } else {
            Self {
                month0: self.month0 - 1,
                ..self
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month0 == 11 {
            Self {
                year: self.year + 1,
                month0: 0,
            }
        } else {
            Self {
                month0: self.month0 + 1,
                ..self
            }
        }
    }

    pub fn grid(self) -> Result<MonthGrid, ValidationError> {
        MonthGrid::new(self.year, self.month0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarEvent;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_starting_wednesday_has_two_blanks() {
        // April 2026 starts on a Wednesday.
        let grid = MonthGrid::new(2026, 3).unwrap();
        assert_eq!(grid.leading_blanks, 2);
        assert_eq!(grid.days_in_month, 30);
    }

    #[test]
    fn month_starting_sunday_has_six_blanks() {
        // February 2026 starts on a Sunday.
        let grid = MonthGrid::new(2026, 1).unwrap();
        assert_eq!(grid.leading_blanks, 6);
        assert_eq!(grid.days_in_month, 28);
        assert_eq!(grid.weeks(), 5);
    }

    #[test]
    fn month_starting_monday_has_no_blanks() {
        // June 2026 starts on a Monday.
        assert_eq!(MonthGrid::new(2026, 5).unwrap().leading_blanks, 0);
    }

    #[test]
    fn leap_february_and_december() {
        assert_eq!(MonthGrid::new(2028, 1).unwrap().days_in_month, 29);
        assert_eq!(MonthGrid::new(2026, 11).unwrap().days_in_month, 31);
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(MonthGrid::new(2026, 12).is_err());
    }

    #[test]
    fn cells_flag_events_and_today() {
        let mut events = EventLog::new();
        events.insert(
            date(2026, 4, 9),
            vec![CalendarEvent {
                time: "09:00".into(),
                title: "Exam".into(),
                desc: String::new(),
            }],
        );
        let cells = MonthGrid::new(2026, 3)
            .unwrap()
            .cells(&events, date(2026, 4, 2));

        assert_eq!(cells.len(), 30);
        assert!(cells[8].has_events);
        assert!(cells[1].is_today);
        assert_eq!(cells.iter().filter(|c| c.has_events).count(), 1);
    }

    #[test]
    fn cursor_wraps_years() {
        let jan = MonthCursor::containing(date(2026, 1, 15));
        assert_eq!(jan.prev(), MonthCursor { year: 2025, month0: 11 });
        assert_eq!(jan.prev().next(), jan);
        let dec = MonthCursor { year: 2026, month0: 11 };
        assert_eq!(dec.next(), MonthCursor { year: 2027, month0: 0 });
    }
}
