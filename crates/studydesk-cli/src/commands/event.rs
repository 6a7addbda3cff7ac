//! Calendar commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use studydesk_core::calendar::DayCell;
use studydesk_core::{Calendar, Clock, MonthCursor, SystemClock};

use super::{open_state, print_json, report, CmdResult, Output};

#[derive(Subcommand)]
pub enum EventAction {
    /// Add an event to a date
    Add {
        /// Date (YYYY-MM-DD)
        date: NaiveDate,
        /// Time (HH:MM)
        time: String,
        /// Event title
        title: String,
        /// Optional description
        #[arg(long, default_value = "")]
        desc: String,
    },
    /// List the events of a date (default: today)
    List {
        date: Option<NaiveDate>,
    },
    /// Delete an event by its position in `event list`
    Delete {
        date: NaiveDate,
        /// 0-based index
        index: usize,
    },
    /// Draw a month grid
    Month {
        /// Month to show (YYYY-MM), default: current month
        month: Option<String>,
        /// Months to step forward (negative steps back)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i32,
    },
}

pub fn run(action: EventAction, out: Output) -> CmdResult {
    let clock = SystemClock;
    let today = clock.today();
    let mut state = open_state(&clock)?;
    let mut calendar = Calendar::new(&mut state);

    match action {
        EventAction::Add {
            date,
            time,
            title,
            desc,
        } => {
            let added = calendar.add_event(date, &time, &title, &desc)?;
            report(out, added, &format!("event added on {date}"), "skipped: time and title are required")?;
        }
        EventAction::List { date } => {
            let date = date.unwrap_or(today);
            let events = calendar.events_on(date);
            if out.json {
                print_json(events)?;
            } else if events.is_empty() {
                println!("no events on {date}");
            } else {
                for (index, event) in events.iter().enumerate() {
                    println!("{index}: {} {}", event.time, event.title);
                    if !event.desc.is_empty() {
                        println!("     {}", event.desc);
                    }
                }
            }
        }
        EventAction::Delete { date, index } => {
            let deleted = calendar.delete_event(date, index)?;
            report(out, deleted, "event deleted", &format!("no event {index} on {date}"))?;
        }
        EventAction::Month { month, offset } => {
            let anchor = match month {
                Some(m) => parse_month(&m)?,
                None => today,
            };
            let mut cursor = MonthCursor::containing(anchor);
            for _ in 0..offset.unsigned_abs() {
                cursor = if offset < 0 { cursor.prev() } else { cursor.next() };
            }

            let grid = cursor.grid()?;
            let cells = grid.cells(state.events(), today);
            if out.json {
                print_json(&serde_json::json!({ "grid": grid, "cells": cells }))?;
            } else {
                println!("{}", grid.first_day().format("%B %Y"));
                print_month(grid.leading_blanks, &cells);
            }
        }
    }
    Ok(())
}

fn parse_month(value: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .map_err(|e| format!("invalid month '{value}' (expected YYYY-MM): {e}").into())
}

/// `[dd]` marks today, `*` a day with events.
fn print_month(leading_blanks: u32, cells: &[DayCell]) {
    println!(" Mo   Tu   We   Th   Fr   Sa   Su");
    let mut line = "     ".repeat(leading_blanks as usize);
    let mut column = leading_blanks;
    for cell in cells {
        let day = chrono::Datelike::day(&cell.date);
        let marker = if cell.has_events { '*' } else { ' ' };
        if cell.is_today {
            line.push_str(&format!("[{day:>2}]{marker}"));
        } else {
            line.push_str(&format!(" {day:>2} {marker}"));
        }
        column += 1;
        if column % 7 == 0 {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }
}
