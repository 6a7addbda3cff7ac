use clap::Subcommand;
use studydesk_core::{ResourceLibrary, SystemClock};

use super::{open_state, print_json, report, CmdResult, Output};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Show the weekly schedule, or one day of it
    List {
        /// Day name, e.g. monday
        day: Option<String>,
    },
    /// Append a class to a day
    Add {
        day: String,
        /// Time (HH:MM)
        time: String,
        subject: String,
    },
}

pub fn run(action: ScheduleAction, out: Output) -> CmdResult {
    let mut state = open_state(&SystemClock)?;

    match action {
        ScheduleAction::List { day } => {
            let schedule = state.schedule();
            let days: Vec<_> = schedule
                .iter()
                .filter(|(name, _)| day.as_deref().map_or(true, |d| d.eq_ignore_ascii_case(name)))
                .collect();
            if out.json {
                match day {
                    Some(_) => print_json(&days.first().map(|(_, classes)| *classes))?,
                    None => print_json(schedule)?,
                }
            } else {
                for (name, classes) in days {
                    println!("{name}");
                    if classes.is_empty() {
                        println!("  no classes");
                    }
                    for class in classes {
                        println!("  {} {}", class.time, class.subject);
                    }
                }
            }
        }
        ScheduleAction::Add { day, time, subject } => {
            let added = ResourceLibrary::new(&mut state).add_schedule_entry(&day, &time, &subject)?;
            report(out, added, &format!("added to {day}"), "skipped: day, time and subject are required")?;
        }
    }
    Ok(())
}
