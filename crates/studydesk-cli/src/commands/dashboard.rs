use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use studydesk_core::{Clock, Config, Summary, SystemClock};

use super::{open_state, print_json, CmdResult, Output};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const BAR_WIDTH: f64 = 20.0;

pub fn run(out: Output, config: &Config) -> CmdResult {
    let clock = SystemClock;
    let mut state = open_state(&clock)?;
    let (summary, _) = Summary::refresh(&mut state, clock.today())?;

    if out.json {
        return print_json(&summary);
    }

    println!("{}", heading(summary.date, &config.ui.date_format));
    println!(
        "Study today: {:.2} / {} h ({:.0}%)  streak {} day(s)",
        summary.daily_hours, summary.goal_hours, summary.goal_pct, summary.streak
    );
    println!(
        "Tasks: {} pending, {} completed, {} overdue",
        summary.tasks.pending, summary.tasks.completed, summary.overdue_tasks
    );
    println!("Events today: {}", summary.events_today);
    println!("\nThis week ({:.2} h)", summary.weekly_total);
    for (label, hours) in WEEKDAYS.iter().zip(summary.weekly) {
        let width = (hours / summary.weekly_max * BAR_WIDTH).round() as usize;
        println!("  {label} {:<20} {hours:.2}", "#".repeat(width));
    }
    Ok(())
}

/// Date heading in the configured format, ISO when the format is invalid.
fn heading(date: NaiveDate, format: &str) -> String {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        tracing::warn!(format, "invalid ui.date_format");
        return date.to_string();
    }
    date.format_with_items(items.into_iter()).to_string()
}
