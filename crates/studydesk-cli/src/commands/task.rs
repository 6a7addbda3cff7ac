//! Task board commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use studydesk_core::task::{BoardView, Filter};
use studydesk_core::{Clock, Priority, SystemClock, Task, TaskBoard, TaskFilter, TaskStatus};

use super::{open_state, print_json, report, CmdResult, Output};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task title
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Free-form category
        #[arg(long, default_value = "general")]
        category: String,
    },
    /// Add a "Quick task" with default fields
    Quick,
    /// Show the board, optionally filtered
    List {
        /// pending, in-progress or completed
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Flip the completed flag
    Toggle {
        id: u64,
    },
    /// Move a task to another column
    Move {
        id: u64,
        status: TaskStatus,
    },
    /// Delete a task
    Delete {
        id: u64,
    },
}

pub fn run(action: TaskAction, out: Output) -> CmdResult {
    let clock = SystemClock;
    let mut state = open_state(&clock)?;
    let mut board = TaskBoard::new(&mut state);

    match action {
        TaskAction::Add {
            title,
            due,
            priority,
            category,
        } => match board.add(&title, due, priority, &category, &clock)? {
            Some(id) => created(out, &board, id)?,
            None => report(out, false, "", "skipped: empty title")?,
        },
        TaskAction::Quick => match board.add_quick(&clock)? {
            Some(id) => created(out, &board, id)?,
            None => report(out, false, "", "skipped")?,
        },
        TaskAction::List {
            status,
            priority,
            category,
        } => {
            let filter = TaskFilter {
                status: Filter::from(status),
                priority: Filter::from(priority),
                category: Filter::from(category),
            };
            let view = board.filter(&filter);
            if out.json {
                print_json(&view)?;
            } else {
                print_board(&view, clock.today());
                let counts = board.counts();
                println!(
                    "\n{} tasks, {} completed, {} pending",
                    counts.total, counts.completed, counts.pending
                );
            }
        }
        TaskAction::Toggle { id } => match board.toggle_completion(id)? {
            Some(completed) if out.json => print_json(&serde_json::json!({ "id": id, "completed": completed }))?,
            Some(true) => println!("task {id} completed"),
            Some(false) => println!("task {id} reopened"),
            None => report(out, false, "", &format!("no task {id}"))?,
        },
        TaskAction::Move { id, status } => {
            let moved = board.set_status(id, status)?;
            report(out, moved, &format!("task {id} moved to {status}"), &format!("no task {id}"))?;
        }
        TaskAction::Delete { id } => {
            let deleted = board.delete(id)?;
            report(out, deleted, &format!("task {id} deleted"), &format!("no task {id}"))?;
        }
    }
    Ok(())
}

fn created(out: Output, board: &TaskBoard<'_>, id: u64) -> CmdResult {
    if out.json {
        if let Some(task) = board.get(id) {
            print_json(task)?;
        }
    } else {
        println!("Task created: {id}");
    }
    Ok(())
}

fn print_board(view: &BoardView<'_>, today: NaiveDate) {
    for status in TaskStatus::ALL {
        let column = view.column(status);
        println!("{} ({})", status.as_str().to_uppercase(), column.len());
        for task in column {
            println!("  {}", task_line(task, today));
        }
    }
}

fn task_line(task: &Task, today: NaiveDate) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!("[{mark}] {} {} ({}, {})", task.id, task.title, task.priority, task.category);
    if let Some(due) = task.due {
        line.push_str(&format!(" due {due}"));
        if task.is_overdue(today) {
            line.push_str(" OVERDUE");
        }
    }
    line
}
