//! Task types for the study board.
//!
//! A task lives in one of three board columns:
//!
//! ```text
//!   PENDING ──toggle──> COMPLETED ──toggle──> IN-PROGRESS
//!      │                    ^                      │
//!      └────── move ────────┴──────── move ────────┘
//! ```
//!
//! Toggling never returns a task to `pending`: un-completing lands it in
//! `in-progress`. Moving between columns leaves the completion flag alone.

mod board;

pub use board::{BoardCounts, BoardView, Filter, TaskBoard, TaskFilter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Board column of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Initial column for every new task
    #[default]
    Pending,
    /// Being worked on
    InProgress,
    /// Done
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" | "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        })
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

pub const DEFAULT_CATEGORY: &str = "general";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// A task on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Creation time in epoch milliseconds, unique within the slice
    pub id: u64,
    pub title: String,
    /// Optional due date
    #[serde(default)]
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    /// Free-form tag
    #[serde(default = "default_category")]
    pub category: String,
    pub completed: bool,
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    /// A task is overdue when its due date is strictly before `today` and it
    /// is not completed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due {
            Some(due) => due < today && !self.completed,
            None => false,
        }
    }

    /// Flip completion. Un-completing moves to `in-progress`, never `pending`.
    pub(crate) fn toggle(&mut self) {
        self.completed = !self.completed;
        self.status = if self.completed {
            TaskStatus::Completed
        } else {
            TaskStatus::InProgress
        };
    }
}
