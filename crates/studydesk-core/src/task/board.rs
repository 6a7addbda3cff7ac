use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use serde::Serialize;

use super::{Priority, Task, TaskStatus, DEFAULT_CATEGORY};
use crate::clock::Clock;
use crate::error::StorageError;
use crate::state::{Slice, StateStore};

/// Highest id handed out by this process. Ids never repeat, even after the
/// task holding one is deleted.
static LAST_ISSUED_ID: AtomicU64 = AtomicU64::new(0);

fn next_id(now_ms: u64, existing_max: u64) -> u64 {
    let floor = now_ms.max(existing_max.saturating_add(1));
    let mut prev = LAST_ISSUED_ID.load(Ordering::Relaxed);
    loop {
        let candidate = floor.max(prev.saturating_add(1));
        match LAST_ISSUED_ID.compare_exchange_weak(
            prev,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate,
            Err(actual) => prev = actual,
        }
    }
}

/// One filter criterion: everything, or an exact match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Filter<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(expected) => expected == value,
        }
    }
}

impl<T> From<Option<T>> for Filter<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Filter::All, Filter::Only)
    }
}

/// Status, priority and category filters, ANDed together.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Filter<TaskStatus>,
    pub priority: Filter<Priority>,
    pub category: Filter<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.matches(&task.status)
            && self.priority.matches(&task.priority)
            && self.category.matches(&task.category)
    }
}

/// Filtered tasks split into the three board columns, insertion order kept.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BoardView<'a> {
    pub pending: Vec<&'a Task>,
    pub in_progress: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

impl<'a> BoardView<'a> {
    pub fn from_tasks(tasks: &'a [Task], filter: &TaskFilter) -> Self {
        let mut view = BoardView::default();
        for task in tasks.iter().filter(|t| filter.matches(t)) {
            match task.status {
                TaskStatus::Pending => view.pending.push(task),
                TaskStatus::InProgress => view.in_progress.push(task),
                TaskStatus::Completed => view.completed.push(task),
            }
        }
        view
    }

    pub fn column(&self, status: TaskStatus) -> &[&'a Task] {
        match status {
            TaskStatus::Pending => &self.pending,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Completed => &self.completed,
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.in_progress.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Board counters. `pending` counts every task not flagged completed,
/// whatever its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BoardCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl BoardCounts {
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total: tasks.len(),
            completed,
            pending: tasks.len() - completed,
        }
    }
}

/// CRUD and column moves over the tasks slice.
///
/// Every mutation writes the tasks slice back before returning. Operations
/// addressed by an id that no longer exists do nothing.
pub struct TaskBoard<'a> {
    state: &'a mut StateStore,
}

impl<'a> TaskBoard<'a> {
    pub fn new(state: &'a mut StateStore) -> Self {
        Self { state }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.state.tasks.iter().find(|t| t.id == id)
    }

    /// Add a pending task. Returns `None` without touching anything when the
    /// title is blank.
    pub fn add(
        &mut self,
        title: &str,
        due: Option<NaiveDate>,
        priority: Priority,
        category: &str,
        clock: &dyn Clock,
    ) -> Result<Option<u64>, StorageError> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        let existing_max = self.state.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        let id = next_id(clock.now_ms(), existing_max);
        let category = match category.trim() {
            "" => DEFAULT_CATEGORY.to_string(),
            c => c.to_string(),
        };

        self.state.tasks.push(Task {
            id,
            title: title.to_string(),
            due,
            priority,
            category,
            completed: false,
            status: TaskStatus::Pending,
        });
        self.state.save(Slice::Tasks)?;
        tracing::debug!(id, "task added");
        Ok(Some(id))
    }

    /// One-click capture with default fields.
    pub fn add_quick(&mut self, clock: &dyn Clock) -> Result<Option<u64>, StorageError> {
        self.add("Quick task", None, Priority::default(), DEFAULT_CATEGORY, clock)
    }

    /// Flip completion of a task. Returns the new flag, or `None` if the id
    /// is unknown.
    pub fn toggle_completion(&mut self, id: u64) -> Result<Option<bool>, StorageError> {
        let Some(task) = self.state.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        task.toggle();
        let completed = task.completed;
        self.state.save(Slice::Tasks)?;
        tracing::debug!(id, completed, "task toggled");
        Ok(Some(completed))
    }

    /// Move a task to another column without touching its completion flag.
    pub fn set_status(&mut self, id: u64, status: TaskStatus) -> Result<bool, StorageError> {
        let Some(task) = self.state.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.status = status;
        self.state.save(Slice::Tasks)?;
        tracing::debug!(id, %status, "task moved");
        Ok(true)
    }

    pub fn delete(&mut self, id: u64) -> Result<bool, StorageError> {
        let before = self.state.tasks.len();
        self.state.tasks.retain(|t| t.id != id);
        if self.state.tasks.len() == before {
            return Ok(false);
        }
        self.state.save(Slice::Tasks)?;
        tracing::debug!(id, "task deleted");
        Ok(true)
    }

    pub fn filter(&self, filter: &TaskFilter) -> BoardView<'_> {
        BoardView::from_tasks(&self.state.tasks, filter)
    }

    pub fn counts(&self) -> BoardCounts {
        BoardCounts::of(&self.state.tasks)
    }
}
