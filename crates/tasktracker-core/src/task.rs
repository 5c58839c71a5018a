use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::form::TaskFields;

/// Lifecycle position of a task, derived from its two persisted flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Created and never edited: neither completed nor carried forward.
    New,
    Completed,
    CarriedForward,
}

impl TaskState {
    /// `completed` wins when storage holds both flags set.
    pub fn from_flags(completed: bool, carried_forward: bool) -> Self {
        match (completed, carried_forward) {
            (true, _) => TaskState::Completed,
            (false, true) => TaskState::CarriedForward,
            (false, false) => TaskState::New,
        }
    }

    /// Machine name, used as the CSS class of a task row.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::New => "new",
            TaskState::Completed => "completed",
            TaskState::CarriedForward => "carried_forward",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TaskState::New => "New",
            TaskState::Completed => "Completed",
            TaskState::CarriedForward => "Carried Forward",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub carried_forward: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn state(&self) -> TaskState {
        TaskState::from_flags(self.completed, self.carried_forward)
    }
}

/// Insert payload. Storage assigns the id; both flags start out false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl CreateTask {
    pub fn new(fields: TaskFields, created_at: DateTime<Utc>) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            due_date: fields.due_date,
            created_at,
        }
    }
}

/// Full rewrite of the mutable columns of one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub carried_forward: bool,
}

impl UpdateTask {
    /// Every edit re-derives `carried_forward` from completion alone,
    /// regardless of how the due date compares to today.
    pub fn with_completion(fields: TaskFields, completed: bool) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            due_date: fields.due_date,
            completed,
            carried_forward: !completed,
        }
    }
}

/// Conjunctive filter over the task table. `None` leaves a column
/// unconstrained; date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub completed: Option<bool>,
    pub carried_forward: Option<bool>,
    pub due_on_or_after: Option<NaiveDate>,
    pub due_on_or_before: Option<NaiveDate>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.completed.map_or(true, |c| task.completed == c)
            && self.carried_forward.map_or(true, |c| task.carried_forward == c)
            && self.due_on_or_after.map_or(true, |d| task.due_date >= d)
            && self.due_on_or_before.map_or(true, |d| task.due_date <= d)
    }
}
