use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::MonthRange;
use crate::task::Task;

/// The task list page: what is due and still open, plus everything carried
/// forward regardless of date.
#[derive(Debug, Clone, Serialize)]
pub struct TaskBoard {
    pub today: NaiveDate,
    pub pending: Vec<Task>,
    pub carried_forward: Vec<Task>,
}

/// Completed and carried-forward tasks due within one calendar month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlySummary {
    pub month: MonthRange,
    pub completed: Vec<Task>,
    pub carried_forward: Vec<Task>,
}

impl MonthlySummary {
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.carried_forward.is_empty()
    }
}
